//! Error types for the maneuver entry path. The per-tick loop never fails.

use thiserror::Error;

use crate::types::{Centidegrees, FlightMode};

/// Rejected maneuver configuration.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    #[error("maneuver configuration contains a non-finite value")]
    NonFinite,

    #[error("fall distance must not be negative")]
    NegativeFallDistance,

    #[error("turn radius must not be negative")]
    NegativeTurnRadius,

    #[error("tick rate must be positive")]
    NonPositiveTickRate,
}

/// Reasons the maneuver refused to start.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EntryRejection {
    #[error("maneuver not allowed from {0:?}")]
    ModeDisallowed(FlightMode),

    #[error("throttle is zero in a manual-throttle mode")]
    ThrottleZero,

    #[error("roll input {0} cd is too large")]
    RollInputTooLarge(Centidegrees),

    #[error("motors are not armed")]
    NotArmed,

    #[error("vehicle is landed")]
    Landed,

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("unknown flight mode")]
pub struct UnknownFlightMode;
