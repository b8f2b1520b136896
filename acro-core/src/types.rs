// types.rs
use core::str::FromStr;

use crate::error::UnknownFlightMode;

/// Attitude angles in centidegrees, as reported by the attitude estimator.
pub type Centidegrees = i32;

/// Control ticks counted by the maneuver.
pub type Ticks = u32;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ManeuverStage {
    Start = 0,    // Placeholder until entry succeeds
    Dive = 1,     // Nose down, near-idle throttle, counting down the fall
    Noseup = 2,   // Pull-up at the derived pitch rate
    Coasting = 3, // Nose above the horizon, hand back to AltHold
    Abandon = 4,  // Cancelled from outside, restore the prior mode
}

/// Mode identifiers understood by the flight-mode dispatcher.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlightMode {
    Stabilize = 0,
    Acro = 1,
    AltHold = 2,
    FlowHold = 3,
    Loiter = 4,
    Land = 5,
    Maneuver = 6,
}

impl FlightMode {
    /// Modes the maneuver may be entered from.
    pub const fn allows_maneuver(&self) -> bool {
        matches!(
            self,
            FlightMode::Acro | FlightMode::Stabilize | FlightMode::AltHold | FlightMode::FlowHold
        )
    }

    /// Modes where the pilot owns throttle directly, so a zero stick means
    /// the motors are not producing lift.
    pub const fn is_low_authority(&self) -> bool {
        matches!(self, FlightMode::Acro | FlightMode::Stabilize)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            FlightMode::Stabilize => "stabilize",
            FlightMode::Acro => "acro",
            FlightMode::AltHold => "alt_hold",
            FlightMode::FlowHold => "flow_hold",
            FlightMode::Loiter => "loiter",
            FlightMode::Land => "land",
            FlightMode::Maneuver => "maneuver",
        }
    }
}

impl FromStr for FlightMode {
    type Err = UnknownFlightMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [FlightMode; 7] = [
            FlightMode::Stabilize,
            FlightMode::Acro,
            FlightMode::AltHold,
            FlightMode::FlowHold,
            FlightMode::Loiter,
            FlightMode::Land,
            FlightMode::Maneuver,
        ];
        ALL.into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or(UnknownFlightMode)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeReason {
    Unknown,
    ManeuverComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpoolState {
    GroundIdle,
    ThrottleUnlimited,
}

/// Something the caller may want to know about after a tick.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ManeuverEvent {
    None,
    /// Fall counter exhausted; the pull-up starts from this pitch.
    DiveComplete { reference_pitch: Centidegrees },
    /// Nose crossed the horizon during the pull-up.
    NoseAboveHorizon,
    /// Dispatcher accepted the hand-off after coasting.
    Completed { mode: FlightMode },
    /// Maneuver was cancelled and control went back to `mode`.
    Abandoned { mode: FlightMode },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ManeuverOutcome {
    Completed(FlightMode),
    Abandoned(FlightMode),
}

/// Pilot stick state sampled when the maneuver is requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PilotInput {
    pub roll_cd: Centidegrees,
    pub throttle_zero: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_round_trip_by_name() {
        assert_eq!("alt_hold".parse::<FlightMode>(), Ok(FlightMode::AltHold));
        assert_eq!("ACRO".parse::<FlightMode>(), Ok(FlightMode::Acro));
        assert_eq!("sport".parse::<FlightMode>(), Err(UnknownFlightMode));
    }

    #[test]
    fn test_allowed_entry_modes() {
        assert!(FlightMode::Stabilize.allows_maneuver());
        assert!(FlightMode::FlowHold.allows_maneuver());
        assert!(!FlightMode::Loiter.allows_maneuver());
        assert!(!FlightMode::Maneuver.allows_maneuver());
    }
}
