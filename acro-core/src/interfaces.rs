//! Capabilities the maneuver borrows from the rest of the flight stack.
//!
//! Commands are fire-and-forget; the next tick's command supersedes the last.

use crate::types::{Centidegrees, FlightMode, ModeReason, SpoolState};

pub trait AttitudeCommander {
    /// `throttle` is in [0, 1].
    fn set_throttle(&mut self, throttle: f32, use_filter: bool);

    /// Earth-frame roll and pitch angles with a yaw rate (cd, cd, cd/s).
    fn command_angles(&mut self, roll_cd: f32, pitch_cd: f32, yaw_rate_cds: f32);

    /// Body-frame rates (cd/s).
    fn command_rates(&mut self, roll_rate_cds: f32, pitch_rate_cds: f32, yaw_rate_cds: f32);
}

pub trait AttitudeFeedback {
    /// Latest pitch estimate, positive nose up.
    fn current_pitch(&self) -> Centidegrees;
}

pub trait SpoolController {
    fn request_spool_state(&mut self, state: SpoolState);
}

pub trait ModeDispatcher {
    fn is_armed(&self) -> bool;
    fn is_landed(&self) -> bool;
    fn current_mode(&self) -> FlightMode;
    /// Returns `false` if the dispatcher refused the change.
    fn request_mode_change(&mut self, mode: FlightMode, reason: ModeReason) -> bool;
}

/// Everything the maneuver controller needs from the vehicle.
pub trait Vehicle: AttitudeCommander + AttitudeFeedback + SpoolController + ModeDispatcher {}

impl<T> Vehicle for T where T: AttitudeCommander + AttitudeFeedback + SpoolController + ModeDispatcher {}
