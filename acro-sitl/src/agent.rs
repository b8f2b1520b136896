use acro_core::{
    AttitudeCommander, AttitudeFeedback, Centidegrees, FlightMode, ModeDispatcher, ModeReason,
    SpoolController, SpoolState,
};

/// How fast the simulated attitude loop can rotate toward an angle target (cd/s).
const ANGLE_SLEW_CDS: f32 = 36_000.0;

/// Rate authority left with the motors at zero throttle.
const MIN_RATE_AUTHORITY: f32 = 0.3;

const GRAVITY_MSS: f32 = 9.8;

/// Thrust-to-weight ratio at full throttle.
const MAX_THRUST_TO_WEIGHT: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum AttitudeTarget {
    Hold,
    Angle(f32),
    Rate(f32),
}

/// A single-axis multirotor: pitch follows the last attitude command and
/// altitude follows gravity and thrust along the body axis.
pub struct SimVehicle {
    pitch_cd: f32,
    altitude_m: f32,
    climb_rate_ms: f32,
    throttle: f32,
    target: AttitudeTarget,
    spool: SpoolState,
    armed: bool,
    mode: FlightMode,
    /// Scales how much of a commanded rate the airframe can actually deliver.
    pitch_authority: f32,
    refused_modes: Vec<FlightMode>,
    mode_log: Vec<(FlightMode, ModeReason, bool)>,
}

impl SimVehicle {
    pub fn new(mode: FlightMode, altitude_m: f32, pitch_authority: f32) -> Self {
        Self {
            pitch_cd: 0.0,
            altitude_m,
            climb_rate_ms: 0.0,
            throttle: 0.5,
            target: AttitudeTarget::Hold,
            spool: SpoolState::GroundIdle,
            armed: true,
            mode,
            pitch_authority,
            refused_modes: Vec::new(),
            mode_log: Vec::new(),
        }
    }

    /// Makes the dispatcher refuse `mode`.
    pub fn refuse_mode(&mut self, mode: FlightMode) {
        self.refused_modes.push(mode);
    }

    /// Advances the airframe by `dt` seconds using the latest commands.
    pub fn step(&mut self, dt: f32) {
        match self.target {
            AttitudeTarget::Hold => {}
            AttitudeTarget::Angle(target) => {
                let max_step = ANGLE_SLEW_CDS * dt;
                let error = target - self.pitch_cd;
                self.pitch_cd += error.clamp(-max_step, max_step);
            }
            AttitudeTarget::Rate(rate) => {
                let authority =
                    (MIN_RATE_AUTHORITY + (1.0 - MIN_RATE_AUTHORITY) * self.throttle) * self.pitch_authority;
                self.pitch_cd += rate * authority * dt;
            }
        }
        self.pitch_cd = self.pitch_cd.clamp(-18_000.0, 18_000.0);

        let thrust = if self.spool == SpoolState::ThrottleUnlimited {
            self.throttle * MAX_THRUST_TO_WEIGHT * GRAVITY_MSS
        } else {
            0.0
        };
        let vertical_thrust = thrust * (self.pitch_cd / 100.0).to_radians().cos();
        self.climb_rate_ms += (vertical_thrust - GRAVITY_MSS) * dt;
        self.altitude_m += self.climb_rate_ms * dt;
    }

    pub fn pitch_cd(&self) -> f32 {
        self.pitch_cd
    }

    pub fn altitude_m(&self) -> f32 {
        self.altitude_m
    }

    pub fn climb_rate_ms(&self) -> f32 {
        self.climb_rate_ms
    }

    pub fn throttle(&self) -> f32 {
        self.throttle
    }

    pub fn mode_log(&self) -> &[(FlightMode, ModeReason, bool)] {
        &self.mode_log
    }
}

impl AttitudeCommander for SimVehicle {
    fn set_throttle(&mut self, throttle: f32, _use_filter: bool) {
        self.throttle = throttle.clamp(0.0, 1.0);
    }

    fn command_angles(&mut self, _roll_cd: f32, pitch_cd: f32, _yaw_rate_cds: f32) {
        self.target = AttitudeTarget::Angle(pitch_cd);
    }

    fn command_rates(&mut self, _roll_rate_cds: f32, pitch_rate_cds: f32, _yaw_rate_cds: f32) {
        self.target = AttitudeTarget::Rate(pitch_rate_cds);
    }
}

impl AttitudeFeedback for SimVehicle {
    fn current_pitch(&self) -> Centidegrees {
        self.pitch_cd.round() as Centidegrees
    }
}

impl SpoolController for SimVehicle {
    fn request_spool_state(&mut self, state: SpoolState) {
        self.spool = state;
    }
}

impl ModeDispatcher for SimVehicle {
    fn is_armed(&self) -> bool {
        self.armed
    }

    fn is_landed(&self) -> bool {
        self.altitude_m <= 0.0
    }

    fn current_mode(&self) -> FlightMode {
        self.mode
    }

    fn request_mode_change(&mut self, mode: FlightMode, reason: ModeReason) -> bool {
        let accepted = !self.refused_modes.contains(&mode);
        self.mode_log.push((mode, reason, accepted));
        if accepted {
            log::info!("[SITL] Mode {} -> {} ({:?})", self.mode.name(), mode.name(), reason);
            self.mode = mode;
            // Hold whatever attitude the new mode inherits.
            self.target = AttitudeTarget::Hold;
        } else {
            log::warn!("[SITL] Mode change to {} refused", mode.name());
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_command_slews_toward_target() {
        let mut v = SimVehicle::new(FlightMode::Stabilize, 50.0, 1.0);
        v.command_angles(0.0, -9_000.0, 0.0);
        v.step(0.01);
        assert!((v.pitch_cd() + 360.0).abs() < 1e-3);

        for _ in 0..100 {
            v.step(0.01);
        }
        assert_eq!(v.current_pitch(), -9_000);
    }

    #[test]
    fn test_rate_authority_grows_with_throttle() {
        let mut low = SimVehicle::new(FlightMode::Stabilize, 50.0, 1.0);
        let mut high = SimVehicle::new(FlightMode::Stabilize, 50.0, 1.0);
        low.set_throttle(0.0, false);
        high.set_throttle(1.0, false);
        low.command_rates(0.0, 10_000.0, 0.0);
        high.command_rates(0.0, 10_000.0, 0.0);
        low.step(0.1);
        high.step(0.1);
        assert!(high.pitch_cd() > low.pitch_cd());
        assert!(low.pitch_cd() > 0.0);
    }

    #[test]
    fn test_refused_mode_is_logged() {
        let mut v = SimVehicle::new(FlightMode::Acro, 50.0, 1.0);
        v.refuse_mode(FlightMode::AltHold);
        assert!(!v.request_mode_change(FlightMode::AltHold, ModeReason::Unknown));
        assert_eq!(v.current_mode(), FlightMode::Acro);
        assert_eq!(v.mode_log(), &[(FlightMode::AltHold, ModeReason::Unknown, false)]);
    }
}
