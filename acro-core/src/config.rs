// config.rs
use crate::error::ConfigError;
use crate::types::Centidegrees;

/// Standard gravity used by the fall model (m/s^2).
pub const GRAVITY_MSS: f32 = 9.8;

/// The attitude controller works in centidegrees.
pub const CENTIDEGREES_PER_DEGREE: f32 = 100.0;

/// Throttle held while rotating into the dive attitude.
pub const DIVE_THROTTLE: f32 = 0.1;

/// Throttle once the dive attitude is reached.
pub const FREE_FALL_THROTTLE: f32 = 0.0;

/// Throttle commanded whenever the pull-up keeps pace.
pub const PULL_UP_THROTTLE: f32 = 1.0;

/// Throttle removed on every tick the pull-up falls behind.
pub const THROTTLE_DECAY_STEP: f32 = 0.01;

/// Throttle commanded on the hand-off tick.
pub const COASTING_THROTTLE: f32 = 0.5;

/// Entry is refused when the roll stick is at or beyond 40 degrees.
pub const MAX_ROLL_INPUT_CD: Centidegrees = 4_000;

pub const DEFAULT_FALL_DISTANCE_M: f32 = 5.0;
pub const DEFAULT_TURN_RADIUS_M: f32 = 3.0;
pub const DEFAULT_DIVE_ANGLE_CD: Centidegrees = -9_000; // Nose straight down
pub const DEFAULT_TICK_RATE_HZ: f32 = 400.0;

/// Pilot-tunable inputs of one maneuver.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ManeuverConfig {
    /// Height given up during the dive (m).
    pub fall_distance_m: f32,
    /// Radius of the pull-up arc (m).
    pub turn_radius_m: f32,
    /// Pitch held during the dive.
    pub dive_angle_cd: Centidegrees,
    /// Rate at which `tick()` is called.
    pub tick_rate_hz: f32,
}

impl ManeuverConfig {
    pub const fn new() -> Self {
        Self {
            fall_distance_m: DEFAULT_FALL_DISTANCE_M,
            turn_radius_m: DEFAULT_TURN_RADIUS_M,
            dive_angle_cd: DEFAULT_DIVE_ANGLE_CD,
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
        }
    }

    /// A zero fall distance or radius is accepted; the deriver clamps the
    /// resulting pitch step.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fall_distance_m.is_finite()
            && self.turn_radius_m.is_finite()
            && self.tick_rate_hz.is_finite())
        {
            return Err(ConfigError::NonFinite);
        }
        if self.fall_distance_m < 0.0 {
            return Err(ConfigError::NegativeFallDistance);
        }
        if self.turn_radius_m < 0.0 {
            return Err(ConfigError::NegativeTurnRadius);
        }
        if self.tick_rate_hz <= 0.0 {
            return Err(ConfigError::NonPositiveTickRate);
        }
        Ok(())
    }
}

impl Default for ManeuverConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(ManeuverConfig::new().validate(), Ok(()));
    }

    #[test]
    fn test_zero_fall_distance_is_valid() {
        let cfg = ManeuverConfig {
            fall_distance_m: 0.0,
            ..ManeuverConfig::new()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_values() {
        let base = ManeuverConfig::new();

        let cfg = ManeuverConfig { fall_distance_m: -1.0, ..base };
        assert_eq!(cfg.validate(), Err(ConfigError::NegativeFallDistance));

        let cfg = ManeuverConfig { turn_radius_m: -0.5, ..base };
        assert_eq!(cfg.validate(), Err(ConfigError::NegativeTurnRadius));

        let cfg = ManeuverConfig { tick_rate_hz: 0.0, ..base };
        assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveTickRate));

        let cfg = ManeuverConfig { turn_radius_m: f32::NAN, ..base };
        assert_eq!(cfg.validate(), Err(ConfigError::NonFinite));
    }
}
