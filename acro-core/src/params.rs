// params.rs
use core::f32::consts::PI;
use num_traits::Float;

use crate::config::{CENTIDEGREES_PER_DEGREE, GRAVITY_MSS, ManeuverConfig};
use crate::types::Ticks;

/// Constants of one maneuver, derived once at entry.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ManeuverParameters {
    /// Speed reached after falling the commanded distance (m/s).
    pub target_vertical_velocity: f32,
    /// Length of the dive in control ticks.
    pub turn_duration_ticks: Ticks,
    /// Body-frame pitch rate for the pull-up (cd/s).
    pub pitch_rate: f32,
    /// Pitch expected to be gained per tick at `pitch_rate` (cd). Always > 0.
    pub pitch_step: f32,
}

impl ManeuverParameters {
    pub fn from_config(config: &ManeuverConfig) -> Self {
        derive(config.fall_distance_m, config.turn_radius_m, config.tick_rate_hz)
    }
}

/// Converts a fall distance and turn radius into maneuver constants.
///
/// The fall time gives the speed at the bottom of the dive; a half-loop of
/// `turn_radius_m` flown at that speed gives the pull-up duration, which is
/// spread over a full circle of pitch to get the rate.
///
/// Inputs are expected to have passed [`ManeuverConfig::validate`]. A zero
/// distance or radius never yields a non-positive `pitch_step`.
pub fn derive(fall_distance_m: f32, turn_radius_m: f32, tick_rate_hz: f32) -> ManeuverParameters {
    let fall_time_s = Float::sqrt(2.0 * fall_distance_m / GRAVITY_MSS);
    let target_vertical_velocity = fall_time_s * GRAVITY_MSS;
    let turn_duration_s = (2.0 * PI * turn_radius_m) / target_vertical_velocity;
    let pitch_rate = (360.0 * CENTIDEGREES_PER_DEGREE) / turn_duration_s;

    let mut pitch_step = pitch_rate / tick_rate_hz;
    // Also catches NaN from a 0/0 distance and radius pair.
    if !(pitch_step > f32::EPSILON) {
        pitch_step = f32::EPSILON;
    }

    let dive_ticks = Float::round(fall_time_s * tick_rate_hz);
    let turn_duration_ticks = if dive_ticks > 0.0 { dive_ticks as Ticks } else { 0 };

    ManeuverParameters {
        target_vertical_velocity,
        turn_duration_ticks,
        pitch_rate,
        pitch_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_reference_scenario() {
        let p = derive(5.0, 3.0, 400.0);
        assert!(close(p.target_vertical_velocity, 9.8995, 0.001));
        assert_eq!(p.turn_duration_ticks, 404);
        assert!(close(p.pitch_rate, 18_906.6, 1.0));
        assert!(close(p.pitch_step, 47.27, 0.01));
    }

    #[test]
    fn test_pitch_step_matches_rate_over_tick_rate() {
        let p = derive(10.0, 5.0, 400.0);
        assert_eq!(p.turn_duration_ticks, 571);
        assert!(close(p.pitch_step * 400.0, p.pitch_rate, 0.01));
    }

    #[test]
    fn test_zero_fall_distance() {
        let p = derive(0.0, 3.0, 400.0);
        assert_eq!(p.turn_duration_ticks, 0);
        assert_eq!(p.target_vertical_velocity, 0.0);
        assert_eq!(p.pitch_step, f32::EPSILON);
    }

    #[test]
    fn test_degenerate_inputs_keep_step_positive() {
        for (fall, radius) in [(0.0, 0.0), (5.0, 0.0), (0.001, 1_000.0), (1e-9, 1e9)] {
            let p = derive(fall, radius, 400.0);
            assert!(p.pitch_step > 0.0, "fall={} radius={}", fall, radius);
            assert!(p.pitch_step >= f32::EPSILON);
        }
    }

    #[test]
    fn test_positive_grid_step_strictly_positive() {
        let mut fall = 0.25;
        while fall < 60.0 {
            let mut radius = 0.1;
            while radius < 40.0 {
                let p = derive(fall, radius, 100.0);
                assert!(p.pitch_step > 0.0);
                radius *= 2.0;
            }
            fall *= 2.0;
        }
    }

    #[test]
    fn test_from_config_uses_all_inputs() {
        let cfg = ManeuverConfig {
            fall_distance_m: 5.0,
            turn_radius_m: 3.0,
            dive_angle_cd: -4_500,
            tick_rate_hz: 100.0,
        };
        let p = ManeuverParameters::from_config(&cfg);
        assert_eq!(p.turn_duration_ticks, 101);
        assert!(close(p.pitch_step, 189.07, 0.05));
    }
}
