mod agent;

use acro_core::{
    FlightMode, ManeuverConfig, ManeuverController, ManeuverEvent, ManeuverOutcome, PilotInput,
};
use agent::SimVehicle;
use clap::Parser;
use std::io::{Write, stdout};
use std::thread::sleep;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "acro-sitl", about = "Fly the dive and pull-up maneuver against a simulated multirotor")]
struct Args {
    /// Height given up during the dive (m)
    #[arg(long, default_value_t = acro_core::DEFAULT_FALL_DISTANCE_M)]
    fall_distance: f32,

    /// Radius of the pull-up arc (m)
    #[arg(long, default_value_t = acro_core::DEFAULT_TURN_RADIUS_M)]
    turn_radius: f32,

    /// Dive attitude (centidegrees, negative is nose down)
    #[arg(long, default_value_t = acro_core::DEFAULT_DIVE_ANGLE_CD, allow_negative_numbers = true)]
    dive_angle: i32,

    /// Control loop rate (Hz)
    #[arg(long, default_value_t = acro_core::DEFAULT_TICK_RATE_HZ)]
    tick_rate: f32,

    /// Mode the vehicle is flying in when the maneuver is requested
    #[arg(long, default_value = "stabilize")]
    initial_mode: FlightMode,

    /// Starting altitude (m)
    #[arg(long, default_value_t = 50.0)]
    altitude: f32,

    /// Fraction of commanded pitch rate the airframe delivers
    #[arg(long, default_value_t = 1.0)]
    pitch_authority: f32,

    /// Cancel the maneuver after this many ticks
    #[arg(long)]
    abandon_at_tick: Option<u32>,

    /// Make the dispatcher refuse the mode the vehicle started in
    #[arg(long)]
    refuse_prior_mode: bool,

    /// Give up if the maneuver has not finished after this many ticks
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u32,

    /// Sleep between ticks so the run takes wall-clock time
    #[arg(long)]
    realtime: bool,
}

#[derive(Debug)]
struct RunSummary {
    outcome: ManeuverOutcome,
    ticks: u32,
    altitude_lost_m: f32,
    mode_requests: usize,
}

fn fly(args: &Args) -> Result<RunSummary, Box<dyn std::error::Error>> {
    let config = ManeuverConfig {
        fall_distance_m: args.fall_distance,
        turn_radius_m: args.turn_radius,
        dive_angle_cd: args.dive_angle,
        tick_rate_hz: args.tick_rate,
    };

    let mut vehicle = SimVehicle::new(args.initial_mode, args.altitude, args.pitch_authority);
    if args.refuse_prior_mode {
        vehicle.refuse_mode(args.initial_mode);
    }

    let mut sm = ManeuverController::new(vehicle, config);
    sm.enter(PilotInput::default())?;

    let params = sm.params();
    println!(
        "Maneuver armed: {} dive ticks, target {:.2} m/s, pitch rate {:.0} cd/s, step {:.2} cd",
        params.turn_duration_ticks, params.target_vertical_velocity, params.pitch_rate, params.pitch_step
    );

    let dt = 1.0 / args.tick_rate;
    let start_alt = args.altitude;
    let mut min_alt = start_alt;

    for tick in 1..=args.max_ticks {
        if args.abandon_at_tick == Some(tick) {
            sm.abandon();
        }

        // 1. Run the controller against the current airframe state
        let old_stage = sm.stage;
        let (stage, event) = sm.tick();

        if stage != old_stage {
            println!("\nSTAGE CHANGE @{}: {:?} -> {:?}", tick, old_stage, stage);
        }
        match event {
            ManeuverEvent::None => {}
            other => println!("\nEVENT @{}: {:?}", tick, other),
        }

        // 2. Integrate the airframe
        let vehicle = sm.vehicle_mut();
        vehicle.step(dt);
        min_alt = min_alt.min(vehicle.altitude_m());

        // 3. Output Status
        print!(
            "\rAlt: {:.1}m | Climb: {:.1}m/s | Pitch: {:.1}deg | Thr: {:.2} | Stage: {:?}   ",
            vehicle.altitude_m(),
            vehicle.climb_rate_ms(),
            vehicle.pitch_cd() / 100.0,
            vehicle.throttle(),
            stage
        );
        stdout().flush()?;

        if let Some(outcome) = sm.outcome {
            println!();
            return Ok(RunSummary {
                outcome,
                ticks: tick,
                altitude_lost_m: start_alt - min_alt,
                mode_requests: sm.vehicle().mode_log().len(),
            });
        }

        if args.realtime {
            sleep(Duration::from_secs_f32(dt));
        }
    }

    Err(format!("maneuver did not finish within {} ticks", args.max_ticks).into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    log::debug!("SITL arguments: {:?}", args);

    let summary = fly(&args)?;
    println!(
        "Finished after {} ticks: {:?}, lost {:.1} m, {} mode request(s)",
        summary.ticks, summary.outcome, summary.altitude_lost_m, summary.mode_requests
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["acro-sitl"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_default_run_completes_into_alt_hold() {
        let summary = fly(&args(&[])).unwrap();
        assert_eq!(summary.outcome, ManeuverOutcome::Completed(FlightMode::AltHold));
        // 404 dive ticks plus the pull-up.
        assert!(summary.ticks > 404);
        assert!(summary.altitude_lost_m > 0.0);
        assert_eq!(summary.mode_requests, 1);
    }

    #[test]
    fn test_abandon_restores_initial_mode() {
        let summary = fly(&args(&["--initial-mode", "acro", "--abandon-at-tick", "100"])).unwrap();
        assert_eq!(summary.outcome, ManeuverOutcome::Abandoned(FlightMode::Acro));
        assert_eq!(summary.ticks, 100);
    }

    #[test]
    fn test_abandon_falls_back_when_initial_mode_refused() {
        let summary = fly(&args(&[
            "--initial-mode",
            "alt_hold",
            "--refuse-prior-mode",
            "--abandon-at-tick",
            "10",
        ]))
        .unwrap();
        assert_eq!(summary.outcome, ManeuverOutcome::Abandoned(FlightMode::Stabilize));
        assert_eq!(summary.mode_requests, 2);
    }

    #[test]
    fn test_entry_rejected_from_loiter() {
        assert!(fly(&args(&["--initial-mode", "loiter"])).is_err());
    }

    #[test]
    fn test_stalled_pull_up_hits_tick_limit() {
        let res = fly(&args(&["--pitch-authority", "0", "--max-ticks", "2000"]));
        assert!(res.is_err());
    }

    #[test]
    fn test_negative_dive_angle_parses() {
        let a = args(&["--dive-angle", "-4500"]);
        assert_eq!(a.dive_angle, -4_500);
    }
}
