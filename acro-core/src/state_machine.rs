use crate::config::{
    COASTING_THROTTLE, DIVE_THROTTLE, FREE_FALL_THROTTLE, ManeuverConfig, PULL_UP_THROTTLE,
    THROTTLE_DECAY_STEP,
};
use crate::entry_gate::check_entry;
use crate::error::EntryRejection;
use crate::interfaces::Vehicle;
use crate::params::ManeuverParameters;
use crate::types::{
    Centidegrees, FlightMode, ManeuverEvent, ManeuverOutcome, ManeuverStage, ModeReason,
    PilotInput, SpoolState, Ticks,
};

/// Mode requested once the nose is back above the horizon.
pub const COMPLETION_MODE: FlightMode = FlightMode::AltHold;

/// Mode requested when the prior mode cannot be restored.
pub const FALLBACK_MODE: FlightMode = FlightMode::Stabilize;

/// ManeuverController runs the dive, pull-up and coast sequence.
/// It is advanced once per control tick and owns the vehicle capabilities it commands.
pub struct ManeuverController<V: Vehicle> {
    vehicle: V,
    config: ManeuverConfig,
    params: ManeuverParameters,
    /// The current stage of the maneuver.
    pub stage: ManeuverStage,
    /// Ticks left before the pull-up starts.
    pub remaining_dive_ticks: Ticks,
    /// Pitch sampled on the previous pull-up tick.
    pub reference_pitch: Centidegrees,
    /// Pitch gain the next tick has to reach to earn full throttle.
    pub pitch_advance_target: f32,
    /// Last throttle computed by the pull-up logic. Sent to the commander clamped to [0, 1].
    pub throttle: f32,
    /// Mode that was active when the maneuver started.
    pub prior_mode: FlightMode,
    /// Set once control has been handed back to the dispatcher.
    pub outcome: Option<ManeuverOutcome>,
}

impl<V: Vehicle> ManeuverController<V> {
    /// Derives the maneuver constants and parks the controller in `Start`.
    pub fn new(vehicle: V, config: ManeuverConfig) -> Self {
        let params = ManeuverParameters::from_config(&config);
        let prior_mode = vehicle.current_mode();
        Self {
            vehicle,
            config,
            params,
            stage: ManeuverStage::Start,
            remaining_dive_ticks: params.turn_duration_ticks,
            reference_pitch: 0,
            pitch_advance_target: params.pitch_step,
            throttle: 0.0,
            prior_mode,
            outcome: None,
        }
    }

    /// Checks the entry preconditions and, if they hold, starts the dive.
    pub fn enter(&mut self, pilot: PilotInput) -> Result<(), EntryRejection> {
        if let Err(reason) = check_entry(&self.vehicle, pilot, &self.config) {
            warn!("Maneuver refused: {:?}", reason);
            return Err(reason);
        }

        self.prior_mode = self.vehicle.current_mode();
        self.remaining_dive_ticks = self.params.turn_duration_ticks;
        self.reference_pitch = 0;
        self.pitch_advance_target = self.params.pitch_step;
        self.throttle = 0.0;
        self.outcome = None;
        self.stage = ManeuverStage::Dive;

        info!(
            "Maneuver armed from {:?}: {} dive ticks, pitch rate {} cd/s, step {} cd",
            self.prior_mode,
            self.params.turn_duration_ticks,
            self.params.pitch_rate,
            self.params.pitch_step
        );
        Ok(())
    }

    /// External cancellation of an armed maneuver. Takes effect on the next tick.
    pub fn abandon(&mut self) {
        if self.outcome.is_some()
            || matches!(self.stage, ManeuverStage::Start | ManeuverStage::Abandon)
        {
            return;
        }
        warn!("Maneuver abandoned during {:?}", self.stage);
        self.stage = ManeuverStage::Abandon;
    }

    /// Runs one control tick. Returns the stage after the tick and anything
    /// worth reporting that happened during it.
    pub fn tick(&mut self) -> (ManeuverStage, ManeuverEvent) {
        // --- 1. Keep the motors at full command range ---
        self.vehicle.request_spool_state(SpoolState::ThrottleUnlimited);

        if self.outcome.is_some() {
            return (self.stage, ManeuverEvent::None);
        }

        let old_stage = self.stage;
        let pitch = self.vehicle.current_pitch();

        // --- 2. Stage Logic ---
        let event = match self.stage {
            ManeuverStage::Start => ManeuverEvent::None,
            ManeuverStage::Dive => self.dive(pitch),
            ManeuverStage::Noseup => self.nose_up(pitch),
            ManeuverStage::Coasting => self.coast(),
            ManeuverStage::Abandon => self.restore_prior_mode(),
        };

        if self.stage != old_stage {
            info!("Maneuver stage {:?} -> {:?}", old_stage, self.stage);
        }

        (self.stage, event)
    }

    fn dive(&mut self, pitch: Centidegrees) -> ManeuverEvent {
        if self.remaining_dive_ticks == 0 {
            self.reference_pitch = pitch;
            self.stage = ManeuverStage::Noseup;
            return ManeuverEvent::DiveComplete {
                reference_pitch: pitch,
            };
        }

        if pitch != self.config.dive_angle_cd {
            self.vehicle.set_throttle(DIVE_THROTTLE, false);
            self.vehicle.command_angles(0.0, self.config.dive_angle_cd as f32, 0.0);
        } else {
            // On the dive attitude: fall freely, no attitude correction this tick.
            self.vehicle.set_throttle(FREE_FALL_THROTTLE, false);
        }
        self.remaining_dive_ticks -= 1;
        ManeuverEvent::None
    }

    fn nose_up(&mut self, pitch: Centidegrees) -> ManeuverEvent {
        if pitch > 0 {
            self.stage = ManeuverStage::Coasting;
            return ManeuverEvent::NoseAboveHorizon;
        }

        let delta = pitch.saturating_sub(self.reference_pitch) as f32;
        if delta >= self.pitch_advance_target {
            self.pitch_advance_target = self.params.pitch_step;
            self.throttle = PULL_UP_THROTTLE;
        } else {
            // Lower the bar so a slow pull-up does not hold full throttle forever.
            self.pitch_advance_target += self.params.pitch_step;
            self.throttle -= THROTTLE_DECAY_STEP;
            debug!(
                "Pull-up behind: gained {} cd, need {} cd",
                delta, self.pitch_advance_target
            );
        }
        self.reference_pitch = pitch;

        self.vehicle.set_throttle(self.throttle.clamp(0.0, 1.0), false);
        self.vehicle.command_rates(0.0, self.params.pitch_rate, 0.0);
        ManeuverEvent::None
    }

    fn coast(&mut self) -> ManeuverEvent {
        self.vehicle.set_throttle(COASTING_THROTTLE, false);
        if self
            .vehicle
            .request_mode_change(COMPLETION_MODE, ModeReason::Unknown)
        {
            self.outcome = Some(ManeuverOutcome::Completed(COMPLETION_MODE));
            info!("Maneuver complete, handed over to {:?}", COMPLETION_MODE);
            ManeuverEvent::Completed {
                mode: COMPLETION_MODE,
            }
        } else {
            warn!("{:?} refused after coasting, restoring prior mode", COMPLETION_MODE);
            self.stage = ManeuverStage::Abandon;
            ManeuverEvent::None
        }
    }

    fn restore_prior_mode(&mut self) -> ManeuverEvent {
        let mode = if self
            .vehicle
            .request_mode_change(self.prior_mode, ModeReason::ManeuverComplete)
        {
            self.prior_mode
        } else {
            error!(
                "Could not restore {:?}, falling back to {:?}",
                self.prior_mode, FALLBACK_MODE
            );
            self.vehicle.request_mode_change(FALLBACK_MODE, ModeReason::Unknown);
            FALLBACK_MODE
        };
        self.outcome = Some(ManeuverOutcome::Abandoned(mode));
        ManeuverEvent::Abandoned { mode }
    }

    pub fn params(&self) -> &ManeuverParameters {
        &self.params
    }

    pub fn config(&self) -> &ManeuverConfig {
        &self.config
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn vehicle(&self) -> &V {
        &self.vehicle
    }

    pub fn vehicle_mut(&mut self) -> &mut V {
        &mut self.vehicle
    }

    pub fn into_vehicle(self) -> V {
        self.vehicle
    }
}
