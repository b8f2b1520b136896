// entry_gate.rs
use crate::config::{MAX_ROLL_INPUT_CD, ManeuverConfig};
use crate::error::EntryRejection;
use crate::interfaces::ModeDispatcher;
use crate::types::PilotInput;

/// Preconditions checked once before the maneuver takes control.
pub fn check_entry<D: ModeDispatcher + ?Sized>(
    dispatcher: &D,
    pilot: PilotInput,
    config: &ManeuverConfig,
) -> Result<(), EntryRejection> {
    config.validate()?;

    let mode = dispatcher.current_mode();
    if !mode.allows_maneuver() {
        return Err(EntryRejection::ModeDisallowed(mode));
    }

    if pilot.throttle_zero && mode.is_low_authority() {
        return Err(EntryRejection::ThrottleZero);
    }

    if pilot.roll_cd.unsigned_abs() >= MAX_ROLL_INPUT_CD.unsigned_abs() {
        return Err(EntryRejection::RollInputTooLarge(pilot.roll_cd));
    }

    if !dispatcher.is_armed() {
        return Err(EntryRejection::NotArmed);
    }
    if dispatcher.is_landed() {
        return Err(EntryRejection::Landed);
    }

    Ok(())
}
