use chrono::NaiveTime;

use super::entity::{is_whole_minute, NewSchedule, Schedule};
use crate::domain::{DomainError, DomainResult};

/// Validates all Schedule invariants
pub fn validate_schedule(schedule: &Schedule) -> DomainResult<()> {
    validate_times(schedule.hora_inicio, schedule.hora_fin)
}

pub fn validate_new_schedule(schedule: &NewSchedule) -> DomainResult<()> {
    validate_times(schedule.hora_inicio, schedule.hora_fin)
}

/// A slot must start strictly before it ends; overnight slots are not supported.
/// Times are whole minutes, the precision they are stored with.
fn validate_times(inicio: NaiveTime, fin: NaiveTime) -> DomainResult<()> {
    for time in [inicio, fin] {
        if !is_whole_minute(&time) {
            return Err(DomainError::InvalidValue(format!(
                "Time {} has seconds; schedules use whole minutes",
                time.format("%H:%M:%S")
            )));
        }
    }
    if inicio >= fin {
        return Err(DomainError::InvariantViolation(format!(
            "Start time {} must be before end time {}",
            inicio.format("%H:%M"),
            fin.format("%H:%M")
        )));
    }
    Ok(())
}
