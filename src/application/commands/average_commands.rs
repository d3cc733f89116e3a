// src/application/commands/average_commands.rs
//
// Average Command Handlers (read-only)

use crate::application::{dto::*, error_handling::CommandResult, state::AppState};

pub fn subject_average(state: &AppState, materia_id: i64) -> CommandResult<AverageDto> {
    let promedio = state.summary_service.subject_average(materia_id)?;
    Ok(AverageDto {
        id: materia_id,
        promedio,
    })
}

pub fn user_average(state: &AppState, usuario_id: i64) -> CommandResult<AverageDto> {
    let promedio = state.summary_service.user_average(usuario_id)?;
    Ok(AverageDto {
        id: usuario_id,
        promedio,
    })
}

pub fn user_summary(state: &AppState, usuario_id: i64) -> CommandResult<SummaryDto> {
    let summary = state.summary_service.user_summary(usuario_id)?;
    Ok(SummaryDto::from(summary))
}

/// Subjects whose weights do not yet reach 100%, largest gap first
pub fn pending_percentages(state: &AppState, usuario_id: i64) -> CommandResult<Vec<PendingWeightDto>> {
    let pending = state.subject_service.pending_percentages(usuario_id)?;
    Ok(pending.into_iter().map(PendingWeightDto::from).collect())
}
