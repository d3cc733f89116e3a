// src/application/commands/grade_commands.rs
//
// Grade Command Handlers

use crate::application::commands::{clearable, parse_date};
use crate::application::{dto::*, error_handling::CommandResult, state::AppState};
use crate::domain::GradeChanges;
use crate::services::{RecordGradeRequest, UpdateGradeRequest};

/// Record a grade. Fails when the subject's weights would pass 100%.
pub fn record_grade(state: &AppState, dto: RecordGradeDto) -> CommandResult<GradeDto> {
    let fecha = dto.fecha.as_deref().map(parse_date).transpose()?;

    let grade = state.grade_service.record_grade(RecordGradeRequest {
        materia_id: dto.materia_id,
        tipo_evaluacion: dto.tipo_evaluacion,
        nota: dto.nota,
        porcentaje: dto.porcentaje,
        fecha,
        observaciones: dto.observaciones,
    })?;

    Ok(GradeDto::from(grade))
}

pub fn get_grade(state: &AppState, nota_id: i64) -> CommandResult<Option<GradeDto>> {
    let grade = state.grade_service.get_grade(nota_id)?;
    Ok(grade.map(GradeDto::from))
}

pub fn list_grades_by_subject(state: &AppState, materia_id: i64) -> CommandResult<Vec<GradeDto>> {
    let grades = state.grade_service.list_grades_by_subject(materia_id)?;
    Ok(grades.into_iter().map(GradeDto::from).collect())
}

pub fn list_grades_by_user(state: &AppState, usuario_id: i64) -> CommandResult<Vec<GradeDto>> {
    let grades = state.grade_service.list_grades_by_user(usuario_id)?;
    Ok(grades.into_iter().map(GradeDto::from).collect())
}

pub fn update_grade(state: &AppState, dto: UpdateGradeDto) -> CommandResult<GradeDto> {
    let fecha = dto.fecha.as_deref().map(parse_date).transpose()?;

    let grade = state.grade_service.update_grade(UpdateGradeRequest {
        nota_id: dto.nota_id,
        changes: GradeChanges {
            tipo_evaluacion: dto.tipo_evaluacion.map(|t| t.trim().to_string()),
            nota: dto.nota,
            porcentaje: dto.porcentaje,
            fecha,
            observaciones: clearable(dto.observaciones),
        },
    })?;

    Ok(GradeDto::from(grade))
}

pub fn delete_grade(state: &AppState, nota_id: i64) -> CommandResult<()> {
    state.grade_service.delete_grade(nota_id)?;
    Ok(())
}
