// src/application/commands/subject_commands.rs
//
// Subject Command Handlers
//
// RULES:
// - Accept DTOs
// - Call services
// - Return DTOs
// - Never contain business logic

use crate::application::commands::clearable;
use crate::application::{dto::*, error_handling::CommandResult, state::AppState};
use crate::domain::SubjectChanges;
use crate::services::{CreateSubjectRequest, UpdateSubjectRequest};

pub fn create_subject(state: &AppState, dto: CreateSubjectDto) -> CommandResult<SubjectDto> {
    let subject = state.subject_service.create_subject(CreateSubjectRequest {
        usuario_id: dto.usuario_id,
        codigo: dto.codigo,
        nombre: dto.nombre,
        creditos: dto.creditos,
        docente: dto.docente,
        periodo: dto.periodo,
        color: dto.color,
    })?;

    Ok(SubjectDto::from(subject))
}

pub fn get_subject(state: &AppState, materia_id: i64) -> CommandResult<Option<SubjectDto>> {
    let subject = state.subject_service.get_subject(materia_id)?;
    Ok(subject.map(SubjectDto::from))
}

/// Subjects of a user, newest period first
pub fn list_subjects(state: &AppState, usuario_id: i64) -> CommandResult<Vec<SubjectDto>> {
    let subjects = state.subject_service.list_subjects(usuario_id)?;
    Ok(subjects.into_iter().map(SubjectDto::from).collect())
}

/// Subjects with their average, recorded weight and grade count
pub fn list_subjects_with_averages(
    state: &AppState,
    usuario_id: i64,
) -> CommandResult<Vec<SubjectAverageDto>> {
    let subjects = state.subject_service.list_subjects_with_averages(usuario_id)?;
    Ok(subjects.into_iter().map(SubjectAverageDto::from).collect())
}

pub fn update_subject(state: &AppState, dto: UpdateSubjectDto) -> CommandResult<SubjectDto> {
    let subject = state.subject_service.update_subject(UpdateSubjectRequest {
        materia_id: dto.materia_id,
        changes: SubjectChanges {
            codigo: dto.codigo,
            nombre: dto.nombre.map(|n| n.trim().to_string()),
            creditos: dto.creditos,
            docente: clearable(dto.docente),
            periodo: clearable(dto.periodo),
            color: dto.color,
        },
    })?;

    Ok(SubjectDto::from(subject))
}

pub fn delete_subject(state: &AppState, materia_id: i64) -> CommandResult<()> {
    state.subject_service.delete_subject(materia_id)?;
    Ok(())
}
