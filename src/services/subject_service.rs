// src/services/subject_service.rs
use std::sync::Arc;

use crate::domain::{
    validate_new_subject, validate_subject, NewSubject, Subject, SubjectChanges,
    SubjectPendingWeight, SubjectWithAverage, DEFAULT_COLOR, DEFAULT_CREDITS,
};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, SubjectCreated, SubjectDeleted, SubjectUpdated};
use crate::repositories::{AveragesRepository, SubjectRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct CreateSubjectRequest {
    pub usuario_id: i64,
    pub codigo: String,
    pub nombre: String,
    pub creditos: Option<u8>,
    pub docente: Option<String>,
    pub periodo: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateSubjectRequest {
    pub materia_id: i64,
    pub changes: SubjectChanges,
}

pub struct SubjectService {
    subject_repo: Arc<dyn SubjectRepository>,
    user_repo: Arc<dyn UserRepository>,
    averages_repo: Arc<dyn AveragesRepository>,
    event_bus: Arc<EventBus>,
}

impl SubjectService {
    pub fn new(
        subject_repo: Arc<dyn SubjectRepository>,
        user_repo: Arc<dyn UserRepository>,
        averages_repo: Arc<dyn AveragesRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            subject_repo,
            user_repo,
            averages_repo,
            event_bus,
        }
    }

    pub fn create_subject(&self, request: CreateSubjectRequest) -> AppResult<Subject> {
        if !self.user_repo.exists(request.usuario_id)? {
            return Err(AppError::not_found("User", request.usuario_id));
        }

        let new_subject = NewSubject {
            usuario_id: request.usuario_id,
            codigo: request.codigo.trim().to_string(),
            nombre: request.nombre.trim().to_string(),
            creditos: request.creditos.unwrap_or(DEFAULT_CREDITS),
            docente: non_blank(request.docente),
            periodo: non_blank(request.periodo),
            color: request.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        };

        validate_new_subject(&new_subject)?;
        self.ensure_code_available(new_subject.usuario_id, &new_subject.codigo, None)?;

        let id = self.subject_repo.insert(&new_subject)?;
        let subject = self
            .subject_repo
            .get_by_id(id)?
            .ok_or_else(|| AppError::not_found("Subject", id))?;

        self.event_bus.emit(SubjectCreated::new(
            subject.id,
            subject.usuario_id,
            subject.codigo.clone(),
        ));

        Ok(subject)
    }

    pub fn update_subject(&self, request: UpdateSubjectRequest) -> AppResult<Subject> {
        let mut subject = self
            .subject_repo
            .get_by_id(request.materia_id)?
            .ok_or_else(|| AppError::not_found("Subject", request.materia_id))?;

        if request.changes.is_empty() {
            return Ok(subject);
        }

        let mut changes = request.changes;
        changes.codigo = changes.codigo.map(|c| c.trim().to_string());

        if let Some(codigo) = &changes.codigo {
            if codigo != &subject.codigo {
                self.ensure_code_available(subject.usuario_id, codigo, Some(subject.id))?;
            }
        }

        let creditos_changed = changes
            .creditos
            .is_some_and(|creditos| creditos != subject.creditos);

        subject.apply_changes(changes);
        validate_subject(&subject)?;
        self.subject_repo.update(&subject)?;

        self.event_bus
            .emit(SubjectUpdated::new(subject.id, creditos_changed));
        Ok(subject)
    }

    /// Deleting a subject removes its grades and schedules.
    pub fn delete_subject(&self, materia_id: i64) -> AppResult<()> {
        let subject = self
            .subject_repo
            .get_by_id(materia_id)?
            .ok_or_else(|| AppError::not_found("Subject", materia_id))?;

        self.subject_repo.delete(materia_id)?;

        self.event_bus
            .emit(SubjectDeleted::new(subject.id, subject.usuario_id));
        Ok(())
    }

    pub fn get_subject(&self, materia_id: i64) -> AppResult<Option<Subject>> {
        self.subject_repo.get_by_id(materia_id)
    }

    pub fn list_subjects(&self, usuario_id: i64) -> AppResult<Vec<Subject>> {
        self.subject_repo.list_by_user(usuario_id)
    }

    pub fn list_subjects_with_averages(&self, usuario_id: i64) -> AppResult<Vec<SubjectWithAverage>> {
        self.averages_repo.subjects_with_averages(usuario_id)
    }

    /// Subjects whose grade weights do not yet reach 100%
    pub fn pending_percentages(&self, usuario_id: i64) -> AppResult<Vec<SubjectPendingWeight>> {
        self.averages_repo.subjects_missing_percentage(usuario_id)
    }

    fn ensure_code_available(
        &self,
        usuario_id: i64,
        codigo: &str,
        excluding: Option<i64>,
    ) -> AppResult<()> {
        if self.subject_repo.code_exists(usuario_id, codigo, excluding)? {
            return Err(AppError::Conflict(format!(
                "A subject with code {} already exists",
                codigo
            )));
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
