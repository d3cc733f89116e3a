// src/services/grade_service.rs
use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{
    ensure_within_budget, validate_grade, validate_new_grade, Grade, GradeChanges, NewGrade,
};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, GradeDeleted, GradeRecorded, GradeUpdated};
use crate::repositories::{GradeRepository, SubjectRepository};

#[derive(Debug, Clone)]
pub struct RecordGradeRequest {
    pub materia_id: i64,
    pub tipo_evaluacion: String,
    pub nota: f64,
    pub porcentaje: f64,
    /// Defaults to today
    pub fecha: Option<NaiveDate>,
    pub observaciones: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateGradeRequest {
    pub nota_id: i64,
    pub changes: GradeChanges,
}

pub struct GradeService {
    grade_repo: Arc<dyn GradeRepository>,
    subject_repo: Arc<dyn SubjectRepository>,
    event_bus: Arc<EventBus>,
}

impl GradeService {
    pub fn new(
        grade_repo: Arc<dyn GradeRepository>,
        subject_repo: Arc<dyn SubjectRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            grade_repo,
            subject_repo,
            event_bus,
        }
    }

    /// Record a grade, rejecting it if the subject's weights would pass 100%.
    pub fn record_grade(&self, request: RecordGradeRequest) -> AppResult<Grade> {
        if !self.subject_repo.exists(request.materia_id)? {
            return Err(AppError::not_found("Subject", request.materia_id));
        }

        let mut new_grade = NewGrade::new(
            request.materia_id,
            request.tipo_evaluacion.trim(),
            request.nota,
            request.porcentaje,
        );
        if let Some(fecha) = request.fecha {
            new_grade.fecha = fecha;
        }
        new_grade.observaciones = request
            .observaciones
            .filter(|o| !o.trim().is_empty());

        validate_new_grade(&new_grade)?;

        let existing = self.grade_repo.total_percentage(new_grade.materia_id, None)?;
        ensure_within_budget(existing, new_grade.porcentaje)?;

        let id = self.grade_repo.insert(&new_grade)?;
        let grade = self
            .grade_repo
            .get_by_id(id)?
            .ok_or_else(|| AppError::not_found("Grade", id))?;

        log::debug!(
            "Recorded grade {} for subject {} ({}% of {}% used)",
            grade.id,
            grade.materia_id,
            grade.porcentaje,
            existing + grade.porcentaje
        );
        self.event_bus.emit(GradeRecorded::new(
            grade.id,
            grade.materia_id,
            grade.porcentaje,
        ));

        Ok(grade)
    }

    /// Update a grade. The weight budget is only rechecked when the weight
    /// changes, against the other grades of the subject.
    pub fn update_grade(&self, request: UpdateGradeRequest) -> AppResult<Grade> {
        let mut grade = self
            .grade_repo
            .get_by_id(request.nota_id)?
            .ok_or_else(|| AppError::not_found("Grade", request.nota_id))?;

        if request.changes.is_empty() {
            return Ok(grade);
        }

        if let Some(porcentaje) = request.changes.porcentaje {
            if porcentaje != grade.porcentaje {
                let others = self
                    .grade_repo
                    .total_percentage(grade.materia_id, Some(grade.id))?;
                ensure_within_budget(others, porcentaje)?;
            }
        }

        grade.apply_changes(request.changes);
        validate_grade(&grade)?;
        self.grade_repo.update(&grade)?;

        self.event_bus
            .emit(GradeUpdated::new(grade.id, grade.materia_id));
        Ok(grade)
    }

    pub fn delete_grade(&self, nota_id: i64) -> AppResult<()> {
        let grade = self
            .grade_repo
            .get_by_id(nota_id)?
            .ok_or_else(|| AppError::not_found("Grade", nota_id))?;

        self.grade_repo.delete(nota_id)?;

        self.event_bus
            .emit(GradeDeleted::new(grade.id, grade.materia_id));
        Ok(())
    }

    pub fn get_grade(&self, nota_id: i64) -> AppResult<Option<Grade>> {
        self.grade_repo.get_by_id(nota_id)
    }

    pub fn list_grades_by_subject(&self, materia_id: i64) -> AppResult<Vec<Grade>> {
        self.grade_repo.list_by_subject(materia_id)
    }

    pub fn list_grades_by_user(&self, usuario_id: i64) -> AppResult<Vec<Grade>> {
        self.grade_repo.list_by_user(usuario_id)
    }

    /// Sum of the recorded weights of a subject
    pub fn total_percentage(&self, materia_id: i64) -> AppResult<f64> {
        self.grade_repo.total_percentage(materia_id, None)
    }
}
