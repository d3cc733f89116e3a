// src/services/academic_summary_service.rs
//
// Derived academic data: subject averages, the credit-weighted overall
// average and the weight still missing per subject. Nothing here is stored.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use crate::domain::{
    credit_weighted_average, weighted_average, weighted_mean, AcademicSummary, Grade,
};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, GradeDeleted, GradeRecorded, GradeUpdated, SubjectAverageChanged};
use crate::repositories::{AveragesRepository, GradeRepository, UserRepository};

pub struct AcademicSummaryService {
    averages_repo: Arc<dyn AveragesRepository>,
    grade_repo: Arc<dyn GradeRepository>,
    user_repo: Arc<dyn UserRepository>,
    event_bus: Arc<EventBus>,
}

impl AcademicSummaryService {
    pub fn new(
        averages_repo: Arc<dyn AveragesRepository>,
        grade_repo: Arc<dyn GradeRepository>,
        user_repo: Arc<dyn UserRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            averages_repo,
            grade_repo,
            user_repo,
            event_bus,
        }
    }

    /// Weighted average of a subject, `None` while it has no grades
    pub fn subject_average(&self, materia_id: i64) -> AppResult<Option<f64>> {
        self.averages_repo.subject_average(materia_id)
    }

    /// Credit-weighted overall average over the subjects that have grades
    pub fn user_average(&self, usuario_id: i64) -> AppResult<Option<f64>> {
        self.averages_repo.user_average(usuario_id)
    }

    pub fn user_summary(&self, usuario_id: i64) -> AppResult<AcademicSummary> {
        if !self.user_repo.exists(usuario_id)? {
            return Err(AppError::not_found("User", usuario_id));
        }

        let materias = self.averages_repo.subjects_with_averages(usuario_id)?;
        let pendientes = self.averages_repo.subjects_missing_percentage(usuario_id)?;
        let grades = self.grade_repo.list_by_user(usuario_id)?;

        let means = subject_means(&grades);
        let graded: Vec<(f64, u8)> = materias
            .iter()
            .filter_map(|m| means.get(&m.subject.id).map(|mean| (*mean, m.subject.creditos)))
            .collect();

        let creditos_cursados = graded.iter().map(|(_, creditos)| u32::from(*creditos)).sum();

        Ok(AcademicSummary {
            usuario_id,
            promedio_general: credit_weighted_average(&graded),
            creditos_cursados,
            materias,
            pendientes,
        })
    }

    /// Recompute the subject average after every grade change and announce it.
    /// Handlers hold the bus weakly: they are stored inside it.
    pub fn register_event_handlers(&self) {
        {
            let repo = Arc::clone(&self.grade_repo);
            let bus = Arc::downgrade(&self.event_bus);
            self.event_bus.subscribe::<GradeRecorded, _>(move |event| {
                announce_average(repo.as_ref(), &bus, event.materia_id);
            });
        }

        {
            let repo = Arc::clone(&self.grade_repo);
            let bus = Arc::downgrade(&self.event_bus);
            self.event_bus.subscribe::<GradeUpdated, _>(move |event| {
                announce_average(repo.as_ref(), &bus, event.materia_id);
            });
        }

        {
            let repo = Arc::clone(&self.grade_repo);
            let bus = Arc::downgrade(&self.event_bus);
            self.event_bus.subscribe::<GradeDeleted, _>(move |event| {
                announce_average(repo.as_ref(), &bus, event.materia_id);
            });
        }
    }
}

fn announce_average(repo: &dyn GradeRepository, bus: &Weak<EventBus>, materia_id: i64) {
    let Some(bus) = bus.upgrade() else {
        return;
    };
    match repo.list_by_subject(materia_id) {
        Ok(grades) => {
            let items: Vec<(f64, f64)> = grades.iter().map(|g| (g.nota, g.porcentaje)).collect();
            let promedio = weighted_average(&items);
            log::debug!("Subject {} average is now {:?}", materia_id, promedio);
            bus.emit(SubjectAverageChanged::new(materia_id, promedio));
        }
        Err(e) => log::warn!("Could not recompute average of subject {}: {}", materia_id, e),
    }
}

/// Unrounded weighted mean per subject id
fn subject_means(grades: &[Grade]) -> HashMap<i64, f64> {
    let mut by_subject: HashMap<i64, Vec<(f64, f64)>> = HashMap::new();
    for grade in grades {
        by_subject
            .entry(grade.materia_id)
            .or_default()
            .push((grade.nota, grade.porcentaje));
    }

    by_subject
        .into_iter()
        .filter_map(|(materia_id, items)| weighted_mean(&items).map(|mean| (materia_id, mean)))
        .collect()
}
