use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::SyncStatus;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 5.0;

/// A graded evaluation item of a subject (nota)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub id: i64,
    pub materia_id: i64,

    /// Free-form evaluation label ("Parcial 1", "Quiz 2", ...)
    pub tipo_evaluacion: String,

    /// Score on the 0.0..=5.0 scale
    pub nota: f64,

    /// Weight of this item within its subject, as a percentage of 100
    pub porcentaje: f64,

    pub fecha: NaiveDate,
    pub observaciones: Option<String>,

    pub sync_status: SyncStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert a grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGrade {
    pub materia_id: i64,
    pub tipo_evaluacion: String,
    pub nota: f64,
    pub porcentaje: f64,
    pub fecha: NaiveDate,
    pub observaciones: Option<String>,
}

impl NewGrade {
    /// Draft dated today
    pub fn new(materia_id: i64, tipo_evaluacion: impl Into<String>, nota: f64, porcentaje: f64) -> Self {
        Self {
            materia_id,
            tipo_evaluacion: tipo_evaluacion.into(),
            nota,
            porcentaje,
            fecha: Utc::now().date_naive(),
            observaciones: None,
        }
    }
}

/// Partial update of a grade. The owning subject never changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeChanges {
    pub tipo_evaluacion: Option<String>,
    pub nota: Option<f64>,
    pub porcentaje: Option<f64>,
    pub fecha: Option<NaiveDate>,
    pub observaciones: Option<Option<String>>,
}

impl GradeChanges {
    pub fn is_empty(&self) -> bool {
        self.tipo_evaluacion.is_none()
            && self.nota.is_none()
            && self.porcentaje.is_none()
            && self.fecha.is_none()
            && self.observaciones.is_none()
    }
}

impl Grade {
    pub fn apply_changes(&mut self, changes: GradeChanges) {
        if let Some(tipo) = changes.tipo_evaluacion {
            self.tipo_evaluacion = tipo;
        }
        if let Some(nota) = changes.nota {
            self.nota = nota;
        }
        if let Some(porcentaje) = changes.porcentaje {
            self.porcentaje = porcentaje;
        }
        if let Some(fecha) = changes.fecha {
            self.fecha = fecha;
        }
        if let Some(obs) = changes.observaciones {
            self.observaciones = obs;
        }

        self.sync_status = SyncStatus::Pending;
        self.updated_at = Utc::now();
    }
}
