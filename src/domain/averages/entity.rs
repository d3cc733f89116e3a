use serde::{Deserialize, Serialize};

use super::calculations::remaining_percentage;
use crate::domain::Subject;

/// A subject together with the aggregates of its grades
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectWithAverage {
    pub subject: Subject,

    /// Weighted average rounded to two decimals, `None` without grades
    pub promedio: Option<f64>,

    /// Sum of the weights recorded so far
    pub porcentaje_total: f64,

    pub cantidad_notas: u32,
}

impl SubjectWithAverage {
    pub fn porcentaje_faltante(&self) -> f64 {
        remaining_percentage(self.porcentaje_total)
    }
}

/// A subject whose grade weights do not reach 100% yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectPendingWeight {
    pub materia_id: i64,
    pub codigo: String,
    pub nombre: String,
    pub porcentaje_faltante: f64,
}

/// Everything the dashboard shows for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicSummary {
    pub usuario_id: i64,
    pub promedio_general: Option<f64>,
    pub creditos_cursados: u32,
    pub materias: Vec<SubjectWithAverage>,
    pub pendientes: Vec<SubjectPendingWeight>,
}
