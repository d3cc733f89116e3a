use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::SyncStatus;

pub const DEFAULT_CREDITS: u8 = 3;
pub const MIN_CREDITS: u8 = 1;
pub const MAX_CREDITS: u8 = 6;
pub const DEFAULT_COLOR: &str = "#3880ff";

/// An academic course the user is enrolled in (materia)
/// Owns grades and schedule entries; credits weight it in the overall average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,

    /// Course code, unique per user (e.g. "MAT201")
    pub codigo: String,

    pub nombre: String,

    /// Credit weight, 1..=6
    pub creditos: u8,

    pub docente: Option<String>,

    /// Academic period label (e.g. "2024-2")
    pub periodo: Option<String>,

    /// Display color, `#RRGGBB`
    pub color: String,

    pub usuario_id: i64,

    pub sync_status: SyncStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert a subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubject {
    pub usuario_id: i64,
    pub codigo: String,
    pub nombre: String,
    pub creditos: u8,
    pub docente: Option<String>,
    pub periodo: Option<String>,
    pub color: String,
}

impl NewSubject {
    /// Draft with default credits and color
    pub fn new(usuario_id: i64, codigo: impl Into<String>, nombre: impl Into<String>) -> Self {
        Self {
            usuario_id,
            codigo: codigo.into(),
            nombre: nombre.into(),
            creditos: DEFAULT_CREDITS,
            docente: None,
            periodo: None,
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

/// Partial update of a subject. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectChanges {
    pub codigo: Option<String>,
    pub nombre: Option<String>,
    pub creditos: Option<u8>,
    pub docente: Option<Option<String>>,
    pub periodo: Option<Option<String>>,
    pub color: Option<String>,
}

impl SubjectChanges {
    pub fn is_empty(&self) -> bool {
        self.codigo.is_none()
            && self.nombre.is_none()
            && self.creditos.is_none()
            && self.docente.is_none()
            && self.periodo.is_none()
            && self.color.is_none()
    }
}

impl Subject {
    /// Apply a partial update
    /// Owner and identity never change; the row goes back to pending sync.
    pub fn apply_changes(&mut self, changes: SubjectChanges) {
        if let Some(codigo) = changes.codigo {
            self.codigo = codigo;
        }
        if let Some(nombre) = changes.nombre {
            self.nombre = nombre;
        }
        if let Some(creditos) = changes.creditos {
            self.creditos = creditos;
        }
        if let Some(docente) = changes.docente {
            self.docente = docente;
        }
        if let Some(periodo) = changes.periodo {
            self.periodo = periodo;
        }
        if let Some(color) = changes.color {
            self.color = color;
        }

        self.sync_status = SyncStatus::Pending;
        self.updated_at = Utc::now();
    }
}
