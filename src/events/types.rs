// events/types.rs
//
// Domain events. Each one records a change that has already been committed
// to the local database and carries just the ids listeners need.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// USER EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRegistered {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub usuario_id: i64,
    pub email: String,
}

impl UserRegistered {
    pub fn new(usuario_id: i64, email: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            usuario_id,
            email,
        }
    }
}

impl DomainEvent for UserRegistered {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "UserRegistered" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub usuario_id: i64,
}

impl UserUpdated {
    pub fn new(usuario_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            usuario_id,
        }
    }
}

impl DomainEvent for UserUpdated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "UserUpdated" }
}

/// Emitted after a user and (by cascade) everything they own is removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub usuario_id: i64,
}

impl UserDeleted {
    pub fn new(usuario_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            usuario_id,
        }
    }
}

impl DomainEvent for UserDeleted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "UserDeleted" }
}

// ============================================================================
// SESSION EVENTS
// ============================================================================

/// Emitted when the identity provider accepts credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLoggedIn {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub usuario_id: i64,
    pub firebase_uid: String,
}

impl UserLoggedIn {
    pub fn new(usuario_id: i64, firebase_uid: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            usuario_id,
            firebase_uid,
        }
    }
}

impl DomainEvent for UserLoggedIn {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "UserLoggedIn" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLoggedOut {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub usuario_id: i64,
}

impl UserLoggedOut {
    pub fn new(usuario_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            usuario_id,
        }
    }
}

impl DomainEvent for UserLoggedOut {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "UserLoggedOut" }
}

// ============================================================================
// SUBJECT EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub materia_id: i64,
    pub usuario_id: i64,
    pub codigo: String,
}

impl SubjectCreated {
    pub fn new(materia_id: i64, usuario_id: i64, codigo: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            materia_id,
            usuario_id,
            codigo,
        }
    }
}

impl DomainEvent for SubjectCreated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "SubjectCreated" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub materia_id: i64,
    /// Credits feed the user average, so listeners care when they move
    pub creditos_changed: bool,
}

impl SubjectUpdated {
    pub fn new(materia_id: i64, creditos_changed: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            materia_id,
            creditos_changed,
        }
    }
}

impl DomainEvent for SubjectUpdated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "SubjectUpdated" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub materia_id: i64,
    pub usuario_id: i64,
}

impl SubjectDeleted {
    pub fn new(materia_id: i64, usuario_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            materia_id,
            usuario_id,
        }
    }
}

impl DomainEvent for SubjectDeleted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "SubjectDeleted" }
}

// ============================================================================
// GRADE EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeRecorded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub nota_id: i64,
    pub materia_id: i64,
    pub porcentaje: f64,
}

impl GradeRecorded {
    pub fn new(nota_id: i64, materia_id: i64, porcentaje: f64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            nota_id,
            materia_id,
            porcentaje,
        }
    }
}

impl DomainEvent for GradeRecorded {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "GradeRecorded" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub nota_id: i64,
    pub materia_id: i64,
}

impl GradeUpdated {
    pub fn new(nota_id: i64, materia_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            nota_id,
            materia_id,
        }
    }
}

impl DomainEvent for GradeUpdated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "GradeUpdated" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub nota_id: i64,
    pub materia_id: i64,
}

impl GradeDeleted {
    pub fn new(nota_id: i64, materia_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            nota_id,
            materia_id,
        }
    }
}

impl DomainEvent for GradeDeleted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "GradeDeleted" }
}

// ============================================================================
// SCHEDULE EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub horario_id: i64,
    pub materia_id: i64,
    pub dia_semana: u8,
}

impl ScheduleCreated {
    pub fn new(horario_id: i64, materia_id: i64, dia_semana: u8) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            horario_id,
            materia_id,
            dia_semana,
        }
    }
}

impl DomainEvent for ScheduleCreated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ScheduleCreated" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub horario_id: i64,
    pub materia_id: i64,
}

impl ScheduleUpdated {
    pub fn new(horario_id: i64, materia_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            horario_id,
            materia_id,
        }
    }
}

impl DomainEvent for ScheduleUpdated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ScheduleUpdated" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub horario_id: i64,
    pub materia_id: i64,
}

impl ScheduleDeleted {
    pub fn new(horario_id: i64, materia_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            horario_id,
            materia_id,
        }
    }
}

impl DomainEvent for ScheduleDeleted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ScheduleDeleted" }
}

// ============================================================================
// DERIVED DATA EVENTS
// ============================================================================

/// Emitted after any grade change, carrying the recomputed subject average
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectAverageChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub materia_id: i64,
    pub promedio: Option<f64>,
}

impl SubjectAverageChanged {
    pub fn new(materia_id: i64, promedio: Option<f64>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            materia_id,
            promedio,
        }
    }
}

impl DomainEvent for SubjectAverageChanged {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "SubjectAverageChanged" }
}

// ============================================================================
// DATA MANAGEMENT EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncCompleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub synced: usize,
    pub failed: usize,
}

impl SyncCompleted {
    pub fn new(synced: usize, failed: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            synced,
            failed,
        }
    }
}

impl DomainEvent for SyncCompleted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "SyncCompleted" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataCleared {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl DataCleared {
    pub fn new() -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
        }
    }
}

impl Default for DataCleared {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainEvent for DataCleared {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "DataCleared" }
}

/// Emitted after demonstration data is loaded for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoDataSeeded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub usuario_id: i64,
    pub materias: usize,
}

impl DemoDataSeeded {
    pub fn new(usuario_id: i64, materias: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            usuario_id,
            materias,
        }
    }
}

impl DomainEvent for DemoDataSeeded {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "DemoDataSeeded" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_get_unique_ids() {
        let a = GradeRecorded::new(1, 1, 10.0);
        let b = GradeRecorded::new(1, 1, 10.0);
        assert_ne!(a.event_id(), b.event_id());
    }

    #[test]
    fn test_event_type_names() {
        assert_eq!(SubjectAverageChanged::new(1, None).event_type(), "SubjectAverageChanged");
        assert_eq!(SyncCompleted::new(3, 0).event_type(), "SyncCompleted");
    }

    #[test]
    fn test_event_serializes_payload() {
        let json = serde_json::to_value(SubjectCreated::new(4, 2, "FIS101".to_string())).unwrap();
        assert_eq!(json["materia_id"], 4);
        assert_eq!(json["codigo"], "FIS101");
    }
}
