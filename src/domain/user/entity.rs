use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::SyncStatus;

/// A student known to the local store
///
/// `firebase_uid` links the row to the external identity provider once the
/// user has authenticated at least once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub nombre: String,
    pub firebase_uid: Option<String>,
    pub sync_status: SyncStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub nombre: String,
    pub firebase_uid: Option<String>,
}

impl NewUser {
    pub fn new(email: impl Into<String>, nombre: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            nombre: nombre.into(),
            firebase_uid: None,
        }
    }

    pub fn with_firebase_uid(mut self, uid: impl Into<String>) -> Self {
        self.firebase_uid = Some(uid.into());
        self
    }
}

/// Partial update of a user. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserChanges {
    pub email: Option<String>,
    pub nombre: Option<String>,
    pub firebase_uid: Option<Option<String>>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.nombre.is_none() && self.firebase_uid.is_none()
    }
}

impl User {
    /// Apply a partial update
    /// Any local change marks the row as pending synchronization
    pub fn apply_changes(&mut self, changes: UserChanges) {
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(nombre) = changes.nombre {
            self.nombre = nombre;
        }
        if let Some(uid) = changes.firebase_uid {
            self.firebase_uid = uid;
        }

        self.sync_status = SyncStatus::Pending;
        self.updated_at = Utc::now();
    }
}
