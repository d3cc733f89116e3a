// src/infrastructure/session_store.rs
//
// Persisted sign-in session
//
// CRITICAL RULES:
// - At most one session at a time
// - Logout removes the file; a missing file means signed out
// - Tokens never appear in logs

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::APP_DIR_NAME;
use crate::error::{AppError, AppResult};
use crate::integrations::AuthenticatedIdentity;

const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Local `usuarios.id` linked to the identity
    pub usuario_id: i64,
    pub identity: AuthenticatedIdentity,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(usuario_id: i64, identity: AuthenticatedIdentity) -> Self {
        Self {
            usuario_id,
            identity,
            started_at: Utc::now(),
        }
    }
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/gestion-academica/session.json`
    pub fn default_path() -> AppResult<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| AppError::Config("Could not determine data directory".to_string()))?;
        Ok(data_dir.join(APP_DIR_NAME).join(SESSION_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> AppResult<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save(&self, session: &Session) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        log::debug!("Session for user {} saved", session.usuario_id);
        Ok(())
    }

    /// Returns whether a session existed
    pub fn clear(&self) -> AppResult<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn identity() -> AuthenticatedIdentity {
        AuthenticatedIdentity {
            uid: "uid-1".to_string(),
            email: "ana@uni.edu".to_string(),
            display_name: Some("Ana".to_string()),
            id_token: "id".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[test]
    fn test_missing_file_means_signed_out() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert!(store.load().unwrap().is_none());
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn test_save_load_clear() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("a").join("session.json"));
        let session = Session::new(7, identity());

        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        assert!(store.clear().unwrap());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert!(SessionStore::new(path).load().is_err());
    }
}
