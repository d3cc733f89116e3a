use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::{DomainError, Grade, Schedule, Subject, User};

/// Reconciliation state of a locally persisted row against the cloud store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Pending,
    Synced,
    Error,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Synced => "synced",
            SyncStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(SyncStatus::Pending),
            "synced" => Ok(SyncStatus::Synced),
            "error" => Ok(SyncStatus::Error),
            other => Err(DomainError::InvalidValue(format!(
                "Invalid sync status: {}",
                other
            ))),
        }
    }
}

/// Tables that carry a sync status column
///
/// Only these names ever reach dynamic SQL, which keeps table names out of
/// user-controlled input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncTable {
    Usuarios,
    Materias,
    Notas,
    Horarios,
}

impl SyncTable {
    pub const ALL: [SyncTable; 4] = [
        SyncTable::Usuarios,
        SyncTable::Materias,
        SyncTable::Notas,
        SyncTable::Horarios,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            SyncTable::Usuarios => "usuarios",
            SyncTable::Materias => "materias",
            SyncTable::Notas => "notas",
            SyncTable::Horarios => "horarios",
        }
    }
}

impl std::fmt::Display for SyncTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for SyncTable {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usuarios" | "users" => Ok(SyncTable::Usuarios),
            "materias" | "subjects" => Ok(SyncTable::Materias),
            "notas" | "grades" => Ok(SyncTable::Notas),
            "horarios" | "schedules" => Ok(SyncTable::Horarios),
            other => Err(DomainError::InvalidValue(format!("Invalid table: {}", other))),
        }
    }
}

/// A locally persisted row of any synchronizable table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "table", content = "record", rename_all = "snake_case")]
pub enum SyncRecord {
    Usuario(User),
    Materia(Subject),
    Nota(Grade),
    Horario(Schedule),
}

impl SyncRecord {
    pub fn id(&self) -> i64 {
        match self {
            SyncRecord::Usuario(u) => u.id,
            SyncRecord::Materia(m) => m.id,
            SyncRecord::Nota(n) => n.id,
            SyncRecord::Horario(h) => h.id,
        }
    }

    pub fn table(&self) -> SyncTable {
        match self {
            SyncRecord::Usuario(_) => SyncTable::Usuarios,
            SyncRecord::Materia(_) => SyncTable::Materias,
            SyncRecord::Nota(_) => SyncTable::Notas,
            SyncRecord::Horario(_) => SyncTable::Horarios,
        }
    }

    pub fn sync_status(&self) -> SyncStatus {
        match self {
            SyncRecord::Usuario(u) => u.sync_status,
            SyncRecord::Materia(m) => m.sync_status,
            SyncRecord::Nota(n) => n.sync_status,
            SyncRecord::Horario(h) => h.sync_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_known_values() {
        assert_eq!("synced".parse::<SyncStatus>().unwrap(), SyncStatus::Synced);
        assert_eq!(" PENDING ".parse::<SyncStatus>().unwrap(), SyncStatus::Pending);
        assert!("done".parse::<SyncStatus>().is_err());
    }

    #[test]
    fn test_table_accepts_english_aliases() {
        assert_eq!("grades".parse::<SyncTable>().unwrap(), SyncTable::Notas);
        assert_eq!("horarios".parse::<SyncTable>().unwrap(), SyncTable::Horarios);
        assert!("sqlite_master".parse::<SyncTable>().is_err());
    }
}
