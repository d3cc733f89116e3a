// src/repositories/sync_repository.rs
//
// Sync-status bookkeeping across all synchronizable tables.
// Table names only ever come from the closed `SyncTable` enum.

use rusqlite::params;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::grade_repository::SqliteGradeRepository;
use super::schedule_repository::SqliteScheduleRepository;
use super::subject_repository::SqliteSubjectRepository;
use super::user_repository::SqliteUserRepository;
use crate::db::ConnectionPool;
use crate::domain::{SyncRecord, SyncStatus, SyncTable};
use crate::error::{AppError, AppResult};

pub trait SyncRepository: Send + Sync {
    fn list_by_status(&self, table: SyncTable, status: SyncStatus) -> AppResult<Vec<SyncRecord>>;

    /// Set the status of one row without touching `updated_at`
    fn update_status(&self, table: SyncTable, id: i64, status: SyncStatus) -> AppResult<()>;

    /// Row counts per status for one table
    fn count_by_status(&self, table: SyncTable) -> AppResult<BTreeMap<SyncStatus, i64>>;
}

pub struct SqliteSyncRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteSyncRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

impl SyncRepository for SqliteSyncRepository {
    fn list_by_status(&self, table: SyncTable, status: SyncStatus) -> AppResult<Vec<SyncRecord>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {} WHERE sync_status = ?1 ORDER BY id",
            table.table_name()
        ))?;

        let records = match table {
            SyncTable::Usuarios => stmt
                .query_map(params![status.as_str()], |row| {
                    SqliteUserRepository::row_to_user(row).map(SyncRecord::Usuario)
                })?
                .collect::<Result<Vec<_>, _>>()?,
            SyncTable::Materias => stmt
                .query_map(params![status.as_str()], |row| {
                    SqliteSubjectRepository::row_to_subject(row).map(SyncRecord::Materia)
                })?
                .collect::<Result<Vec<_>, _>>()?,
            SyncTable::Notas => stmt
                .query_map(params![status.as_str()], |row| {
                    SqliteGradeRepository::row_to_grade(row).map(SyncRecord::Nota)
                })?
                .collect::<Result<Vec<_>, _>>()?,
            SyncTable::Horarios => stmt
                .query_map(params![status.as_str()], |row| {
                    SqliteScheduleRepository::row_to_schedule(row).map(SyncRecord::Horario)
                })?
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(records)
    }

    fn update_status(&self, table: SyncTable, id: i64, status: SyncStatus) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            &format!("UPDATE {} SET sync_status = ?1 WHERE id = ?2", table.table_name()),
            params![status.as_str(), id],
        )?;

        if rows_affected == 0 {
            return Err(AppError::not_found(table.table_name(), id));
        }
        Ok(())
    }

    fn count_by_status(&self, table: SyncTable) -> AppResult<BTreeMap<SyncStatus, i64>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT sync_status, COUNT(*) FROM {} GROUP BY sync_status",
            table.table_name()
        ))?;

        let mut counts = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        for row in rows {
            let (raw, count) = row?;
            let status: SyncStatus = raw.parse()?;
            counts.insert(status, count);
        }

        Ok(counts)
    }
}
