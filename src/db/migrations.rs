// src/db/migrations.rs
//
// Versioned schema bootstrap.
//
// The schema version lives in `schema_version`. A fresh file gets schema.sql
// applied; any other version than the one compiled in is refused instead of
// being migrated silently.

use rusqlite::Connection;
use serde::Serialize;

use crate::error::{AppError, AppResult};

const SCHEMA_VERSION: i32 = 1;

const SCHEMA_V1: &str = include_str!("../../schema.sql");

/// Tables counted by `get_database_stats`, in foreign-key order
const DATA_TABLES: [&str; 4] = ["usuarios", "materias", "notas", "horarios"];

/// Create the schema on a fresh database, accept an up-to-date one.
/// Running it twice is harmless.
pub fn initialize_database(conn: &Connection) -> AppResult<()> {
    match schema_version(conn)? {
        0 => {
            conn.execute_batch(SCHEMA_V1)
                .map_err(|e| AppError::Other(format!("Failed to apply schema v1: {}", e)))?;
            record_schema_version(conn, SCHEMA_VERSION)?;
            log::info!("Created database schema v{}", SCHEMA_VERSION);
            Ok(())
        }
        SCHEMA_VERSION => {
            log::debug!("Database schema v{} already present", SCHEMA_VERSION);
            Ok(())
        }
        found if found < SCHEMA_VERSION => Err(AppError::Other(format!(
            "Database schema v{} predates v{}; migrate or recreate the file",
            found, SCHEMA_VERSION
        ))),
        found => Err(AppError::Other(format!(
            "Database schema v{} was written by a newer release (this one knows v{})",
            found, SCHEMA_VERSION
        ))),
    }
}

/// 0 when the database has never been initialized
fn schema_version(conn: &Connection) -> AppResult<i32> {
    let tracked: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
        [],
        |row| row.get(0),
    )?;
    if !tracked {
        return Ok(0);
    }

    let latest: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(latest.unwrap_or(0))
}

fn record_schema_version(conn: &Connection, version: i32) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at)
         VALUES (?1, strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))",
        [version],
    )?;
    Ok(())
}

/// `PRAGMA integrity_check`, turned into an error unless SQLite answers "ok"
pub fn verify_database_integrity(conn: &Connection) -> AppResult<()> {
    let verdict: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
    if verdict == "ok" {
        Ok(())
    } else {
        Err(AppError::Other(format!("Integrity check reported: {}", verdict)))
    }
}

pub fn get_database_stats(conn: &Connection) -> AppResult<DatabaseStats> {
    let page_count: i64 = conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
    let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;

    let mut counts = [0_i64; DATA_TABLES.len()];
    for (slot, table) in counts.iter_mut().zip(DATA_TABLES) {
        *slot = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
    }
    let [usuario_count, materia_count, nota_count, horario_count] = counts;

    Ok(DatabaseStats {
        size_bytes: page_count * page_size,
        page_count,
        page_size,
        usuario_count,
        materia_count,
        nota_count,
        horario_count,
    })
}

/// File size and row counts
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseStats {
    pub size_bytes: i64,
    pub page_count: i64,
    pub page_size: i64,
    pub usuario_count: i64,
    pub materia_count: i64,
    pub nota_count: i64,
    pub horario_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_connection;

    #[test]
    fn test_initialize_fresh_database() {
        let conn = create_test_connection().unwrap();

        assert_eq!(schema_version(&conn).unwrap(), 0);

        initialize_database(&conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), 1);

        let table_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();

        // schema_version + usuarios + materias + notas + horarios
        assert_eq!(table_count, 5);
    }

    #[test]
    fn test_initialize_idempotent() {
        let conn = create_test_connection().unwrap();

        initialize_database(&conn).unwrap();
        initialize_database(&conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), 1);
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();
        record_schema_version(&conn, 2).unwrap();

        assert!(initialize_database(&conn).is_err());
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO materias (codigo, nombre, usuario_id) VALUES ('X1', 'Orphan', 999)",
            [],
        );

        assert!(result.is_err(), "Foreign key constraint should have been violated");
    }

    #[test]
    fn test_check_constraints_guard_grade_ranges() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();
        conn.execute("INSERT INTO usuarios (email, nombre) VALUES ('a@b.co', 'A')", [])
            .unwrap();
        conn.execute(
            "INSERT INTO materias (codigo, nombre, usuario_id) VALUES ('M1', 'Math', 1)",
            [],
        )
        .unwrap();

        let too_high = conn.execute(
            "INSERT INTO notas (materia_id, tipo_evaluacion, nota, porcentaje) VALUES (1, 'P1', 5.5, 10)",
            [],
        );
        assert!(too_high.is_err());

        let zero_weight = conn.execute(
            "INSERT INTO notas (materia_id, tipo_evaluacion, nota, porcentaje) VALUES (1, 'P1', 4.0, 0)",
            [],
        );
        assert!(zero_weight.is_err());
    }

    #[test]
    fn test_database_stats() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        let stats = get_database_stats(&conn).unwrap();

        assert!(stats.size_bytes > 0);
        assert_eq!(stats.usuario_count, 0);
        assert_eq!(stats.materia_count, 0);
        assert_eq!(stats.nota_count, 0);
        assert_eq!(stats.horario_count, 0);
    }

    #[test]
    fn test_integrity_check() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        verify_database_integrity(&conn).unwrap();
    }
}
