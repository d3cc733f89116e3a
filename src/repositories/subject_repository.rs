// src/repositories/subject_repository.rs
//
// Subject (materia) persistence

use rusqlite::{params, OptionalExtension, Row};
use std::sync::Arc;

use super::row_mapping::{credits, now_rfc3339, sync_status, timestamp};
use crate::db::ConnectionPool;
use crate::domain::{NewSubject, Subject};
use crate::error::{AppError, AppResult};

pub(crate) const SUBJECT_COLUMNS: &str = "id, codigo, nombre, creditos, docente, periodo, color, \
     usuario_id, sync_status, created_at, updated_at";

pub trait SubjectRepository: Send + Sync {
    fn insert(&self, subject: &NewSubject) -> AppResult<i64>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<Subject>>;
    fn list_by_user(&self, usuario_id: i64) -> AppResult<Vec<Subject>>;
    fn update(&self, subject: &Subject) -> AppResult<()>;
    fn delete(&self, id: i64) -> AppResult<()>;
    fn exists(&self, id: i64) -> AppResult<bool>;

    /// Whether `codigo` is already used by another subject of the same user
    fn code_exists(&self, usuario_id: i64, codigo: &str, excluding: Option<i64>) -> AppResult<bool>;
}

pub struct SqliteSubjectRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteSubjectRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map database row to Subject. Works on any row that carries the
    /// subject columns by name, including joined aggregate rows.
    pub(crate) fn row_to_subject(row: &Row) -> Result<Subject, rusqlite::Error> {
        Ok(Subject {
            id: row.get("id")?,
            codigo: row.get("codigo")?,
            nombre: row.get("nombre")?,
            creditos: credits(row, "creditos")?,
            docente: row.get("docente")?,
            periodo: row.get("periodo")?,
            color: row.get("color")?,
            usuario_id: row.get("usuario_id")?,
            sync_status: sync_status(row, "sync_status")?,
            created_at: timestamp(row, "created_at")?,
            updated_at: timestamp(row, "updated_at")?,
        })
    }
}

impl SubjectRepository for SqliteSubjectRepository {
    fn insert(&self, subject: &NewSubject) -> AppResult<i64> {
        let conn = self.pool.get()?;
        let now = now_rfc3339();

        conn.execute(
            "INSERT INTO materias (
                codigo, nombre, creditos, docente, periodo, color, usuario_id,
                sync_status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'pending', ?8, ?8)",
            params![
                subject.codigo,
                subject.nombre,
                subject.creditos,
                subject.docente,
                subject.periodo,
                subject.color,
                subject.usuario_id,
                now,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<Subject>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM materias WHERE id = ?1",
            SUBJECT_COLUMNS
        ))?;

        let subject = stmt.query_row(params![id], Self::row_to_subject).optional()?;
        Ok(subject)
    }

    fn list_by_user(&self, usuario_id: i64) -> AppResult<Vec<Subject>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM materias
             WHERE usuario_id = ?1
             ORDER BY periodo DESC, nombre ASC",
            SUBJECT_COLUMNS
        ))?;

        let subjects = stmt
            .query_map(params![usuario_id], Self::row_to_subject)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(subjects)
    }

    fn update(&self, subject: &Subject) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE materias
             SET codigo = ?1, nombre = ?2, creditos = ?3, docente = ?4, periodo = ?5,
                 color = ?6, sync_status = ?7, updated_at = ?8
             WHERE id = ?9",
            params![
                subject.codigo,
                subject.nombre,
                subject.creditos,
                subject.docente,
                subject.periodo,
                subject.color,
                subject.sync_status.as_str(),
                subject.updated_at.to_rfc3339(),
                subject.id,
            ],
        )?;

        if rows_affected == 0 {
            return Err(AppError::not_found("Subject", subject.id));
        }
        Ok(())
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM materias WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(AppError::not_found("Subject", id));
        }
        Ok(())
    }

    fn exists(&self, id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM materias WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn code_exists(&self, usuario_id: i64, codigo: &str, excluding: Option<i64>) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM materias
             WHERE codigo = ?1 AND usuario_id = ?2 AND (?3 IS NULL OR id != ?3)",
            params![codigo, usuario_id, excluding],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }
}
