// src/repositories/grade_repository.rs
//
// Grade (nota) persistence

use rusqlite::{params, OptionalExtension, Row};
use std::sync::Arc;

use super::row_mapping::{date, now_rfc3339, sync_status, timestamp};
use crate::db::ConnectionPool;
use crate::domain::{Grade, NewGrade};
use crate::error::{AppError, AppResult};

const GRADE_COLUMNS: &str = "id, materia_id, tipo_evaluacion, nota, porcentaje, fecha, \
     observaciones, sync_status, created_at, updated_at";

pub trait GradeRepository: Send + Sync {
    fn insert(&self, grade: &NewGrade) -> AppResult<i64>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<Grade>>;
    fn list_by_subject(&self, materia_id: i64) -> AppResult<Vec<Grade>>;
    fn list_by_user(&self, usuario_id: i64) -> AppResult<Vec<Grade>>;
    fn update(&self, grade: &Grade) -> AppResult<()>;
    fn delete(&self, id: i64) -> AppResult<()>;

    /// Sum of the weights recorded for a subject, optionally leaving one grade out
    fn total_percentage(&self, materia_id: i64, excluding: Option<i64>) -> AppResult<f64>;
}

pub struct SqliteGradeRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteGradeRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    pub(crate) fn row_to_grade(row: &Row) -> Result<Grade, rusqlite::Error> {
        Ok(Grade {
            id: row.get("id")?,
            materia_id: row.get("materia_id")?,
            tipo_evaluacion: row.get("tipo_evaluacion")?,
            nota: row.get("nota")?,
            porcentaje: row.get("porcentaje")?,
            fecha: date(row, "fecha")?,
            observaciones: row.get("observaciones")?,
            sync_status: sync_status(row, "sync_status")?,
            created_at: timestamp(row, "created_at")?,
            updated_at: timestamp(row, "updated_at")?,
        })
    }
}

impl GradeRepository for SqliteGradeRepository {
    fn insert(&self, grade: &NewGrade) -> AppResult<i64> {
        let conn = self.pool.get()?;
        let now = now_rfc3339();

        conn.execute(
            "INSERT INTO notas (
                materia_id, tipo_evaluacion, nota, porcentaje, fecha, observaciones,
                sync_status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', ?7, ?7)",
            params![
                grade.materia_id,
                grade.tipo_evaluacion,
                grade.nota,
                grade.porcentaje,
                grade.fecha.format("%Y-%m-%d").to_string(),
                grade.observaciones,
                now,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<Grade>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM notas WHERE id = ?1", GRADE_COLUMNS))?;

        let grade = stmt.query_row(params![id], Self::row_to_grade).optional()?;
        Ok(grade)
    }

    fn list_by_subject(&self, materia_id: i64) -> AppResult<Vec<Grade>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM notas
             WHERE materia_id = ?1
             ORDER BY fecha DESC, created_at DESC, id DESC",
            GRADE_COLUMNS
        ))?;

        let grades = stmt
            .query_map(params![materia_id], Self::row_to_grade)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(grades)
    }

    fn list_by_user(&self, usuario_id: i64) -> AppResult<Vec<Grade>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT n.id, n.materia_id, n.tipo_evaluacion, n.nota, n.porcentaje, n.fecha,
                    n.observaciones, n.sync_status, n.created_at, n.updated_at
             FROM notas n
             INNER JOIN materias m ON n.materia_id = m.id
             WHERE m.usuario_id = ?1
             ORDER BY n.fecha DESC, n.created_at DESC, n.id DESC",
        )?;

        let grades = stmt
            .query_map(params![usuario_id], Self::row_to_grade)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(grades)
    }

    fn update(&self, grade: &Grade) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE notas
             SET tipo_evaluacion = ?1, nota = ?2, porcentaje = ?3, fecha = ?4,
                 observaciones = ?5, sync_status = ?6, updated_at = ?7
             WHERE id = ?8",
            params![
                grade.tipo_evaluacion,
                grade.nota,
                grade.porcentaje,
                grade.fecha.format("%Y-%m-%d").to_string(),
                grade.observaciones,
                grade.sync_status.as_str(),
                grade.updated_at.to_rfc3339(),
                grade.id,
            ],
        )?;

        if rows_affected == 0 {
            return Err(AppError::not_found("Grade", grade.id));
        }
        Ok(())
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM notas WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(AppError::not_found("Grade", id));
        }
        Ok(())
    }

    fn total_percentage(&self, materia_id: i64, excluding: Option<i64>) -> AppResult<f64> {
        let conn = self.pool.get()?;

        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(porcentaje), 0.0) FROM notas
             WHERE materia_id = ?1 AND (?2 IS NULL OR id != ?2)",
            params![materia_id, excluding],
            |row| row.get(0),
        )?;

        Ok(total)
    }
}
