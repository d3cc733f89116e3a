// src/repositories/averages_repository.rs
//
// Derived aggregate queries over grades.
// Averages are computed by SQLite on every call and never stored.

use rusqlite::{params, Row};
use std::sync::Arc;

use super::subject_repository::SqliteSubjectRepository;
use crate::db::ConnectionPool;
use crate::domain::{round2, SubjectPendingWeight, SubjectWithAverage, MAX_TOTAL_PERCENTAGE};
use crate::error::AppResult;

/// Weighted subject average in SQL: Σ(nota × porcentaje) / Σ(porcentaje)
const SUBJECT_AVERAGE_EXPR: &str =
    "SUM(n.nota * n.porcentaje) / NULLIF(SUM(n.porcentaje), 0)";

pub trait AveragesRepository: Send + Sync {
    /// Weighted average of one subject, `None` when it has no grades
    fn subject_average(&self, materia_id: i64) -> AppResult<Option<f64>>;

    /// Credit-weighted mean of the subject averages of a user,
    /// counting only subjects with at least one grade
    fn user_average(&self, usuario_id: i64) -> AppResult<Option<f64>>;

    fn subjects_with_averages(&self, usuario_id: i64) -> AppResult<Vec<SubjectWithAverage>>;

    /// Subjects whose weights do not reach 100% yet, largest gap first
    fn subjects_missing_percentage(&self, usuario_id: i64) -> AppResult<Vec<SubjectPendingWeight>>;
}

pub struct SqliteAveragesRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteAveragesRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_subject_with_average(row: &Row) -> Result<SubjectWithAverage, rusqlite::Error> {
        let cantidad: i64 = row.get("cantidad_notas")?;
        Ok(SubjectWithAverage {
            subject: SqliteSubjectRepository::row_to_subject(row)?,
            promedio: row.get("promedio")?,
            porcentaje_total: round2(row.get("porcentaje_total")?),
            cantidad_notas: u32::try_from(cantidad).unwrap_or(u32::MAX),
        })
    }
}

impl AveragesRepository for SqliteAveragesRepository {
    fn subject_average(&self, materia_id: i64) -> AppResult<Option<f64>> {
        let conn = self.pool.get()?;

        let promedio: Option<f64> = conn.query_row(
            &format!(
                "SELECT ROUND({}, 2) FROM notas n WHERE n.materia_id = ?1",
                SUBJECT_AVERAGE_EXPR
            ),
            params![materia_id],
            |row| row.get(0),
        )?;

        Ok(promedio)
    }

    fn user_average(&self, usuario_id: i64) -> AppResult<Option<f64>> {
        let conn = self.pool.get()?;

        let promedio: Option<f64> = conn.query_row(
            &format!(
                "SELECT ROUND(SUM(p.promedio * m.creditos) / NULLIF(SUM(m.creditos), 0), 2)
                 FROM materias m
                 INNER JOIN (
                     SELECT n.materia_id, {} AS promedio
                     FROM notas n
                     GROUP BY n.materia_id
                     HAVING SUM(n.porcentaje) > 0
                 ) p ON m.id = p.materia_id
                 WHERE m.usuario_id = ?1",
                SUBJECT_AVERAGE_EXPR
            ),
            params![usuario_id],
            |row| row.get(0),
        )?;

        Ok(promedio)
    }

    fn subjects_with_averages(&self, usuario_id: i64) -> AppResult<Vec<SubjectWithAverage>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT m.id, m.codigo, m.nombre, m.creditos, m.docente, m.periodo, m.color,
                    m.usuario_id, m.sync_status, m.created_at, m.updated_at,
                    ROUND({}, 2) AS promedio,
                    COALESCE(SUM(n.porcentaje), 0.0) AS porcentaje_total,
                    COUNT(n.id) AS cantidad_notas
             FROM materias m
             LEFT JOIN notas n ON m.id = n.materia_id
             WHERE m.usuario_id = ?1
             GROUP BY m.id
             ORDER BY m.periodo DESC, m.nombre ASC",
            SUBJECT_AVERAGE_EXPR
        ))?;

        let subjects = stmt
            .query_map(params![usuario_id], Self::row_to_subject_with_average)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(subjects)
    }

    fn subjects_missing_percentage(&self, usuario_id: i64) -> AppResult<Vec<SubjectPendingWeight>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT m.id, m.codigo, m.nombre,
                    ?2 - COALESCE(SUM(n.porcentaje), 0.0) AS porcentaje_faltante
             FROM materias m
             LEFT JOIN notas n ON m.id = n.materia_id
             WHERE m.usuario_id = ?1
             GROUP BY m.id
             HAVING porcentaje_faltante > 1e-9
             ORDER BY porcentaje_faltante DESC, m.nombre ASC",
        )?;

        let pending = stmt
            .query_map(params![usuario_id, MAX_TOTAL_PERCENTAGE], |row| {
                Ok(SubjectPendingWeight {
                    materia_id: row.get("id")?,
                    codigo: row.get("codigo")?,
                    nombre: row.get("nombre")?,
                    porcentaje_faltante: round2(row.get("porcentaje_faltante")?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pending)
    }
}
