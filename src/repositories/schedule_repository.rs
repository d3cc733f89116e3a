// src/repositories/schedule_repository.rs
//
// Schedule (horario) persistence

use rusqlite::{params, OptionalExtension, Row};
use std::sync::Arc;

use super::row_mapping::{clock, day_of_week, now_rfc3339, sync_status, timestamp};
use crate::db::ConnectionPool;
use crate::domain::{format_clock, DayOfWeek, NewSchedule, Schedule, ScheduleDetail};
use crate::error::{AppError, AppResult};
use chrono::NaiveTime;

const SCHEDULE_COLUMNS: &str = "id, materia_id, dia_semana, hora_inicio, hora_fin, aula, \
     sync_status, created_at, updated_at";

pub trait ScheduleRepository: Send + Sync {
    fn insert(&self, schedule: &NewSchedule) -> AppResult<i64>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<Schedule>>;
    fn list_by_subject(&self, materia_id: i64) -> AppResult<Vec<Schedule>>;

    /// Every slot of a user's subjects, ordered by day then start time
    fn list_details_by_user(&self, usuario_id: i64) -> AppResult<Vec<ScheduleDetail>>;

    fn update(&self, schedule: &Schedule) -> AppResult<()>;
    fn delete(&self, id: i64) -> AppResult<()>;

    /// Whether the subject already has a slot starting at that day and time
    fn slot_taken(
        &self,
        materia_id: i64,
        dia: DayOfWeek,
        hora_inicio: NaiveTime,
        excluding: Option<i64>,
    ) -> AppResult<bool>;
}

pub struct SqliteScheduleRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteScheduleRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    pub(crate) fn row_to_schedule(row: &Row) -> Result<Schedule, rusqlite::Error> {
        Ok(Schedule {
            id: row.get("id")?,
            materia_id: row.get("materia_id")?,
            dia_semana: day_of_week(row, "dia_semana")?,
            hora_inicio: clock(row, "hora_inicio")?,
            hora_fin: clock(row, "hora_fin")?,
            aula: row.get("aula")?,
            sync_status: sync_status(row, "sync_status")?,
            created_at: timestamp(row, "created_at")?,
            updated_at: timestamp(row, "updated_at")?,
        })
    }

    fn row_to_detail(row: &Row) -> Result<ScheduleDetail, rusqlite::Error> {
        Ok(ScheduleDetail {
            schedule: Self::row_to_schedule(row)?,
            materia_nombre: row.get("materia_nombre")?,
            codigo: row.get("codigo")?,
            docente: row.get("docente")?,
            color: row.get("color")?,
        })
    }
}

impl ScheduleRepository for SqliteScheduleRepository {
    fn insert(&self, schedule: &NewSchedule) -> AppResult<i64> {
        let conn = self.pool.get()?;
        let now = now_rfc3339();

        conn.execute(
            "INSERT INTO horarios (
                materia_id, dia_semana, hora_inicio, hora_fin, aula,
                sync_status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6, ?6)",
            params![
                schedule.materia_id,
                schedule.dia_semana.number(),
                format_clock(&schedule.hora_inicio),
                format_clock(&schedule.hora_fin),
                schedule.aula,
                now,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<Schedule>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM horarios WHERE id = ?1",
            SCHEDULE_COLUMNS
        ))?;

        let schedule = stmt.query_row(params![id], Self::row_to_schedule).optional()?;
        Ok(schedule)
    }

    fn list_by_subject(&self, materia_id: i64) -> AppResult<Vec<Schedule>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM horarios
             WHERE materia_id = ?1
             ORDER BY dia_semana, hora_inicio",
            SCHEDULE_COLUMNS
        ))?;

        let schedules = stmt
            .query_map(params![materia_id], Self::row_to_schedule)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(schedules)
    }

    fn list_details_by_user(&self, usuario_id: i64) -> AppResult<Vec<ScheduleDetail>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT h.id, h.materia_id, h.dia_semana, h.hora_inicio, h.hora_fin, h.aula,
                    h.sync_status, h.created_at, h.updated_at,
                    m.nombre AS materia_nombre, m.codigo, m.docente, m.color
             FROM horarios h
             INNER JOIN materias m ON h.materia_id = m.id
             WHERE m.usuario_id = ?1
             ORDER BY h.dia_semana, h.hora_inicio",
        )?;

        let details = stmt
            .query_map(params![usuario_id], Self::row_to_detail)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(details)
    }

    fn update(&self, schedule: &Schedule) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE horarios
             SET dia_semana = ?1, hora_inicio = ?2, hora_fin = ?3, aula = ?4,
                 sync_status = ?5, updated_at = ?6
             WHERE id = ?7",
            params![
                schedule.dia_semana.number(),
                format_clock(&schedule.hora_inicio),
                format_clock(&schedule.hora_fin),
                schedule.aula,
                schedule.sync_status.as_str(),
                schedule.updated_at.to_rfc3339(),
                schedule.id,
            ],
        )?;

        if rows_affected == 0 {
            return Err(AppError::not_found("Schedule", schedule.id));
        }
        Ok(())
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM horarios WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(AppError::not_found("Schedule", id));
        }
        Ok(())
    }

    fn slot_taken(
        &self,
        materia_id: i64,
        dia: DayOfWeek,
        hora_inicio: NaiveTime,
        excluding: Option<i64>,
    ) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM horarios
             WHERE materia_id = ?1 AND dia_semana = ?2 AND hora_inicio = ?3
               AND (?4 IS NULL OR id != ?4)",
            params![materia_id, dia.number(), format_clock(&hora_inicio), excluding],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }
}
