// src/services/schedule_service.rs
use std::sync::Arc;

use chrono::NaiveTime;

use crate::domain::{
    format_clock, validate_new_schedule, validate_schedule, DayOfWeek, NewSchedule, Schedule,
    ScheduleChanges, ScheduleDetail,
};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, ScheduleCreated, ScheduleDeleted, ScheduleUpdated};
use crate::repositories::{ScheduleRepository, SubjectRepository};

#[derive(Debug, Clone)]
pub struct CreateScheduleRequest {
    pub materia_id: i64,
    pub dia_semana: DayOfWeek,
    pub hora_inicio: NaiveTime,
    pub hora_fin: NaiveTime,
    pub aula: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateScheduleRequest {
    pub horario_id: i64,
    pub changes: ScheduleChanges,
}

pub struct ScheduleService {
    schedule_repo: Arc<dyn ScheduleRepository>,
    subject_repo: Arc<dyn SubjectRepository>,
    event_bus: Arc<EventBus>,
}

impl ScheduleService {
    pub fn new(
        schedule_repo: Arc<dyn ScheduleRepository>,
        subject_repo: Arc<dyn SubjectRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            schedule_repo,
            subject_repo,
            event_bus,
        }
    }

    pub fn create_schedule(&self, request: CreateScheduleRequest) -> AppResult<Schedule> {
        if !self.subject_repo.exists(request.materia_id)? {
            return Err(AppError::not_found("Subject", request.materia_id));
        }

        let new_schedule = NewSchedule {
            materia_id: request.materia_id,
            dia_semana: request.dia_semana,
            hora_inicio: request.hora_inicio,
            hora_fin: request.hora_fin,
            aula: request.aula.filter(|a| !a.trim().is_empty()),
        };

        validate_new_schedule(&new_schedule)?;
        self.ensure_slot_free(
            new_schedule.materia_id,
            new_schedule.dia_semana,
            new_schedule.hora_inicio,
            None,
        )?;

        let id = self.schedule_repo.insert(&new_schedule)?;
        let schedule = self
            .schedule_repo
            .get_by_id(id)?
            .ok_or_else(|| AppError::not_found("Schedule", id))?;

        self.event_bus.emit(ScheduleCreated::new(
            schedule.id,
            schedule.materia_id,
            schedule.dia_semana.number(),
        ));

        Ok(schedule)
    }

    pub fn update_schedule(&self, request: UpdateScheduleRequest) -> AppResult<Schedule> {
        let mut schedule = self
            .schedule_repo
            .get_by_id(request.horario_id)?
            .ok_or_else(|| AppError::not_found("Schedule", request.horario_id))?;

        if request.changes.is_empty() {
            return Ok(schedule);
        }

        let moves_slot = request.changes.moves_slot();
        schedule.apply_changes(request.changes);
        validate_schedule(&schedule)?;

        if moves_slot {
            self.ensure_slot_free(
                schedule.materia_id,
                schedule.dia_semana,
                schedule.hora_inicio,
                Some(schedule.id),
            )?;
        }

        self.schedule_repo.update(&schedule)?;

        self.event_bus
            .emit(ScheduleUpdated::new(schedule.id, schedule.materia_id));
        Ok(schedule)
    }

    pub fn delete_schedule(&self, horario_id: i64) -> AppResult<()> {
        let schedule = self
            .schedule_repo
            .get_by_id(horario_id)?
            .ok_or_else(|| AppError::not_found("Schedule", horario_id))?;

        self.schedule_repo.delete(horario_id)?;

        self.event_bus
            .emit(ScheduleDeleted::new(schedule.id, schedule.materia_id));
        Ok(())
    }

    pub fn get_schedule(&self, horario_id: i64) -> AppResult<Option<Schedule>> {
        self.schedule_repo.get_by_id(horario_id)
    }

    pub fn list_schedules_by_subject(&self, materia_id: i64) -> AppResult<Vec<Schedule>> {
        self.schedule_repo.list_by_subject(materia_id)
    }

    /// Weekly timetable of a user, ordered by day then start time
    pub fn weekly_schedule(&self, usuario_id: i64) -> AppResult<Vec<ScheduleDetail>> {
        self.schedule_repo.list_details_by_user(usuario_id)
    }

    fn ensure_slot_free(
        &self,
        materia_id: i64,
        dia: DayOfWeek,
        hora_inicio: NaiveTime,
        excluding: Option<i64>,
    ) -> AppResult<()> {
        if self
            .schedule_repo
            .slot_taken(materia_id, dia, hora_inicio, excluding)?
        {
            return Err(AppError::Conflict(format!(
                "Subject {} already has a class on {} at {}",
                materia_id,
                dia.nombre(),
                format_clock(&hora_inicio)
            )));
        }
        Ok(())
    }
}
