// src/application/commands/schedule_commands.rs
//
// Schedule Command Handlers

use crate::application::commands::clearable;
use crate::application::{dto::*, error_handling::CommandResult, state::AppState};
use crate::domain::{parse_clock, DayOfWeek, ScheduleChanges};
use crate::services::{CreateScheduleRequest, UpdateScheduleRequest};

pub fn create_schedule(state: &AppState, dto: CreateScheduleDto) -> CommandResult<ScheduleDto> {
    let dia_semana: DayOfWeek = dto.dia_semana.parse()?;
    let hora_inicio = parse_clock(&dto.hora_inicio)?;
    let hora_fin = parse_clock(&dto.hora_fin)?;

    let schedule = state.schedule_service.create_schedule(CreateScheduleRequest {
        materia_id: dto.materia_id,
        dia_semana,
        hora_inicio,
        hora_fin,
        aula: dto.aula,
    })?;

    Ok(ScheduleDto::from(schedule))
}

pub fn get_schedule(state: &AppState, horario_id: i64) -> CommandResult<Option<ScheduleDto>> {
    let schedule = state.schedule_service.get_schedule(horario_id)?;
    Ok(schedule.map(ScheduleDto::from))
}

pub fn list_schedules_by_subject(
    state: &AppState,
    materia_id: i64,
) -> CommandResult<Vec<ScheduleDto>> {
    let schedules = state.schedule_service.list_schedules_by_subject(materia_id)?;
    Ok(schedules.into_iter().map(ScheduleDto::from).collect())
}

/// Weekly timetable of a user, Monday first
pub fn weekly_schedule(state: &AppState, usuario_id: i64) -> CommandResult<Vec<ScheduleDetailDto>> {
    let week = state.schedule_service.weekly_schedule(usuario_id)?;
    Ok(week.into_iter().map(ScheduleDetailDto::from).collect())
}

pub fn update_schedule(state: &AppState, dto: UpdateScheduleDto) -> CommandResult<ScheduleDto> {
    let changes = ScheduleChanges {
        dia_semana: dto.dia_semana.as_deref().map(str::parse::<DayOfWeek>).transpose()?,
        hora_inicio: dto.hora_inicio.as_deref().map(parse_clock).transpose()?,
        hora_fin: dto.hora_fin.as_deref().map(parse_clock).transpose()?,
        aula: clearable(dto.aula),
    };

    let schedule = state.schedule_service.update_schedule(UpdateScheduleRequest {
        horario_id: dto.horario_id,
        changes,
    })?;

    Ok(ScheduleDto::from(schedule))
}

pub fn delete_schedule(state: &AppState, horario_id: i64) -> CommandResult<()> {
    state.schedule_service.delete_schedule(horario_id)?;
    Ok(())
}
