// src/cli/mod.rs
//
// Command-line front end
//
// Every subcommand maps onto one command handler; results are printed as
// pretty JSON, failures as an ErrorResponse on stderr.

pub mod args;

pub use args::Cli;

use serde::Serialize;
use serde_json::{json, Value};

use crate::application::commands;
use crate::application::dto::*;
use crate::application::error_handling::{CommandResult, ErrorResponse};
use crate::application::state::AppState;
use crate::error::AppError;

use args::{
    AuthCommand, AverageCommand, Command, DbCommand, GradeCommand, ScheduleCommand,
    SubjectCommand, SyncCommand, UserCommand,
};

fn to_json<T: Serialize>(value: T) -> CommandResult<Value> {
    serde_json::to_value(value).map_err(|e| ErrorResponse::from(AppError::from(e)))
}

fn found<T: Serialize>(value: Option<T>, what: &str, id: i64) -> CommandResult<Value> {
    match value {
        Some(value) => to_json(value),
        None => Err(ErrorResponse::from(AppError::not_found(what, id))),
    }
}

fn deleted(what: &str, id: i64) -> Value {
    json!({ "deleted": format!("{} {}", what, id) })
}

/// Execute one parsed command against the application state
pub async fn run(state: &AppState, command: Command) -> CommandResult<Value> {
    match command {
        Command::Auth { command } => run_auth(state, command).await,
        Command::User { command } => run_user(state, command),
        Command::Subject { command } => run_subject(state, command),
        Command::Grade { command } => run_grade(state, command),
        Command::Schedule { command } => run_schedule(state, command),
        Command::Average { command } => run_average(state, command),
        Command::Sync { command } => match command {
            SyncCommand::Status => to_json(commands::sync_status(state)?),
            SyncCommand::Push => to_json(commands::sync_push(state).await?),
        },
        Command::Db { command } => run_db(state, command),
    }
}

async fn run_auth(state: &AppState, command: AuthCommand) -> CommandResult<Value> {
    match command {
        AuthCommand::Register {
            email,
            password,
            nombre,
            universidad,
            carrera,
            semestre,
        } => {
            let dto = RegisterAccountDto {
                email,
                password,
                nombre,
                universidad,
                carrera,
                semestre,
            };
            to_json(commands::register_account(state, dto).await?)
        }
        AuthCommand::Login { email, password } => {
            to_json(commands::login(state, email, password).await?)
        }
        AuthCommand::Logout => Ok(json!({ "signed_out": commands::logout(state)? })),
        AuthCommand::ResetPassword { email } => {
            commands::reset_password(state, email.clone()).await?;
            Ok(json!({ "reset_email_sent": email.trim() }))
        }
        AuthCommand::Whoami => to_json(commands::whoami(state)?),
    }
}

fn run_user(state: &AppState, command: UserCommand) -> CommandResult<Value> {
    match command {
        UserCommand::Create { email, nombre } => {
            to_json(commands::create_user(state, email, nombre)?)
        }
        UserCommand::Get { id } => found(commands::get_user(state, id)?, "User", id),
        UserCommand::List => to_json(commands::list_users(state)?),
        UserCommand::Update { id, email, nombre } => to_json(commands::update_user(
            state,
            UpdateUserDto {
                usuario_id: id,
                email,
                nombre,
            },
        )?),
        UserCommand::Delete { id } => {
            commands::delete_user(state, id)?;
            Ok(deleted("User", id))
        }
    }
}

fn run_subject(state: &AppState, command: SubjectCommand) -> CommandResult<Value> {
    match command {
        SubjectCommand::Add {
            user,
            codigo,
            nombre,
            creditos,
            docente,
            periodo,
            color,
        } => {
            let dto = CreateSubjectDto {
                usuario_id: state.resolve_user(user.usuario_id)?,
                codigo,
                nombre,
                creditos,
                docente,
                periodo,
                color,
            };
            to_json(commands::create_subject(state, dto)?)
        }
        SubjectCommand::Get { id } => found(commands::get_subject(state, id)?, "Subject", id),
        SubjectCommand::List { user, averages } => {
            let usuario_id = state.resolve_user(user.usuario_id)?;
            if averages {
                to_json(commands::list_subjects_with_averages(state, usuario_id)?)
            } else {
                to_json(commands::list_subjects(state, usuario_id)?)
            }
        }
        SubjectCommand::Update {
            id,
            codigo,
            nombre,
            creditos,
            docente,
            periodo,
            color,
        } => to_json(commands::update_subject(
            state,
            UpdateSubjectDto {
                materia_id: id,
                codigo,
                nombre,
                creditos,
                docente,
                periodo,
                color,
            },
        )?),
        SubjectCommand::Delete { id } => {
            commands::delete_subject(state, id)?;
            Ok(deleted("Subject", id))
        }
    }
}

fn run_grade(state: &AppState, command: GradeCommand) -> CommandResult<Value> {
    match command {
        GradeCommand::Add {
            materia_id,
            tipo_evaluacion,
            nota,
            porcentaje,
            fecha,
            observaciones,
        } => to_json(commands::record_grade(
            state,
            RecordGradeDto {
                materia_id,
                tipo_evaluacion,
                nota,
                porcentaje,
                fecha,
                observaciones,
            },
        )?),
        GradeCommand::Get { id } => found(commands::get_grade(state, id)?, "Grade", id),
        GradeCommand::List { materia_id, user } => match materia_id {
            Some(materia_id) => to_json(commands::list_grades_by_subject(state, materia_id)?),
            None => {
                let usuario_id = state.resolve_user(user.usuario_id)?;
                to_json(commands::list_grades_by_user(state, usuario_id)?)
            }
        },
        GradeCommand::Update {
            id,
            tipo_evaluacion,
            nota,
            porcentaje,
            fecha,
            observaciones,
        } => to_json(commands::update_grade(
            state,
            UpdateGradeDto {
                nota_id: id,
                tipo_evaluacion,
                nota,
                porcentaje,
                fecha,
                observaciones,
            },
        )?),
        GradeCommand::Delete { id } => {
            commands::delete_grade(state, id)?;
            Ok(deleted("Grade", id))
        }
    }
}

fn run_schedule(state: &AppState, command: ScheduleCommand) -> CommandResult<Value> {
    match command {
        ScheduleCommand::Add {
            materia_id,
            dia_semana,
            hora_inicio,
            hora_fin,
            aula,
        } => to_json(commands::create_schedule(
            state,
            CreateScheduleDto {
                materia_id,
                dia_semana,
                hora_inicio,
                hora_fin,
                aula,
            },
        )?),
        ScheduleCommand::Get { id } => found(commands::get_schedule(state, id)?, "Schedule", id),
        ScheduleCommand::List { materia_id } => {
            to_json(commands::list_schedules_by_subject(state, materia_id)?)
        }
        ScheduleCommand::Week { user } => {
            let usuario_id = state.resolve_user(user.usuario_id)?;
            to_json(commands::weekly_schedule(state, usuario_id)?)
        }
        ScheduleCommand::Update {
            id,
            dia_semana,
            hora_inicio,
            hora_fin,
            aula,
        } => to_json(commands::update_schedule(
            state,
            UpdateScheduleDto {
                horario_id: id,
                dia_semana,
                hora_inicio,
                hora_fin,
                aula,
            },
        )?),
        ScheduleCommand::Delete { id } => {
            commands::delete_schedule(state, id)?;
            Ok(deleted("Schedule", id))
        }
    }
}

fn run_average(state: &AppState, command: AverageCommand) -> CommandResult<Value> {
    match command {
        AverageCommand::Subject { id } => to_json(commands::subject_average(state, id)?),
        AverageCommand::User { user } => {
            let usuario_id = state.resolve_user(user.usuario_id)?;
            to_json(commands::user_average(state, usuario_id)?)
        }
        AverageCommand::Summary { user } => {
            let usuario_id = state.resolve_user(user.usuario_id)?;
            to_json(commands::user_summary(state, usuario_id)?)
        }
        AverageCommand::Pending { user } => {
            let usuario_id = state.resolve_user(user.usuario_id)?;
            to_json(commands::pending_percentages(state, usuario_id)?)
        }
    }
}

fn run_db(state: &AppState, command: DbCommand) -> CommandResult<Value> {
    match command {
        // Opening the state already migrated the schema
        DbCommand::Init => Ok(json!({ "initialized": commands::check_database(state)? == "ok" })),
        DbCommand::Stats => to_json(commands::database_stats(state)?),
        DbCommand::Check => Ok(json!({ "integrity": commands::check_database(state)? })),
        DbCommand::Tables => to_json(commands::list_tables(state)?),
        DbCommand::Export { output } => {
            let export = to_json(commands::export_data(state)?)?;
            match output {
                Some(path) => {
                    let content = serde_json::to_string_pretty(&export)
                        .map_err(|e| ErrorResponse::from(AppError::from(e)))?;
                    std::fs::write(&path, content).map_err(|e| ErrorResponse::from(AppError::from(e)))?;
                    log::info!("Exported data to {}", path.display());
                    Ok(json!({ "exported_to": path.display().to_string() }))
                }
                None => Ok(export),
            }
        }
        DbCommand::Clear { yes } => {
            if !yes {
                return Err(ErrorResponse::validation(
                    "Refusing to delete all data without --yes",
                ));
            }
            commands::clear_data(state)?;
            Ok(json!({ "cleared": true }))
        }
        DbCommand::Seed => to_json(commands::seed_demo_data(state)?),
    }
}
