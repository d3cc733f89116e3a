// src/cli/args.rs
//
// Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ConfigOverrides;

/// Local-first academic record manager: subjects, grades and class schedules
#[derive(Debug, Parser)]
#[command(name = "gestion-academica", version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "GESTION_ACADEMICA_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true, env = "GESTION_ACADEMICA_DB")]
    pub database: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `gestion_academica=trace`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Cloud project id
    #[arg(long, global = true, env = "GESTION_ACADEMICA_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Cloud web API key
    #[arg(long, global = true, env = "GESTION_ACADEMICA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            database_path: self.database.clone(),
            log_level: self.log_level.clone(),
            project_id: self.project_id.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign up, sign in and out
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
    /// Local users
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
    /// Subjects (materias)
    Subject {
        #[command(subcommand)]
        command: SubjectCommand,
    },
    /// Grades (notas)
    Grade {
        #[command(subcommand)]
        command: GradeCommand,
    },
    /// Weekly class schedule (horarios)
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommand,
    },
    /// Weighted averages
    Average {
        #[command(subcommand)]
        command: AverageCommand,
    },
    /// Cloud synchronization
    Sync {
        #[command(subcommand)]
        command: SyncCommand,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommand,
    },
}

/// `--user`, falling back to the signed-in user
#[derive(Debug, Clone, Copy, Args)]
pub struct UserArg {
    /// Local user id (defaults to the signed-in user)
    #[arg(long = "user", short = 'u')]
    pub usuario_id: Option<i64>,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "GESTION_ACADEMICA_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        nombre: String,
        #[arg(long, default_value = "")]
        universidad: String,
        #[arg(long, default_value = "")]
        carrera: String,
        #[arg(long, default_value_t = 1)]
        semestre: u8,
    },
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "GESTION_ACADEMICA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Email a password reset link
    ResetPassword {
        #[arg(long)]
        email: String,
    },
    /// Show the signed-in user
    Whoami,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a local user without a cloud account
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        nombre: String,
    },
    Get {
        id: i64,
    },
    List,
    Update {
        id: i64,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        nombre: Option<String>,
    },
    /// Delete a user with all their subjects, grades and schedules
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum SubjectCommand {
    Add {
        #[command(flatten)]
        user: UserArg,
        #[arg(long)]
        codigo: String,
        #[arg(long)]
        nombre: String,
        /// 1..6, defaults to 3
        #[arg(long)]
        creditos: Option<u8>,
        #[arg(long)]
        docente: Option<String>,
        /// Academic period, e.g. 2024-2
        #[arg(long)]
        periodo: Option<String>,
        /// #RRGGBB
        #[arg(long)]
        color: Option<String>,
    },
    Get {
        id: i64,
    },
    /// List subjects; `--averages` adds average and recorded weight
    List {
        #[command(flatten)]
        user: UserArg,
        #[arg(long)]
        averages: bool,
    },
    /// Update fields; an empty value clears docente / periodo
    Update {
        id: i64,
        #[arg(long)]
        codigo: Option<String>,
        #[arg(long)]
        nombre: Option<String>,
        #[arg(long)]
        creditos: Option<u8>,
        #[arg(long)]
        docente: Option<String>,
        #[arg(long)]
        periodo: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a subject with its grades and schedules
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum GradeCommand {
    /// Record a grade; the subject's weights may not exceed 100%
    Add {
        #[arg(long = "subject", short = 's')]
        materia_id: i64,
        /// Evaluation label, e.g. "Parcial 1"
        #[arg(long = "tipo")]
        tipo_evaluacion: String,
        /// Score 0.0..5.0
        #[arg(long)]
        nota: f64,
        /// Weight within the subject, (0, 100]
        #[arg(long)]
        porcentaje: f64,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        fecha: Option<String>,
        #[arg(long)]
        observaciones: Option<String>,
    },
    Get {
        id: i64,
    },
    /// Grades of a subject, or of a user when no subject is given
    List {
        #[arg(long = "subject", short = 's')]
        materia_id: Option<i64>,
        #[command(flatten)]
        user: UserArg,
    },
    Update {
        id: i64,
        #[arg(long = "tipo")]
        tipo_evaluacion: Option<String>,
        #[arg(long)]
        nota: Option<f64>,
        #[arg(long)]
        porcentaje: Option<f64>,
        #[arg(long)]
        fecha: Option<String>,
        #[arg(long)]
        observaciones: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum ScheduleCommand {
    Add {
        #[arg(long = "subject", short = 's')]
        materia_id: i64,
        /// 1..7 or a day name (lunes, martes, ...)
        #[arg(long = "dia")]
        dia_semana: String,
        /// HH:MM
        #[arg(long = "inicio")]
        hora_inicio: String,
        /// HH:MM
        #[arg(long = "fin")]
        hora_fin: String,
        #[arg(long)]
        aula: Option<String>,
    },
    Get {
        id: i64,
    },
    /// Classes of one subject
    List {
        #[arg(long = "subject", short = 's')]
        materia_id: i64,
    },
    /// Weekly timetable of a user
    Week {
        #[command(flatten)]
        user: UserArg,
    },
    Update {
        id: i64,
        #[arg(long = "dia")]
        dia_semana: Option<String>,
        #[arg(long = "inicio")]
        hora_inicio: Option<String>,
        #[arg(long = "fin")]
        hora_fin: Option<String>,
        #[arg(long)]
        aula: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum AverageCommand {
    /// Weighted average of one subject
    Subject {
        id: i64,
    },
    /// Credit-weighted overall average of a user
    User {
        #[command(flatten)]
        user: UserArg,
    },
    /// Averages per subject, overall average and missing weights
    Summary {
        #[command(flatten)]
        user: UserArg,
    },
    /// Subjects whose grade weights do not reach 100% yet
    Pending {
        #[command(flatten)]
        user: UserArg,
    },
}

#[derive(Debug, Subcommand)]
pub enum SyncCommand {
    /// Row counts per table and sync status
    Status,
    /// Push pending rows to the cloud project
    Push,
}

#[derive(Debug, Subcommand)]
pub enum DbCommand {
    /// Create or migrate the schema
    Init,
    /// Size and row counts
    Stats,
    /// Run an integrity check
    Check,
    /// Column layout of every table
    Tables,
    /// Dump every table as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Delete all data
    Clear {
        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Insert a demo student with subjects, grades and schedules
    Seed,
}
