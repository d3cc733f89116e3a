// src/services/data_service.rs
//
// Whole-database operations: JSON export, wipe and demonstration data.

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;

use crate::db::{clear_all_data, ConnectionPool};
use crate::domain::{DayOfWeek, Grade, ScheduleDetail, Subject, User};
use crate::error::{AppError, AppResult};
use crate::events::{DataCleared, DemoDataSeeded, EventBus};
use crate::repositories::{GradeRepository, ScheduleRepository, SubjectRepository, UserRepository};
use crate::services::grade_service::{GradeService, RecordGradeRequest};
use crate::services::schedule_service::{CreateScheduleRequest, ScheduleService};
use crate::services::subject_service::{CreateSubjectRequest, SubjectService};
use crate::services::user_service::{RegisterUserRequest, UserService};

pub const DEMO_EMAIL: &str = "estudiante@test.com";

#[derive(Debug, Clone, Serialize)]
pub struct ExportData {
    pub usuarios: Vec<User>,
    pub materias: Vec<Subject>,
    pub notas: Vec<Grade>,
    pub horarios: Vec<ScheduleDetail>,
    pub export_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedSummary {
    pub usuario_id: i64,
    pub materias: usize,
    pub notas: usize,
    pub horarios: usize,
}

pub struct DataService {
    pool: Arc<ConnectionPool>,
    user_repo: Arc<dyn UserRepository>,
    subject_repo: Arc<dyn SubjectRepository>,
    grade_repo: Arc<dyn GradeRepository>,
    schedule_repo: Arc<dyn ScheduleRepository>,
    user_service: Arc<UserService>,
    subject_service: Arc<SubjectService>,
    grade_service: Arc<GradeService>,
    schedule_service: Arc<ScheduleService>,
    event_bus: Arc<EventBus>,
}

impl DataService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: Arc<ConnectionPool>,
        user_repo: Arc<dyn UserRepository>,
        subject_repo: Arc<dyn SubjectRepository>,
        grade_repo: Arc<dyn GradeRepository>,
        schedule_repo: Arc<dyn ScheduleRepository>,
        user_service: Arc<UserService>,
        subject_service: Arc<SubjectService>,
        grade_service: Arc<GradeService>,
        schedule_service: Arc<ScheduleService>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            pool,
            user_repo,
            subject_repo,
            grade_repo,
            schedule_repo,
            user_service,
            subject_service,
            grade_service,
            schedule_service,
            event_bus,
        }
    }

    /// Every user with their subjects, grades and schedules
    pub fn export_all(&self) -> AppResult<ExportData> {
        let usuarios = self.user_repo.list_all()?;
        let mut materias = Vec::new();
        let mut notas = Vec::new();
        let mut horarios = Vec::new();

        for usuario in &usuarios {
            let user_subjects = self.subject_repo.list_by_user(usuario.id)?;
            for materia in &user_subjects {
                notas.extend(self.grade_repo.list_by_subject(materia.id)?);
            }
            materias.extend(user_subjects);
            horarios.extend(self.schedule_repo.list_details_by_user(usuario.id)?);
        }

        log::info!(
            "Exported {} users, {} subjects, {} grades, {} schedules",
            usuarios.len(),
            materias.len(),
            notas.len(),
            horarios.len()
        );

        Ok(ExportData {
            usuarios,
            materias,
            notas,
            horarios,
            export_timestamp: Utc::now(),
        })
    }

    /// Delete every row of every table
    pub fn clear_all(&self) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        clear_all_data(&mut conn)?;
        drop(conn);

        log::warn!("All local data deleted");
        self.event_bus.emit(DataCleared::new());
        Ok(())
    }

    /// Load a demonstration student with two subjects, three grades and two
    /// weekly classes. Fails if the demo student already exists.
    pub fn seed_demo_data(&self) -> AppResult<SeedSummary> {
        if self.user_repo.get_by_email(DEMO_EMAIL)?.is_some() {
            return Err(AppError::Conflict(
                "Demo data is already present".to_string(),
            ));
        }

        let usuario = self.user_service.register_user(RegisterUserRequest {
            email: DEMO_EMAIL.to_string(),
            nombre: "Juan Pérez".to_string(),
            firebase_uid: Some("test_firebase_uid_123".to_string()),
        })?;

        let movil = self.subject_service.create_subject(CreateSubjectRequest {
            usuario_id: usuario.id,
            codigo: "ING301".to_string(),
            nombre: "Aplicaciones Móviles I".to_string(),
            creditos: Some(3),
            docente: Some("Prof. García".to_string()),
            periodo: Some("2024-2".to_string()),
            color: None,
        })?;

        let calculo = self.subject_service.create_subject(CreateSubjectRequest {
            usuario_id: usuario.id,
            codigo: "MAT201".to_string(),
            nombre: "Cálculo II".to_string(),
            creditos: Some(4),
            docente: Some("Prof. Rodríguez".to_string()),
            periodo: Some("2024-2".to_string()),
            color: None,
        })?;

        let grades = [
            (movil.id, "Parcial 1", 4.2, 30.0),
            (movil.id, "Quiz 1", 3.8, 10.0),
            (calculo.id, "Parcial 1", 3.5, 35.0),
        ];
        for (materia_id, tipo, nota, porcentaje) in grades {
            self.grade_service.record_grade(RecordGradeRequest {
                materia_id,
                tipo_evaluacion: tipo.to_string(),
                nota,
                porcentaje,
                fecha: None,
                observaciones: None,
            })?;
        }

        let classes = [
            (movil.id, DayOfWeek::Monday, (8, 0), (10, 0), "A101"),
            (calculo.id, DayOfWeek::Tuesday, (10, 0), (12, 0), "B205"),
        ];
        for (materia_id, dia_semana, inicio, fin, aula) in classes {
            self.schedule_service.create_schedule(CreateScheduleRequest {
                materia_id,
                dia_semana,
                hora_inicio: clock(inicio)?,
                hora_fin: clock(fin)?,
                aula: Some(aula.to_string()),
            })?;
        }

        let summary = SeedSummary {
            usuario_id: usuario.id,
            materias: 2,
            notas: grades.len(),
            horarios: classes.len(),
        };

        log::info!("Demo data inserted for user {}", usuario.id);
        self.event_bus
            .emit(DemoDataSeeded::new(usuario.id, summary.materias));
        Ok(summary)
    }
}

fn clock((hour, minute): (u32, u32)) -> AppResult<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| AppError::Other(format!("Invalid time {:02}:{:02}", hour, minute)))
}
