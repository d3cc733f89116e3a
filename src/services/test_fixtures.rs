// src/services/test_fixtures.rs
//
// Wiring shared by the service test suites: one in-memory database,
// SQLite repositories and every synchronous service on a common bus.

use std::sync::Arc;

use crate::db::{create_memory_pool, get_connection, initialize_database, ConnectionPool};
use crate::events::EventBus;
use crate::repositories::{
    SqliteAveragesRepository, SqliteGradeRepository, SqliteScheduleRepository,
    SqliteSubjectRepository, SqliteSyncRepository, SqliteUserRepository,
};
use crate::services::{
    AcademicSummaryService, CreateSubjectRequest, DataService, GradeService, RecordGradeRequest,
    RegisterUserRequest, ScheduleService, SubjectService, UserService,
};

pub struct Fixture {
    pub pool: Arc<ConnectionPool>,
    pub bus: Arc<EventBus>,
    pub users: Arc<UserService>,
    pub subjects: Arc<SubjectService>,
    pub grades: Arc<GradeService>,
    pub schedules: Arc<ScheduleService>,
    pub summary: Arc<AcademicSummaryService>,
    pub data: DataService,
    pub user_repo: Arc<SqliteUserRepository>,
    pub subject_repo: Arc<SqliteSubjectRepository>,
    pub sync_repo: Arc<SqliteSyncRepository>,
}

impl Fixture {
    pub fn new() -> Self {
        let pool = Arc::new(create_memory_pool().unwrap());
        {
            let conn = get_connection(&pool).unwrap();
            initialize_database(&conn).unwrap();
        }

        let bus = Arc::new(EventBus::new());
        let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
        let subject_repo = Arc::new(SqliteSubjectRepository::new(pool.clone()));
        let grade_repo = Arc::new(SqliteGradeRepository::new(pool.clone()));
        let schedule_repo = Arc::new(SqliteScheduleRepository::new(pool.clone()));
        let averages_repo = Arc::new(SqliteAveragesRepository::new(pool.clone()));
        let sync_repo = Arc::new(SqliteSyncRepository::new(pool.clone()));

        let users = Arc::new(UserService::new(user_repo.clone(), bus.clone()));
        let subjects = Arc::new(SubjectService::new(
            subject_repo.clone(),
            user_repo.clone(),
            averages_repo.clone(),
            bus.clone(),
        ));
        let grades = Arc::new(GradeService::new(
            grade_repo.clone(),
            subject_repo.clone(),
            bus.clone(),
        ));
        let schedules = Arc::new(ScheduleService::new(
            schedule_repo.clone(),
            subject_repo.clone(),
            bus.clone(),
        ));
        let summary = Arc::new(AcademicSummaryService::new(
            averages_repo,
            grade_repo.clone(),
            user_repo.clone(),
            bus.clone(),
        ));
        summary.register_event_handlers();

        let data = DataService::new(
            pool.clone(),
            user_repo.clone(),
            subject_repo.clone(),
            grade_repo,
            schedule_repo,
            users.clone(),
            subjects.clone(),
            grades.clone(),
            schedules.clone(),
            bus.clone(),
        );

        Self {
            pool,
            bus,
            users,
            subjects,
            grades,
            schedules,
            summary,
            data,
            user_repo,
            subject_repo,
            sync_repo,
        }
    }

    pub fn user(&self, email: &str) -> i64 {
        self.users
            .register_user(RegisterUserRequest {
                email: email.to_string(),
                nombre: "Estudiante".to_string(),
                firebase_uid: None,
            })
            .unwrap()
            .id
    }

    pub fn subject(&self, usuario_id: i64, codigo: &str, creditos: u8) -> i64 {
        self.subjects
            .create_subject(CreateSubjectRequest {
                usuario_id,
                codigo: codigo.to_string(),
                nombre: format!("Materia {}", codigo),
                creditos: Some(creditos),
                docente: None,
                periodo: Some("2024-2".to_string()),
                color: None,
            })
            .unwrap()
            .id
    }

    pub fn grade_request(materia_id: i64, nota: f64, porcentaje: f64) -> RecordGradeRequest {
        RecordGradeRequest {
            materia_id,
            tipo_evaluacion: "Parcial".to_string(),
            nota,
            porcentaje,
            fecha: None,
            observaciones: None,
        }
    }

    pub fn event_types(&self) -> Vec<String> {
        self.bus
            .get_event_log()
            .into_iter()
            .map(|entry| entry.event_type)
            .collect()
    }
}
