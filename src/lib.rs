// src/lib.rs
// Gestion Academica - Local-first academic record manager
//
// Architecture:
// - Domain-centric: validation and average calculations live in domains
// - Event-driven: services coordinate through events
// - Explicit: No implicit behavior, no magic
// - Local-first: SQLite is the source of truth, the cloud is a mirror
// - Application Layer: CLI boundary

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod infrastructure;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod cli;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    // Averages
    credit_weighted_average,
    round2,
    weighted_average,
    AcademicSummary,
    // Schedule
    DayOfWeek,
    DomainError,
    // Grade
    Grade,
    NewGrade,
    NewSchedule,
    NewSubject,
    NewUser,
    Schedule,
    ScheduleDetail,
    // Subject
    Subject,
    SubjectPendingWeight,
    SubjectWithAverage,
    // Sync
    SyncStatus,
    SyncTable,
    // User
    User,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Configuration
// ============================================================================

pub use config::{AppConfig, ConfigOverrides};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{DomainEvent, EventBus, EventLogEntry};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, create_memory_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    AveragesRepository, GradeRepository, ScheduleRepository, SqliteAveragesRepository,
    SqliteGradeRepository, SqliteScheduleRepository, SqliteSubjectRepository,
    SqliteSyncRepository, SqliteUserRepository, SubjectRepository, SyncRepository,
    UserRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    AcademicSummaryService, AuthService, DataService, GradeService, ScheduleService,
    SubjectService, SyncReport, SyncService, UserService,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, CommandResult, ErrorResponse, ErrorType};

pub use application::commands;
pub use application::dto;

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{
    DocumentStore, FirebaseAuthClient, FirestoreClient, IdentityProvider, InMemoryDocumentStore,
};
