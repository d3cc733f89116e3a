// src/services/mod.rs
//
// Services Module - Orchestration Layer
//
// Services enforce business rules (ownership, uniqueness, the percentage
// budget), call repositories and emit events after successful writes.

pub mod academic_summary_service;
pub mod auth_service;
pub mod data_service;
pub mod grade_service;
pub mod schedule_service;
pub mod subject_service;
pub mod sync_service;
pub mod user_service;

#[cfg(test)]
mod test_fixtures;

#[cfg(test)]
mod auth_service_tests;
#[cfg(test)]
mod sync_service_tests;

// Re-export all services and their types
pub use academic_summary_service::AcademicSummaryService;

pub use auth_service::{AuthService, RegisterAccountRequest};

pub use data_service::{DataService, ExportData, SeedSummary, DEMO_EMAIL};

pub use grade_service::{GradeService, RecordGradeRequest, UpdateGradeRequest};

pub use schedule_service::{CreateScheduleRequest, ScheduleService, UpdateScheduleRequest};

pub use subject_service::{CreateSubjectRequest, SubjectService, UpdateSubjectRequest};

pub use sync_service::{sync_overview, SyncReport, SyncService, TableSyncReport};

pub use user_service::{RegisterUserRequest, UpdateUserRequest, UserService};
