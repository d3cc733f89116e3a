// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO event emission
// - Explicit, parameterized SQL only

mod row_mapping;

pub mod averages_repository;
pub mod grade_repository;
pub mod schedule_repository;
pub mod subject_repository;
pub mod sync_repository;
pub mod user_repository;

#[cfg(test)]
mod repository_tests;

pub use averages_repository::{AveragesRepository, SqliteAveragesRepository};
pub use grade_repository::{GradeRepository, SqliteGradeRepository};
pub use schedule_repository::{ScheduleRepository, SqliteScheduleRepository};
pub use subject_repository::{SqliteSubjectRepository, SubjectRepository};
pub use sync_repository::{SqliteSyncRepository, SyncRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};
