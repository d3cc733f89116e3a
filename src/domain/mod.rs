// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file declares all domain modules and re-exports their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod averages;
pub mod grade;
pub mod schedule;
pub mod subject;
pub mod sync_status;
pub mod user;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// User Domain
pub use user::{validate_new_user, validate_user, NewUser, User, UserChanges};

// Subject Domain
pub use subject::{
    validate_new_subject, validate_subject, NewSubject, Subject, SubjectChanges, DEFAULT_COLOR,
    DEFAULT_CREDITS,
};

// Grade Domain
pub use grade::{validate_grade, validate_new_grade, Grade, GradeChanges, NewGrade};

// Schedule Domain
pub use schedule::{
    format_clock, parse_clock, validate_new_schedule, validate_schedule, DayOfWeek, NewSchedule,
    Schedule, ScheduleChanges, ScheduleDetail,
};

// Averages (Derived Data)
pub use averages::{
    credit_weighted_average, ensure_within_budget, remaining_percentage, round2,
    weighted_average, weighted_mean, AcademicSummary, SubjectPendingWeight, SubjectWithAverage,
    MAX_TOTAL_PERCENTAGE,
};

// Sync tracking
pub use sync_status::{SyncRecord, SyncStatus, SyncTable};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Total percentage would be {total}%. Maximum allowed: {max}%")]
    PercentageBudgetExceeded { total: f64, max: f64 },

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
