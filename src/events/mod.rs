// src/events/mod.rs
//
// Internal Event System - Public API
//
// CRITICAL: EventHandler is INTERNAL and must NOT be exported

pub mod bus;
pub mod types;

pub use types::DomainEvent;

pub use types::{
    // Data management
    DataCleared,
    DemoDataSeeded,
    // Grades
    GradeDeleted,
    GradeRecorded,
    GradeUpdated,
    // Schedules
    ScheduleCreated,
    ScheduleDeleted,
    ScheduleUpdated,
    // Subjects
    SubjectAverageChanged,
    SubjectCreated,
    SubjectDeleted,
    SubjectUpdated,
    SyncCompleted,
    // Users and sessions
    UserDeleted,
    UserLoggedIn,
    UserLoggedOut,
    UserRegistered,
    UserUpdated,
};

pub use bus::{EventBus, EventLogEntry};
