// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between the CLI and Services
// - Commands accept DTOs, return DTOs
// - Commands convert AppError into ErrorResponse
// - Commands NEVER contain business logic

pub mod auth_commands;
pub mod average_commands;
pub mod db_commands;
pub mod grade_commands;
pub mod schedule_commands;
pub mod subject_commands;
pub mod sync_commands;
pub mod user_commands;

pub use auth_commands::*;
pub use average_commands::*;
pub use db_commands::*;
pub use grade_commands::*;
pub use schedule_commands::*;
pub use subject_commands::*;
pub use sync_commands::*;
pub use user_commands::*;

use chrono::NaiveDate;

use crate::application::error_handling::ErrorResponse;

/// `YYYY-MM-DD`
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, ErrorResponse> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ErrorResponse::validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

/// Patch semantics for nullable text: absent keeps, blank clears
pub(crate) fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| {
        let v = v.trim().to_string();
        if v.is_empty() {
            None
        } else {
            Some(v)
        }
    })
}
