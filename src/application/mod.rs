// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Sits between the CLI and the services
// - Translates between DTOs and domain entities
// - Converts AppError into ErrorResponse for output

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod state;

pub use error_handling::{CommandResult, ErrorResponse, ErrorType};
pub use state::AppState;
