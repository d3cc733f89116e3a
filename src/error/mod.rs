// src/error/mod.rs
//
// Application-wide error type shared by every layer above the domain.

pub mod types;

pub use types::{AppError, AppResult};
