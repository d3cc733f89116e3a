// src/application/error_handling.rs
//
// Error Handling for Commands
//
// ARCHITECTURE:
// - Maps internal errors → user-friendly responses
// - Provides a consistent error format for the CLI output
// - Never exposes internal implementation details
// - Logs errors for debugging

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::error::AppError;

/// Standard error response printed by the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Resource not found (404)
    NotFound,

    /// Invalid input (400)
    Validation,

    /// Duplicate code, email or schedule slot (409)
    Conflict,

    /// Domain invariant violation, including the 100% weight budget (422)
    DomainError,

    /// Missing or rejected credentials (401)
    Unauthorized,

    /// Missing configuration, e.g. no cloud project (503)
    Configuration,

    /// Database/persistence error (500)
    Database,

    /// Identity provider or document store failure (502)
    ExternalService,

    /// File system error (500)
    FileSystem,

    /// Other/unknown error (500)
    Internal,
}

impl ErrorType {
    /// Process exit code used by the binary
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorType::Validation | ErrorType::DomainError => 2,
            ErrorType::NotFound => 3,
            ErrorType::Conflict => 4,
            ErrorType::Unauthorized => 5,
            ErrorType::Configuration => 6,
            ErrorType::ExternalService => 7,
            ErrorType::Database | ErrorType::FileSystem | ErrorType::Internal => 1,
        }
    }
}

impl ErrorResponse {
    fn new(error_type: ErrorType, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error_type,
            message: message.into(),
            details,
        }
    }

    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::NotFound(what) => Self::new(ErrorType::NotFound, format!("{} not found", what), None),

            AppError::Domain(DomainError::PercentageBudgetExceeded { total, max }) => Self::new(
                ErrorType::DomainError,
                "Grade weights would exceed the subject budget",
                Some(DomainError::PercentageBudgetExceeded { total, max }.to_string()),
            ),

            AppError::Domain(DomainError::InvalidValue(message)) => {
                Self::new(ErrorType::Validation, message, None)
            }

            AppError::Domain(domain_error) => Self::new(
                ErrorType::DomainError,
                "Domain validation failed",
                Some(domain_error.to_string()),
            ),

            AppError::Conflict(message) => Self::new(ErrorType::Conflict, message, None),

            AppError::Auth(message) => Self::new(ErrorType::Unauthorized, message, None),

            AppError::Config(message) => Self::new(ErrorType::Configuration, message, None),

            AppError::External(message) => {
                log::warn!("External service error: {}", message);
                Self::new(ErrorType::ExternalService, "External service error", Some(message))
            }

            AppError::Database(db_error) => {
                // Log full error for debugging
                log::error!("Database error: {:?}", db_error);
                Self::new(
                    ErrorType::Database,
                    "Database operation failed",
                    Some("Check logs for details".to_string()),
                )
            }

            AppError::Pool(pool_error) => {
                log::error!("Connection pool error: {}", pool_error);
                Self::new(ErrorType::Database, "Database connection failed", None)
            }

            AppError::Serialization(serde_error) => {
                log::error!("Serialization error: {:?}", serde_error);
                Self::new(ErrorType::Internal, "Data serialization failed", None)
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {:?}", io_error);
                Self::new(
                    ErrorType::FileSystem,
                    "File system operation failed",
                    Some(io_error.to_string()),
                )
            }

            AppError::Other(message) => {
                log::error!("Other error: {}", message);
                Self::new(ErrorType::Internal, message, None)
            }
        }
    }

    /// Create validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Validation, message, None)
    }

    /// Create not found error
    pub fn not_found(resource: &str) -> Self {
        Self::new(ErrorType::NotFound, format!("{} not found", resource), None)
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self::from_app_error(error)
    }
}

impl From<DomainError> for ErrorResponse {
    fn from(error: DomainError) -> Self {
        Self::from_app_error(AppError::Domain(error))
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.message, details),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ErrorResponse {}

/// Result type of every command handler
pub type CommandResult<T> = Result<T, ErrorResponse>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = ErrorResponse::from_app_error(AppError::not_found("Subject", 4));
        assert_eq!(error.error_type, ErrorType::NotFound);
        assert_eq!(error.message, "Subject 4 not found");
    }

    #[test]
    fn test_budget_error_keeps_message() {
        let error = ErrorResponse::from(AppError::Domain(DomainError::PercentageBudgetExceeded {
            total: 105.0,
            max: 100.0,
        }));
        assert_eq!(error.error_type, ErrorType::DomainError);
        assert_eq!(
            error.details.as_deref(),
            Some("Total percentage would be 105%. Maximum allowed: 100%")
        );
    }

    #[test]
    fn test_conflict_and_auth_errors() {
        let conflict = ErrorResponse::from(AppError::Conflict(
            "A subject with code MAT201 already exists".to_string(),
        ));
        assert_eq!(conflict.error_type, ErrorType::Conflict);
        assert_eq!(conflict.message, "A subject with code MAT201 already exists");

        let auth = ErrorResponse::from(AppError::Auth("Incorrect password".to_string()));
        assert_eq!(auth.error_type, ErrorType::Unauthorized);
        assert_eq!(auth.error_type.exit_code(), 5);
    }

    #[test]
    fn test_invalid_value_is_validation() {
        let error = ErrorResponse::from(DomainError::InvalidValue("Unknown day of week: 'x'".into()));
        assert_eq!(error.error_type, ErrorType::Validation);
    }

    #[test]
    fn test_serialization() {
        let error = ErrorResponse::not_found("Subject");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("not_found"));
        assert!(json.contains("Subject not found"));
        assert!(json.contains("\"success\":false"));
    }
}
