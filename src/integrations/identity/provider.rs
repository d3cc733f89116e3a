// src/integrations/identity/provider.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::invariants::validate_email;
use crate::error::{AppError, AppResult};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    /// Local checks run before contacting the provider
    pub fn validate(&self) -> AppResult<()> {
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Auth(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

// Never print the password
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// An identity confirmed by the provider, with its bearer tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthenticatedIdentity {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// External identity/token provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and sign it in
    async fn sign_up(
        &self,
        credentials: Credentials,
        display_name: Option<String>,
    ) -> AppResult<AuthenticatedIdentity>;

    async fn sign_in(&self, credentials: Credentials) -> AppResult<AuthenticatedIdentity>;

    /// Ask the provider to email a password reset link
    async fn send_password_reset(&self, email: String) -> AppResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_credentials_validation() {
        assert!(Credentials::new("ana@uni.edu", "secret1").validate().is_ok());
        assert!(Credentials::new("not-an-email", "secret1").validate().is_err());

        let err = Credentials::new("ana@uni.edu", "12345").validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Authentication error: Password must be at least 6 characters"
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let debug = format!("{:?}", Credentials::new("ana@uni.edu", "hunter22"));
        assert!(!debug.contains("hunter22"));
    }

    #[test]
    fn test_expiry() {
        let mut identity = AuthenticatedIdentity {
            uid: "u".to_string(),
            email: "ana@uni.edu".to_string(),
            display_name: None,
            id_token: "t".to_string(),
            refresh_token: "r".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        };
        assert!(!identity.is_expired());
        identity.expires_at = Utc::now() - Duration::seconds(1);
        assert!(identity.is_expired());
    }
}
