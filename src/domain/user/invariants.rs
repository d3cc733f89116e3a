use std::sync::OnceLock;

use regex::Regex;

use super::entity::{NewUser, User};
use crate::domain::{DomainError, DomainResult};

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
    })
}

/// Validates all User invariants
pub fn validate_user(user: &User) -> DomainResult<()> {
    validate_email(&user.email)?;
    validate_nombre(&user.nombre)?;
    Ok(())
}

pub fn validate_new_user(user: &NewUser) -> DomainResult<()> {
    validate_email(&user.email)?;
    validate_nombre(&user.nombre)?;
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> DomainResult<()> {
    if !email_pattern().is_match(email.trim()) {
        return Err(DomainError::InvariantViolation(format!(
            "Invalid email address: '{}'",
            email
        )));
    }
    Ok(())
}

fn validate_nombre(nombre: &str) -> DomainResult<()> {
    if nombre.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "User name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user() {
        let user = NewUser::new("estudiante@test.com", "Juan Pérez");
        assert!(validate_new_user(&user).is_ok());
    }

    #[test]
    fn test_malformed_email_fails() {
        for email in ["", "no-at-sign", "a@b", "two@@signs.com", "spa ce@x.com"] {
            let user = NewUser::new(email, "Someone");
            assert!(validate_new_user(&user).is_err(), "accepted '{}'", email);
        }
    }

    #[test]
    fn test_blank_name_fails() {
        let user = NewUser::new("a@b.co", "   ");
        assert!(validate_new_user(&user).is_err());
    }
}
