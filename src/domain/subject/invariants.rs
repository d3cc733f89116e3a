use std::sync::OnceLock;

use regex::Regex;

use super::entity::{NewSubject, Subject, MAX_CREDITS, MIN_CREDITS};
use crate::domain::{DomainError, DomainResult};

fn color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("color pattern is a valid regex"))
}

/// Validates all Subject invariants
pub fn validate_subject(subject: &Subject) -> DomainResult<()> {
    validate_fields(&subject.codigo, &subject.nombre, subject.creditos, &subject.color)
}

pub fn validate_new_subject(subject: &NewSubject) -> DomainResult<()> {
    validate_fields(&subject.codigo, &subject.nombre, subject.creditos, &subject.color)
}

fn validate_fields(codigo: &str, nombre: &str, creditos: u8, color: &str) -> DomainResult<()> {
    if codigo.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Subject code cannot be empty".to_string(),
        ));
    }
    if nombre.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Subject name cannot be empty".to_string(),
        ));
    }
    if !(MIN_CREDITS..=MAX_CREDITS).contains(&creditos) {
        return Err(DomainError::InvariantViolation(format!(
            "Credits must be between {} and {}, got {}",
            MIN_CREDITS, MAX_CREDITS, creditos
        )));
    }
    if !color_pattern().is_match(color) {
        return Err(DomainError::InvariantViolation(format!(
            "Color must look like #RRGGBB, got '{}'",
            color
        )));
    }
    Ok(())
}

/// Subject invariants:
///
/// 1. Code and name are never blank
/// 2. Credits stay within 1..=6
/// 3. Code is unique per user (enforced by the service and a UNIQUE index)
/// 4. Deleting a subject deletes its grades and schedules
