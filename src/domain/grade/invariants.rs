use super::entity::{Grade, NewGrade, MAX_SCORE, MIN_SCORE};
use crate::domain::{DomainError, DomainResult, MAX_TOTAL_PERCENTAGE};

/// Validates the invariants a single grade can check on its own.
/// The per-subject percentage budget needs the sibling grades and lives in
/// `averages::ensure_within_budget`.
pub fn validate_grade(grade: &Grade) -> DomainResult<()> {
    validate_fields(&grade.tipo_evaluacion, grade.nota, grade.porcentaje)
}

pub fn validate_new_grade(grade: &NewGrade) -> DomainResult<()> {
    validate_fields(&grade.tipo_evaluacion, grade.nota, grade.porcentaje)
}

fn validate_fields(tipo_evaluacion: &str, nota: f64, porcentaje: f64) -> DomainResult<()> {
    if tipo_evaluacion.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Evaluation type cannot be empty".to_string(),
        ));
    }
    if !nota.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&nota) {
        return Err(DomainError::InvariantViolation(format!(
            "Score must be between {} and {}, got {}",
            MIN_SCORE, MAX_SCORE, nota
        )));
    }
    if !porcentaje.is_finite() || porcentaje <= 0.0 || porcentaje > MAX_TOTAL_PERCENTAGE {
        return Err(DomainError::InvariantViolation(format!(
            "Percentage must be greater than 0 and at most {}, got {}",
            MAX_TOTAL_PERCENTAGE, porcentaje
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_grade() {
        let grade = NewGrade::new(1, "Parcial 1", 4.2, 30.0);
        assert!(validate_new_grade(&grade).is_ok());
    }

    #[test]
    fn test_score_bounds_are_inclusive() {
        assert!(validate_new_grade(&NewGrade::new(1, "Quiz", 0.0, 10.0)).is_ok());
        assert!(validate_new_grade(&NewGrade::new(1, "Quiz", 5.0, 10.0)).is_ok());
        assert!(validate_new_grade(&NewGrade::new(1, "Quiz", 5.01, 10.0)).is_err());
        assert!(validate_new_grade(&NewGrade::new(1, "Quiz", -0.1, 10.0)).is_err());
    }

    #[test]
    fn test_zero_or_excessive_percentage_fails() {
        assert!(validate_new_grade(&NewGrade::new(1, "Final", 3.0, 0.0)).is_err());
        assert!(validate_new_grade(&NewGrade::new(1, "Final", 3.0, 100.5)).is_err());
        assert!(validate_new_grade(&NewGrade::new(1, "Final", 3.0, 100.0)).is_ok());
    }

    #[test]
    fn test_nan_is_rejected() {
        assert!(validate_new_grade(&NewGrade::new(1, "Final", f64::NAN, 10.0)).is_err());
        assert!(validate_new_grade(&NewGrade::new(1, "Final", 3.0, f64::NAN)).is_err());
    }
}
