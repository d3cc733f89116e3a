use crate::domain::{DomainError, DomainResult};

/// Grade weights of one subject must add up to at most this value
pub const MAX_TOTAL_PERCENTAGE: f64 = 100.0;

/// Absorbs binary float noise such as 33.3 + 33.3 + 33.4
const PERCENTAGE_TOLERANCE: f64 = 1e-9;

/// Round half away from zero to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `Σ(score × weight) / Σ(weight)` over `(score, weight)` pairs, unrounded
///
/// Returns `None` when the total weight is zero.
pub fn weighted_mean(items: &[(f64, f64)]) -> Option<f64> {
    let total_weight: f64 = items.iter().map(|(_, weight)| weight).sum();
    if total_weight <= 0.0 {
        return None;
    }
    let weighted: f64 = items.iter().map(|(score, weight)| score * weight).sum();
    Some(weighted / total_weight)
}

/// Subject average as displayed: the weighted mean rounded to two decimals
pub fn weighted_average(items: &[(f64, f64)]) -> Option<f64> {
    weighted_mean(items).map(round2)
}

/// `Σ(average × credits) / Σ(credits)` over `(subject_average, credits)` pairs
///
/// Callers pass only subjects that have an average. Pass unrounded subject
/// means to match the stored-query result exactly.
pub fn credit_weighted_average(items: &[(f64, u8)]) -> Option<f64> {
    let total_credits: f64 = items.iter().map(|(_, credits)| f64::from(*credits)).sum();
    if total_credits <= 0.0 {
        return None;
    }
    let weighted: f64 = items
        .iter()
        .map(|(average, credits)| average * f64::from(*credits))
        .sum();
    Some(round2(weighted / total_credits))
}

/// Reject a weight that would push the subject's running total above 100%
///
/// `existing_total` is the sum of the other grades of the subject (excluding
/// the grade being updated, if any).
pub fn ensure_within_budget(existing_total: f64, new_weight: f64) -> DomainResult<()> {
    let total = existing_total + new_weight;
    if total > MAX_TOTAL_PERCENTAGE + PERCENTAGE_TOLERANCE {
        return Err(DomainError::PercentageBudgetExceeded {
            total: round2(total),
            max: MAX_TOTAL_PERCENTAGE,
        });
    }
    Ok(())
}

/// Weight still unassigned in a subject, never negative
pub fn remaining_percentage(total: f64) -> f64 {
    round2((MAX_TOTAL_PERCENTAGE - total).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_average_uses_relative_weights() {
        // 4.2 @ 30% and 3.8 @ 10% → (126 + 38) / 40 = 4.1
        assert_eq!(weighted_average(&[(4.2, 30.0), (3.8, 10.0)]), Some(4.1));
    }

    #[test]
    fn test_weighted_average_single_item() {
        assert_eq!(weighted_average(&[(3.5, 35.0)]), Some(3.5));
    }

    #[test]
    fn test_weighted_average_empty_is_none() {
        assert_eq!(weighted_average(&[]), None);
    }

    #[test]
    fn test_weighted_mean_keeps_precision() {
        let mean = weighted_mean(&[(4.0, 50.0), (3.0, 25.0)]).unwrap();
        assert!((mean - 11.0 / 3.0).abs() < 1e-12);
        assert_eq!(weighted_average(&[(4.0, 50.0), (3.0, 25.0)]), Some(3.67));
    }

    #[test]
    fn test_credit_weighted_average() {
        // 4.1 × 3 + 3.5 × 4 = 26.3 over 7 credits
        assert_eq!(credit_weighted_average(&[(4.1, 3), (3.5, 4)]), Some(3.76));
        assert_eq!(credit_weighted_average(&[]), None);
    }

    #[test]
    fn test_budget_allows_exactly_one_hundred() {
        assert!(ensure_within_budget(70.0, 30.0).is_ok());
        assert!(ensure_within_budget(33.3 + 33.3, 33.4).is_ok());
    }

    #[test]
    fn test_budget_rejects_overflow_with_total() {
        let err = ensure_within_budget(90.0, 15.0).unwrap_err();
        match err {
            DomainError::PercentageBudgetExceeded { total, max } => {
                assert_eq!(total, 105.0);
                assert_eq!(max, 100.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            ensure_within_budget(90.0, 15.0).unwrap_err().to_string(),
            "Total percentage would be 105%. Maximum allowed: 100%"
        );
    }

    #[test]
    fn test_remaining_percentage_never_negative() {
        assert_eq!(remaining_percentage(40.0), 60.0);
        assert_eq!(remaining_percentage(100.0), 0.0);
        assert_eq!(remaining_percentage(120.0), 0.0);
    }
}
