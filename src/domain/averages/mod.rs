//! Averages are derived data:
//!
//! 1. They are ALWAYS computed from grades, never stored
//! 2. A subject with no weight recorded has no average (not zero)
//! 3. The overall average only counts subjects with at least one grade
//! 4. Grade weights of a subject never add up to more than 100

pub mod calculations;
pub mod entity;

pub use calculations::{
    credit_weighted_average, ensure_within_budget, remaining_percentage, round2,
    weighted_average, weighted_mean, MAX_TOTAL_PERCENTAGE,
};
pub use entity::{AcademicSummary, SubjectPendingWeight, SubjectWithAverage};
