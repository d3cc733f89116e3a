pub mod entity;
pub mod invariants;

pub use entity::{Grade, GradeChanges, NewGrade, MAX_SCORE, MIN_SCORE};
pub use invariants::{validate_grade, validate_new_grade};
