pub mod entity;
pub mod invariants;

pub use entity::{
    NewSubject, Subject, SubjectChanges, DEFAULT_COLOR, DEFAULT_CREDITS, MAX_CREDITS, MIN_CREDITS,
};
pub use invariants::{validate_new_subject, validate_subject};
