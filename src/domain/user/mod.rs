pub mod entity;
pub mod invariants;

pub use entity::{NewUser, User, UserChanges};
pub use invariants::{validate_new_user, validate_user};
