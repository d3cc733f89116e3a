// src/integrations/identity/mod.rs

pub mod firebase_auth;
pub mod provider;

pub use firebase_auth::FirebaseAuthClient;
pub use provider::{AuthenticatedIdentity, Credentials, IdentityProvider, MIN_PASSWORD_LEN};

#[cfg(test)]
pub use provider::MockIdentityProvider;
