// src/integrations/mod.rs
//
// External Integrations Module
//
// - document_store: schemaless cloud storage abstraction + in-memory store
// - firestore: Firestore REST implementation of the document store
// - cloud: typed per-collection CRUD and cloud document shapes
// - identity: identity provider abstraction + Firebase Auth client

pub mod cloud;
pub mod document_store;
pub mod firestore;
pub mod identity;

pub use document_store::{to_fields, Document, DocumentStore, InMemoryDocumentStore};
pub use firestore::FirestoreClient;
pub use identity::{
    AuthenticatedIdentity, Credentials, FirebaseAuthClient, IdentityProvider, MIN_PASSWORD_LEN,
};
