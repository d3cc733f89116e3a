// src/integrations/firestore/mod.rs

pub mod client;
pub mod value;

pub use client::FirestoreClient;
