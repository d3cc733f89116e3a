// src/integrations/cloud/mod.rs
//
// Typed access to the cloud collections (usuarios, materias, notas,
// horarios) on top of any DocumentStore.

pub mod collection;
pub mod models;

pub use collection::{CloudCollection, CloudDoc, CREATED_AT_FIELD};
pub use models::{
    CloudDay, CloudGrade, CloudSchedule, CloudSubject, CloudUserProfile, GradeKind,
    GRADES_COLLECTION, SCHEDULES_COLLECTION, SUBJECTS_COLLECTION, USERS_COLLECTION,
};

use std::sync::Arc;

use crate::integrations::document_store::DocumentStore;

pub fn users(store: Arc<dyn DocumentStore>) -> CloudCollection<CloudUserProfile> {
    CloudCollection::new(store, USERS_COLLECTION)
}

pub fn subjects(store: Arc<dyn DocumentStore>) -> CloudCollection<CloudSubject> {
    CloudCollection::new(store, SUBJECTS_COLLECTION)
}

pub fn grades(store: Arc<dyn DocumentStore>) -> CloudCollection<CloudGrade> {
    CloudCollection::new(store, GRADES_COLLECTION)
}

pub fn schedules(store: Arc<dyn DocumentStore>) -> CloudCollection<CloudSchedule> {
    CloudCollection::new(store, SCHEDULES_COLLECTION)
}
