// src/services/sync_service.rs
//
// Pushes local rows that are not yet reconciled to the cloud document store.
//
// RULES:
// - Rows in `pending` or `error` are pushed; `error` rows are retried
// - Each document is written under the local row id (idempotent `set`)
// - A row that fails is marked `error` and does not stop the run
// - Tables are pushed parents first: usuarios, materias, notas, horarios

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{SyncRecord, SyncStatus, SyncTable};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, SyncCompleted};
use crate::integrations::cloud::{CloudGrade, CloudSchedule, CloudSubject, CloudUserProfile};
use crate::integrations::{to_fields, DocumentStore};
use crate::repositories::{SubjectRepository, SyncRepository, UserRepository};

/// Outcome of one table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableSyncReport {
    pub synced: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub tables: BTreeMap<String, TableSyncReport>,
    pub errors: Vec<String>,
}

impl SyncReport {
    pub fn synced(&self) -> usize {
        self.tables.values().map(|t| t.synced).sum()
    }

    pub fn failed(&self) -> usize {
        self.tables.values().map(|t| t.failed).sum()
    }
}

pub struct SyncService {
    sync_repo: Arc<dyn SyncRepository>,
    user_repo: Arc<dyn UserRepository>,
    subject_repo: Arc<dyn SubjectRepository>,
    store: Arc<dyn DocumentStore>,
    collection_prefix: String,
    event_bus: Arc<EventBus>,
}

impl SyncService {
    pub fn new(
        sync_repo: Arc<dyn SyncRepository>,
        user_repo: Arc<dyn UserRepository>,
        subject_repo: Arc<dyn SubjectRepository>,
        store: Arc<dyn DocumentStore>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            sync_repo,
            user_repo,
            subject_repo,
            store,
            collection_prefix: String::new(),
            event_bus,
        }
    }

    pub fn with_collection_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.collection_prefix = prefix.into();
        self
    }

    /// Row counts per table and sync status
    pub fn status(&self) -> AppResult<BTreeMap<String, BTreeMap<SyncStatus, i64>>> {
        sync_overview(self.sync_repo.as_ref())
    }

    pub async fn sync_pending(&self) -> AppResult<SyncReport> {
        let mut report = SyncReport::default();
        let mut owners = OwnerCache::default();

        for table in SyncTable::ALL {
            let mut records = self.sync_repo.list_by_status(table, SyncStatus::Pending)?;
            records.extend(self.sync_repo.list_by_status(table, SyncStatus::Error)?);

            let collection = format!("{}{}", self.collection_prefix, table.table_name());
            let entry = report.tables.entry(table.to_string()).or_default();

            for record in records {
                let id = record.id();
                let outcome = match self.to_document(&record, &mut owners) {
                    Ok(fields) => self.store.set(&collection, &id.to_string(), fields).await,
                    Err(e) => Err(e),
                };

                match outcome {
                    Ok(()) => {
                        self.sync_repo.update_status(table, id, SyncStatus::Synced)?;
                        entry.synced += 1;
                    }
                    Err(e) => {
                        log::warn!("Failed to sync {} {}: {}", table, id, e);
                        self.sync_repo.update_status(table, id, SyncStatus::Error)?;
                        entry.failed += 1;
                        report.errors.push(format!("{} {}: {}", table, id, e));
                    }
                }
            }
        }

        log::info!(
            "Sync finished: {} synced, {} failed",
            report.synced(),
            report.failed()
        );
        self.event_bus
            .emit(SyncCompleted::new(report.synced(), report.failed()));

        Ok(report)
    }

    fn to_document(
        &self,
        record: &SyncRecord,
        owners: &mut OwnerCache,
    ) -> AppResult<Map<String, Value>> {
        match record {
            SyncRecord::Usuario(user) => {
                let uid = user
                    .firebase_uid
                    .clone()
                    .unwrap_or_else(|| local_owner(user.id));
                to_fields(&CloudUserProfile::from_local(user, &uid))
            }
            SyncRecord::Materia(subject) => {
                let owner = owners.user(self, subject.usuario_id)?;
                to_fields(&CloudSubject::from_local(subject, &owner))
            }
            SyncRecord::Nota(grade) => {
                let owner = owners.subject_owner(self, grade.materia_id)?;
                to_fields(&CloudGrade::from_local(grade, &owner))
            }
            SyncRecord::Horario(schedule) => {
                let owner = owners.subject_owner(self, schedule.materia_id)?;
                to_fields(&CloudSchedule::from_local(schedule, &owner))
            }
        }
    }
}

/// Row counts per table and sync status, without touching the cloud
pub fn sync_overview(
    sync_repo: &dyn SyncRepository,
) -> AppResult<BTreeMap<String, BTreeMap<SyncStatus, i64>>> {
    SyncTable::ALL
        .iter()
        .map(|table| Ok((table.to_string(), sync_repo.count_by_status(*table)?)))
        .collect()
}

/// Owner id written for users without a linked identity
fn local_owner(usuario_id: i64) -> String {
    format!("local-{}", usuario_id)
}

/// Memoizes owner lookups for the duration of one run
#[derive(Default)]
struct OwnerCache {
    users: HashMap<i64, String>,
    subjects: HashMap<i64, String>,
}

impl OwnerCache {
    fn user(&mut self, service: &SyncService, usuario_id: i64) -> AppResult<String> {
        if let Some(owner) = self.users.get(&usuario_id) {
            return Ok(owner.clone());
        }
        let user = service
            .user_repo
            .get_by_id(usuario_id)?
            .ok_or_else(|| AppError::not_found("User", usuario_id))?;
        let owner = user.firebase_uid.unwrap_or_else(|| local_owner(usuario_id));
        self.users.insert(usuario_id, owner.clone());
        Ok(owner)
    }

    fn subject_owner(&mut self, service: &SyncService, materia_id: i64) -> AppResult<String> {
        if let Some(owner) = self.subjects.get(&materia_id) {
            return Ok(owner.clone());
        }
        let subject = service
            .subject_repo
            .get_by_id(materia_id)?
            .ok_or_else(|| AppError::not_found("Subject", materia_id))?;
        let owner = self.user(service, subject.usuario_id)?;
        self.subjects.insert(materia_id, owner.clone());
        Ok(owner)
    }
}
