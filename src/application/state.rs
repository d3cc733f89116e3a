// src/application/state.rs
//
// Wiring of the whole application: pool, repositories, services, event bus.
//
// Services that need the network (auth, sync) are built on demand because
// they depend on cloud settings that may be absent.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{
    create_connection_pool, create_memory_pool, default_database_path, get_connection,
    initialize_database, ConnectionPool,
};
use crate::error::{AppError, AppResult};
use crate::domain::SyncStatus;
use crate::events::EventBus;
use crate::infrastructure::SessionStore;
use crate::integrations::cloud::{CloudCollection, USERS_COLLECTION};
use crate::integrations::{DocumentStore, FirebaseAuthClient, FirestoreClient};
use crate::repositories::{
    AveragesRepository, GradeRepository, ScheduleRepository, SqliteAveragesRepository,
    SqliteGradeRepository, SqliteScheduleRepository, SqliteSubjectRepository,
    SqliteSyncRepository, SqliteUserRepository, SubjectRepository, SyncRepository,
    UserRepository,
};
use crate::services::{
    sync_overview, AcademicSummaryService, AuthService, DataService, GradeService,
    ScheduleService, SubjectService, SyncService, UserService,
};

/// Application state shared by every command.
/// All fields are Arc-wrapped so commands can hand services around freely.
pub struct AppState {
    pub config: AppConfig,
    pub pool: Arc<ConnectionPool>,
    pub event_bus: Arc<EventBus>,
    pub user_service: Arc<UserService>,
    pub subject_service: Arc<SubjectService>,
    pub grade_service: Arc<GradeService>,
    pub schedule_service: Arc<ScheduleService>,
    pub summary_service: Arc<AcademicSummaryService>,
    pub data_service: Arc<DataService>,
    session_path: PathBuf,
    user_repo: Arc<dyn UserRepository>,
    subject_repo: Arc<dyn SubjectRepository>,
    sync_repo: Arc<dyn SyncRepository>,
}

impl AppState {
    /// Open (and migrate) the configured database file
    pub fn initialize(config: AppConfig) -> AppResult<Self> {
        let db_path = match &config.database.path {
            Some(path) => path.clone(),
            None => default_database_path()?,
        };
        let pool = create_connection_pool(&db_path, config.database.pool_size)?;
        log::info!("Using database {}", db_path.display());

        Self::with_pool(config, Arc::new(pool), SessionStore::default_path()?)
    }

    /// Private in-memory database; nothing survives the process
    pub fn in_memory(config: AppConfig, session_path: PathBuf) -> AppResult<Self> {
        Self::with_pool(config, Arc::new(create_memory_pool()?), session_path)
    }

    pub fn with_pool(
        config: AppConfig,
        pool: Arc<ConnectionPool>,
        session_path: PathBuf,
    ) -> AppResult<Self> {
        // Initialize schema (idempotent)
        {
            let conn = get_connection(&pool)?;
            initialize_database(&conn)?;
        }

        // 1. INFRASTRUCTURE
        let event_bus = Arc::new(EventBus::new());

        // 2. REPOSITORIES
        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(pool.clone()));
        let subject_repo: Arc<dyn SubjectRepository> =
            Arc::new(SqliteSubjectRepository::new(pool.clone()));
        let grade_repo: Arc<dyn GradeRepository> = Arc::new(SqliteGradeRepository::new(pool.clone()));
        let schedule_repo: Arc<dyn ScheduleRepository> =
            Arc::new(SqliteScheduleRepository::new(pool.clone()));
        let averages_repo: Arc<dyn AveragesRepository> =
            Arc::new(SqliteAveragesRepository::new(pool.clone()));
        let sync_repo: Arc<dyn SyncRepository> = Arc::new(SqliteSyncRepository::new(pool.clone()));

        // 3. SERVICES
        let user_service = Arc::new(UserService::new(user_repo.clone(), event_bus.clone()));
        let subject_service = Arc::new(SubjectService::new(
            subject_repo.clone(),
            user_repo.clone(),
            averages_repo.clone(),
            event_bus.clone(),
        ));
        let grade_service = Arc::new(GradeService::new(
            grade_repo.clone(),
            subject_repo.clone(),
            event_bus.clone(),
        ));
        let schedule_service = Arc::new(ScheduleService::new(
            schedule_repo.clone(),
            subject_repo.clone(),
            event_bus.clone(),
        ));
        let summary_service = Arc::new(AcademicSummaryService::new(
            averages_repo,
            grade_repo.clone(),
            user_repo.clone(),
            event_bus.clone(),
        ));
        let data_service = Arc::new(DataService::new(
            pool.clone(),
            user_repo.clone(),
            subject_repo.clone(),
            grade_repo,
            schedule_repo,
            user_service.clone(),
            subject_service.clone(),
            grade_service.clone(),
            schedule_service.clone(),
            event_bus.clone(),
        ));

        // 4. EVENT HANDLERS
        summary_service.register_event_handlers();

        Ok(Self {
            config,
            pool,
            event_bus,
            user_service,
            subject_service,
            grade_service,
            schedule_service,
            summary_service,
            data_service,
            session_path,
            user_repo,
            subject_repo,
            sync_repo,
        })
    }

    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(self.session_path.clone())
    }

    /// The explicit user when given, otherwise the signed-in one
    pub fn resolve_user(&self, explicit: Option<i64>) -> AppResult<i64> {
        if let Some(id) = explicit {
            return Ok(id);
        }
        self.session_store()
            .load()?
            .map(|session| session.usuario_id)
            .ok_or_else(|| {
                AppError::Auth("Not signed in. Run `auth login` first or pass --user".to_string())
            })
    }

    /// Auth service backed by Firebase Authentication
    pub fn auth_service(&self) -> AppResult<AuthService> {
        let api_key = self
            .config
            .cloud
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::Config("Authentication is not configured (cloud.api_key)".to_string()))?;

        let provider = Arc::new(FirebaseAuthClient::new(api_key)?);
        let service = AuthService::new(
            provider,
            self.user_service.clone(),
            self.session_store(),
            self.event_bus.clone(),
        );

        if !self.config.cloud.is_configured() {
            return Ok(service);
        }
        let store = self.document_store()?;
        let profiles = CloudCollection::new(store, self.config.cloud.collection(USERS_COLLECTION));
        Ok(service.with_profiles(profiles))
    }

    /// Row counts per table and sync status; needs no cloud settings
    pub fn sync_status(&self) -> AppResult<BTreeMap<String, BTreeMap<SyncStatus, i64>>> {
        sync_overview(self.sync_repo.as_ref())
    }

    /// Sync service pushing to the configured Firestore project
    pub fn sync_service(&self) -> AppResult<SyncService> {
        let store = self.document_store()?;
        Ok(self
            .sync_service_with(store)
            .with_collection_prefix(self.config.cloud.collection_prefix.clone()))
    }

    /// Sync service over an arbitrary document store
    pub fn sync_service_with(&self, store: Arc<dyn DocumentStore>) -> SyncService {
        SyncService::new(
            self.sync_repo.clone(),
            self.user_repo.clone(),
            self.subject_repo.clone(),
            store,
            self.event_bus.clone(),
        )
    }

    fn document_store(&self) -> AppResult<Arc<dyn DocumentStore>> {
        let project_id = self
            .config
            .cloud
            .project_id
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::Config("Cloud sync is not configured".to_string()))?;

        let mut client = FirestoreClient::new(project_id)?;
        if let Some(api_key) = self.config.cloud.api_key.as_deref() {
            client = client.with_api_key(api_key);
        }

        // Requests carry the signed-in user's token when there is one
        if let Some(session) = self.session_store().load()? {
            if session.identity.is_expired() {
                log::warn!("Stored session token has expired; sign in again if the cloud rejects requests");
            } else {
                client = client.with_id_token(session.identity.id_token);
            }
        }

        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn state(dir: &TempDir) -> AppState {
        AppState::in_memory(AppConfig::default(), dir.path().join("session.json")).unwrap()
    }

    #[test]
    fn test_resolve_user_prefers_explicit_id() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);

        assert_eq!(state.resolve_user(Some(7)).unwrap(), 7);
        assert!(matches!(state.resolve_user(None), Err(AppError::Auth(_))));
    }

    #[test]
    fn test_cloud_services_require_configuration() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);

        assert!(matches!(
            state.sync_service(),
            Err(AppError::Config(msg)) if msg == "Cloud sync is not configured"
        ));
        assert!(matches!(state.auth_service(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_average_handlers_are_registered() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);

        assert_eq!(
            state
                .event_bus
                .subscriber_count::<crate::events::GradeRecorded>(),
            1
        );
    }
}
