// src/services/sync_service_tests.rs
//
// Pushing local rows to a document store and tracking their sync status.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::{Map, Value};

    use crate::domain::SyncStatus;
    use crate::error::{AppError, AppResult};
    use crate::events::SyncCompleted;
    use crate::integrations::{Document, DocumentStore, InMemoryDocumentStore};
    use crate::services::test_fixtures::Fixture;
    use crate::services::SyncService;

    /// Delegates to an in-memory store but refuses writes to one collection
    struct FlakyStore {
        inner: InMemoryDocumentStore,
        broken: String,
    }

    #[async_trait]
    impl DocumentStore for FlakyStore {
        async fn list(&self, collection: &str) -> AppResult<Vec<Document>> {
            self.inner.list(collection).await
        }

        async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
            self.inner.get(collection, id).await
        }

        async fn add(&self, collection: &str, data: Map<String, Value>) -> AppResult<String> {
            self.inner.add(collection, data).await
        }

        async fn set(&self, collection: &str, id: &str, data: Map<String, Value>) -> AppResult<()> {
            if collection == self.broken {
                return Err(AppError::External("503 Service Unavailable".to_string()));
            }
            self.inner.set(collection, id, data).await
        }

        async fn update(&self, collection: &str, id: &str, data: Map<String, Value>) -> AppResult<()> {
            self.inner.update(collection, id, data).await
        }

        async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
            self.inner.delete(collection, id).await
        }
    }

    fn sync_service(fx: &Fixture, store: Arc<dyn DocumentStore>) -> SyncService {
        SyncService::new(
            fx.sync_repo.clone(),
            fx.user_repo.clone(),
            fx.subject_repo.clone(),
            store,
            fx.bus.clone(),
        )
    }

    #[tokio::test]
    async fn test_sync_pushes_every_pending_row() {
        let fx = Fixture::new();
        fx.data.seed_demo_data().unwrap();
        let store = Arc::new(InMemoryDocumentStore::new());
        let sync = sync_service(&fx, store.clone());

        let report = sync.sync_pending().await.unwrap();

        assert_eq!(report.synced(), 8);
        assert_eq!(report.failed(), 0);
        assert_eq!(report.tables["notas"].synced, 3);
        assert_eq!(store.count("usuarios").await, 1);
        assert_eq!(store.count("materias").await, 2);
        assert_eq!(store.count("notas").await, 3);
        assert_eq!(store.count("horarios").await, 2);

        for counts in sync.status().unwrap().values() {
            assert_eq!(counts.get(&SyncStatus::Pending).copied().unwrap_or(0), 0);
            assert!(counts.get(&SyncStatus::Synced).copied().unwrap_or(0) > 0);
        }

        // Nothing left for a second run
        assert_eq!(sync.sync_pending().await.unwrap().synced(), 0);
    }

    #[tokio::test]
    async fn test_documents_carry_owner_and_local_ids() {
        let fx = Fixture::new();
        let seeded = fx.data.seed_demo_data().unwrap();
        let store = Arc::new(InMemoryDocumentStore::new());

        sync_service(&fx, store.clone()).sync_pending().await.unwrap();

        let notas = store.list("notas").await.unwrap();
        assert!(notas
            .iter()
            .all(|doc| doc.field("usuarioId") == Some(&Value::from("test_firebase_uid_123"))));

        let materias = fx.subjects.list_subjects(seeded.usuario_id).unwrap();
        let calculo = materias.iter().find(|m| m.codigo == "MAT201").unwrap();
        let doc = store
            .get("materias", &calculo.id.to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.field("nombre"), Some(&Value::from("Cálculo II")));
        assert_eq!(doc.field("creditos"), Some(&Value::from(4)));

        let horarios = store.list("horarios").await.unwrap();
        let dias: Vec<&Value> = horarios.iter().filter_map(|d| d.field("diaSemana")).collect();
        assert!(dias.contains(&&Value::from("lunes")));
        assert!(dias.contains(&&Value::from("martes")));
    }

    #[tokio::test]
    async fn test_unlinked_user_gets_local_owner_id() {
        let fx = Fixture::new();
        let ana = fx.user("ana@uni.edu");
        fx.subject(ana, "MAT201", 4);
        let store = Arc::new(InMemoryDocumentStore::new());

        sync_service(&fx, store.clone()).sync_pending().await.unwrap();

        let owner = Value::from(format!("local-{}", ana));
        let materias = store.list("materias").await.unwrap();
        assert_eq!(materias[0].field("usuarioId"), Some(&owner));
        let profile = store.get("usuarios", &ana.to_string()).await.unwrap().unwrap();
        assert_eq!(profile.field("uid"), Some(&owner));
    }

    #[tokio::test]
    async fn test_failed_rows_are_marked_and_retried() {
        let fx = Fixture::new();
        fx.data.seed_demo_data().unwrap();

        let flaky = Arc::new(FlakyStore {
            inner: InMemoryDocumentStore::new(),
            broken: "notas".to_string(),
        });
        let report = sync_service(&fx, flaky).sync_pending().await.unwrap();

        assert_eq!(report.failed(), 3);
        assert_eq!(report.synced(), 5);
        assert_eq!(report.errors.len(), 3);
        assert!(report.errors[0].starts_with("notas "));

        let status = sync_service(&fx, Arc::new(InMemoryDocumentStore::new()))
            .status()
            .unwrap();
        assert_eq!(status["notas"].get(&SyncStatus::Error), Some(&3));

        // A healthy store picks the errored rows up again
        let healthy = Arc::new(InMemoryDocumentStore::new());
        let retry = sync_service(&fx, healthy.clone()).sync_pending().await.unwrap();
        assert_eq!(retry.synced(), 3);
        assert_eq!(retry.tables["notas"].synced, 3);
        assert_eq!(healthy.count("notas").await, 3);
    }

    #[tokio::test]
    async fn test_local_edit_after_sync_is_pushed_again() {
        let fx = Fixture::new();
        let ana = fx.user("ana@uni.edu");
        let calculo = fx.subject(ana, "MAT201", 4);
        let store = Arc::new(InMemoryDocumentStore::new());
        let sync = sync_service(&fx, store.clone());
        sync.sync_pending().await.unwrap();

        fx.grades
            .record_grade(Fixture::grade_request(calculo, 4.5, 20.0))
            .unwrap();

        let report = sync.sync_pending().await.unwrap();
        assert_eq!(report.synced(), 1);
        assert_eq!(report.tables["notas"].synced, 1);
        assert_eq!(report.tables["materias"].synced, 0);
    }

    #[tokio::test]
    async fn test_collection_prefix_and_completion_event() {
        let fx = Fixture::new();
        let completed: Arc<Mutex<Vec<(usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
        {
            let completed = Arc::clone(&completed);
            fx.bus.subscribe::<SyncCompleted, _>(move |event| {
                completed.lock().unwrap().push((event.synced, event.failed));
            });
        }

        fx.user("ana@uni.edu");
        let store = Arc::new(InMemoryDocumentStore::new());
        sync_service(&fx, store.clone())
            .with_collection_prefix("dev_")
            .sync_pending()
            .await
            .unwrap();

        assert_eq!(store.count("dev_usuarios").await, 1);
        assert_eq!(store.count("usuarios").await, 0);
        assert_eq!(*completed.lock().unwrap(), vec![(1, 0)]);
    }
}
