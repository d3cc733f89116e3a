// src/integrations/document_store.rs
//
// Schemaless document storage used as the cloud mirror of local data.
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Documents are plain JSON objects keyed by a string id
// - Implementations never interpret document contents

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A stored document: its id within the collection plus its fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: Map<String, Value>,
}

impl Document {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document of a collection
    async fn list(&self, collection: &str) -> AppResult<Vec<Document>>;

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>>;

    /// Store a new document under a generated id and return that id
    async fn add(&self, collection: &str, data: Map<String, Value>) -> AppResult<String>;

    /// Create or fully replace the document with the given id
    async fn set(&self, collection: &str, id: &str, data: Map<String, Value>) -> AppResult<()>;

    /// Merge the given fields into an existing document
    async fn update(&self, collection: &str, id: &str, data: Map<String, Value>) -> AppResult<()>;

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()>;
}

/// Turn a serializable value into document fields
pub fn to_fields<T: Serialize>(value: &T) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Other(format!(
            "Documents must be JSON objects, got {}",
            other
        ))),
    }
}

/// Process-local document store
///
/// Backs tests and offline dry runs.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Map<String, Value>>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list(&self, collection: &str) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let docs = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(docs)
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn add(&self, collection: &str, data: Map<String, Value>) -> AppResult<String> {
        let id = Uuid::new_v4().simple().to_string();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, data: Map<String, Value>) -> AppResult<()> {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, data: Map<String, Value>) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| AppError::NotFound(format!("Document {}/{}", collection, id)))?;

        existing.extend(data);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id));

        if removed.is_none() {
            return Err(AppError::NotFound(format!("Document {}/{}", collection, id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_add_then_get() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .add("materias", fields(json!({"codigo": "MAT201"})))
            .await
            .unwrap();

        let doc = store.get("materias", &id).await.unwrap().unwrap();
        assert_eq!(doc.field("codigo"), Some(&json!("MAT201")));
        assert!(store.get("materias", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = InMemoryDocumentStore::new();
        store
            .set("notas", "n1", fields(json!({"calificacion": 3.0, "tipo": "parcial"})))
            .await
            .unwrap();
        store
            .update("notas", "n1", fields(json!({"calificacion": 4.5})))
            .await
            .unwrap();

        let doc = store.get("notas", "n1").await.unwrap().unwrap();
        assert_eq!(doc.field("calificacion"), Some(&json!(4.5)));
        assert_eq!(doc.field("tipo"), Some(&json!("parcial")));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_fail() {
        let store = InMemoryDocumentStore::new();
        let err = store.update("notas", "nope", Map::new()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(store.delete("notas", "nope").await.is_err());
    }

    #[tokio::test]
    async fn test_set_replaces_document() {
        let store = InMemoryDocumentStore::new();
        store.set("horarios", "h1", fields(json!({"aula": "A1", "x": 1}))).await.unwrap();
        store.set("horarios", "h1", fields(json!({"aula": "B2"}))).await.unwrap();

        let doc = store.get("horarios", "h1").await.unwrap().unwrap();
        assert_eq!(doc.data.len(), 1);
        assert_eq!(store.count("horarios").await, 1);
    }

    #[test]
    fn test_to_fields_rejects_non_objects() {
        assert!(to_fields(&json!([1, 2])).is_err());
        assert_eq!(to_fields(&json!({"a": 1})).unwrap().len(), 1);
    }
}
