// src/integrations/cloud/collection.rs
//
// Thin per-entity CRUD over a DocumentStore collection.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::integrations::document_store::{to_fields, Document, DocumentStore};

/// Field stamped on every document created through a collection
pub const CREATED_AT_FIELD: &str = "fechaCreacion";

/// A typed document together with its id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudDoc<T> {
    pub id: String,
    #[serde(flatten)]
    pub data: T,
}

pub struct CloudCollection<T> {
    store: Arc<dyn DocumentStore>,
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CloudCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn DocumentStore>, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn list_all(&self) -> AppResult<Vec<CloudDoc<T>>> {
        self.store
            .list(&self.name)
            .await?
            .into_iter()
            .map(|doc| self.decode(doc))
            .collect()
    }

    /// Documents whose `field` equals `value`
    ///
    /// Filtering happens client-side after listing the whole collection.
    pub async fn list_where(&self, field: &str, value: &Value) -> AppResult<Vec<CloudDoc<T>>> {
        self.store
            .list(&self.name)
            .await?
            .into_iter()
            .filter(|doc| doc.field(field) == Some(value))
            .map(|doc| self.decode(doc))
            .collect()
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<CloudDoc<T>>> {
        self.store
            .get(&self.name, id)
            .await?
            .map(|doc| self.decode(doc))
            .transpose()
    }

    /// Create a document, stamping its creation time
    pub async fn add(&self, item: &T) -> AppResult<String> {
        let mut fields = to_fields(item)?;
        fields.insert(
            CREATED_AT_FIELD.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        let id = self.store.add(&self.name, fields).await?;
        log::debug!("Added {}/{}", self.name, id);
        Ok(id)
    }

    /// Create or replace the document with a known id
    pub async fn set(&self, id: &str, item: &T) -> AppResult<()> {
        let fields = to_fields(item)?;
        self.store.set(&self.name, id, fields).await
    }

    /// Merge a partial document (camelCase field names)
    pub async fn update(&self, id: &str, patch: Map<String, Value>) -> AppResult<()> {
        self.store.update(&self.name, id, patch).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete(&self.name, id).await
    }

    fn decode(&self, doc: Document) -> AppResult<CloudDoc<T>> {
        let data = serde_json::from_value(Value::Object(doc.data)).map_err(|e| {
            AppError::External(format!(
                "Document {}/{} does not match the expected shape: {}",
                self.name, doc.id, e
            ))
        })?;
        Ok(CloudDoc { id: doc.id, data })
    }
}
