// src/integrations/firestore/client.rs
//
// Firestore REST client
//
// ARCHITECTURE:
// - Implements DocumentStore over the Firestore v1 REST API
// - Encodes/decodes typed values (see value.rs)
// - Authenticates with the project API key and, when signed in, the user's
//   ID token
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Never creates or modifies domain entities directly

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::value::{decode_fields, encode_fields};
use crate::error::{AppError, AppResult};
use crate::integrations::document_store::{Document, DocumentStore};

const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const PAGE_SIZE: u32 = 300;

#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct FirestoreClient {
    base_url: String,
    project_id: String,
    api_key: Option<String>,
    id_token: Option<String>,
    http_client: Client,
}

impl FirestoreClient {
    pub fn new(project_id: impl Into<String>) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: FIRESTORE_BASE_URL.to_string(),
            project_id: project_id.into(),
            api_key: None,
            id_token: None,
            http_client,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Send requests on behalf of a signed-in user
    pub fn with_id_token(mut self, id_token: impl Into<String>) -> Self {
        self.id_token = Some(id_token.into());
        self
    }

    /// Point the client at another endpoint, e.g. the local emulator
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn documents_root(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.base_url.trim_end_matches('/'),
            self.project_id
        )
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.documents_root(), collection)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.documents_root(), collection, id)
    }

    fn authorize(&self, mut request: RequestBuilder) -> RequestBuilder {
        request = request.header(header::ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }
        if let Some(token) = &self.id_token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        request
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> AppResult<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| AppError::External(format!("Firestore {} failed: {}", action, e)))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let detail = response
            .json::<ErrorEnvelope>()
            .await
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| status.to_string());

        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Firestore document ({})", detail)));
        }

        Err(AppError::External(format!(
            "Firestore {} returned {}: {}",
            action, status, detail
        )))
    }

    fn to_document(raw: RawDocument) -> AppResult<Document> {
        let id = document_id(&raw.name)?;
        Ok(Document {
            id,
            data: decode_fields(&raw.fields)?,
        })
    }
}

/// Last path segment of a resource name like `projects/p/.../materias/abc`
fn document_id(name: &str) -> AppResult<String> {
    name.rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::External(format!("Invalid document name: {}", name)))
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn list(&self, collection: &str) -> AppResult<Vec<Document>> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http_client
                .get(self.collection_url(collection))
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let page: ListResponse = self.send(request, "list").await?.json().await?;
            for raw in page.documents {
                documents.push(Self::to_document(raw)?);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        log::debug!("Listed {} documents from {}", documents.len(), collection);
        Ok(documents)
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let request = self.http_client.get(self.document_url(collection, id));
        match self.send(request, "get").await {
            Ok(response) => {
                let raw: RawDocument = response.json().await?;
                Ok(Some(Self::to_document(raw)?))
            }
            Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn add(&self, collection: &str, data: Map<String, Value>) -> AppResult<String> {
        let request = self
            .http_client
            .post(self.collection_url(collection))
            .json(&json!({ "fields": encode_fields(&data) }));

        let raw: RawDocument = self.send(request, "add").await?.json().await?;
        document_id(&raw.name)
    }

    async fn set(&self, collection: &str, id: &str, data: Map<String, Value>) -> AppResult<()> {
        let request = self
            .http_client
            .patch(self.document_url(collection, id))
            .json(&json!({ "fields": encode_fields(&data) }));

        self.send(request, "set").await?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, data: Map<String, Value>) -> AppResult<()> {
        let mut params: Vec<(&str, &str)> = data
            .keys()
            .map(|field| ("updateMask.fieldPaths", field.as_str()))
            .collect();
        params.push(("currentDocument.exists", "true"));

        let request = self
            .http_client
            .patch(self.document_url(collection, id))
            .query(&params)
            .json(&json!({ "fields": encode_fields(&data) }));

        self.send(request, "update").await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let request = self.http_client.delete(self.document_url(collection, id));
        self.send(request, "delete").await?;
        Ok(())
    }
}
