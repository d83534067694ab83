//! Qdrant vector store over the REST API
//!
//! Points use the LangChain payload layout (`page_content` + `metadata`) so
//! collections written by other tooling can be queried unchanged.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::time::Duration;

use crate::config::QdrantConfig;
use crate::error::{Error, Result};
use crate::types::{ScoredDocument, VectorPoint};

use super::vector_store::VectorStoreProvider;

/// Payload key holding the chunk text
const CONTENT_KEY: &str = "page_content";
/// Payload key holding the chunk metadata object
const METADATA_KEY: &str = "metadata";

/// Qdrant REST client
pub struct QdrantStore {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    result: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ScoredPoint {
    score: f32,
    #[serde(default)]
    payload: Option<Map<String, Value>>,
}

impl QdrantStore {
    /// Create a new Qdrant client
    pub fn new(config: &QdrantConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/collections/{}", self.base_url, collection)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("api-key", key),
            None => request,
        }
    }

    fn map_err(action: &str, e: reqwest::Error) -> Error {
        Error::VectorStore(format!("Qdrant {} failed: {}", action, e))
    }

    async fn check_status(action: &str, response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(Error::VectorStore(format!(
            "Qdrant {} failed: HTTP {} - {}",
            action, status, body
        )))
    }
}

#[async_trait]
impl VectorStoreProvider for QdrantStore {
    async fn search(
        &self,
        collection: &str,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>> {
        let request = SearchRequest {
            vector: query_embedding,
            limit: top_k,
            with_payload: true,
        };

        let response = self
            .authorize(
                self.client
                    .post(format!("{}/points/search", self.collection_url(collection))),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::map_err("search", e))?;

        let body = Self::check_status("search", response)
            .await?
            .text()
            .await
            .map_err(|e| Self::map_err("search", e))?;

        let documents = parse_search_response(&body)?;
        tracing::debug!(
            "Qdrant search in '{}' returned {} documents (best score {:?})",
            collection,
            documents.len(),
            documents.first().map(|d| d.score)
        );
        Ok(documents)
    }

    async fn upsert(&self, collection: &str, points: &[VectorPoint]) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        let body = json!({
            "points": points.iter().map(point_to_json).collect::<Vec<_>>(),
        });

        let response = self
            .authorize(
                self.client
                    .put(format!("{}/points", self.collection_url(collection)))
                    .query(&[("wait", "true")]),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::map_err("upsert", e))?;

        Self::check_status("upsert", response).await?;
        tracing::debug!("Upserted {} points into '{}'", points.len(), collection);
        Ok(())
    }

    async fn ensure_collection(&self, collection: &str, dimensions: usize) -> Result<()> {
        let response = self
            .authorize(self.client.get(self.collection_url(collection)))
            .send()
            .await
            .map_err(|e| Self::map_err("collection lookup", e))?;

        if response.status().is_success() {
            tracing::debug!("Collection '{}' already exists", collection);
            return Ok(());
        }
        if response.status() != StatusCode::NOT_FOUND {
            Self::check_status("collection lookup", response).await?;
        }

        let response = self
            .authorize(self.client.put(self.collection_url(collection)))
            .json(&json!({
                "vectors": { "size": dimensions, "distance": "Cosine" }
            }))
            .send()
            .await
            .map_err(|e| Self::map_err("collection creation", e))?;

        Self::check_status("collection creation", response).await?;
        tracing::info!("Created collection '{}' ({} dimensions)", collection, dimensions);
        Ok(())
    }

    async fn health_check(&self, collection: &str) -> Result<bool> {
        match self
            .authorize(self.client.get(self.collection_url(collection)))
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "qdrant"
    }
}

/// Convert a Qdrant search body into documents, best first
fn parse_search_response(body: &str) -> Result<Vec<ScoredDocument>> {
    let parsed: SearchResponse = serde_json::from_str(body)
        .map_err(|e| Error::VectorStore(format!("Failed to parse search response: {}", e)))?;

    Ok(parsed
        .result
        .into_iter()
        .map(|point| {
            let mut payload = point.payload.unwrap_or_default();
            let content = match payload.remove(CONTENT_KEY) {
                Some(Value::String(text)) => text,
                _ => String::new(),
            };
            let metadata = match payload.remove(METADATA_KEY) {
                Some(Value::Object(map)) => map,
                _ => Map::new(),
            };
            ScoredDocument {
                content,
                score: point.score,
                metadata,
            }
        })
        .collect())
}

fn point_to_json(point: &VectorPoint) -> Value {
    json!({
        "id": point.id.to_string(),
        "vector": point.vector,
        "payload": {
            CONTENT_KEY: point.content,
            METADATA_KEY: point.metadata,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_parse_langchain_payload() {
        let body = r#"{
            "result": [
                {"id": "a", "version": 1, "score": 0.91,
                 "payload": {"page_content": "Refunds are issued within 5 days.",
                             "metadata": {"source": "policy.txt", "title": "Policy"}}},
                {"id": 7, "version": 1, "score": 0.42, "payload": null}
            ],
            "status": "ok",
            "time": 0.002
        }"#;

        let docs = parse_search_response(body).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content, "Refunds are issued within 5 days.");
        assert_eq!(docs[0].score, 0.91);
        assert_eq!(docs[0].metadata["source"], "policy.txt");
        assert_eq!(docs[1].content, "");
        assert!(docs[1].metadata.is_empty());
    }

    #[test]
    fn test_parse_error_is_vector_store_error() {
        let err = parse_search_response(r#"{"status": {"error": "Not found"}}"#).unwrap_err();
        assert!(matches!(err, Error::VectorStore(_)));
    }

    #[test]
    fn test_point_payload_layout() {
        let mut metadata = Map::new();
        metadata.insert("source".to_string(), json!("corpus.txt"));
        let point = VectorPoint {
            id: Uuid::nil(),
            vector: vec![0.5, 0.25],
            content: "chunk".to_string(),
            metadata,
        };

        assert_eq!(
            point_to_json(&point),
            json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "vector": [0.5, 0.25],
                "payload": {"page_content": "chunk", "metadata": {"source": "corpus.txt"}}
            })
        );
    }

    #[test]
    fn test_collection_url() {
        let store = QdrantStore::new(&QdrantConfig {
            url: "http://localhost:6333/".to_string(),
            ..QdrantConfig::default()
        })
        .unwrap();
        assert_eq!(
            store.collection_url("context_collection"),
            "http://localhost:6333/collections/context_collection"
        );
    }
}
