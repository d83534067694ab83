//! Vector store provider trait for storing and searching embeddings

use async_trait::async_trait;
use crate::error::Result;
use crate::types::{ScoredDocument, VectorPoint};

/// Trait for vector storage and similarity search
///
/// Collections are addressed by their physical name.
///
/// Implementations:
/// - `QdrantStore`: Qdrant REST API
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Top-k nearest documents, best first
    async fn search(
        &self,
        collection: &str,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>>;

    /// Insert or replace points
    async fn upsert(&self, collection: &str, points: &[VectorPoint]) -> Result<()>;

    /// Create the collection if it does not exist yet
    async fn ensure_collection(&self, collection: &str, dimensions: usize) -> Result<()>;

    /// Check that the collection is reachable
    async fn health_check(&self, collection: &str) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
