//! Corpus ingestion: read, chunk, embed, upsert

mod chunker;

pub use chunker::{TextChunk, TextChunker};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, VectorStoreProvider};
use crate::types::VectorPoint;

/// Summary of one ingestion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub source: PathBuf,
    pub collection: String,
    pub chunks: usize,
    pub points: usize,
}

/// Loads one text file into a vector store collection
pub struct IngestJob {
    embedder: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStoreProvider>,
    chunker: TextChunker,
    batch_size: usize,
}

impl IngestJob {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStoreProvider>,
        chunker: TextChunker,
        batch_size: usize,
    ) -> Self {
        Self {
            embedder,
            vector_store,
            chunker,
            batch_size: batch_size.max(1),
        }
    }

    /// Ingest `path` into `collection`
    pub async fn run(&self, path: &Path, collection: &str) -> Result<IngestReport> {
        self.run_with_progress(path, collection, |_, _| {}).await
    }

    /// Ingest `path`, calling `progress(done, total)` after each upserted batch
    pub async fn run_with_progress<F>(
        &self,
        path: &Path,
        collection: &str,
        mut progress: F,
    ) -> Result<IngestReport>
    where
        F: FnMut(usize, usize),
    {
        let text = tokio::fs::read_to_string(path).await?;
        let chunks = self.chunker.chunk(&text);

        tracing::info!(
            "Ingesting {} ({} chunks) into {}",
            path.display(),
            chunks.len(),
            collection
        );

        self.vector_store
            .ensure_collection(collection, self.embedder.dimensions())
            .await?;

        let source = path.display().to_string();
        let title = document_title(path);
        let mut points_written = 0usize;

        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;

            if embeddings.len() != batch.len() {
                return Err(Error::embedding(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    embeddings.len()
                )));
            }

            let points: Vec<VectorPoint> = batch
                .iter()
                .zip(embeddings)
                .map(|(chunk, vector)| VectorPoint {
                    id: Uuid::new_v4(),
                    vector,
                    content: chunk.content.clone(),
                    metadata: chunk_metadata(&source, &title, chunk.index),
                })
                .collect();

            self.vector_store.upsert(collection, &points).await?;
            points_written += points.len();
            progress(points_written, chunks.len());

            tracing::debug!("Upserted {}/{} points", points_written, chunks.len());
        }

        tracing::info!("Ingested {} points into {}", points_written, collection);

        Ok(IngestReport {
            source: path.to_path_buf(),
            collection: collection.to_string(),
            chunks: chunks.len(),
            points: points_written,
        })
    }
}

fn document_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn chunk_metadata(source: &str, title: &str, index: usize) -> Map<String, Value> {
    let mut metadata = Map::new();
    metadata.insert("source".to_string(), Value::from(source));
    metadata.insert("title".to_string(), Value::from(title));
    metadata.insert("chunk_index".to_string(), Value::from(index));
    metadata
}
