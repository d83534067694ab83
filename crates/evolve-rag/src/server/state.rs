//! Application state for the query server

use std::sync::Arc;
use std::time::Duration;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::AnswerGenerator;
use crate::pipeline::QueryPipeline;
use crate::providers::{
    AzureOpenAiClient, EmbeddingProvider, LlmProvider, OnnxEmbedder, QdrantStore,
    VectorStoreProvider,
};
use crate::shaping::{FallbackFormatter, ResponseShaper};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    pipeline: QueryPipeline,
    /// Kept for readiness probes
    vector_store: Arc<dyn VectorStoreProvider>,
}

impl AppState {
    /// Build the providers from configuration and wire the pipeline
    pub async fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing RAG application state...");

        let embedder: Arc<dyn EmbeddingProvider> =
            Arc::new(OnnxEmbedder::new(&config.embeddings).await?);
        tracing::info!(
            "Embedding provider: {} ({} dims)",
            embedder.name(),
            embedder.dimensions()
        );

        let vector_store: Arc<dyn VectorStoreProvider> = Arc::new(QdrantStore::new(&config.qdrant)?);
        tracing::info!(
            "Vector store: {} at {} (data: {}, context: {})",
            vector_store.name(),
            config.qdrant.url,
            config.qdrant.data_collection,
            config.qdrant.context_collection
        );

        let llm: Arc<dyn LlmProvider> = Arc::new(AzureOpenAiClient::new(&config.llm)?);
        tracing::info!("LLM provider: {} ({})", llm.name(), llm.model());

        Ok(Self::from_parts(config, embedder, vector_store, llm))
    }

    /// Wire the pipeline from already-built providers
    pub fn from_parts(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStoreProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        let generator = AnswerGenerator::new(
            embedder,
            vector_store.clone(),
            llm.clone(),
            config.qdrant.clone(),
        );
        let shaper = ResponseShaper::new(
            llm,
            FallbackFormatter::new(
                config.pipeline.fallback_max_sentences,
                config.pipeline.fallback_max_chars,
            ),
            Duration::from_secs(config.pipeline.stage_timeout_secs),
        );
        let pipeline = QueryPipeline::new(generator, shaper, config.pipeline.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                vector_store,
            }),
        }
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn pipeline(&self) -> &QueryPipeline {
        &self.inner.pipeline
    }

    /// True when both collections answer a health probe
    pub async fn is_ready(&self) -> bool {
        let qdrant = &self.inner.config.qdrant;
        for collection in [&qdrant.data_collection, &qdrant.context_collection] {
            match self.inner.vector_store.health_check(collection).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!("Collection {} is not available", collection);
                    return false;
                }
                Err(e) => {
                    tracing::warn!("Health check for {} failed: {}", collection, e);
                    return false;
                }
            }
        }
        true
    }
}
