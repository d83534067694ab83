//! Configuration for the RAG service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Collection;

/// Main RAG service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Qdrant connection and collection names
    pub qdrant: QdrantConfig,
    /// Azure OpenAI configuration
    pub llm: LlmConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Query pipeline tuning
    pub pipeline: PipelineConfig,
    /// Chunking configuration (ingestion)
    pub chunking: ChunkingConfig,
}

impl RagConfig {
    /// Load configuration: `.env`, then an optional TOML file, then environment overrides.
    ///
    /// When `path` is `None` the `RAG_CONFIG` variable is consulted for a file path.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let file = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("RAG_CONFIG").map(PathBuf::from));

        let mut config = match file {
            Some(file) => {
                tracing::info!("Loading configuration from {}", file.display());
                let raw = std::fs::read_to_string(&file)?;
                Self::from_toml(&raw)?
            }
            None => Self::default(),
        };

        config.apply_env_with(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML document; missing sections fall back to defaults
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("QDRANT_URL") {
            self.qdrant.url = url;
        }
        if let Some(key) = lookup("QDRANT_API_KEY") {
            self.qdrant.api_key = Some(key).filter(|k| !k.is_empty());
        }
        if let Some(deployment) = lookup("AZURE_DEPLOYMENT") {
            self.llm.deployment = deployment;
        }
        if let Some(key) = lookup("AZURE_API_KEY") {
            self.llm.api_key = key;
        }
        if let Some(endpoint) = lookup("AZURE_ENDPOINT") {
            self.llm.endpoint = endpoint;
        }
        if let Some(version) = lookup("AZURE_API_VERSION") {
            self.llm.api_version = version;
        }
        if let Some(host) = lookup("RAG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("RAG_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid RAG_PORT value: {}", port),
            }
        }
    }

    /// Check that everything needed to serve queries is present
    pub fn validate(&self) -> Result<()> {
        if self.qdrant.url.trim().is_empty() {
            return Err(Error::Config("QDRANT_URL is not set".to_string()));
        }
        if self.llm.endpoint.trim().is_empty() {
            return Err(Error::Config("AZURE_ENDPOINT is not set".to_string()));
        }
        if self.llm.api_key.trim().is_empty() {
            return Err(Error::Config("AZURE_API_KEY is not set".to_string()));
        }
        if self.llm.deployment.trim().is_empty() {
            return Err(Error::Config("AZURE_DEPLOYMENT is not set".to_string()));
        }
        self.pipeline.validate()?;
        self.chunking.validate()
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Allow cross-origin requests from any origin
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
        }
    }
}

/// Qdrant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QdrantConfig {
    /// REST endpoint, e.g. `https://xyz.cloud.qdrant.io:6333`
    pub url: String,
    /// API key (Qdrant Cloud)
    pub api_key: Option<String>,
    /// Collection holding the document corpus
    pub data_collection: String,
    /// Collection holding chart/diagram snippets
    pub context_collection: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl QdrantConfig {
    /// Physical collection name for a logical collection
    pub fn collection_name(&self, collection: Collection) -> &str {
        match collection {
            Collection::Data => &self.data_collection,
            Collection::Context => &self.context_collection,
        }
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6333".to_string(),
            api_key: None,
            data_collection: "my_json_collection".to_string(),
            context_collection: "context_collection".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Azure OpenAI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,
    /// API key
    pub api_key: String,
    /// Chat model deployment name
    pub deployment: String,
    /// REST API version
    pub api_version: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            deployment: String::new(),
            api_version: "2024-02-01".to_string(),
            temperature: 0.0,
            timeout_secs: 120,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// sentence-transformers model name
    pub model: String,
    /// Embedding dimensions (384 for MiniLM)
    pub dimensions: usize,
    /// Batch size for embedding generation
    pub batch_size: usize,
    /// Maximum sequence length
    pub max_length: usize,
    /// Cache directory for model files
    pub cache_dir: PathBuf,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "all-MiniLM-L6-v2".to_string(),
            dimensions: 384,
            batch_size: 32,
            max_length: 256,
            cache_dir: dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("evolve-rag")
                .join("models"),
        }
    }
}

/// Query pipeline tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum best score for the data collection before any generation happens
    pub confidence_threshold: f32,
    /// Documents inspected by the confidence gate
    pub gate_top_k: usize,
    /// Documents retrieved for the primary answer
    pub data_top_k: usize,
    /// Documents retrieved for the chart/diagram answer
    pub context_top_k: usize,
    /// Upper bound for each external stage in seconds
    pub stage_timeout_secs: u64,
    /// Sentences kept by the fallback formatter
    pub fallback_max_sentences: usize,
    /// Characters kept by the fallback formatter for single-sentence answers
    pub fallback_max_chars: usize,
}

impl PipelineConfig {
    fn validate(&self) -> Result<()> {
        if self.gate_top_k == 0 || self.data_top_k == 0 || self.context_top_k == 0 {
            return Err(Error::Config("top_k values must be positive".to_string()));
        }
        if !(-1.0..=1.0).contains(&self.confidence_threshold) {
            return Err(Error::Config(format!(
                "confidence_threshold {} is outside [-1, 1]",
                self.confidence_threshold
            )));
        }
        if self.stage_timeout_secs == 0 {
            return Err(Error::Config("stage_timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.37,
            gate_top_k: 3,
            data_top_k: 5,
            context_top_k: 3,
            stage_timeout_secs: 60,
            fallback_max_sentences: 4,
            fallback_max_chars: 300,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
    /// Minimum chunk size (skip smaller chunks)
    pub min_chunk_size: usize,
}

impl ChunkingConfig {
    /// Reject sizes that cannot make progress
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be positive".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            min_chunk_size: 1,
        }
    }
}
