//! Provider abstractions for the external collaborators
//!
//! The pipeline only sees these traits; concrete clients are built once at
//! startup and shared behind `Arc<dyn ...>`.

pub mod azure;
pub mod embedding;
pub mod llm;
pub mod onnx;
pub mod qdrant;
pub mod vector_store;

pub use azure::AzureOpenAiClient;
pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use onnx::OnnxEmbedder;
pub use qdrant::QdrantStore;
pub use vector_store::VectorStoreProvider;
