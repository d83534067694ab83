//! evolve-rag: two-stage RAG query service
//!
//! Answers questions from a Qdrant-backed document corpus. A confidence gate
//! rejects queries the corpus cannot answer, a primary answer is generated
//! from the data collection, and a second pass over the context collection
//! produces an optional Mermaid diagram or Chart.js configuration. The result
//! is shaped into an ordered list of blocks for the frontend.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod server;
pub mod shaping;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::{QueryPipeline, INSUFFICIENT_INFORMATION};
pub use types::{QueryRequest, QueryResponse, ResponseBlock, ResponsePayload};
