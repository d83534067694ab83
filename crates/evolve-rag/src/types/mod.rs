//! Core types for the RAG service

pub mod document;
pub mod query;
pub mod response;

pub use document::{Collection, ScoredDocument, SourceMetadata, SourceSummary, VectorPoint};
pub use query::QueryRequest;
pub use response::{QueryResponse, ResponseBlock, ResponsePayload};
