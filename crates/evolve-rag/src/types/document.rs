//! Retrieved documents and the source metadata derived from them

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Placeholder for metadata fields the vector store did not provide
pub const UNKNOWN: &str = "Unknown";

/// Logical vector store collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Document corpus used for the primary answer
    Data,
    /// Chart and diagram snippets used for the secondary answer
    Context,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Data => "data",
            Collection::Context => "context",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document returned by similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// Text content of the stored chunk
    pub content: String,
    /// Similarity score, higher is more relevant
    pub score: f32,
    /// Arbitrary metadata stored alongside the chunk
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ScoredDocument {
    pub fn new(content: impl Into<String>, score: f32) -> Self {
        Self {
            content: content.into(),
            score,
            metadata: Map::new(),
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Presentation view of a retrieved document's origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub title: String,
    pub source: String,
    pub pages: Vec<Value>,
}

impl SourceMetadata {
    /// Extract title, source and pages, defaulting missing fields
    pub fn from_document(doc: &ScoredDocument) -> Self {
        Self {
            title: text_field(&doc.metadata, "title"),
            source: text_field(&doc.metadata, "source"),
            pages: match doc.metadata.get("pages") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(pages)) => pages.clone(),
                Some(single) => vec![single.clone()],
            },
        }
    }
}

fn text_field(metadata: &Map<String, Value>, key: &str) -> String {
    match metadata.get(key) {
        None | Some(Value::Null) => UNKNOWN.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Source list attached as the final response block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source_documents: Vec<SourceMetadata>,
    pub total_sources: usize,
}

impl SourceSummary {
    /// Build the summary for documents in retrieval order
    pub fn from_documents(docs: &[ScoredDocument]) -> Self {
        Self {
            source_documents: docs.iter().map(SourceMetadata::from_document).collect(),
            total_sources: docs.len(),
        }
    }
}

/// A chunk ready to be written to the vector store
#[derive(Debug, Clone)]
pub struct VectorPoint {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub content: String,
    pub metadata: Map<String, Value>,
}
