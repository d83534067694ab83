//! Response payload sent to the frontend
//!
//! The payload is an ordered list of single-key objects rather than a fixed
//! record; the frontend renders blocks in the order received.

use serde::{Deserialize, Serialize};

use super::document::SourceSummary;

/// One block of the response payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseBlock {
    /// Formatted answer text
    Message(String),
    /// Mermaid diagram source
    Mermaid(String),
    /// Chart.js configuration
    Chart(String),
    /// Documents the answer was generated from
    Metadata(SourceSummary),
}

impl ResponseBlock {
    /// Key this block serializes under
    pub fn kind(&self) -> &'static str {
        match self {
            ResponseBlock::Message(_) => "message",
            ResponseBlock::Mermaid(_) => "mermaid",
            ResponseBlock::Chart(_) => "chart",
            ResponseBlock::Metadata(_) => "metadata",
        }
    }
}

/// Ordered response blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponsePayload(pub Vec<ResponseBlock>);

impl ResponsePayload {
    /// Payload consisting of a single message block
    pub fn message(text: impl Into<String>) -> Self {
        Self(vec![ResponseBlock::Message(text.into())])
    }

    pub fn push(&mut self, block: ResponseBlock) {
        self.0.push(block);
    }

    pub fn blocks(&self) -> &[ResponseBlock] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Success envelope for `POST /query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: ResponsePayload,
}

impl From<ResponsePayload> for QueryResponse {
    fn from(response: ResponsePayload) -> Self {
        Self { response }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::SourceMetadata;
    use serde_json::json;

    #[test]
    fn test_blocks_serialize_as_single_key_objects() {
        let mut payload = ResponsePayload::message("• one\n• two");
        payload.push(ResponseBlock::Mermaid("A-->B".to_string()));
        payload.push(ResponseBlock::Metadata(SourceSummary {
            source_documents: vec![SourceMetadata {
                title: "Unknown".to_string(),
                source: "corpus.txt".to_string(),
                pages: vec![],
            }],
            total_sources: 1,
        }));

        let value = serde_json::to_value(QueryResponse::from(payload)).unwrap();
        assert_eq!(
            value,
            json!({
                "response": [
                    {"message": "• one\n• two"},
                    {"mermaid": "A-->B"},
                    {"metadata": {
                        "source_documents": [
                            {"title": "Unknown", "source": "corpus.txt", "pages": []}
                        ],
                        "total_sources": 1
                    }}
                ]
            })
        );
    }

    #[test]
    fn test_chart_block_kind() {
        let block = ResponseBlock::Chart("const config = {};".to_string());
        assert_eq!(block.kind(), "chart");
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({"chart": "const config = {};"})
        );
    }
}
