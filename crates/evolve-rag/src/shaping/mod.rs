//! Response shaping: formatted message, optional visual block, source metadata

pub mod fallback;
pub mod visual;

use std::sync::Arc;
use std::time::Duration;

use crate::generation::PromptBuilder;
use crate::providers::LlmProvider;
use crate::types::{ResponseBlock, ResponsePayload, SourceSummary};

pub use fallback::FallbackFormatter;
pub use visual::{attachment_for, clean_chart, clean_mermaid, VisualKind};

/// Turns raw pipeline output into the ordered frontend payload
///
/// Block order is fixed: message, then at most one mermaid/chart block,
/// then metadata.
pub struct ResponseShaper {
    llm: Arc<dyn LlmProvider>,
    fallback: FallbackFormatter,
    timeout: Duration,
}

impl ResponseShaper {
    pub fn new(llm: Arc<dyn LlmProvider>, fallback: FallbackFormatter, timeout: Duration) -> Self {
        Self {
            llm,
            fallback,
            timeout,
        }
    }

    /// Build the payload; formatting failures are absorbed by the fallback formatter
    pub async fn shape(
        &self,
        raw_answer: &str,
        secondary_output: &str,
        original_query: &str,
        metadata: SourceSummary,
    ) -> ResponsePayload {
        let message = self.format_message(raw_answer, original_query).await;
        let mut payload = ResponsePayload::message(message);

        if let Some(block) = attachment_for(original_query, secondary_output) {
            tracing::debug!("Attaching {} block", block.kind());
            payload.push(block);
        }

        payload.push(ResponseBlock::Metadata(metadata));
        payload
    }

    /// Ask the model for a compact version of the answer
    pub async fn format_message(&self, raw_answer: &str, original_query: &str) -> String {
        let prompt = PromptBuilder::build_format_prompt(original_query, raw_answer);

        match tokio::time::timeout(self.timeout, self.llm.complete(&prompt)).await {
            Ok(Ok(formatted)) => formatted.trim().to_string(),
            Ok(Err(e)) => {
                tracing::warn!("Formatter model failed, using fallback: {}", e);
                self.fallback.format(raw_answer)
            }
            Err(_) => {
                tracing::warn!(
                    "Formatter model timed out after {:?}, using fallback",
                    self.timeout
                );
                self.fallback.format(raw_answer)
            }
        }
    }
}
