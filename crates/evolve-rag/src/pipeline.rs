//! Two-stage query pipeline
//!
//! Confidence gate on the data collection, primary answer from the data
//! collection, chart/diagram answer from the context collection seeded with
//! the primary answer, then response shaping. Stages run strictly in order.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::generation::{AnswerGenerator, PromptTemplate};
use crate::shaping::ResponseShaper;
use crate::types::{Collection, ResponsePayload, SourceSummary};

/// Message returned when retrieval is not confident enough to answer
pub const INSUFFICIENT_INFORMATION: &str =
    "I don't have enough information to answer this query based on the stored documents.";

/// Raw output of the generation stages, before shaping
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Detailed answer from the data collection
    pub primary_answer: String,
    /// Sources behind the primary answer
    pub sources: SourceSummary,
    /// Chart/diagram output from the context collection, unsanitized
    pub secondary_output: String,
}

/// Outcome of the generation stages
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// Gate rejected the query; no model calls were made
    LowConfidence { best_score: Option<f32> },
    /// Both generation stages completed
    Answered(PipelineResult),
}

/// Orchestrates one request from query to payload
pub struct QueryPipeline {
    generator: AnswerGenerator,
    shaper: ResponseShaper,
    config: PipelineConfig,
    data_template: PromptTemplate,
    context_template: PromptTemplate,
}

impl QueryPipeline {
    pub fn new(generator: AnswerGenerator, shaper: ResponseShaper, config: PipelineConfig) -> Self {
        Self {
            generator,
            shaper,
            config,
            data_template: PromptTemplate::data(),
            context_template: PromptTemplate::context(),
        }
    }

    /// Replace the prompt templates used for the two generation stages
    pub fn with_templates(mut self, data: PromptTemplate, context: PromptTemplate) -> Self {
        self.data_template = data;
        self.context_template = context;
        self
    }

    /// Answer `query` end to end
    pub async fn run(&self, query: &str) -> Result<ResponsePayload> {
        let start = Instant::now();

        let payload = match self.generate(query).await? {
            PipelineOutcome::LowConfidence { .. } => {
                ResponsePayload::message(INSUFFICIENT_INFORMATION)
            }
            PipelineOutcome::Answered(result) => {
                self.shaper
                    .shape(
                        &result.primary_answer,
                        &result.secondary_output,
                        query,
                        result.sources,
                    )
                    .await
            }
        };

        tracing::info!(
            "Query completed in {}ms, {} blocks",
            start.elapsed().as_millis(),
            payload.len()
        );

        Ok(payload)
    }

    /// Run the gate and both generation stages without shaping
    pub async fn generate(&self, query: &str) -> Result<PipelineOutcome> {
        tracing::info!("Query: \"{}\"", query);

        // Stage 1: confidence gate
        let gate_docs = self
            .stage(
                "confidence gate",
                self.generator
                    .retrieve(query, Collection::Data, self.config.gate_top_k),
            )
            .await?;

        let best_score = gate_docs.iter().map(|d| d.score).reduce(f32::max);
        match best_score {
            Some(score) if score >= self.config.confidence_threshold => {
                tracing::debug!("Confidence gate passed (best score {:.3})", score);
            }
            _ => {
                tracing::warn!(
                    "Confidence gate rejected query (best score {:?}, threshold {})",
                    best_score,
                    self.config.confidence_threshold
                );
                return Ok(PipelineOutcome::LowConfidence { best_score });
            }
        }

        // Stage 2: detailed answer from the data collection
        let primary = self
            .stage(
                "primary generation",
                self.generator.generate(
                    query,
                    Collection::Data,
                    &self.data_template,
                    self.config.data_top_k,
                ),
            )
            .await?;
        let sources = SourceSummary::from_documents(&primary.documents);

        // Stage 3: chart/diagram source, seeded with the primary answer
        let secondary = self
            .stage(
                "secondary generation",
                self.generator.generate(
                    &primary.answer,
                    Collection::Context,
                    &self.context_template,
                    self.config.context_top_k,
                ),
            )
            .await?;

        tracing::info!(
            "Generated answer ({} chars) from {} sources, secondary output {} chars",
            primary.answer.len(),
            sources.total_sources,
            secondary.answer.len()
        );

        Ok(PipelineOutcome::Answered(PipelineResult {
            primary_answer: primary.answer,
            sources,
            secondary_output: secondary.answer,
        }))
    }

    async fn stage<T, F>(&self, name: &str, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let secs = self.config.stage_timeout_secs;
        match tokio::time::timeout(Duration::from_secs(secs), future).await {
            Ok(result) => result,
            Err(_) => Err(Error::timeout(name, secs)),
        }
    }
}
