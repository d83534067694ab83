//! In-memory providers for unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, LlmProvider, VectorStoreProvider};
use crate::types::{ScoredDocument, VectorPoint};

/// Embeds every text as `[len]` and records what it saw
#[derive(Default)]
pub struct FakeEmbedder {
    pub texts: Mutex<Vec<String>>,
    pub fail: bool,
}

impl FakeEmbedder {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().clone()
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.fail {
            return Err(Error::embedding("model not loaded"));
        }
        self.texts.lock().push(text.to_string());
        Ok(vec![text.len() as f32])
    }

    fn dimensions(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Returns canned documents per collection, truncated to `top_k`
#[derive(Default)]
pub struct FakeVectorStore {
    pub documents: HashMap<String, Vec<ScoredDocument>>,
    pub searches: Mutex<Vec<(String, usize)>>,
    pub upserts: Mutex<Vec<(String, usize)>>,
    pub ensured: Mutex<Vec<(String, usize)>>,
    pub fail: bool,
}

impl FakeVectorStore {
    pub fn with_collection(mut self, name: &str, docs: Vec<ScoredDocument>) -> Self {
        self.documents.insert(name.to_string(), docs);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn searches(&self) -> Vec<(String, usize)> {
        self.searches.lock().clone()
    }
}

#[async_trait]
impl VectorStoreProvider for FakeVectorStore {
    async fn search(
        &self,
        collection: &str,
        _query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>> {
        if self.fail {
            return Err(Error::vector_store("connection refused"));
        }
        self.searches.lock().push((collection.to_string(), top_k));
        Ok(self
            .documents
            .get(collection)
            .map(|docs| docs.iter().take(top_k).cloned().collect())
            .unwrap_or_default())
    }

    async fn upsert(&self, collection: &str, points: &[VectorPoint]) -> Result<()> {
        if self.fail {
            return Err(Error::vector_store("connection refused"));
        }
        self.upserts.lock().push((collection.to_string(), points.len()));
        Ok(())
    }

    async fn ensure_collection(&self, collection: &str, dimensions: usize) -> Result<()> {
        self.ensured.lock().push((collection.to_string(), dimensions));
        Ok(())
    }

    async fn health_check(&self, collection: &str) -> Result<bool> {
        Ok(!self.fail && self.documents.contains_key(collection))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

type Responder = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Replays scripted completions in order and records every prompt
#[derive(Default)]
pub struct FakeLlm {
    pub replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    pub prompts: Mutex<Vec<String>>,
    pub delay: Option<Duration>,
    pub responder: Option<Responder>,
}

impl FakeLlm {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = std::result::Result<S, S>>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(Into::into).map_err(Into::into))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// Answer every prompt with `respond(prompt)` instead of the script
    pub fn responding<F>(respond: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            responder: Some(Box::new(respond)),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl LlmProvider for FakeLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(respond) = &self.responder {
            return Ok(respond(prompt));
        }
        let reply = self.replies.lock().pop_front();
        match reply {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(Error::llm(message)),
            None => Err(Error::llm("no scripted reply")),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

/// Test configuration using the default collection names
pub fn test_config() -> RagConfig {
    let mut config = RagConfig::default();
    config.llm.endpoint = "https://example.openai.azure.com".to_string();
    config.llm.api_key = "test".to_string();
    config.llm.deployment = "test".to_string();
    config
}

/// A document in the data collection with full metadata
pub fn data_doc(content: &str, score: f32) -> ScoredDocument {
    ScoredDocument::new(content, score)
        .with_metadata("title", "Company Handbook")
        .with_metadata("source", "handbook.txt")
        .with_metadata("pages", serde_json::json!([1]))
}
