//! Retrieval-augmented answer generator
//!
//! One retrieval plus one completion against a logical collection.

use std::sync::Arc;

use crate::config::QdrantConfig;
use crate::error::Result;
use crate::providers::{EmbeddingProvider, LlmProvider, VectorStoreProvider};
use crate::types::{Collection, ScoredDocument};

use super::prompt::{PromptBuilder, PromptTemplate};

/// Completion text plus the documents it was grounded on
#[derive(Debug, Clone)]
pub struct GeneratedAnswer {
    /// Model completion, verbatim
    pub answer: String,
    /// Retrieved documents in rank order
    pub documents: Vec<ScoredDocument>,
}

/// Embeds, retrieves, fills a prompt template and calls the language model
pub struct AnswerGenerator {
    embedder: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStoreProvider>,
    llm: Arc<dyn LlmProvider>,
    collections: QdrantConfig,
}

impl AnswerGenerator {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStoreProvider>,
        llm: Arc<dyn LlmProvider>,
        collections: QdrantConfig,
    ) -> Self {
        Self {
            embedder,
            vector_store,
            llm,
            collections,
        }
    }

    /// Physical collection name behind a logical collection
    pub fn collection_name(&self, collection: Collection) -> &str {
        self.collections.collection_name(collection)
    }

    /// Embed `query` and return the `top_k` nearest documents
    pub async fn retrieve(
        &self,
        query: &str,
        collection: Collection,
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>> {
        let embedding = self.embedder.embed(query).await?;
        self.vector_store
            .search(self.collection_name(collection), &embedding, top_k)
            .await
    }

    /// Retrieve context for `query` and generate an answer with `template`
    ///
    /// Errors from the embedder, the vector store or the language model are
    /// returned unchanged; the caller decides how to recover.
    pub async fn generate(
        &self,
        query: &str,
        collection: Collection,
        template: &PromptTemplate,
        top_k: usize,
    ) -> Result<GeneratedAnswer> {
        let documents = self.retrieve(query, collection, top_k).await?;
        let context = PromptBuilder::build_context(&documents);
        let prompt = template.render(query, &context);

        tracing::debug!(
            "Generating {} answer from {} documents with {}",
            collection,
            documents.len(),
            self.llm.model()
        );

        let answer = self.llm.complete(&prompt).await?;

        Ok(GeneratedAnswer { answer, documents })
    }
}
