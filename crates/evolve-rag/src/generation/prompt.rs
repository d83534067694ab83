//! Prompt templates for answer generation and response formatting

use crate::error::{Error, Result};
use crate::types::ScoredDocument;

const QUESTION_SLOT: &str = "{question}";
const CONTEXT_SLOT: &str = "{context}";

/// Detailed, explanatory answer over the document corpus
pub const DATA_TEMPLATE: &str = r#"You are a helpful assistant.
Use the retrieved documents to provide a clear, detailed, and descriptive answer to the query.
Add relevant explanations, context, and background so the user fully understands.

Question: {question}
Context: {context}
Answer:"#;

/// Machine-renderable chart or diagram source only
pub const CONTEXT_TEMPLATE: &str = r#"You are a precise assistant for generating charts using charts/diagram/code snippets.
Follow these rules strictly:
- Provide the code/output ONLY, without explanations unless explicitly asked.
- If the query is about mermaid, write pure mermaid syntax without any () brackets or markdown formatting.
- If the query is about Chart or graph or plot, return valid JSON config code for Chart.js.
- If the query is about other libraries, follow their raw syntax exactly.
- Do not wrap output in markdown ``` blocks unless explicitly requested.

Question: {question}
Context: {context}
Answer:"#;

/// A prompt with `{question}` and `{context}` slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Create a template, rejecting ones that lack either slot
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        for slot in [QUESTION_SLOT, CONTEXT_SLOT] {
            if !template.contains(slot) {
                return Err(Error::Config(format!("Prompt template is missing {}", slot)));
            }
        }
        Ok(Self { template })
    }

    /// Template for the primary, explanatory answer
    pub fn data() -> Self {
        Self {
            template: DATA_TEMPLATE.to_string(),
        }
    }

    /// Template for the chart/diagram answer
    pub fn context() -> Self {
        Self {
            template: CONTEXT_TEMPLATE.to_string(),
        }
    }

    /// Fill both slots in one pass; slot markers inside the inserted text are left alone
    pub fn render(&self, question: &str, context: &str) -> String {
        self.template
            .split(CONTEXT_SLOT)
            .map(|part| part.replace(QUESTION_SLOT, question))
            .collect::<Vec<_>>()
            .join(context)
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

/// Prompt builder helpers
pub struct PromptBuilder;

impl PromptBuilder {
    /// Concatenate retrieved document contents into a prompt context
    pub fn build_context(documents: &[ScoredDocument]) -> String {
        documents
            .iter()
            .map(|doc| doc.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Meta-prompt that compresses a detailed answer for the chat frontend
    pub fn build_format_prompt(original_query: &str, raw_answer: &str) -> String {
        format!(
            r#"You are a response formatter. Your task is to convert detailed RAG responses into clean, frontend-friendly formats.

Original Query: {original_query}
Raw Response: {raw_answer}

Format the response according to these rules:
1. Keep it concise (6-7 lines maximum)
2. Use bullet points or short paragraphs for better readability
3. Remove unnecessary technical details
4. Make it conversational and easy to understand
5. Focus on key insights and main points

Provide ONLY the formatted message content, no additional text or explanations."#,
            original_query = original_query,
            raw_answer = raw_answer
        )
    }
}
