//! LLM provider trait for prompt completion

use async_trait::async_trait;
use crate::error::Result;

/// Trait for language-model completion
///
/// Implementations:
/// - `AzureOpenAiClient`: Azure OpenAI chat completions
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a fully rendered prompt, returning the model's text
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model (deployment) being used
    fn model(&self) -> &str;
}
