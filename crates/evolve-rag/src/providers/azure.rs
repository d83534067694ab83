//! Azure OpenAI chat-completions client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::llm::LlmProvider;

/// Azure OpenAI client for a single chat deployment
pub struct AzureOpenAiClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: LlmConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl AzureOpenAiClient {
    /// Create a new Azure OpenAI client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Chat completions URL for the configured deployment
    fn endpoint(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment
        )
    }
}

#[async_trait]
impl LlmProvider for AzureOpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        };

        tracing::debug!(
            "Completing prompt ({} chars) with deployment {}",
            prompt.len(),
            self.config.deployment
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("api-version", self.config.api_version.as_str())])
            .header("api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Llm(format!("Completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Llm(format!(
                "Completion failed: HTTP {} - {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Llm(format!("Failed to read completion response: {}", e)))?;

        parse_completion(&body)
    }

    fn name(&self) -> &str {
        "azure-openai"
    }

    fn model(&self) -> &str {
        &self.config.deployment
    }
}

/// Extract the first choice's content from a chat-completions body
fn parse_completion(body: &str) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| Error::Llm(format!("Failed to parse completion response: {}", e)))?;

    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| Error::Llm("Completion response contained no choices".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LlmConfig {
        LlmConfig {
            endpoint: "https://res.openai.azure.com/".to_string(),
            api_key: "key".to_string(),
            deployment: "gpt-4o".to_string(),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = AzureOpenAiClient::new(&config()).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://res.openai.azure.com/openai/deployments/gpt-4o/chat/completions"
        );
        assert_eq!(client.model(), "gpt-4o");
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Refunds take 5 days."}}
            ]
        }"#;
        assert_eq!(parse_completion(body).unwrap(), "Refunds take 5 days.");
    }

    #[test]
    fn test_parse_completion_without_choices() {
        let err = parse_completion(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, Error::Llm(_)));
    }

    #[test]
    fn test_null_content_is_empty_answer() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "");
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: 0.0,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "messages": [{"role": "user", "content": "hi"}],
                "temperature": 0.0
            })
        );
    }
}
