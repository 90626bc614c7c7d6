//! OpenAI-compatible chat completions backend
//!
//! Sends a non-streaming request to `{base_url}/chat/completions`:
//! ```text
//! {"model":"gpt-4.1-mini","messages":[...],"max_completion_tokens":64,
//!  "response_format":{"type":"json_object"}}
//! ```
//! and returns `choices[0].message.content`.

use super::CompletionBackend;
use crate::error::{Error, Result};
use crate::types::ChatMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Connection and sampling settings for the completion backend
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    /// API base, e.g. `https://api.openai.com/v1`
    pub base_url: String,

    /// Bearer token
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature. `None` leaves the field out of the request,
    /// which is required for models that only accept their default.
    pub temperature: Option<f32>,

    /// Upper bound on the response size
    pub max_output_tokens: u32,

    /// Whole-request timeout
    pub timeout: Duration,
}

impl OpenAiSettings {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: None,
            max_output_tokens: 64,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Completion backend speaking the OpenAI chat completions protocol
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    settings: OpenAiSettings,
    endpoint: String,
}

impl OpenAiBackend {
    /// Create a backend with its own HTTP client
    pub fn new(settings: OpenAiSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        let endpoint = format!("{}/chat/completions", settings.base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            settings,
            endpoint,
        })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.settings.model,
            messages,
            max_completion_tokens: self.settings.max_output_tokens,
            temperature: self.settings.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        debug!(model = %self.settings.model, "sending classification request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::backend(format!(
                "completion request failed with {}: {}",
                status,
                truncate(&body, 200)
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::backend("completion response had no content"))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// =============================================================================
// OpenAI Request/Response Structures
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_completion_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}
