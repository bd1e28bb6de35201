//! Chat model client for the summarization request.
//!
//! Talks to Groq's OpenAI-compatible chat completions endpoint.

use crate::config::{AgentConfig, Credential};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Decoding temperature for every request
pub const TEMPERATURE: f32 = 0.0;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API key was rejected: {0}")]
    Unauthorized(String),
    #[error("content is too large for a single request: {0}")]
    InputTooLarge(String),
    #[error("LLM request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("LLM service returned HTTP {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("failed to parse response: {0}")]
    ParseError(String),
    #[error("LLM returned an empty summary")]
    EmptyResponse,
}

/// A model that turns one prompt into one completion
#[async_trait(?Send)]
pub trait ChatModel {
    /// Identifier reported alongside the summary
    fn model_id(&self) -> &str;

    async fn complete(&self, credential: &Credential, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
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
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

/// Groq chat completions client. Holds no credential.
pub struct GroqClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl GroqClient {
    pub fn new(config: &AgentConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait(?Send)]
impl ChatModel for GroqClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, credential: &Credential, prompt: &str) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            stream: false,
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "sending completion request");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential.expose())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!(%status, "completion request failed");
            return Err(classify_failure(status, &text));
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::ParseError(e.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(content)
    }
}

/// Map an error response onto the matching `LlmError`
fn classify_failure(status: StatusCode, body: &str) -> LlmError {
    let api_error = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);
    let message = api_error
        .as_ref()
        .map(|e| e.message.clone())
        .unwrap_or_else(|| body.trim().to_string());
    let code = api_error.and_then(|e| e.code).unwrap_or_default();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Unauthorized(message),
        StatusCode::PAYLOAD_TOO_LARGE => LlmError::InputTooLarge(message),
        _ if code == "context_length_exceeded" => LlmError::InputTooLarge(message),
        _ => LlmError::Api { status, message },
    }
}
