//! Text generation against a hosted language model.
//!
//! The workflow only sees the [`TextGenerator`] trait. [`AnthropicClient`]
//! is the production implementation; tests substitute their own.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const API_VERSION: &str = "2023-06-01";

/// Errors raised while producing text.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API key is configured.
    #[error("generation API key is not configured")]
    MissingApiKey,
    /// Transport failure or non-success response.
    #[error("generation service unavailable{}: {message}", status_suffix(.status))]
    Unavailable {
        status: Option<u16>,
        message: String,
    },
    /// A success response that carried no usable text.
    #[error("malformed generation response: {0}")]
    Malformed(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" (HTTP {code})")).unwrap_or_default()
}

/// A single generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
}

/// Produces text for a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Settings for [`AnthropicClient`].
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Overall request timeout. `None` leaves the transport default.
    pub timeout: Option<Duration>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: None,
        }
    }
}

/// Messages API client.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    config: GenerationConfig,
}

impl AnthropicClient {
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| GenerationError::Unavailable {
            status: None,
            message: e.to_string(),
        })?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap, GenerationError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        let key = HeaderValue::from_str(api_key).map_err(|e| GenerationError::Unavailable {
            status: None,
            message: format!("invalid API key header: {e}"),
        })?;
        headers.insert("x-api-key", key);
        Ok(headers)
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Option<Vec<ContentBlock>>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(GenerationError::MissingApiKey)?;

        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: &request.system,
            messages: [Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        debug!(
            "Requesting generation from {} (model {}, {} prompt chars)",
            self.config.endpoint,
            self.config.model,
            request.prompt.chars().count()
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .headers(self.headers(api_key)?)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Unavailable {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::Unavailable {
                status: Some(status.as_u16()),
                message: e.to_string(),
            })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(GenerationError::Unavailable {
                status: Some(status.as_u16()),
                message,
            });
        }

        extract_text(&text)
    }
}

fn extract_text(body: &str) -> Result<String, GenerationError> {
    let parsed: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::Malformed(format!("invalid response body: {e}")))?;

    let Some(blocks) = parsed.content else {
        return Err(GenerationError::Malformed(
            "response has no content".to_string(),
        ));
    };

    let text: String = blocks
        .into_iter()
        .filter(|block| block.kind.as_deref().map_or(true, |kind| kind == "text"))
        .filter_map(|block| block.text)
        .collect();

    if text.trim().is_empty() {
        return Err(GenerationError::Malformed(
            "response has no text content".to_string(),
        ));
    }
    Ok(text)
}
