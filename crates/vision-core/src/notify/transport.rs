//! Outbound email delivery.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com/emails";

/// A fully rendered message, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Delivery failures.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("email API key is not configured")]
    MissingApiKey,
    #[error("email service rejected the message (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("email transport error: {0}")]
    Transport(String),
}

/// Sends rendered emails.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError>;
}

/// Settings for [`HttpEmailTransport`].
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_EMAIL_API_URL.to_string(),
            api_key: None,
            timeout: None,
        }
    }
}

/// JSON email API client using bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpEmailTransport {
    client: reqwest::Client,
    config: EmailConfig,
}

impl HttpEmailTransport {
    pub fn new(config: EmailConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl EmailTransport for HttpEmailTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(TransportError::MissingApiKey)?;
        let auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| TransportError::Transport(e.to_string()))?;

        debug!("Sending email '{}' to {}", email.subject, email.to);

        let response = self
            .client
            .post(&self.config.api_url)
            .header(AUTHORIZATION, auth)
            .json(email)
            .send()
            .await
            .map_err(|e| TransportError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(TransportError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
