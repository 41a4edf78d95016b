//! Best-effort templated email notifications.
//!
//! [`NotificationDispatcher::notify`] never returns an error. Every failure
//! (missing template, missing recipient, transport error) is logged and
//! reported through the returned [`NotificationOutcome`].

use std::sync::Arc;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{models::EmailTemplate, store::TemplateStore};

pub mod template;
pub mod transport;

pub use template::{render_template, TemplateVars};
pub use transport::{
    EmailConfig, EmailTransport, HttpEmailTransport, OutboundEmail, TransportError,
    DEFAULT_EMAIL_API_URL,
};

pub const DEFAULT_FROM_EMAIL: &str = "noreply@example.com";
pub const DEFAULT_FROM_NAME: &str = "Vision Builder";
pub const DEFAULT_SITE_URL: &str = "http://localhost:8787";

/// Sender defaults and notification routing.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub from_email: String,
    pub from_name: String,
    pub reply_to: Option<String>,
    /// Internal address that receives completion notices.
    pub admin_email: Option<String>,
    /// Base URL used to build results links.
    pub site_url: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            from_email: DEFAULT_FROM_EMAIL.to_string(),
            from_name: DEFAULT_FROM_NAME.to_string(),
            reply_to: None,
            admin_email: None,
            site_url: DEFAULT_SITE_URL.to_string(),
        }
    }
}

impl NotificationConfig {
    /// Link to the public results page for a submission.
    pub fn results_url(&self, submission_id: &str) -> String {
        format!(
            "{}/vision/results/{}",
            self.site_url.trim_end_matches('/'),
            submission_id
        )
    }
}

/// Result of one send attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationOutcome {
    pub template_key: String,
    pub recipient: String,
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NotificationOutcome {
    fn delivered(template_key: &str, recipient: &str) -> Self {
        Self {
            template_key: template_key.to_string(),
            recipient: recipient.to_string(),
            delivered: true,
            error: None,
        }
    }

    pub(crate) fn failed(template_key: &str, recipient: &str, error: impl Into<String>) -> Self {
        let error = error.into();
        warn!("Notification '{template_key}' to '{recipient}' failed: {error}");
        Self {
            template_key: template_key.to_string(),
            recipient: recipient.to_string(),
            delivered: false,
            error: Some(error),
        }
    }

    /// Human-readable warning for an undelivered notification.
    pub fn warning(&self) -> Option<String> {
        if self.delivered {
            return None;
        }
        Some(format!(
            "Notification '{}' to {} was not sent: {}",
            self.template_key,
            self.recipient,
            self.error.as_deref().unwrap_or("unknown error")
        ))
    }
}

/// Looks up templates, renders them and hands them to a transport.
#[derive(Clone)]
pub struct NotificationDispatcher {
    templates: Arc<dyn TemplateStore>,
    transport: Arc<dyn EmailTransport>,
    config: NotificationConfig,
}

impl NotificationDispatcher {
    pub fn new(
        templates: Arc<dyn TemplateStore>,
        transport: Arc<dyn EmailTransport>,
        config: NotificationConfig,
    ) -> Self {
        Self {
            templates,
            transport,
            config,
        }
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.config
    }

    /// Renders the template named `template_key` and sends it to `recipient`.
    pub async fn notify(
        &self,
        template_key: &str,
        recipient: &str,
        vars: &TemplateVars,
    ) -> NotificationOutcome {
        let template = match self.templates.get_template(template_key).await {
            Ok(Some(template)) => template,
            Ok(None) => {
                return NotificationOutcome::failed(
                    template_key,
                    recipient,
                    format!("template '{template_key}' not found"),
                );
            }
            Err(e) => {
                return NotificationOutcome::failed(
                    template_key,
                    recipient,
                    format!("template lookup failed: {e}"),
                );
            }
        };

        let email = self.render(&template, recipient, vars);
        match self.transport.send(&email).await {
            Ok(()) => {
                info!("Sent '{template_key}' to {recipient}");
                NotificationOutcome::delivered(template_key, recipient)
            }
            Err(e) => NotificationOutcome::failed(template_key, recipient, e.to_string()),
        }
    }

    fn render(&self, template: &EmailTemplate, recipient: &str, vars: &TemplateVars) -> OutboundEmail {
        let from_name = template
            .from_name
            .as_deref()
            .unwrap_or(&self.config.from_name);
        let from_email = template
            .from_email
            .as_deref()
            .unwrap_or(&self.config.from_email);
        let from = if from_name.trim().is_empty() {
            from_email.to_string()
        } else {
            format!("{from_name} <{from_email}>")
        };

        OutboundEmail {
            from,
            reply_to: template
                .reply_to_email
                .clone()
                .or_else(|| self.config.reply_to.clone()),
            to: recipient.to_string(),
            subject: render_template(&template.subject, vars),
            html: render_template(&template.content, vars),
        }
    }
}
