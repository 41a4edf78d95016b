//! Wiring of the production collaborators from command-line settings.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, warn};
use vision_core::{
    generation::{AnthropicClient, GenerationConfig},
    notify::{EmailConfig, HttpEmailTransport, NotificationConfig, NotificationDispatcher},
    SqliteStore, VisionWorkflow,
};

use crate::args::ServiceArgs;

impl From<&ServiceArgs> for GenerationConfig {
    fn from(args: &ServiceArgs) -> Self {
        GenerationConfig {
            api_key: non_empty(args.api_key.as_deref()),
            model: args.model.clone(),
            max_tokens: args.max_tokens,
            temperature: args.temperature,
            ..GenerationConfig::default()
        }
    }
}

impl From<&ServiceArgs> for EmailConfig {
    fn from(args: &ServiceArgs) -> Self {
        EmailConfig {
            api_url: args.email_api_url.clone(),
            api_key: non_empty(args.email_api_key.as_deref()),
            ..EmailConfig::default()
        }
    }
}

impl From<&ServiceArgs> for NotificationConfig {
    fn from(args: &ServiceArgs) -> Self {
        NotificationConfig {
            from_email: args.email_from.clone(),
            from_name: args.email_from_name.clone(),
            reply_to: non_empty(args.email_reply_to.as_deref()),
            admin_email: non_empty(args.admin_email.as_deref()),
            site_url: args.site_url.clone(),
        }
    }
}

/// Builds the workflow around the given store.
///
/// A missing API key is not an error here: the workflow reports it as a
/// configuration failure when a generation is attempted.
pub fn build_workflow(store: Arc<SqliteStore>, service: &ServiceArgs) -> Result<VisionWorkflow> {
    let generation = GenerationConfig::from(service);
    if generation.api_key.is_none() {
        warn!("ANTHROPIC_API_KEY is not set; generation requests will fail");
    }
    debug!("Using model {} at {}", generation.model, generation.endpoint);

    let generator =
        AnthropicClient::new(generation).context("Failed to create generation client")?;
    let transport = HttpEmailTransport::new(EmailConfig::from(service))
        .context("Failed to create email transport")?;
    let notifier = NotificationDispatcher::new(
        store.clone(),
        Arc::new(transport),
        NotificationConfig::from(service),
    );

    Ok(VisionWorkflow::new(store, Arc::new(generator), notifier))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
