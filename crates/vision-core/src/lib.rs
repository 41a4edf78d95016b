//! Core library for the vision builder.
//!
//! A submitter fills in a multi-step form describing who they want to be,
//! what they want to be doing and what they want to have in one area of life.
//! This crate turns that stored submission into two documents, a first-person
//! vision narrative and a 12-month action plan, using a hosted language
//! model, saves them, and emails the results.
//!
//! # Components
//!
//! - [`store`]: async SQLite persistence for submissions and email templates
//! - [`prompt`]: builds the generation prompt from a submission
//! - [`generation`]: the [`generation::TextGenerator`] seam and its HTTP client
//! - [`parser`]: splits generated text into the two documents
//! - [`notify`]: best-effort templated email
//! - [`workflow`]: orchestrates one run end to end
//! - [`progress`]: time-based progress display for interactive callers
//! - [`display`]: markdown formatting for terminal and MCP output
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use vision_core::{
//!     generation::{AnthropicClient, GenerationConfig},
//!     notify::{EmailConfig, HttpEmailTransport, NotificationConfig, NotificationDispatcher},
//!     store::StoreBuilder,
//!     workflow::VisionWorkflow,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(
//!     StoreBuilder::new()
//!         .with_database_path(Some("vision.db"))
//!         .build()
//!         .await?,
//! );
//!
//! let generator = AnthropicClient::new(GenerationConfig {
//!     api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
//!     ..GenerationConfig::default()
//! })?;
//! let transport = HttpEmailTransport::new(EmailConfig::default())?;
//! let notifier = NotificationDispatcher::new(
//!     store.clone(),
//!     Arc::new(transport),
//!     NotificationConfig::default(),
//! );
//!
//! let workflow = VisionWorkflow::new(store, Arc::new(generator), notifier);
//! let outcome = workflow.run("4f9c2a0b1d2e3f405162738495a6b7c8").await?;
//! println!("{}", outcome.vision_narrative);
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod generation;
pub mod models;
pub mod notify;
pub mod params;
pub mod parser;
pub mod progress;
pub mod prompt;
pub mod store;
pub mod workflow;

pub use error::{Result, VisionError};
pub use store::{SqliteStore, StoreBuilder, SubmissionStore, TemplateStore};
pub use workflow::{VisionWorkflow, WorkflowError, WorkflowOutcome};
