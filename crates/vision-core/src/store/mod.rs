//! Async persistence API for submissions and email templates.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Workflow     │    │   SqliteStore   │    │    Database     │
//! │  CLI / HTTP /   │───▶│ (spawn_blocking │───▶│   (via db/)     │
//! │      MCP        │    │   per call)     │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! The workflow depends on the [`SubmissionStore`] and [`TemplateStore`]
//! traits rather than on SQLite directly, so tests can substitute doubles
//! that fail on purpose.
//!
//! # Usage
//!
//! ```rust
//! use vision_core::{params::CreateSubmission, store::{StoreBuilder, SubmissionStore}};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = StoreBuilder::new()
//!     .with_database_path(Some("vision.db"))
//!     .build()
//!     .await?;
//!
//! let submission = store
//!     .create_submission(&CreateSubmission {
//!         name: "Alex".to_string(),
//!         email: "alex@example.com".to_string(),
//!         area_of_life: "health-fitness".to_string(),
//!         current_reality: None,
//!         why_important: None,
//!         being_words: vec!["calm".to_string()],
//!         doing_actions: vec![],
//!         having_outcomes: vec![],
//!     })
//!     .await?;
//! println!("Created submission {}", submission.id);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{EmailTemplate, VisionSubmission},
    params::{AdvanceStep, CompleteSubmission, CreateSubmission, UpsertTemplate},
};

pub mod builder;
mod submission_ops;
mod template_ops;

pub use builder::StoreBuilder;

/// Persistence for a vision submission's lifecycle state.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Validates the form input and inserts a `started` submission.
    async fn create_submission(&self, params: &CreateSubmission) -> Result<VisionSubmission>;

    /// Fetches a submission, `None` if it does not exist.
    async fn get_submission(&self, id: &str) -> Result<Option<VisionSubmission>>;

    /// Lists submissions, newest first.
    async fn list_submissions(&self, limit: Option<u32>) -> Result<Vec<VisionSubmission>>;

    /// Records a builder step marker, `None` if the submission does not exist.
    async fn advance_step(&self, params: &AdvanceStep) -> Result<Option<VisionSubmission>>;

    /// Saves generated documents and marks the submission completed.
    ///
    /// Conditional on the submission's version; fails with `StaleVersion`
    /// when another writer got there first.
    async fn complete_submission(&self, params: &CompleteSubmission) -> Result<VisionSubmission>;
}

/// Read access to email templates, plus operator maintenance.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Looks up a template by key.
    async fn get_template(&self, key: &str) -> Result<Option<EmailTemplate>>;

    /// Lists all templates.
    async fn list_templates(&self) -> Result<Vec<EmailTemplate>>;

    /// Creates or replaces a template.
    async fn upsert_template(&self, params: &UpsertTemplate) -> Result<EmailTemplate>;
}

/// SQLite-backed implementation of both store traits.
///
/// Every call opens its own connection on the blocking thread pool, so the
/// store is cheap to clone and share between requests.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pub(crate) db_path: PathBuf,
}

impl SqliteStore {
    /// Creates a store for an already initialized database file.
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Path of the backing database file.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }
}
