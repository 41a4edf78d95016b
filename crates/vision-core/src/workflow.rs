//! Orchestration of a single vision generation run.
//!
//! ```text
//! Start ──▶ Loaded ──▶ Generated ──▶ Parsed ──▶ Persisted ──▶ Notified
//!   │          │           │            │            │
//!   │      NotFound    Generation   Generation   Persistence
//! Validation          Configuration (empty doc)
//! ```
//!
//! Everything up to `Parsed` is read-only. `Persisted` is the single write,
//! conditional on the version read at `Loaded`. Notifications are
//! best-effort: their failures become warnings on a successful outcome.

use std::{fmt, sync::Arc};

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    error::VisionError,
    generation::{GenerationError, GenerationRequest, TextGenerator},
    models::{VisionSubmission, ADMIN_TEMPLATE_KEY, RESULTS_TEMPLATE_KEY},
    notify::{NotificationDispatcher, NotificationOutcome, TemplateVars},
    params::CompleteSubmission,
    parser::{self, ParseSource},
    prompt::{build_prompt_now, SYSTEM_PROMPT},
    store::SubmissionStore,
};

/// Workflow progress markers, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
    Start,
    Loaded,
    Generated,
    Parsed,
    Persisted,
    Notified,
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Loaded => "loaded",
            Self::Generated => "generated",
            Self::Parsed => "parsed",
            Self::Persisted => "persisted",
            Self::Notified => "notified",
        };
        f.write_str(name)
    }
}

/// Terminal failures of a workflow run.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Submission {id} not found")]
    NotFound { id: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to load submission: {0}")]
    Storage(#[source] VisionError),

    #[error("Failed to generate vision: {0}")]
    Generation(#[source] GenerationError),

    /// Generation succeeded but the results could not be saved. The generated
    /// documents are kept here so they are not lost.
    #[error("Failed to save generated vision: {source}")]
    Persistence {
        #[source]
        source: VisionError,
        narrative: String,
        action_plan: String,
    },
}

impl WorkflowError {
    /// HTTP status this failure maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Configuration(_)
            | Self::Storage(_)
            | Self::Generation(_)
            | Self::Persistence { .. } => 500,
        }
    }
}

impl From<GenerationError> for WorkflowError {
    fn from(error: GenerationError) -> Self {
        match error {
            GenerationError::MissingApiKey => Self::Configuration(error.to_string()),
            other => Self::Generation(other),
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowOutcome {
    pub submission_id: String,
    pub vision_narrative: String,
    pub action_plan: String,
    pub parse_source: ParseSource,
    pub notifications: Vec<NotificationOutcome>,
    pub warnings: Vec<String>,
}

/// Generates, stores and announces a vision for one submission.
#[derive(Clone)]
pub struct VisionWorkflow {
    store: Arc<dyn SubmissionStore>,
    generator: Arc<dyn TextGenerator>,
    notifier: NotificationDispatcher,
}

impl VisionWorkflow {
    pub fn new(
        store: Arc<dyn SubmissionStore>,
        generator: Arc<dyn TextGenerator>,
        notifier: NotificationDispatcher,
    ) -> Self {
        Self {
            store,
            generator,
            notifier,
        }
    }

    /// Runs the workflow for `submission_id`.
    ///
    /// Only the id is taken from the caller; all other inputs are read from
    /// the store.
    pub async fn run(&self, submission_id: &str) -> Result<WorkflowOutcome, WorkflowError> {
        let id = submission_id.trim();
        if id.is_empty() {
            return Err(WorkflowError::Validation(
                "Submission ID is required".to_string(),
            ));
        }
        stage(id, WorkflowStage::Start);

        let submission = self
            .store
            .get_submission(id)
            .await
            .map_err(WorkflowError::Storage)?
            .ok_or_else(|| WorkflowError::NotFound { id: id.to_string() })?;
        if submission.status.is_completed() {
            warn!("Submission {id} is already completed, regenerating");
        }
        stage(id, WorkflowStage::Loaded);

        let request = GenerationRequest {
            system: SYSTEM_PROMPT.to_string(),
            prompt: build_prompt_now(&submission),
        };
        let raw = self.generator.generate(&request).await.map_err(|e| {
            error!("Generation failed for submission {id}: {e}");
            WorkflowError::from(e)
        })?;
        stage(id, WorkflowStage::Generated);

        let parsed = parser::parse(&raw);
        info!("Submission {id}: parsed response using {} strategy", parsed.source);
        if parsed.is_incomplete() {
            error!("Submission {id}: generated response produced an empty document");
            return Err(WorkflowError::Generation(GenerationError::Malformed(
                "response did not contain both a narrative and an action plan".to_string(),
            )));
        }
        stage(id, WorkflowStage::Parsed);

        let completion = CompleteSubmission {
            id: id.to_string(),
            expected_version: submission.version,
            vision_narrative: parsed.narrative,
            action_plan: parsed.action_plan,
        };
        let completed = match self.store.complete_submission(&completion).await {
            Ok(completed) => completed,
            Err(source) => {
                error!(
                    "Failed to save generated vision for submission {id}: {source}\n\
                     --- narrative ---\n{}\n--- action plan ---\n{}",
                    completion.vision_narrative, completion.action_plan
                );
                return Err(WorkflowError::Persistence {
                    source,
                    narrative: completion.vision_narrative,
                    action_plan: completion.action_plan,
                });
            }
        };
        stage(id, WorkflowStage::Persisted);

        let notifications = self.send_notifications(&completed).await;
        let warnings: Vec<String> = notifications
            .iter()
            .filter_map(NotificationOutcome::warning)
            .collect();
        stage(id, WorkflowStage::Notified);

        Ok(WorkflowOutcome {
            submission_id: completed.id,
            vision_narrative: completion.vision_narrative,
            action_plan: completion.action_plan,
            parse_source: parsed.source,
            notifications,
            warnings,
        })
    }

    async fn send_notifications(&self, submission: &VisionSubmission) -> Vec<NotificationOutcome> {
        let config = self.notifier.config();
        let vars = TemplateVars::new()
            .with("name", submission.name.as_str())
            .with("first_name", submission.first_name())
            .with("email", submission.email.as_str())
            .with("area_of_life", submission.area_of_life.label())
            .with("results_url", config.results_url(&submission.id))
            .with("submission_id", submission.id.as_str());

        let results = self
            .notifier
            .notify(RESULTS_TEMPLATE_KEY, &submission.email, &vars)
            .await;

        let admin = match config.admin_email.as_deref().map(str::trim) {
            Some(admin_email) if !admin_email.is_empty() => {
                let completed_at = submission
                    .completed_at
                    .map(|ts| ts.to_string())
                    .unwrap_or_default();
                let admin_vars = vars.with("completed_at", completed_at);
                self.notifier
                    .notify(ADMIN_TEMPLATE_KEY, admin_email, &admin_vars)
                    .await
            }
            _ => NotificationOutcome::failed(
                ADMIN_TEMPLATE_KEY,
                "(admin)",
                "admin email address is not configured",
            ),
        };

        vec![results, admin]
    }
}

fn stage(id: &str, stage: WorkflowStage) {
    info!("Submission {id}: stage {stage}");
}
