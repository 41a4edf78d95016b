//! Vision submission model.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{AreaOfLife, SubmissionStatus};

/// One user's vision-creation request and its generated results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisionSubmission {
    /// Opaque identifier generated by the store
    pub id: String,

    /// Name of the submitter
    pub name: String,

    /// Email address the results are delivered to
    pub email: String,

    /// Category the vision is scoped to
    pub area_of_life: AreaOfLife,

    /// Where the submitter stands today
    pub current_reality: Option<String>,

    /// Why this vision matters to the submitter
    pub why_important: Option<String>,

    /// Who the submitter wants to be
    #[serde(default)]
    pub being_words: Vec<String>,

    /// What the submitter wants to be doing
    #[serde(default)]
    pub doing_actions: Vec<String>,

    /// What the submitter wants to have
    #[serde(default)]
    pub having_outcomes: Vec<String>,

    /// Lifecycle status
    #[serde(default)]
    pub status: SubmissionStatus,

    /// Builder step the submitter last reached
    pub current_step: u32,

    /// Generated vision narrative (set on completion)
    pub vision_narrative: Option<String>,

    /// Generated 12-month action plan (set on completion)
    pub action_plan: Option<String>,

    /// Optimistic concurrency counter, bumped by every write
    pub version: u64,

    /// Timestamp when the submission was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the submission was last modified (UTC)
    pub updated_at: Timestamp,

    /// Timestamp when generation results were saved (UTC)
    pub completed_at: Option<Timestamp>,
}

impl VisionSubmission {
    /// First word of the submitter's name, for greetings.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}
