//! Email template model.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Template key for the results email sent to the submitter.
pub const RESULTS_TEMPLATE_KEY: &str = "vision-results";

/// Template key for the internal notification sent to operations.
pub const ADMIN_TEMPLATE_KEY: &str = "vision-admin-notification";

/// A stored email template with `{{variable}}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailTemplate {
    /// Lookup key
    pub template_key: String,

    /// Subject line, may contain placeholders
    pub subject: String,

    /// HTML body, may contain placeholders
    pub content: String,

    /// Sender address override
    pub from_email: Option<String>,

    /// Sender display name override
    pub from_name: Option<String>,

    /// Reply-to address override
    pub reply_to_email: Option<String>,

    /// Timestamp when the template was last modified (UTC)
    pub updated_at: Timestamp,
}
