//! Parameter structures shared by the CLI, HTTP and MCP interfaces.
//!
//! Core parameter types stay free of interface framework derives. Interface
//! layers wrap them:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │ HTTP / MCP body │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! JSON schema generation is available behind the `schema` feature for the
//! MCP server.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, VisionError},
    models::AreaOfLife,
};

/// Parameters for operations requiring just a submission ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the submission to operate on
    pub id: String,
}

/// Parameters for creating a new vision submission.
///
/// This is what the sign-up form collects. List fields keep the order the
/// user entered them in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateSubmission {
    /// Submitter's name
    pub name: String,
    /// Submitter's email address
    pub email: String,
    /// Area of life key, e.g. `health-fitness`
    pub area_of_life: String,
    /// Where the submitter stands today
    pub current_reality: Option<String>,
    /// Why the vision matters
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
}

/// A validated [`CreateSubmission`], ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    pub area_of_life: AreaOfLife,
    pub current_reality: Option<String>,
    pub why_important: Option<String>,
    pub being_words: Vec<String>,
    pub doing_actions: Vec<String>,
    pub having_outcomes: Vec<String>,
}

impl CreateSubmission {
    /// Validate and normalize the form input.
    ///
    /// Blank optional text becomes `None`, list entries are trimmed and
    /// empty entries dropped.
    pub fn validate(&self) -> Result<NewSubmission> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(VisionError::invalid_input("name").with_reason("Name cannot be empty"));
        }

        let email = self.email.trim();
        if !is_plausible_email(email) {
            return Err(VisionError::invalid_input("email")
                .with_reason(format!("'{email}' is not a valid email address")));
        }

        let area_of_life = self
            .area_of_life
            .parse::<AreaOfLife>()
            .map_err(|reason| VisionError::invalid_input("area_of_life").with_reason(reason))?;

        Ok(NewSubmission {
            name: name.to_string(),
            email: email.to_string(),
            area_of_life,
            current_reality: non_blank(self.current_reality.as_deref()),
            why_important: non_blank(self.why_important.as_deref()),
            being_words: clean_list(&self.being_words),
            doing_actions: clean_list(&self.doing_actions),
            having_outcomes: clean_list(&self.having_outcomes),
        })
    }
}

/// Parameters for recording the builder step a submitter reached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AdvanceStep {
    /// The ID of the submission
    pub id: String,
    /// Builder step reached (must be greater than the current one)
    pub step: u32,
}

/// The single write the vision workflow performs on a submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompleteSubmission {
    /// The ID of the submission
    pub id: String,
    /// Version read before generation started
    pub expected_version: u64,
    /// Generated vision narrative
    pub vision_narrative: String,
    /// Generated action plan
    pub action_plan: String,
}

/// Parameters for creating or replacing an email template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpsertTemplate {
    /// Lookup key, e.g. `vision-results`
    pub template_key: String,
    /// Subject line with `{{variable}}` placeholders
    pub subject: String,
    /// HTML body with `{{variable}}` placeholders
    pub content: String,
    /// Sender address override
    pub from_email: Option<String>,
    /// Sender display name override
    pub from_name: Option<String>,
    /// Reply-to address override
    pub reply_to_email: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(String::from)
}

fn clean_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Syntactic sanity check: one `@`, non-empty local part, dotted domain.
fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CreateSubmission {
        CreateSubmission {
            name: "  Alex ".to_string(),
            email: "alex@example.com".to_string(),
            area_of_life: "health-fitness".to_string(),
            current_reality: Some("   ".to_string()),
            why_important: Some("My kids".to_string()),
            being_words: vec!["disciplined".to_string(), " ".to_string(), " calm".to_string()],
            doing_actions: vec!["train daily".to_string()],
            having_outcomes: Vec::new(),
        }
    }

    #[test]
    fn test_validate_normalizes_input() {
        let new = form().validate().expect("form should validate");
        assert_eq!(new.name, "Alex");
        assert_eq!(new.area_of_life, AreaOfLife::HealthFitness);
        assert_eq!(new.current_reality, None);
        assert_eq!(new.why_important.as_deref(), Some("My kids"));
        assert_eq!(new.being_words, vec!["disciplined", "calm"]);
        assert!(new.having_outcomes.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        for email in ["", "alex", "alex@", "@example.com", "alex@example", "a b@example.com"] {
            let mut params = form();
            params.email = email.to_string();
            match params.validate() {
                Err(VisionError::InvalidInput { field, .. }) => assert_eq!(field, "email"),
                other => panic!("expected email validation error for {email:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_validate_rejects_unknown_area() {
        let mut params = form();
        params.area_of_life = "gardening".to_string();
        assert!(matches!(
            params.validate(),
            Err(VisionError::InvalidInput { field, .. }) if field == "area_of_life"
        ));
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let mut params = form();
        params.name = "   ".to_string();
        assert!(params.validate().is_err());
    }
}
