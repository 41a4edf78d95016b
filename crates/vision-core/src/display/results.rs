//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::{
    models::{EmailTemplate, VisionSubmission},
    workflow::WorkflowOutcome,
};

/// Wrapper type for displaying the result of create operations.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    /// Create a new CreateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<VisionSubmission> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created submission with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<EmailTemplate> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Saved template '{}'", self.resource.template_key)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Markdown report of a finished generation run.
pub struct GenerationReport<'a>(pub &'a WorkflowOutcome);

impl fmt::Display for GenerationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = self.0;
        writeln!(
            f,
            "Generated vision for submission {}",
            outcome.submission_id
        )?;
        writeln!(f)?;
        writeln!(f, "## Vision Narrative")?;
        writeln!(f)?;
        writeln!(f, "{}", outcome.vision_narrative)?;
        writeln!(f)?;
        writeln!(f, "## Action Plan")?;
        writeln!(f)?;
        writeln!(f, "{}", outcome.action_plan)?;

        if !outcome.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Warnings")?;
            writeln!(f)?;
            for warning in &outcome.warnings {
                writeln!(f, "- {warning}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseSource;

    #[test]
    fn test_generation_report_lists_warnings() {
        let outcome = WorkflowOutcome {
            submission_id: "abc".to_string(),
            vision_narrative: "N".to_string(),
            action_plan: "P".to_string(),
            parse_source: ParseSource::Sentinel,
            notifications: vec![],
            warnings: vec!["Notification 'x' to y was not sent: boom".to_string()],
        };

        let output = GenerationReport(&outcome).to_string();
        assert!(output.starts_with("Generated vision for submission abc\n"));
        assert!(output.contains("## Vision Narrative\n\nN\n"));
        assert!(output.contains("## Action Plan\n\nP\n"));
        assert!(output.contains("## Warnings\n\n- Notification 'x'"));
    }

    #[test]
    fn test_generation_report_without_warnings() {
        let outcome = WorkflowOutcome {
            submission_id: "abc".to_string(),
            vision_narrative: "N".to_string(),
            action_plan: "P".to_string(),
            parse_source: ParseSource::Loose,
            notifications: vec![],
            warnings: vec![],
        };

        assert!(!GenerationReport(&outcome).to_string().contains("Warnings"));
    }
}
