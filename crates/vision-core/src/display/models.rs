//! Display implementations for domain models.
//!
//! Output is markdown so the CLI can hand it straight to the terminal
//! renderer, and MCP tools can return it verbatim.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{AreaOfLife, EmailTemplate, SubmissionStatus, VisionSubmission};

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_db_string())
    }
}

impl fmt::Display for AreaOfLife {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for VisionSubmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} ({})", self.name, self.id)?;
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.status)?;
        writeln!(f, "- Email: {}", self.email)?;
        writeln!(f, "- Area of life: {}", self.area_of_life)?;
        writeln!(f, "- Step: {}", self.current_step)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;
        if let Some(completed_at) = &self.completed_at {
            writeln!(f, "- Completed: {}", LocalDateTime(completed_at))?;
        }

        if !self.being_words.is_empty() {
            writeln!(f, "\n## Being")?;
            writeln!(f)?;
            writeln!(f, "{}", self.being_words.join(", "))?;
        }
        fmt_list(f, "Doing", &self.doing_actions)?;
        fmt_list(f, "Having", &self.having_outcomes)?;

        if let Some(reality) = &self.current_reality {
            writeln!(f, "\n## Current Reality")?;
            writeln!(f)?;
            writeln!(f, "{reality}")?;
        }
        if let Some(why) = &self.why_important {
            writeln!(f, "\n## Why It Matters")?;
            writeln!(f)?;
            writeln!(f, "{why}")?;
        }

        match (&self.vision_narrative, &self.action_plan) {
            (Some(narrative), Some(plan)) if self.status.is_completed() => {
                writeln!(f, "\n## Vision Narrative")?;
                writeln!(f)?;
                writeln!(f, "{narrative}")?;
                writeln!(f, "\n## Action Plan")?;
                writeln!(f)?;
                writeln!(f, "{plan}")?;
            }
            _ => writeln!(f, "\nNot generated yet.")?,
        }

        Ok(())
    }
}

fn fmt_list(f: &mut fmt::Formatter<'_>, title: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f, "\n## {title}")?;
    writeln!(f)?;
    for item in items {
        writeln!(f, "- {item}")?;
    }
    Ok(())
}

impl fmt::Display for EmailTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.template_key)?;
        writeln!(f)?;
        writeln!(f, "- **Subject**: {}", self.subject)?;
        if let Some(name) = &self.from_name {
            writeln!(f, "- **From name**: {name}")?;
        }
        if let Some(email) = &self.from_email {
            writeln!(f, "- **From email**: {email}")?;
        }
        if let Some(reply_to) = &self.reply_to_email {
            writeln!(f, "- **Reply to**: {reply_to}")?;
        }
        writeln!(f, "- **Updated**: {}", LocalDateTime(&self.updated_at))?;
        writeln!(f)?;
        Ok(())
    }
}
