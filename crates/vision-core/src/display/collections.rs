//! Collection wrapper types for displaying groups of domain objects.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{EmailTemplate, VisionSubmission};

/// Compact listing of submissions, one section per submission.
///
/// # Examples
///
/// ```rust
/// use vision_core::display::Submissions;
///
/// let output = format!("{}", Submissions(vec![]));
/// assert_eq!(output, "No submissions found.\n");
/// ```
pub struct Submissions(pub Vec<VisionSubmission>);

impl Submissions {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Submissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No submissions found.");
        }

        for submission in &self.0 {
            writeln!(f, "## {} (ID: {})", submission.name, submission.id)?;
            writeln!(f)?;
            writeln!(f, "- **Status**: {}", submission.status)?;
            writeln!(f, "- **Area of life**: {}", submission.area_of_life)?;
            writeln!(f, "- **Email**: {}", submission.email)?;
            writeln!(
                f,
                "- **Created**: {}",
                LocalDateTime(&submission.created_at)
            )?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Listing of email templates.
pub struct Templates(pub Vec<EmailTemplate>);

impl fmt::Display for Templates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No templates found.");
        }
        for template in &self.0 {
            write!(f, "{template}")?;
        }
        Ok(())
    }
}
