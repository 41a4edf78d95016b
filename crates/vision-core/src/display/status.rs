//! One-line status messages for command feedback.

use std::fmt;

/// Severity of an [`OperationStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Warning,
    Failure,
}

/// A short message prefixed with its severity.
pub struct OperationStatus {
    pub message: String,
    pub kind: StatusKind,
}

impl OperationStatus {
    pub fn success(message: String) -> Self {
        Self {
            message,
            kind: StatusKind::Success,
        }
    }

    pub fn warning(message: String) -> Self {
        Self {
            message,
            kind: StatusKind::Warning,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            message,
            kind: StatusKind::Failure,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            StatusKind::Success => "Success:",
            StatusKind::Warning => "Warning:",
            StatusKind::Failure => "Error:",
        };
        writeln!(f, "{prefix} {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_status_prefixes() {
        let success = OperationStatus::success("Template saved".to_string());
        assert_eq!(success.to_string(), "Success: Template saved\n");

        let warning = OperationStatus::warning("Email not sent".to_string());
        assert!(warning.to_string().starts_with("Warning:"));

        let failure = OperationStatus::failure("Generation failed".to_string());
        assert!(failure.to_string().starts_with("Error:"));
    }
}
