//! Error handling utilities for the MCP server

use std::fmt::Display;

use rmcp::ErrorData;
use vision_core::WorkflowError;

/// Wrap a store failure as an internal MCP error.
pub fn to_mcp_error(message: &str, error: impl Display) -> ErrorData {
    ErrorData::internal_error(format!("{message}: {error}"), None)
}

/// Caller mistakes become `invalid_params`; everything else is internal.
pub fn workflow_to_mcp_error(error: WorkflowError) -> ErrorData {
    match error.status_code() {
        400 | 404 => ErrorData::invalid_params(error.to_string(), None),
        _ => to_mcp_error("Vision generation failed", error),
    }
}
