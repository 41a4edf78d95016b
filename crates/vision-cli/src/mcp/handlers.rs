//! MCP tool handlers implementation

use std::sync::Arc;

use log::debug;
use rmcp::{
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;
use vision_core::{
    display::GenerationReport, params as core, SubmissionStore, VisionWorkflow,
};

use super::errors::{to_mcp_error, workflow_to_mcp_error};

/// Transparent wrapper giving core parameter types the serde and schema
/// derives the protocol layer needs.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type Id = McpParams<core::Id>;

pub type McpResult = Result<CallToolResult, ErrorData>;

pub struct McpHandlers {
    workflow: VisionWorkflow,
    store: Arc<dyn SubmissionStore>,
}

impl McpHandlers {
    pub fn new(workflow: VisionWorkflow, store: Arc<dyn SubmissionStore>) -> Self {
        Self { workflow, store }
    }

    pub async fn generate_vision(&self, params: &Id) -> McpResult {
        debug!("generate_vision: {params:?}");

        let outcome = self
            .workflow
            .run(&params.as_ref().id)
            .await
            .map_err(workflow_to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(
            GenerationReport(&outcome).to_string(),
        )]))
    }

    pub async fn show_submission(&self, params: &Id) -> McpResult {
        debug!("show_submission: {params:?}");

        let id = &params.as_ref().id;
        let submission = self
            .store
            .get_submission(id)
            .await
            .map_err(|e| to_mcp_error("Failed to load submission", e))?
            .ok_or_else(|| {
                ErrorData::invalid_params(format!("Submission {id} not found"), None)
            })?;

        Ok(CallToolResult::success(vec![Content::text(
            submission.to_string(),
        )]))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use vision_core::{
        generation::{AnthropicClient, GenerationConfig},
        notify::{EmailConfig, HttpEmailTransport, NotificationConfig, NotificationDispatcher},
        params::CreateSubmission,
        StoreBuilder,
    };

    use super::*;

    async fn handlers(dir: &TempDir) -> (McpHandlers, Arc<vision_core::SqliteStore>) {
        let store = Arc::new(
            StoreBuilder::new()
                .with_database_path(Some(dir.path().join("mcp.db")))
                .build()
                .await
                .expect("store"),
        );
        let generator = AnthropicClient::new(GenerationConfig::default()).expect("client");
        let transport = HttpEmailTransport::new(EmailConfig::default()).expect("transport");
        let notifier = NotificationDispatcher::new(
            store.clone(),
            Arc::new(transport),
            NotificationConfig::default(),
        );
        let workflow = VisionWorkflow::new(store.clone(), Arc::new(generator), notifier);
        (McpHandlers::new(workflow, store.clone()), store)
    }

    fn id(value: &str) -> Id {
        McpParams(core::Id {
            id: value.to_string(),
        })
    }

    #[tokio::test]
    async fn test_show_submission_renders_markdown() {
        let dir = TempDir::new().expect("temp dir");
        let (handlers, store) = handlers(&dir).await;
        let submission = store
            .create_submission(&CreateSubmission {
                name: "Alex".to_string(),
                email: "alex@example.com".to_string(),
                area_of_life: "personal-growth".to_string(),
                current_reality: None,
                why_important: None,
                being_words: vec!["curious".to_string()],
                doing_actions: Vec::new(),
                having_outcomes: Vec::new(),
            })
            .await
            .expect("create");

        let result = handlers
            .show_submission(&id(&submission.id))
            .await
            .expect("tool result");
        let json = serde_json::to_string(&result).expect("serialize");
        assert!(json.contains("# Alex"));
        assert!(json.contains("Not generated yet."));
    }

    #[tokio::test]
    async fn test_unknown_submission_is_invalid_params() {
        let dir = TempDir::new().expect("temp dir");
        let (handlers, _store) = handlers(&dir).await;

        let show = handlers.show_submission(&id("missing")).await;
        assert!(show.is_err());

        let generate = handlers
            .generate_vision(&id("missing"))
            .await
            .expect_err("unknown id must fail");
        assert!(generate.message.contains("not found"));
    }
}
