//! MCP server exposing vision generation to AI assistants over stdio.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::signal::unix::{signal, SignalKind};
use vision_core::{SubmissionStore, VisionWorkflow};

pub mod errors;
pub mod handlers;

pub use handlers::{Id, McpResult};

#[derive(Clone)]
pub struct VisionMcpServer {
    handlers: Arc<handlers::McpHandlers>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl VisionMcpServer {
    pub fn new(workflow: VisionWorkflow, store: Arc<dyn SubmissionStore>) -> Self {
        Self {
            handlers: Arc::new(handlers::McpHandlers::new(workflow, store)),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "generate_vision",
        description = "Generate the vision narrative and 12-month action plan for a stored submission, save them, and email the results. Takes the submission ID. Takes up to a minute. Email failures are listed as warnings and do not fail the call."
    )]
    async fn generate_vision(&self, Parameters(params): Parameters<Id>) -> McpResult {
        self.handlers.generate_vision(&params).await
    }

    #[tool(
        name = "show_submission",
        description = "Show a stored vision submission: the submitter's answers, status, and the generated narrative and action plan once available."
    )]
    async fn show_submission(&self, Parameters(params): Parameters<Id>) -> McpResult {
        self.handlers.show_submission(&params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for VisionMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "vision".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(
                "Vision builder turns a coaching submission (who the person wants to be, \
                 what they want to be doing and having in one area of life) into a \
                 first-person vision narrative and a 12-month action plan.\n\n\
                 Use `show_submission` to inspect a submission and `generate_vision` to \
                 produce, save and email its results."
                    .to_string(),
            ),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: VisionMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting vision MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
