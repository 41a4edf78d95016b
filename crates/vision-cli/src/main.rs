//! Vision builder CLI
//!
//! Manages submissions and templates locally and hosts the generation
//! workflow over HTTP or MCP.

mod args;
mod cli;
mod config;
mod mcp;
mod renderer;
mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, VisionMcpServer};
use renderer::TerminalRenderer;
use server::AppState;
use vision_core::StoreBuilder;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let store = Arc::new(
        StoreBuilder::new()
            .with_database_path(database_file)
            .build()
            .await
            .context("Failed to open submission store")?,
    );
    info!("Using database {}", store.database_path().display());

    let renderer = TerminalRenderer::new(!no_color);

    match command {
        Submission { command } => {
            Cli::new(store, renderer)
                .handle_submission_command(command)
                .await
        }
        Template { command } => {
            Cli::new(store, renderer)
                .handle_template_command(command)
                .await
        }
        Generate { id, service } => {
            let workflow = config::build_workflow(store.clone(), &service)?;
            Cli::new(store, renderer).generate(&workflow, &id).await
        }
        Serve { listen, service } => {
            let workflow = config::build_workflow(store.clone(), &service)?;
            server::serve(listen, AppState::new(workflow, store)).await
        }
        Mcp { service } => {
            let workflow = config::build_workflow(store.clone(), &service)?;
            run_stdio_server(VisionMcpServer::new(workflow, store))
                .await
                .context("MCP server failed")
        }
    }
}
