use std::{net::SocketAddr, path::PathBuf};

use clap::{Args as ClapArgs, Parser, Subcommand};
use vision_core::{
    generation::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE},
    notify::{DEFAULT_EMAIL_API_URL, DEFAULT_FROM_EMAIL, DEFAULT_FROM_NAME, DEFAULT_SITE_URL},
};

use crate::cli::{SubmissionCommands, TemplateCommands};

/// Vision builder: turn a submitted vision form into a narrative and a
/// 12-month action plan.
///
/// Submissions and email templates live in a local SQLite database. The
/// `generate` command runs one generation in the terminal; `serve` exposes
/// the same workflow over HTTP for the website, and `mcp` over the Model
/// Context Protocol.
#[derive(Parser)]
#[command(version, about, name = "vision")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/vision/vision.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage vision submissions
    #[command(alias = "s")]
    Submission {
        #[command(subcommand)]
        command: SubmissionCommands,
    },
    /// Manage email templates
    #[command(alias = "t")]
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// Generate the vision for a submission
    #[command(alias = "g")]
    Generate {
        /// Identifier of the submission
        id: String,
        #[command(flatten)]
        service: ServiceArgs,
    },
    /// Serve the generation endpoint over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8787")]
        listen: SocketAddr,
        #[command(flatten)]
        service: ServiceArgs,
    },
    /// Start the MCP server on stdio
    Mcp {
        #[command(flatten)]
        service: ServiceArgs,
    },
}

/// Settings for the generation and email services.
///
/// Every flag falls back to an environment variable so deployments can keep
/// secrets out of the command line.
#[derive(ClapArgs, Clone, Debug)]
pub struct ServiceArgs {
    /// API key for the language model service
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model used for generation
    #[arg(long, env = "VISION_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Maximum tokens requested per generation
    #[arg(long, env = "VISION_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Sampling temperature
    #[arg(long, env = "VISION_TEMPERATURE", default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// API key for the email service
    #[arg(long, env = "EMAIL_API_KEY", hide_env_values = true)]
    pub email_api_key: Option<String>,

    /// Email service endpoint
    #[arg(long, env = "EMAIL_API_URL", default_value = DEFAULT_EMAIL_API_URL)]
    pub email_api_url: String,

    /// Default sender address
    #[arg(long, env = "EMAIL_FROM", default_value = DEFAULT_FROM_EMAIL)]
    pub email_from: String,

    /// Default sender display name
    #[arg(long, env = "EMAIL_FROM_NAME", default_value = DEFAULT_FROM_NAME)]
    pub email_from_name: String,

    /// Default reply-to address
    #[arg(long, env = "EMAIL_REPLY_TO")]
    pub email_reply_to: Option<String>,

    /// Address that receives completion notices
    #[arg(long, env = "ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    /// Public base URL used in results links
    #[arg(long, env = "SITE_URL", default_value = DEFAULT_SITE_URL)]
    pub site_url: String,
}
