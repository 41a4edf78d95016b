//! Command definitions and their handlers.
//!
//! Argument structs carry the clap derives and convert into the core
//! parameter types, which stay free of CLI concerns:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Store / Workflow
//! ```

use std::{io::Write, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use log::{debug, error};
use tokio::sync::oneshot;
use vision_core::{
    display::{CreateResult, GenerationReport, OperationStatus, Submissions, Templates},
    params::{AdvanceStep, CreateSubmission, Id, UpsertTemplate},
    progress::{ProgressConfig, ProgressPresenter, ProgressSnapshot},
    SqliteStore, SubmissionStore, TemplateStore, VisionWorkflow, WorkflowError,
};

use crate::renderer::TerminalRenderer;

/// Builder step a submission reaches once the form has been filled in.
const FORM_COMPLETE_STEP: u32 = 2;

/// Record a new vision submission
#[derive(Args)]
pub struct CreateSubmissionArgs {
    /// Submitter's name
    #[arg(long)]
    pub name: String,
    /// Address the results are emailed to
    #[arg(long)]
    pub email: String,
    /// Area of life, e.g. health-fitness, career-business, personal-growth
    #[arg(long)]
    pub area: String,
    /// Where the submitter stands today
    #[arg(long)]
    pub current_reality: Option<String>,
    /// Why this vision matters
    #[arg(long)]
    pub why_important: Option<String>,
    /// Who the submitter wants to be, as a comma-separated list
    #[arg(long, value_delimiter = ',')]
    pub being: Vec<String>,
    /// What the submitter wants to be doing, as a comma-separated list
    #[arg(long, value_delimiter = ',')]
    pub doing: Vec<String>,
    /// What the submitter wants to have, as a comma-separated list
    #[arg(long, value_delimiter = ',')]
    pub having: Vec<String>,
}

impl From<CreateSubmissionArgs> for CreateSubmission {
    fn from(val: CreateSubmissionArgs) -> Self {
        CreateSubmission {
            name: val.name,
            email: val.email,
            area_of_life: val.area,
            current_reality: val.current_reality,
            why_important: val.why_important,
            being_words: val.being,
            doing_actions: val.doing,
            having_outcomes: val.having,
        }
    }
}

/// Show one submission
#[derive(Args)]
pub struct ShowSubmissionArgs {
    /// Identifier of the submission
    pub id: String,
}

impl From<ShowSubmissionArgs> for Id {
    fn from(val: ShowSubmissionArgs) -> Self {
        Id { id: val.id }
    }
}

/// List submissions, newest first
#[derive(Args)]
pub struct ListSubmissionsArgs {
    /// Maximum number of submissions to show
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Subcommand)]
pub enum SubmissionCommands {
    #[command(alias = "c")]
    Create(CreateSubmissionArgs),
    #[command(alias = "s")]
    Show(ShowSubmissionArgs),
    #[command(aliases = ["l", "ls"])]
    List(ListSubmissionsArgs),
}

/// Create or replace an email template
#[derive(Args)]
pub struct SetTemplateArgs {
    /// Template key, e.g. vision-results or vision-admin-notification
    pub key: String,
    /// Subject line; `{{variable}}` placeholders are filled in when sending
    #[arg(long)]
    pub subject: String,
    /// HTML body; `{{variable}}` placeholders are filled in when sending
    #[arg(long)]
    pub content: String,
    /// Sender address for this template
    #[arg(long)]
    pub from_email: Option<String>,
    /// Sender display name for this template
    #[arg(long)]
    pub from_name: Option<String>,
    /// Reply-to address for this template
    #[arg(long)]
    pub reply_to: Option<String>,
}

impl From<SetTemplateArgs> for UpsertTemplate {
    fn from(val: SetTemplateArgs) -> Self {
        UpsertTemplate {
            template_key: val.key,
            subject: val.subject,
            content: val.content,
            from_email: val.from_email,
            from_name: val.from_name,
            reply_to_email: val.reply_to,
        }
    }
}

#[derive(Subcommand)]
pub enum TemplateCommands {
    /// List email templates
    #[command(aliases = ["l", "ls"])]
    List,
    #[command(alias = "s")]
    Set(SetTemplateArgs),
}

/// Runs CLI commands against a store and renders the results.
pub struct Cli {
    store: Arc<SqliteStore>,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(store: Arc<SqliteStore>, renderer: TerminalRenderer) -> Self {
        Self { store, renderer }
    }

    pub async fn handle_submission_command(&self, command: SubmissionCommands) -> Result<()> {
        match command {
            SubmissionCommands::Create(args) => self.create_submission(&args.into()).await,
            SubmissionCommands::Show(args) => self.show_submission(&args.into()).await,
            SubmissionCommands::List(args) => self.list_submissions(args.limit).await,
        }
    }

    pub async fn handle_template_command(&self, command: TemplateCommands) -> Result<()> {
        match command {
            TemplateCommands::List => self.list_templates().await,
            TemplateCommands::Set(args) => self.set_template(&args.into()).await,
        }
    }

    async fn create_submission(&self, params: &CreateSubmission) -> Result<()> {
        let created = self
            .store
            .create_submission(params)
            .await
            .context("Failed to create submission")?;

        let submission = self
            .store
            .advance_step(&AdvanceStep {
                id: created.id.clone(),
                step: FORM_COMPLETE_STEP,
            })
            .await
            .context("Failed to record form progress")?
            .unwrap_or(created);

        self.renderer
            .render(&CreateResult::new(submission).to_string())
    }

    async fn show_submission(&self, params: &Id) -> Result<()> {
        match self
            .store
            .get_submission(&params.id)
            .await
            .context("Failed to load submission")?
        {
            Some(submission) => self.renderer.render(&submission.to_string()),
            None => self.renderer.render(
                &OperationStatus::failure(format!("Submission {} not found", params.id))
                    .to_string(),
            ),
        }
    }

    async fn list_submissions(&self, limit: Option<u32>) -> Result<()> {
        let submissions = self
            .store
            .list_submissions(limit)
            .await
            .context("Failed to list submissions")?;
        self.renderer.render(&Submissions(submissions).to_string())
    }

    async fn list_templates(&self) -> Result<()> {
        let templates = self
            .store
            .list_templates()
            .await
            .context("Failed to list templates")?;
        self.renderer.render(&Templates(templates).to_string())
    }

    async fn set_template(&self, params: &UpsertTemplate) -> Result<()> {
        let template = self
            .store
            .upsert_template(params)
            .await
            .context("Failed to save template")?;
        self.renderer
            .render(&CreateResult::new(template).to_string())
    }

    /// Runs one generation with a progress bar on stderr.
    pub async fn generate(&self, workflow: &VisionWorkflow, id: &str) -> Result<()> {
        let (navigated_tx, navigated_rx) = oneshot::channel();
        let presenter = ProgressPresenter::start(
            ProgressConfig::default(),
            draw_progress,
            move || {
                let _ = navigated_tx.send(());
            },
        );

        match workflow.run(id).await {
            Ok(outcome) => {
                presenter.complete();
                if navigated_rx.await.is_err() {
                    debug!("Progress display closed before navigation");
                }
                eprintln!();
                self.renderer
                    .render(&GenerationReport(&outcome).to_string())
            }
            Err(err) => {
                presenter.stop();
                eprintln!();
                if let WorkflowError::Persistence {
                    narrative,
                    action_plan,
                    ..
                } = &err
                {
                    error!("Generated vision for {id} could not be saved");
                    self.renderer.render(&format!(
                        "## Vision Narrative\n\n{narrative}\n\n## Action Plan\n\n{action_plan}\n"
                    ))?;
                }
                Err(anyhow::Error::new(err).context(format!("Vision generation failed for {id}")))
            }
        }
    }
}

fn draw_progress(snapshot: &ProgressSnapshot) {
    const WIDTH: usize = 30;
    let filled = usize::from(snapshot.percent) * WIDTH / 100;
    let mut stderr = std::io::stderr().lock();
    let _ = write!(
        stderr,
        "\r[{}{}] {:>3}% {:<45}",
        "#".repeat(filled),
        " ".repeat(WIDTH - filled),
        snapshot.percent,
        snapshot.label
    );
    let _ = stderr.flush();
}
