mod common;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use common::{alex_submission, create_test_store};
use vision_core::{
    generation::{GenerationError, GenerationRequest, TextGenerator},
    models::{SubmissionStatus, VisionSubmission},
    notify::{
        EmailTransport, NotificationConfig, NotificationDispatcher, OutboundEmail, TransportError,
    },
    params::{AdvanceStep, CompleteSubmission, CreateSubmission},
    parser::{ParseSource, ACTION_PLAN_HEADER, NARRATIVE_HEADER},
    Result, SqliteStore, SubmissionStore, VisionError, VisionWorkflow, WorkflowError,
};

enum Reply {
    Text(String),
    Unavailable,
    MissingKey,
}

/// Generator double that returns a canned reply and records prompts
struct MockGenerator {
    reply: Reply,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn sentinel(narrative: &str, plan: &str) -> Arc<Self> {
        Self::new(Reply::Text(format!(
            "{NARRATIVE_HEADER}\n{narrative}\n{ACTION_PLAN_HEADER}\n{plan}\n"
        )))
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Unavailable => Err(GenerationError::Unavailable {
                status: Some(529),
                message: "Overloaded".to_string(),
            }),
            Reply::MissingKey => Err(GenerationError::MissingApiKey),
        }
    }
}

/// Transport double that records deliveries and fails for chosen recipients
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<OutboundEmail>>,
    fail_for: Vec<String>,
}

#[async_trait]
impl EmailTransport for RecordingTransport {
    async fn send(&self, email: &OutboundEmail) -> std::result::Result<(), TransportError> {
        if self.fail_for.contains(&email.to) {
            return Err(TransportError::Rejected {
                status: 500,
                message: "mailbox unavailable".to_string(),
            });
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Store wrapper that counts completion writes and can fail them
struct InstrumentedStore {
    inner: SqliteStore,
    completions: AtomicUsize,
    fail_completion: bool,
}

impl InstrumentedStore {
    fn new(inner: SqliteStore, fail_completion: bool) -> Arc<Self> {
        Arc::new(Self {
            inner,
            completions: AtomicUsize::new(0),
            fail_completion,
        })
    }
}

#[async_trait]
impl SubmissionStore for InstrumentedStore {
    async fn create_submission(&self, params: &CreateSubmission) -> Result<VisionSubmission> {
        self.inner.create_submission(params).await
    }

    async fn get_submission(&self, id: &str) -> Result<Option<VisionSubmission>> {
        self.inner.get_submission(id).await
    }

    async fn list_submissions(&self, limit: Option<u32>) -> Result<Vec<VisionSubmission>> {
        self.inner.list_submissions(limit).await
    }

    async fn advance_step(&self, params: &AdvanceStep) -> Result<Option<VisionSubmission>> {
        self.inner.advance_step(params).await
    }

    async fn complete_submission(&self, params: &CompleteSubmission) -> Result<VisionSubmission> {
        self.completions.fetch_add(1, Ordering::SeqCst);
        if self.fail_completion {
            return Err(VisionError::Configuration {
                message: "database is read-only".to_string(),
            });
        }
        self.inner.complete_submission(params).await
    }
}

struct Harness {
    _temp_dir: tempfile::TempDir,
    sqlite: SqliteStore,
    store: Arc<InstrumentedStore>,
    transport: Arc<RecordingTransport>,
}

impl Harness {
    async fn new(fail_completion: bool, fail_for: &[&str]) -> Self {
        let (temp_dir, sqlite) = create_test_store().await;
        Self {
            _temp_dir: temp_dir,
            store: InstrumentedStore::new(sqlite.clone(), fail_completion),
            sqlite,
            transport: Arc::new(RecordingTransport {
                sent: Mutex::new(Vec::new()),
                fail_for: fail_for.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }

    fn workflow(&self, generator: Arc<MockGenerator>, admin_email: Option<&str>) -> VisionWorkflow {
        let notifier = NotificationDispatcher::new(
            Arc::new(self.sqlite.clone()),
            self.transport.clone(),
            NotificationConfig {
                admin_email: admin_email.map(str::to_string),
                site_url: "https://coach.example".to_string(),
                ..NotificationConfig::default()
            },
        );
        VisionWorkflow::new(self.store.clone(), generator, notifier)
    }

    async fn alex(&self) -> VisionSubmission {
        let created = self
            .sqlite
            .create_submission(&alex_submission())
            .await
            .expect("Failed to create submission");
        self.sqlite
            .advance_step(&AdvanceStep {
                id: created.id,
                step: 2,
            })
            .await
            .expect("Failed to advance step")
            .expect("Submission should exist")
    }

    async fn reload(&self, id: &str) -> VisionSubmission {
        self.sqlite
            .get_submission(id)
            .await
            .expect("Query failed")
            .expect("Submission should exist")
    }
}

#[tokio::test]
async fn test_end_to_end_generation() {
    let harness = Harness::new(false, &[]).await;
    let submission = harness.alex().await;
    let generator = MockGenerator::sentinel("N", "P");
    let workflow = harness.workflow(generator.clone(), Some("ops@coach.example"));

    let outcome = workflow
        .run(&submission.id)
        .await
        .expect("Workflow should succeed");

    assert_eq!(outcome.submission_id, submission.id);
    assert_eq!(outcome.vision_narrative, "N");
    assert_eq!(outcome.action_plan, "P");
    assert_eq!(outcome.parse_source, ParseSource::Sentinel);
    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.notifications.len(), 2);

    let stored = harness.reload(&submission.id).await;
    assert_eq!(stored.status, SubmissionStatus::Completed);
    assert_eq!(stored.vision_narrative.as_deref(), Some("N"));
    assert_eq!(stored.action_plan.as_deref(), Some("P"));
    assert!(stored.completed_at.is_some());

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Alex"));
    assert!(prompts[0].contains("Health & Fitness"));
    assert!(prompts[0].contains("disciplined, calm"));
    assert!(prompts[0].contains("- train daily"));

    let sent = harness.transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "alex@example.com");
    assert!(sent[0]
        .html
        .contains(&format!("https://coach.example/vision/results/{}", submission.id)));
    assert!(!sent[0].html.contains("{{first_name}}"));
    assert_eq!(sent[1].to, "ops@coach.example");
    assert!(!sent[1].html.contains("{{completed_at}}"));
}

#[tokio::test]
async fn test_blank_id_is_validation_error() {
    let harness = Harness::new(false, &[]).await;
    let generator = MockGenerator::sentinel("N", "P");
    let workflow = harness.workflow(generator.clone(), None);

    let err = workflow.run("   ").await.unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));
    assert_eq!(err.status_code(), 400);
    assert!(generator.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_submission_is_not_found_without_writes() {
    let harness = Harness::new(false, &[]).await;
    let generator = MockGenerator::sentinel("N", "P");
    let workflow = harness.workflow(generator.clone(), None);

    let err = workflow
        .run("00000000000000000000000000000000")
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::NotFound { .. }));
    assert_eq!(err.status_code(), 404);
    assert_eq!(harness.store.completions.load(Ordering::SeqCst), 0);
    assert!(generator.prompts.lock().unwrap().is_empty());
    assert!(harness.transport.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_generation_failure_leaves_submission_unchanged() {
    let harness = Harness::new(false, &[]).await;
    let submission = harness.alex().await;
    let workflow = harness.workflow(MockGenerator::new(Reply::Unavailable), None);

    let err = workflow.run(&submission.id).await.unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::Generation(GenerationError::Unavailable { .. })
    ));
    assert_eq!(err.status_code(), 500);
    assert_eq!(harness.store.completions.load(Ordering::SeqCst), 0);
    assert_eq!(harness.reload(&submission.id).await, submission);
    assert!(harness.transport.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_api_key_is_configuration_error() {
    let harness = Harness::new(false, &[]).await;
    let submission = harness.alex().await;
    let workflow = harness.workflow(MockGenerator::new(Reply::MissingKey), None);

    let err = workflow.run(&submission.id).await.unwrap_err();

    assert!(matches!(err, WorkflowError::Configuration(_)));
    assert_eq!(harness.reload(&submission.id).await, submission);
}

#[tokio::test]
async fn test_empty_parsed_document_is_malformed_without_writes() {
    let harness = Harness::new(false, &[]).await;
    let submission = harness.alex().await;
    let generator = MockGenerator::new(Reply::Text(format!(
        "{NARRATIVE_HEADER}\n\n{ACTION_PLAN_HEADER}\nP"
    )));
    let workflow = harness.workflow(generator, None);

    let err = workflow.run(&submission.id).await.unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::Generation(GenerationError::Malformed(_))
    ));
    assert_eq!(harness.store.completions.load(Ordering::SeqCst), 0);
    assert_eq!(harness.reload(&submission.id).await, submission);
}

#[tokio::test]
async fn test_persistence_failure_keeps_generated_text() {
    let harness = Harness::new(true, &[]).await;
    let submission = harness.alex().await;
    let workflow = harness.workflow(MockGenerator::sentinel("N", "P"), Some("ops@coach.example"));

    let err = workflow.run(&submission.id).await.unwrap_err();

    match &err {
        WorkflowError::Persistence {
            narrative,
            action_plan,
            ..
        } => {
            assert_eq!(narrative, "N");
            assert_eq!(action_plan, "P");
        }
        other => panic!("expected Persistence, got {other:?}"),
    }
    assert_eq!(err.status_code(), 500);
    assert_eq!(harness.store.completions.load(Ordering::SeqCst), 1);

    let stored = harness.reload(&submission.id).await;
    assert_ne!(stored.status, SubmissionStatus::Completed);
    assert!(stored.vision_narrative.is_none());
    assert!(harness.transport.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_stale_version_is_persistence_error() {
    let harness = Harness::new(false, &[]).await;
    let submission = harness.alex().await;

    /// Generator that lets another writer touch the submission mid-flight
    struct InterleavingGenerator {
        store: SqliteStore,
        id: String,
    }

    #[async_trait]
    impl TextGenerator for InterleavingGenerator {
        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> std::result::Result<String, GenerationError> {
            self.store
                .advance_step(&AdvanceStep {
                    id: self.id.clone(),
                    step: 3,
                })
                .await
                .expect("Concurrent write failed");
            Ok(format!("{NARRATIVE_HEADER}\nN\n{ACTION_PLAN_HEADER}\nP"))
        }
    }

    let notifier = NotificationDispatcher::new(
        Arc::new(harness.sqlite.clone()),
        harness.transport.clone(),
        NotificationConfig::default(),
    );
    let workflow = VisionWorkflow::new(
        harness.store.clone(),
        Arc::new(InterleavingGenerator {
            store: harness.sqlite.clone(),
            id: submission.id.clone(),
        }),
        notifier,
    );

    let err = workflow.run(&submission.id).await.unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::Persistence {
            source: VisionError::StaleVersion { .. },
            ..
        }
    ));
    let stored = harness.reload(&submission.id).await;
    assert_eq!(stored.status, SubmissionStatus::StepInProgress(3));
}

#[tokio::test]
async fn test_one_failed_notification_is_one_warning() {
    let harness = Harness::new(false, &["ops@coach.example"]).await;
    let submission = harness.alex().await;
    let workflow = harness.workflow(MockGenerator::sentinel("N", "P"), Some("ops@coach.example"));

    let outcome = workflow
        .run(&submission.id)
        .await
        .expect("Notification failures must not fail the run");

    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("vision-admin-notification"));
    assert!(outcome.notifications[0].delivered);
    assert!(!outcome.notifications[1].delivered);
    assert_eq!(harness.transport.sent.lock().unwrap().len(), 1);
    assert_eq!(
        harness.reload(&submission.id).await.status,
        SubmissionStatus::Completed
    );
}

#[tokio::test]
async fn test_missing_admin_address_is_a_warning() {
    let harness = Harness::new(false, &[]).await;
    let submission = harness.alex().await;
    let workflow = harness.workflow(MockGenerator::sentinel("N", "P"), None);

    let outcome = workflow.run(&submission.id).await.unwrap();

    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("not configured"));
    assert_eq!(harness.transport.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_completed_submission_is_regenerated() {
    let harness = Harness::new(false, &[]).await;
    let submission = harness.alex().await;

    harness
        .workflow(MockGenerator::sentinel("First", "Plan one"), None)
        .run(&submission.id)
        .await
        .unwrap();
    let outcome = harness
        .workflow(MockGenerator::sentinel("Second", "Plan two"), None)
        .run(&submission.id)
        .await
        .unwrap();

    assert_eq!(outcome.vision_narrative, "Second");
    let stored = harness.reload(&submission.id).await;
    assert_eq!(stored.vision_narrative.as_deref(), Some("Second"));
    assert_eq!(stored.action_plan.as_deref(), Some("Plan two"));
    assert_eq!(harness.store.completions.load(Ordering::SeqCst), 2);
}
