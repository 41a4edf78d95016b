//! HTTP entry point for the website.
//!
//! | Method | Path                            | Purpose                         |
//! |--------|---------------------------------|---------------------------------|
//! | POST   | `/api/generate-vision`          | run the workflow for one id     |
//! | GET    | `/api/vision-submissions/{id}`  | stored record for results pages |
//! | GET    | `/health`                       | liveness                        |

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::signal::unix::{signal, SignalKind};
use vision_core::{models::VisionSubmission, SubmissionStore, VisionWorkflow, WorkflowError};

mod cors;

#[derive(Clone)]
pub struct AppState {
    workflow: VisionWorkflow,
    store: Arc<dyn SubmissionStore>,
}

impl AppState {
    pub fn new(workflow: VisionWorkflow, store: Arc<dyn SubmissionStore>) -> Self {
        Self { workflow, store }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    #[serde(rename = "submissionId")]
    submission_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    success: bool,
    message: String,
    vision_narrative: String,
    action_plan: String,
    submission_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, error: impl Into<String>, details: Option<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            success: false,
            error: error.into(),
            details,
        }),
    )
}

/// Maps a workflow failure onto the response shape. Generated text carried
/// by persistence failures is never echoed back.
fn workflow_error(err: WorkflowError) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match &err {
        WorkflowError::Validation(reason) => api_error(status, reason.clone(), None),
        WorkflowError::NotFound { .. } => api_error(status, "Submission not found", None),
        WorkflowError::Configuration(reason) => {
            api_error(status, "Server configuration error", Some(reason.clone()))
        }
        WorkflowError::Storage(source) => {
            api_error(status, "Failed to load submission", Some(source.to_string()))
        }
        WorkflowError::Generation(source) => {
            api_error(status, "Failed to generate vision", Some(source.to_string()))
        }
        WorkflowError::Persistence { source, .. } => api_error(
            status,
            "Failed to save generated vision",
            Some(source.to_string()),
        ),
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/generate-vision", post(generate_vision))
        .route("/api/vision-submissions/{id}", get(get_submission))
        .layer(middleware::from_fn(cors::cors))
        .with_state(state)
}

/// Serves until SIGINT or SIGTERM.
pub async fn serve(listen: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("Failed to bind {listen}"))?;
    info!("Vision server listening on {listen}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Vision server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let (Ok(mut sigint), Ok(mut sigterm)) = (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    ) else {
        error!("Failed to install signal handlers; stop the server with SIGKILL");
        return std::future::pending().await;
    };

    tokio::select! {
        _ = sigint.recv() => info!("Received SIGINT, shutting down gracefully..."),
        _ = sigterm.recv() => info!("Received SIGTERM, shutting down gracefully..."),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn generate_vision(State(state): State<AppState>, body: Bytes) -> Response {
    let request: GenerateRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            warn!("Rejected generate-vision request: {err}");
            return api_error(
                StatusCode::BAD_REQUEST,
                "Request body must be JSON with a submissionId",
                Some(err.to_string()),
            )
            .into_response();
        }
    };

    let Some(submission_id) = request.submission_id else {
        return workflow_error(WorkflowError::Validation(
            "submissionId is required".to_string(),
        ))
        .into_response();
    };

    match state.workflow.run(&submission_id).await {
        Ok(outcome) => Json(GenerateResponse {
            success: true,
            message: "Vision generated successfully".to_string(),
            vision_narrative: outcome.vision_narrative,
            action_plan: outcome.action_plan,
            submission_id: outcome.submission_id,
            warnings: outcome.warnings,
        })
        .into_response(),
        Err(err) => {
            error!("Vision generation failed for {submission_id}: {err}");
            workflow_error(err).into_response()
        }
    }
}

async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VisionSubmission>, ApiError> {
    match state.store.get_submission(&id).await {
        Ok(Some(submission)) => Ok(Json(submission)),
        Ok(None) => Err(api_error(
            StatusCode::NOT_FOUND,
            "Submission not found",
            None,
        )),
        Err(err) => {
            error!("Failed to load submission {id}: {err}");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load submission",
                Some(err.to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode as ClientStatus;
    use serde_json::Value;
    use tempfile::TempDir;
    use vision_core::{
        generation::{GenerationError, GenerationRequest, TextGenerator},
        notify::{
            EmailTransport, NotificationConfig, NotificationDispatcher, OutboundEmail,
            TransportError,
        },
        params::CreateSubmission,
        SqliteStore, StoreBuilder,
    };

    use super::*;

    struct FixedGenerator(Option<String>);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> std::result::Result<String, GenerationError> {
            self.0.clone().ok_or_else(|| GenerationError::Unavailable {
                status: Some(529),
                message: "overloaded".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<OutboundEmail>>,
    }

    #[async_trait]
    impl EmailTransport for RecordingTransport {
        async fn send(&self, email: &OutboundEmail) -> std::result::Result<(), TransportError> {
            self.sent
                .lock()
                .expect("transport lock")
                .push(email.clone());
            Ok(())
        }
    }

    struct TestServer {
        base: String,
        store: Arc<SqliteStore>,
        _dir: TempDir,
    }

    async fn spawn(generated: Option<&str>) -> TestServer {
        let dir = TempDir::new().expect("temp dir");
        let store = Arc::new(
            StoreBuilder::new()
                .with_database_path(Some(dir.path().join("server.db")))
                .build()
                .await
                .expect("store"),
        );
        let notifier = NotificationDispatcher::new(
            store.clone(),
            Arc::new(RecordingTransport::default()),
            NotificationConfig {
                admin_email: Some("ops@example.com".to_string()),
                ..NotificationConfig::default()
            },
        );
        let workflow = VisionWorkflow::new(
            store.clone(),
            Arc::new(FixedGenerator(generated.map(String::from))),
            notifier,
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let app = router(AppState::new(workflow, store.clone()));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        TestServer {
            base: format!("http://{addr}"),
            store,
            _dir: dir,
        }
    }

    async fn create_alex(store: &SqliteStore) -> VisionSubmission {
        store
            .create_submission(&CreateSubmission {
                name: "Alex".to_string(),
                email: "alex@example.com".to_string(),
                area_of_life: "health-fitness".to_string(),
                current_reality: None,
                why_important: None,
                being_words: vec!["disciplined".to_string(), "calm".to_string()],
                doing_actions: vec!["train daily".to_string()],
                having_outcomes: vec!["strong body".to_string()],
            })
            .await
            .expect("create submission")
    }

    async fn post_generate(base: &str, body: String) -> (ClientStatus, Value) {
        let response = reqwest::Client::new()
            .post(format!("{base}/api/generate-vision"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("request");
        let status = response.status();
        (status, response.json().await.expect("json body"))
    }

    const GENERATED: &str = "=== VISION NARRATIVE ===\nN\n=== 12-MONTH ACTION PLAN ===\nP";

    #[tokio::test]
    async fn test_generate_vision_success() {
        let server = spawn(Some(GENERATED)).await;
        let submission = create_alex(&server.store).await;

        let (status, body) = post_generate(
            &server.base,
            json!({ "submissionId": submission.id }).to_string(),
        )
        .await;

        assert_eq!(status, ClientStatus::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["vision_narrative"], "N");
        assert_eq!(body["action_plan"], "P");
        assert_eq!(body["submission_id"], submission.id.as_str());
        assert!(body.get("warnings").is_none());

        let stored = server
            .store
            .get_submission(&submission.id)
            .await
            .expect("load")
            .expect("submission exists");
        assert!(stored.status.is_completed());
        assert!(stored.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_generate_vision_rejects_missing_or_blank_id() {
        let server = spawn(Some(GENERATED)).await;

        for body in [json!({}), json!({ "submissionId": "  " })] {
            let (status, body) = post_generate(&server.base, body.to_string()).await;
            assert_eq!(status, ClientStatus::BAD_REQUEST);
            assert_eq!(body["success"], false);
        }

        let (status, _) = post_generate(&server.base, "not json".to_string()).await;
        assert_eq!(status, ClientStatus::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_generate_vision_unknown_id_is_404() {
        let server = spawn(Some(GENERATED)).await;

        let (status, body) = post_generate(
            &server.base,
            json!({ "submissionId": "does-not-exist" }).to_string(),
        )
        .await;

        assert_eq!(status, ClientStatus::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Submission not found");
    }

    #[tokio::test]
    async fn test_generation_failure_is_500_with_details() {
        let server = spawn(None).await;
        let submission = create_alex(&server.store).await;

        let (status, body) = post_generate(
            &server.base,
            json!({ "submissionId": submission.id }).to_string(),
        )
        .await;

        assert_eq!(status, ClientStatus::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(body["details"]
            .as_str()
            .expect("details")
            .contains("overloaded"));

        let stored = server
            .store
            .get_submission(&submission.id)
            .await
            .expect("load")
            .expect("submission exists");
        assert!(!stored.status.is_completed());
    }

    #[tokio::test]
    async fn test_preflight_gets_empty_200_with_cors_headers() {
        let server = spawn(Some(GENERATED)).await;

        let response = reqwest::Client::new()
            .request(
                reqwest::Method::OPTIONS,
                format!("{}/api/generate-vision", server.base),
            )
            .send()
            .await
            .expect("request");

        assert_eq!(response.status(), ClientStatus::OK);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
        assert!(response
            .headers()
            .contains_key("access-control-allow-methods"));
        assert!(response.text().await.expect("body").is_empty());
    }

    #[tokio::test]
    async fn test_error_responses_carry_cors_headers() {
        let server = spawn(Some(GENERATED)).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/generate-vision", server.base))
            .body("{}")
            .send()
            .await
            .expect("request");

        assert_eq!(response.status(), ClientStatus::BAD_REQUEST);
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_get_submission_and_health() {
        let server = spawn(Some(GENERATED)).await;
        let submission = create_alex(&server.store).await;
        let client = reqwest::Client::new();

        let found = client
            .get(format!(
                "{}/api/vision-submissions/{}",
                server.base, submission.id
            ))
            .send()
            .await
            .expect("request");
        assert_eq!(found.status(), ClientStatus::OK);
        let body: Value = found.json().await.expect("json");
        assert_eq!(body["name"], "Alex");
        assert_eq!(body["area_of_life"], "health-fitness");

        let missing = client
            .get(format!("{}/api/vision-submissions/nope", server.base))
            .send()
            .await
            .expect("request");
        assert_eq!(missing.status(), ClientStatus::NOT_FOUND);

        let health: Value = client
            .get(format!("{}/health", server.base))
            .send()
            .await
            .expect("request")
            .json()
            .await
            .expect("json");
        assert_eq!(health["status"], "ok");
    }
}
