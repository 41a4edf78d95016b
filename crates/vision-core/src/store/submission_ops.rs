//! Submission operations for the SqliteStore.

use async_trait::async_trait;
use log::debug;
use tokio::task;

use super::{SqliteStore, SubmissionStore};
use crate::{
    db::Database,
    error::{Result, VisionError},
    models::VisionSubmission,
    params::{AdvanceStep, CompleteSubmission, CreateSubmission},
};

#[async_trait]
impl SubmissionStore for SqliteStore {
    async fn create_submission(&self, params: &CreateSubmission) -> Result<VisionSubmission> {
        let new = params.validate()?;
        let db_path = self.db_path.clone();

        let submission = task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.create_submission(&new)
        })
        .await
        .map_err(VisionError::join)??;

        debug!("Created submission {}", submission.id);
        Ok(submission)
    }

    async fn get_submission(&self, id: &str) -> Result<Option<VisionSubmission>> {
        let db_path = self.db_path.clone();
        let id = id.to_string();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_submission(&id)
        })
        .await
        .map_err(VisionError::join)?
    }

    async fn list_submissions(&self, limit: Option<u32>) -> Result<Vec<VisionSubmission>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_submissions(limit)
        })
        .await
        .map_err(VisionError::join)?
    }

    async fn advance_step(&self, params: &AdvanceStep) -> Result<Option<VisionSubmission>> {
        let db_path = self.db_path.clone();
        let id = params.id.clone();
        let step = params.step;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.advance_step(&id, step)
        })
        .await
        .map_err(VisionError::join)?
    }

    async fn complete_submission(&self, params: &CompleteSubmission) -> Result<VisionSubmission> {
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.complete_submission(
                &params.id,
                params.expected_version,
                &params.vision_narrative,
                &params.action_plan,
            )
        })
        .await
        .map_err(VisionError::join)?
    }
}
