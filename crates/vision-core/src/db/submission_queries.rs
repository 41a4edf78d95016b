//! Submission CRUD operations and queries.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension, Row, Transaction};

use super::{optional_timestamp, parse_column, string_list};
use crate::{
    error::{DatabaseResultExt, Result, VisionError},
    models::{SubmissionStatus, VisionSubmission},
    params::NewSubmission,
};

const GENERATE_ID_SQL: &str = "SELECT lower(hex(randomblob(16)))";
const INSERT_SUBMISSION_SQL: &str = "INSERT INTO vision_submissions (id, name, email, area_of_life, current_reality, why_important, being_words, doing_actions, having_outcomes, status, current_step, version, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1, 1, ?11, ?11)";
const SUBMISSION_COLUMNS: &str = "id, name, email, area_of_life, current_reality, why_important, being_words, doing_actions, having_outcomes, status, current_step, vision_narrative, action_plan, version, created_at, updated_at, completed_at";
const SELECT_STATUS_SQL: &str =
    "SELECT status, version FROM vision_submissions WHERE id = ?1";
const UPDATE_STEP_SQL: &str = "UPDATE vision_submissions SET status = ?1, current_step = ?2, version = version + 1, updated_at = ?3 WHERE id = ?4 AND version = ?5";
const COMPLETE_SUBMISSION_SQL: &str = "UPDATE vision_submissions SET status = ?1, vision_narrative = ?2, action_plan = ?3, completed_at = ?4, updated_at = ?4, version = version + 1 WHERE id = ?5 AND version = ?6";
const CHECK_SUBMISSION_EXISTS_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM vision_submissions WHERE id = ?1)";

impl super::Database {
    /// Inserts a new submission in `started` state at builder step 1.
    ///
    /// The identifier is generated by SQLite from 16 random bytes.
    pub fn create_submission(&mut self, new: &NewSubmission) -> Result<VisionSubmission> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let id: String = tx
            .query_row(GENERATE_ID_SQL, [], |row| row.get(0))
            .db_context("Failed to generate submission id")?;

        let now = Timestamp::now();

        tx.execute(
            INSERT_SUBMISSION_SQL,
            params![
                &id,
                &new.name,
                &new.email,
                new.area_of_life.key(),
                new.current_reality.as_deref(),
                new.why_important.as_deref(),
                serde_json::to_string(&new.being_words)?,
                serde_json::to_string(&new.doing_actions)?,
                serde_json::to_string(&new.having_outcomes)?,
                SubmissionStatus::Started.as_db_string(),
                now.to_string(),
            ],
        )
        .db_context("Failed to insert submission")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(VisionSubmission {
            id,
            name: new.name.clone(),
            email: new.email.clone(),
            area_of_life: new.area_of_life,
            current_reality: new.current_reality.clone(),
            why_important: new.why_important.clone(),
            being_words: new.being_words.clone(),
            doing_actions: new.doing_actions.clone(),
            having_outcomes: new.having_outcomes.clone(),
            status: SubmissionStatus::Started,
            current_step: 1,
            vision_narrative: None,
            action_plan: None,
            version: 1,
            created_at: now,
            updated_at: now,
            completed_at: None,
        })
    }

    /// Retrieves a submission by its ID.
    pub fn get_submission(&self, id: &str) -> Result<Option<VisionSubmission>> {
        let sql = format!("SELECT {SUBMISSION_COLUMNS} FROM vision_submissions WHERE id = ?1");
        self.connection
            .query_row(&sql, params![id], Self::build_submission_from_row)
            .optional()
            .db_context("Failed to query submission")
    }

    /// Lists submissions, newest first.
    pub fn list_submissions(&self, limit: Option<u32>) -> Result<Vec<VisionSubmission>> {
        let sql = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM vision_submissions ORDER BY created_at DESC, id LIMIT ?1"
        );
        let limit = limit.map_or(-1, i64::from);

        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare query")?;

        let rows = stmt
            .query_map(params![limit], Self::build_submission_from_row)
            .db_context("Failed to query submissions")?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read submission row")
    }

    /// Records that the submitter reached builder `step`.
    ///
    /// Returns `None` if the submission does not exist. Fails with
    /// `InvalidInput` if the write would move the status backwards and with
    /// `StaleVersion` if the row changed after it was read.
    pub fn advance_step(&mut self, id: &str, step: u32) -> Result<Option<VisionSubmission>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let current: Option<(String, i64)> = tx
            .query_row(SELECT_STATUS_SQL, params![id], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()
            .db_context("Failed to query submission status")?;

        let Some((status_str, version)) = current else {
            return Ok(None);
        };

        let current_status = status_str.parse::<SubmissionStatus>().map_err(|reason| {
            VisionError::invalid_input("status").with_reason(reason)
        })?;
        let next_status = SubmissionStatus::StepInProgress(step);

        if next_status <= current_status {
            return Err(VisionError::invalid_input("step").with_reason(format!(
                "status cannot move from '{}' to '{}'",
                current_status.as_db_string(),
                next_status.as_db_string()
            )));
        }

        Self::write_step(&tx, id, &next_status, step, version)?;

        let sql = format!("SELECT {SUBMISSION_COLUMNS} FROM vision_submissions WHERE id = ?1");
        let submission = tx
            .query_row(&sql, params![id], Self::build_submission_from_row)
            .optional()
            .db_context("Failed to query updated submission")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(submission)
    }

    /// Applies a step change guarded by the version read in the same
    /// transaction.
    fn write_step(
        tx: &Transaction<'_>,
        id: &str,
        status: &SubmissionStatus,
        step: u32,
        expected_version: i64,
    ) -> Result<()> {
        let changed = tx
            .execute(
                UPDATE_STEP_SQL,
                params![
                    status.as_db_string(),
                    step,
                    Timestamp::now().to_string(),
                    id,
                    expected_version
                ],
            )
            .db_context("Failed to update submission step")?;

        if changed == 0 {
            return Err(VisionError::StaleVersion {
                id: id.to_string(),
                expected: u64::try_from(expected_version).unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// Stores generated documents and marks the submission completed.
    ///
    /// The update only applies if the stored `version` still equals
    /// `expected_version`; otherwise `StaleVersion` is returned and nothing
    /// is written.
    pub fn complete_submission(
        &mut self,
        id: &str,
        expected_version: u64,
        vision_narrative: &str,
        action_plan: &str,
    ) -> Result<VisionSubmission> {
        if vision_narrative.trim().is_empty() {
            return Err(VisionError::invalid_input("vision_narrative")
                .with_reason("Vision narrative cannot be empty"));
        }
        if action_plan.trim().is_empty() {
            return Err(VisionError::invalid_input("action_plan")
                .with_reason("Action plan cannot be empty"));
        }

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let expected = i64::try_from(expected_version).map_err(|_| {
            VisionError::invalid_input("version").with_reason("Version is out of range")
        })?;

        let changed = tx
            .execute(
                COMPLETE_SUBMISSION_SQL,
                params![
                    SubmissionStatus::Completed.as_db_string(),
                    vision_narrative,
                    action_plan,
                    Timestamp::now().to_string(),
                    id,
                    expected
                ],
            )
            .db_context("Failed to complete submission")?;

        if changed == 0 {
            let exists: bool = tx
                .query_row(CHECK_SUBMISSION_EXISTS_SQL, params![id], |row| row.get(0))
                .db_context("Failed to check submission existence")?;

            return Err(if exists {
                VisionError::StaleVersion {
                    id: id.to_string(),
                    expected: expected_version,
                }
            } else {
                VisionError::SubmissionNotFound { id: id.to_string() }
            });
        }

        let sql = format!("SELECT {SUBMISSION_COLUMNS} FROM vision_submissions WHERE id = ?1");
        let submission = tx
            .query_row(&sql, params![id], Self::build_submission_from_row)
            .db_context("Failed to query completed submission")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(submission)
    }

    /// Helper to build a VisionSubmission from a database row.
    fn build_submission_from_row(row: &Row<'_>) -> rusqlite::Result<VisionSubmission> {
        Ok(VisionSubmission {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            area_of_life: parse_column(row, 3)?,
            current_reality: row.get(4)?,
            why_important: row.get(5)?,
            being_words: string_list(row, 6)?,
            doing_actions: string_list(row, 7)?,
            having_outcomes: string_list(row, 8)?,
            status: parse_column(row, 9)?,
            current_step: row.get(10)?,
            vision_narrative: row.get(11)?,
            action_plan: row.get(12)?,
            version: row.get::<_, i64>(13)? as u64,
            created_at: parse_column(row, 14)?,
            updated_at: parse_column(row, 15)?,
            completed_at: optional_timestamp(row, 16)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use super::*;
    use crate::{db::Database, models::AreaOfLife};

    #[test]
    fn test_step_write_with_outdated_version_is_stale() {
        let temp_file = NamedTempFile::new().expect("temp file");
        let mut db = Database::new(temp_file.path()).expect("database");
        let created = db
            .create_submission(&NewSubmission {
                name: "Alex".to_string(),
                email: "alex@example.com".to_string(),
                area_of_life: AreaOfLife::HealthFitness,
                current_reality: None,
                why_important: None,
                being_words: vec!["disciplined".to_string(), "calm".to_string()],
                doing_actions: vec!["train daily".to_string()],
                having_outcomes: vec!["strong body".to_string()],
            })
            .expect("create");
        db.advance_step(&created.id, 2)
            .expect("advance")
            .expect("submission exists");

        let tx = db.connection.transaction().expect("transaction");
        let result = Database::write_step(
            &tx,
            &created.id,
            &SubmissionStatus::StepInProgress(3),
            3,
            1,
        );
        assert!(matches!(
            result,
            Err(VisionError::StaleVersion { expected: 1, .. })
        ));
        drop(tx);

        let stored = db
            .get_submission(&created.id)
            .expect("get")
            .expect("submission exists");
        assert_eq!(stored.version, 2);
        assert_eq!(stored.current_step, 2);
    }
}
