//! Email template queries.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension, Row};

use super::parse_column;
use crate::{
    error::{DatabaseResultExt, Result, VisionError},
    models::EmailTemplate,
    params::UpsertTemplate,
};

const TEMPLATE_COLUMNS: &str =
    "template_key, subject, content, from_email, from_name, reply_to_email, updated_at";
const UPSERT_TEMPLATE_SQL: &str = "INSERT INTO email_templates (template_key, subject, content, from_email, from_name, reply_to_email, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) ON CONFLICT(template_key) DO UPDATE SET subject = excluded.subject, content = excluded.content, from_email = excluded.from_email, from_name = excluded.from_name, reply_to_email = excluded.reply_to_email, updated_at = excluded.updated_at";

impl super::Database {
    /// Looks up a template by key.
    pub fn get_template(&self, key: &str) -> Result<Option<EmailTemplate>> {
        let sql = format!("SELECT {TEMPLATE_COLUMNS} FROM email_templates WHERE template_key = ?1");
        self.connection
            .query_row(&sql, params![key], Self::build_template_from_row)
            .optional()
            .db_context("Failed to query email template")
    }

    /// Lists all templates ordered by key.
    pub fn list_templates(&self) -> Result<Vec<EmailTemplate>> {
        let sql = format!("SELECT {TEMPLATE_COLUMNS} FROM email_templates ORDER BY template_key");
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare query")?;

        let rows = stmt
            .query_map([], Self::build_template_from_row)
            .db_context("Failed to query email templates")?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read email template row")
    }

    /// Creates a template or replaces the one stored under the same key.
    pub fn upsert_template(&mut self, template: &UpsertTemplate) -> Result<EmailTemplate> {
        let key = template.template_key.trim();
        if key.is_empty() {
            return Err(VisionError::invalid_input("template_key")
                .with_reason("Template key cannot be empty"));
        }
        if template.subject.trim().is_empty() {
            return Err(
                VisionError::invalid_input("subject").with_reason("Subject cannot be empty")
            );
        }

        let now = Timestamp::now();
        self.connection
            .execute(
                UPSERT_TEMPLATE_SQL,
                params![
                    key,
                    &template.subject,
                    &template.content,
                    template.from_email.as_deref(),
                    template.from_name.as_deref(),
                    template.reply_to_email.as_deref(),
                    now.to_string(),
                ],
            )
            .db_context("Failed to save email template")?;

        Ok(EmailTemplate {
            template_key: key.to_string(),
            subject: template.subject.clone(),
            content: template.content.clone(),
            from_email: template.from_email.clone(),
            from_name: template.from_name.clone(),
            reply_to_email: template.reply_to_email.clone(),
            updated_at: now,
        })
    }

    fn build_template_from_row(row: &Row<'_>) -> rusqlite::Result<EmailTemplate> {
        Ok(EmailTemplate {
            template_key: row.get(0)?,
            subject: row.get(1)?,
            content: row.get(2)?,
            from_email: row.get(3)?,
            from_name: row.get(4)?,
            reply_to_email: row.get(5)?,
            updated_at: parse_column(row, 6)?,
        })
    }
}
