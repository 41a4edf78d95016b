//! Template operations for the SqliteStore.

use async_trait::async_trait;
use tokio::task;

use super::{SqliteStore, TemplateStore};
use crate::{
    db::Database,
    error::{Result, VisionError},
    models::EmailTemplate,
    params::UpsertTemplate,
};

#[async_trait]
impl TemplateStore for SqliteStore {
    async fn get_template(&self, key: &str) -> Result<Option<EmailTemplate>> {
        let db_path = self.db_path.clone();
        let key = key.to_string();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_template(&key)
        })
        .await
        .map_err(VisionError::join)?
    }

    async fn list_templates(&self) -> Result<Vec<EmailTemplate>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_templates()
        })
        .await
        .map_err(VisionError::join)?
    }

    async fn upsert_template(&self, params: &UpsertTemplate) -> Result<EmailTemplate> {
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.upsert_template(&params)
        })
        .await
        .map_err(VisionError::join)?
    }
}
