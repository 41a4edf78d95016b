#![allow(dead_code)]

use vision_core::{params::CreateSubmission, SqliteStore, StoreBuilder};
use tempfile::TempDir;

/// Helper function to create a test store backed by a temporary database
pub async fn create_test_store() -> (TempDir, SqliteStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let store = StoreBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create store");
    (temp_dir, store)
}

/// Form input for the health-fitness sample submission
pub fn alex_submission() -> CreateSubmission {
    CreateSubmission {
        name: "Alex".to_string(),
        email: "alex@example.com".to_string(),
        area_of_life: "health-fitness".to_string(),
        current_reality: None,
        why_important: None,
        being_words: vec!["disciplined".to_string(), "calm".to_string()],
        doing_actions: vec!["train daily".to_string()],
        having_outcomes: vec!["strong body".to_string()],
    }
}
