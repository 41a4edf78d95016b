//! Builder for creating and configuring SqliteStore instances.

use std::path::{Path, PathBuf};

use tokio::task;

use super::SqliteStore;
use crate::{
    db::Database,
    error::{Result, VisionError},
};

/// Builder for creating and configuring SqliteStore instances.
#[derive(Debug, Clone)]
pub struct StoreBuilder {
    database_path: Option<PathBuf>,
}

impl StoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/vision/vision.db` or `~/.local/share/vision/vision.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Builds the configured store, creating the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns `VisionError::FileSystem` if the database directory cannot be
    /// created.
    /// Returns `VisionError::Database` if database initialization fails
    pub async fn build(self) -> Result<SqliteStore> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| VisionError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), VisionError>(())
        })
        .await
        .map_err(VisionError::join)??;

        Ok(SqliteStore::new(db_path))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("vision")
            .place_data_file("vision.db")
            .map_err(|e| VisionError::XdgDirectory(e.to_string()))
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
