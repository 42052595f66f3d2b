//! Builder for creating and configuring [`SqliteStore`] instances.

use std::path::{Path, PathBuf};

use tokio::task;

use super::{ObjectStore, SqliteStore};
use crate::{
    db::Database,
    error::{JoinResultExt, Result, TrackerError},
};

const XDG_PREFIX: &str = "labtrack";

/// Builder for creating and configuring a [`SqliteStore`].
#[derive(Debug, Clone, Default)]
pub struct StoreBuilder {
    database_path: Option<PathBuf>,
    storage_root: Option<PathBuf>,
    public_url: Option<String>,
}

impl StoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/labtrack/labtrack.db` or
    /// `~/.local/share/labtrack/labtrack.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the directory buckets are stored under.
    ///
    /// Defaults to `objects/` next to the database file.
    pub fn with_storage_root<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.storage_root = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the URL prefix uploaded objects are served under.
    ///
    /// Defaults to a `file://` URL of the storage root.
    pub fn with_public_url(mut self, url: Option<String>) -> Self {
        if url.is_some() {
            self.public_url = url;
        }
        self
    }

    /// Builds the configured store, creating directories and the database
    /// schema as needed.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::FileSystem` if a directory cannot be created
    /// Returns `TrackerError::Database` if database initialization fails
    pub async fn build(self) -> Result<SqliteStore> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        let parent = db_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        create_dir(&parent)?;

        let storage_root = self
            .storage_root
            .unwrap_or_else(|| parent.join("objects"));
        create_dir(&storage_root)?;

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), TrackerError>(())
        })
        .await
        .join_context()??;

        let objects = match self.public_url {
            Some(url) => ObjectStore::new(storage_root, url),
            None => ObjectStore::local(storage_root),
        };

        Ok(SqliteStore::new(db_path, objects))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix(XDG_PREFIX)
            .place_data_file("labtrack.db")
            .map_err(|e| TrackerError::XdgDirectory(e.to_string()))
    }
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| TrackerError::FileSystem {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn build_creates_database_and_object_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("nested/lab.db");

        let store = StoreBuilder::new()
            .with_database_path(Some(&db_path))
            .build()
            .await
            .expect("Failed to build store");

        assert!(db_path.exists());
        assert_eq!(store.objects().root(), temp_dir.path().join("nested/objects"));
        assert!(store.objects().root().is_dir());
    }

    #[tokio::test]
    async fn public_url_override_is_used() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let store = StoreBuilder::new()
            .with_database_path(Some(temp_dir.path().join("lab.db")))
            .with_storage_root(Some(temp_dir.path().join("blobs")))
            .with_public_url(Some("https://files.example".to_string()))
            .build()
            .await
            .expect("Failed to build store");

        assert_eq!(
            store.objects().public_url("workstation", "1/a.png"),
            "https://files.example/workstation/1/a.png"
        );
    }
}
