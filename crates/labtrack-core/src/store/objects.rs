//! Filesystem-backed object storage.
//!
//! Buckets are directories under a root; objects are files addressed by a
//! relative path inside their bucket.

use std::path::{Component, Path, PathBuf};

use log::debug;

use super::StoredObject;
use crate::error::{Result, TrackerError};

/// Object storage rooted at a local directory.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
    public_base: String,
}

impl ObjectStore {
    /// Create an object store. `public_base` is the URL prefix objects are
    /// served under; a trailing slash is ignored.
    pub fn new(root: PathBuf, public_base: impl Into<String>) -> Self {
        let public_base = public_base.into().trim_end_matches('/').to_string();
        Self { root, public_base }
    }

    /// Object store served straight from disk through `file://` URLs.
    pub fn local(root: PathBuf) -> Self {
        let base = format!("file://{}", root.display());
        Self::new(root, base)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL an object is served under.
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/{}/{}", self.public_base, bucket, path)
    }

    /// Write `bytes` to `bucket/path`, replacing any previous object.
    pub async fn put(&self, bucket: &str, path: &str, bytes: Vec<u8>) -> Result<StoredObject> {
        let target = self.resolve(bucket, path)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TrackerError::FileSystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        debug!("writing {} bytes to {}", bytes.len(), target.display());
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| TrackerError::FileSystem {
                path: target.clone(),
                source: e,
            })?;

        Ok(StoredObject {
            path: path.to_string(),
            public_url: self.public_url(bucket, path),
        })
    }

    /// Map a bucket and object path onto the filesystem, refusing anything
    /// that would escape the bucket.
    fn resolve(&self, bucket: &str, path: &str) -> Result<PathBuf> {
        let is_plain = |value: &str| {
            !value.is_empty()
                && Path::new(value)
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)))
        };

        if !is_plain(bucket) || bucket.contains('/') {
            return Err(TrackerError::Upload {
                file_name: path.to_string(),
                reason: format!("Invalid bucket name '{bucket}'"),
            });
        }
        if !is_plain(path) {
            return Err(TrackerError::Upload {
                file_name: path.to_string(),
                reason: "Object path must be relative and stay inside its bucket".to_string(),
            });
        }

        Ok(self.root.join(bucket).join(path))
    }
}
