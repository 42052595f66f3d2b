//! Attachment working sets for step drafts.
//!
//! While a step is being created or edited its attachments live in an
//! [`AttachmentSession`], detached from the step's persisted URL list. Files
//! are staged, uploaded one by one to the `workstation` bucket, and only
//! entries that finished uploading contribute a URL to the submitted step.
//!
//! Removing an entry never deletes the uploaded object.

use std::path::Path;

use jiff::Timestamp;
use log::{debug, warn};
use serde::Serialize;

use crate::{
    error::{Result, TrackerError},
    store::{DataStore, WORKSTATION_BUCKET},
};

/// Upload state of one attachment entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Pending,
    Uploading,
    Completed,
    Failed,
}

/// One file in an attachment working set.
#[derive(Debug, Clone)]
pub struct AttachmentEntry {
    pub file_name: String,
    /// Public URL, set once the upload completed
    pub url: Option<String>,
    pub status: UploadStatus,
    /// Reason of the last failed upload
    pub error: Option<String>,
    bytes: Option<Vec<u8>>,
}

impl AttachmentEntry {
    fn staged(file_name: String, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            url: None,
            status: UploadStatus::Pending,
            error: None,
            bytes: Some(bytes),
        }
    }

    fn uploaded(url: &str) -> Self {
        let file_name = url.rsplit('/').next().unwrap_or(url).to_string();
        Self {
            file_name,
            url: Some(url.to_string()),
            status: UploadStatus::Completed,
            error: None,
            bytes: None,
        }
    }
}

/// Attachment working set of one draft.
#[derive(Debug, Clone, Default)]
pub struct AttachmentSession {
    entries: Vec<AttachmentEntry>,
}

impl AttachmentSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a session from a step's persisted URLs; every entry starts out
    /// completed.
    pub fn from_urls(urls: &[String]) -> Self {
        Self {
            entries: urls.iter().map(|u| AttachmentEntry::uploaded(u)).collect(),
        }
    }

    pub fn entries(&self) -> &[AttachmentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a file as a pending entry and return its index.
    pub fn stage(&mut self, file_name: impl Into<String>, bytes: Vec<u8>) -> usize {
        self.entries
            .push(AttachmentEntry::staged(file_name.into(), bytes));
        self.entries.len() - 1
    }

    /// Upload a pending or failed entry to the `workstation` bucket.
    ///
    /// The entry moves to `Uploading` for the duration of the call and ends
    /// `Completed` with its public URL, or `Failed` with the reason. A
    /// failed entry stays in the set and may be retried or removed.
    /// Uploading an already completed entry returns its URL unchanged.
    pub async fn upload<S>(&mut self, index: usize, store: &S, case_id: u64) -> Result<String>
    where
        S: DataStore + ?Sized,
    {
        let entry = self.entries.get_mut(index).ok_or_else(|| {
            TrackerError::validation("attachment")
                .with_reason(format!("No attachment at position {index}"))
        })?;

        if let (UploadStatus::Completed, Some(url)) = (entry.status, &entry.url) {
            return Ok(url.clone());
        }

        let bytes = entry.bytes.clone().unwrap_or_default();
        let path = object_path(case_id, &entry.file_name);
        entry.status = UploadStatus::Uploading;
        entry.error = None;
        debug!("uploading attachment '{}' to {path}", entry.file_name);

        match store.upload_file(WORKSTATION_BUCKET, &path, bytes).await {
            Ok(object) => {
                entry.status = UploadStatus::Completed;
                entry.url = Some(object.public_url.clone());
                entry.bytes = None;
                Ok(object.public_url)
            }
            Err(e) => {
                warn!("upload of '{}' failed: {e}", entry.file_name);
                entry.status = UploadStatus::Failed;
                entry.error = Some(e.to_string());
                Err(match e {
                    upload @ TrackerError::Upload { .. } => upload,
                    other => TrackerError::Upload {
                        file_name: entry.file_name.clone(),
                        reason: other.to_string(),
                    },
                })
            }
        }
    }

    /// Upload every pending entry, returning the failures.
    ///
    /// Failed entries are left for an explicit retry.
    pub async fn upload_pending<S>(&mut self, store: &S, case_id: u64) -> Vec<TrackerError>
    where
        S: DataStore + ?Sized,
    {
        let pending: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.status == UploadStatus::Pending)
            .map(|(i, _)| i)
            .collect();

        let mut failures = Vec::new();
        for index in pending {
            if let Err(e) = self.upload(index, store, case_id).await {
                failures.push(e);
            }
        }
        failures
    }

    /// Drop an entry from the working set. Stored objects are left alone.
    pub fn remove(&mut self, index: usize) -> Option<AttachmentEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// URLs of completed entries, in working set order.
    pub fn completed_urls(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.status == UploadStatus::Completed)
            .filter_map(|e| e.url.clone())
            .collect()
    }
}

/// Object path of an attachment: `<case>/<nanos>-<file name>`.
fn object_path(case_id: u64, file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .map(|n| n.to_string_lossy().replace(char::is_whitespace, "-"))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "attachment".to_string());
    format!("{case_id}/{}-{base}", Timestamp::now().as_nanosecond())
}
