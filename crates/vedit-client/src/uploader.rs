//! Video submission client.
//!
//! Holds the currently selected local file and transfers it to the job
//! service as a new processing job. Submission success means the service
//! acknowledged receipt; processing progress is observed afterwards through
//! the poller, which gets an immediate refresh on every successful upload.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::ClientResult;
use crate::poller::JobPoller;
use crate::service::JobServiceClient;

/// A local file chosen for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Path to the file on disk
    pub path: PathBuf,
    /// Display name sent to the service (final path component)
    pub filename: String,
}

impl SelectedFile {
    fn from_path(path: PathBuf) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        Self { path, filename }
    }
}

/// Result of an upload attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The service acknowledged the new job
    Submitted,
    /// No file was selected; nothing was sent
    NothingSelected,
}

/// Client for submitting one file at a time to the job service.
///
/// Transitions `idle -> uploading -> idle` on both outcomes; the caller is
/// expected to prevent re-entrant uploads while one is in flight (the guard
/// flag is exposed via [`is_uploading`](Self::is_uploading)).
pub struct SubmissionClient {
    service: Arc<JobServiceClient>,
    poller: Arc<JobPoller>,
    selected: Mutex<Option<SelectedFile>>,
    uploading: AtomicBool,
}

impl SubmissionClient {
    /// Create a submission client that refreshes the given poller after
    /// each acknowledged upload.
    pub fn new(service: Arc<JobServiceClient>, poller: Arc<JobPoller>) -> Self {
        Self {
            service,
            poller,
            selected: Mutex::new(None),
            uploading: AtomicBool::new(false),
        }
    }

    /// Record the chosen file, replacing any previous unsubmitted selection.
    ///
    /// No validation of type or size happens here; the service decides what
    /// it accepts.
    pub async fn select_file(&self, path: impl AsRef<Path>) {
        let file = SelectedFile::from_path(path.as_ref().to_path_buf());
        let mut selected = self.selected.lock().await;
        *selected = Some(file);
    }

    /// The currently selected file, if any.
    pub async fn selected_file(&self) -> Option<SelectedFile> {
        self.selected.lock().await.clone()
    }

    /// Drop the current selection without submitting it.
    pub async fn clear_selection(&self) {
        self.selected.lock().await.take();
    }

    /// Whether an upload is currently in flight.
    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::SeqCst)
    }

    /// Submit the selected file as a new job.
    ///
    /// A no-op when nothing is selected. On acknowledgment the selection is
    /// cleared and the poller refreshed immediately. On failure the
    /// selection is retained so the caller can retry without re-selecting,
    /// and the error carries the service's reason when one was provided.
    pub async fn upload(&self) -> ClientResult<UploadOutcome> {
        let Some(file) = self.selected_file().await else {
            return Ok(UploadOutcome::NothingSelected);
        };

        self.uploading.store(true, Ordering::SeqCst);
        let result = self.transfer(&file).await;
        self.uploading.store(false, Ordering::SeqCst);

        match result {
            Ok(()) => {
                info!(filename = %file.filename, "upload acknowledged, job created");
                self.clear_selection().await;
                self.poller.refresh_now().await;
                Ok(UploadOutcome::Submitted)
            }
            Err(e) => {
                warn!(filename = %file.filename, "upload failed: {}", e);
                Err(e)
            }
        }
    }

    async fn transfer(&self, file: &SelectedFile) -> ClientResult<()> {
        let bytes = tokio::fs::read(&file.path).await?;
        self.service.create_job(&file.filename, bytes).await
    }
}
