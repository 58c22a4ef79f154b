//! Job records as observed by the client.
//!
//! The job service owns the job lifecycle; the client only mirrors whatever
//! the last successful list fetch reported. Records are never mutated
//! locally.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Job processing status.
///
/// Transitions (`pending -> processing -> {completed, failed}`) are driven
/// entirely by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job accepted, waiting for a worker
    #[default]
    Pending,
    /// Job is actively being processed
    Processing,
    /// Job completed successfully
    Completed,
    /// Job failed with an error
    Failed,
}

impl JobStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One backend unit of work, as returned by `GET /jobs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Opaque identifier assigned by the backend, stable for the job's lifetime
    pub id: String,
    /// Display name of the source file
    pub filename: String,
    /// Current processing status
    pub status: JobStatus,
    /// Progress percentage (0-100), meaningful only while processing
    pub progress: u8,
}

impl JobRecord {
    /// Create a new record, clamping progress to 100.
    pub fn new(
        id: impl Into<String>,
        filename: impl Into<String>,
        status: JobStatus,
        progress: u8,
    ) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            status,
            progress: progress.min(100),
        }
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
