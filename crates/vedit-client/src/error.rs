//! Client error types.

use reqwest::StatusCode;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upload rejected ({status}): {reason}")]
    UploadRejected { status: StatusCode, reason: String },

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Transient failures are expected to clear on their own; polling treats
    /// every failure this way, the next scheduled tick is the retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ClientError::Network(_) | ClientError::RequestFailed(_)
        )
    }
}
