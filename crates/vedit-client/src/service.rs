//! Job service HTTP client.
//!
//! Two wire operations: `POST /upload` (multipart, field `video`) to create
//! a job, and `GET /jobs` for a full snapshot of all known jobs. There is no
//! pagination or delta feed; every list response is the complete set.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;
use vedit_models::JobRecord;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// HTTP client for the job service.
pub struct JobServiceClient {
    http: Client,
    config: ClientConfig,
}

impl JobServiceClient {
    /// Create a new client.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submit a new job by uploading the file bytes.
    ///
    /// Success means the service acknowledged receipt, not that processing
    /// finished; completion is observed later through the job list. The
    /// acknowledgment body is not consumed.
    pub async fn create_job(&self, filename: &str, bytes: Vec<u8>) -> ClientResult<()> {
        let url = format!("{}/upload", self.config.base_url);

        debug!(%url, filename, size = bytes.len(), "submitting job");

        let part = Part::bytes(bytes).file_name(filename.to_string());
        let form = Form::new().part("video", part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(ClientError::Network)?;

        if response.status().is_success() {
            debug!(status = %response.status(), filename, "job submission acknowledged");
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let reason = if body.trim().is_empty() {
            "upload request was rejected".to_string()
        } else {
            body
        };

        Err(ClientError::UploadRejected { status, reason })
    }

    /// Fetch the complete current set of jobs.
    pub async fn list_jobs(&self) -> ClientResult<Vec<JobRecord>> {
        let url = format!("{}/jobs", self.config.base_url);

        let response = self.http.get(&url).send().await.map_err(ClientError::Network)?;

        if !response.status().is_success() {
            return Err(ClientError::RequestFailed(format!(
                "job service returned {}",
                response.status()
            )));
        }

        let jobs: Vec<JobRecord> = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        Ok(jobs)
    }
}
