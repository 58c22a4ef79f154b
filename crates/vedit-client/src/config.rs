//! Client configuration.

use std::time::Duration;

/// Configuration for the job service client and poller.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the job service
    pub base_url: String,
    /// Period between scheduled status refreshes
    pub poll_interval: Duration,
    /// Per-request timeout; kept at or below the poll interval so a hung
    /// request cannot starve subsequent ticks
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            poll_interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("VEDIT_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            poll_interval: Duration::from_secs(
                std::env::var("VEDIT_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            request_timeout: Duration::from_secs(
                std::env::var("VEDIT_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        }
    }

    /// Override the base URL, trimming any trailing slash.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let url: String = base_url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}
