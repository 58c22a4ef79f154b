//! Client for the VideoEdit job service.
//!
//! This crate implements the two halves of the dashboard's backend contract:
//!
//! - [`SubmissionClient`] transfers a selected video file to the job service
//!   as a new processing job and reports the submission outcome.
//! - [`JobPoller`] keeps a local snapshot of all known jobs, refreshed on a
//!   fixed cadence and on demand after a successful submission.
//!
//! The job service is the sole source of truth; the poller's list is a cache
//! replaced wholesale by each successful fetch. Rendering the list is the
//! caller's concern.

pub mod config;
pub mod error;
pub mod poller;
pub mod service;
pub mod uploader;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use poller::JobPoller;
pub use service::JobServiceClient;
pub use uploader::{SelectedFile, SubmissionClient, UploadOutcome};
