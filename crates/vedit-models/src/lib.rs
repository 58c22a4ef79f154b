//! Shared data models for the VideoEdit client.
//!
//! This crate provides the Serde-serializable job types exchanged with the
//! job service: the job record returned by the list endpoint and its
//! processing status.

pub mod job;

pub use job::{JobRecord, JobStatus};
