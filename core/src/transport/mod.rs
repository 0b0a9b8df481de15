//! Access to the job server.
//!
//! The controller and poller depend on the [`TaskApi`] trait, not on HTTP,
//! so both can be driven by scripted implementations in tests.

pub mod form;
pub mod http;

use async_trait::async_trait;

use crate::error::{PollError, StartError, StopError};
use crate::protocol::{Ack, Started};
use crate::task::{StatusUpdate, TaskIdentifier};

pub use form::{FileField, JobForm};
pub use http::{HttpConfig, HttpTaskApi};

/// The three operations the job server exposes.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Submits a job.
    async fn start(&self, form: &JobForm) -> Result<Started, StartError>;

    /// Requests termination of a job.
    async fn stop(&self, id: &TaskIdentifier) -> Result<Ack, StopError>;

    /// Fetches the current status of a job.
    async fn status(&self, id: &TaskIdentifier) -> Result<StatusUpdate, PollError>;
}
