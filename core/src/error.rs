//! Error types for task lifecycle operations.
//!
//! One enum per operation: starting a job, stopping a job, and fetching
//! status. Poll errors are transient by construction; start and stop errors
//! are surfaced to the operator and never alter tracked state.

use crate::task::TaskIdentifier;

/// Reasons a task identifier is rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// Nothing left after trimming.
    #[error("Task ID is empty")]
    Empty,
    /// Longer than [`TaskIdentifier::MAX_LEN`] bytes.
    #[error("Task ID is too long ({0} bytes)")]
    TooLong(usize),
    /// Contains whitespace or control characters.
    #[error("Task ID contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Errors that can occur while submitting a job.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StartError {
    /// The payload was rejected, locally or by the server.
    #[error("Validation Error: {0}")]
    Validation(String),
    /// The server could not be reached or answered unintelligibly.
    #[error("Transport Error: {0}")]
    Transport(String),
}

/// Errors that can occur while requesting termination of a job.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StopError {
    /// The identifier failed local validation; no request was sent.
    #[error("Invalid Task ID: {0}")]
    InvalidIdentifier(#[from] IdentifierError),
    /// The server reports no task with this identifier.
    #[error("Task Not Found: {0}")]
    NotFound(TaskIdentifier),
    /// The server could not be reached or answered unintelligibly.
    #[error("Transport Error: {0}")]
    Transport(String),
}

/// Errors from a single status fetch.
///
/// None of these end a poll session; the next poll is scheduled regardless.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollError {
    /// Network failure, timeout, or non-2xx response.
    #[error("Transport Error: {0}")]
    Transport(String),
    /// The body was not a recognisable status document.
    #[error("Malformed Response: {0}")]
    MalformedResponse(String),
}

impl PollError {
    /// Returns `true` if the failure came from the network layer.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Short reason suitable for the rendered status line.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Transport(msg) | Self::MalformedResponse(msg) => msg,
        }
    }
}
