//! Messages from a poll loop to its owner.

use crate::error::PollError;
use crate::task::{StatusUpdate, TaskIdentifier};

/// Why a poll loop exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The server reported the task as no longer running.
    Terminal,
    /// The owner cancelled the session.
    Cancelled,
    /// The owner started tracking a different task.
    Superseded,
    /// The owner stopped listening for events.
    Detached,
}

/// What one poll cycle produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// A status response, already normalised.
    Updated(StatusUpdate),
    /// A transient failure; the next poll is still scheduled.
    Failed(PollError),
    /// The loop exited and will send nothing more.
    Finished(SessionEnd),
}

/// An outcome tagged with the session and task it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollEvent {
    /// Generation of the emitting session.
    pub session: u64,
    /// Task the session polls.
    pub task_id: TaskIdentifier,
    /// What happened.
    pub outcome: PollOutcome,
}
