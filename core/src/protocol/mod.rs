//! Client side of the job server protocol.
//!
//! [`wire`] holds the raw JSON shapes; [`adapter`] turns them into the
//! canonical types below and into [`crate::task::StatusUpdate`].

pub mod adapter;
pub mod wire;

use crate::task::TaskIdentifier;

/// A job the server accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Started {
    /// Identifier for all later calls.
    pub id: TaskIdentifier,
    /// Server confirmation text.
    pub message: String,
}

/// Server acknowledgement of a stop request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// Server confirmation text.
    pub message: String,
}

pub use adapter::{interpret_start, interpret_status, interpret_stop, normalize_status};
