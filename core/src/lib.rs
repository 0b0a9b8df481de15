//! Taskwatch core library.
//!
//! Client-side lifecycle management for long-running jobs executed by a
//! remote job server: submitting a job, tracking the task it creates,
//! polling its status on a fixed cadence, requesting termination, and
//! projecting the last-known state into a displayable model.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Task lifecycle orchestration.
pub mod controller;
/// Error taxonomy for start, stop, and poll operations.
pub mod error;
/// Infrastructure components (audit, config, telemetry).
pub mod infrastructure;
/// Periodic status polling.
pub mod poller;
/// Server response shapes and their interpretation.
pub mod protocol;
/// Task identity and last-known state.
pub mod task;
/// Transport seam and its HTTP implementation.
pub mod transport;
/// Render model projection.
pub mod view;

pub use controller::{ControllerConfig, TaskController};
pub use error::{IdentifierError, PollError, StartError, StopError};
pub use task::{TaskHandle, TaskIdentifier, TaskSnapshot};
pub use transport::{HttpConfig, HttpTaskApi, JobForm, TaskApi};
