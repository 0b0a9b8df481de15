//! Task model: identifiers, log entries, snapshots, and handles.

pub mod handle;
pub mod id;
pub mod log;
pub mod snapshot;

pub use handle::TaskHandle;
pub use id::TaskIdentifier;
pub use log::LogEntry;
pub use snapshot::{Counts, LogUpdate, MergeOutcome, StatusUpdate, TaskSnapshot};
