//! Wire formats spoken by the job server.
//!
//! These types mirror the JSON bodies exactly, including every shape variant
//! seen across deployments. Nothing outside [`crate::protocol`] should touch
//! them; use [`crate::protocol::adapter`] to get canonical types.

use serde::{Deserialize, Serialize};

use crate::task::TaskIdentifier;

/// Reply to `POST /`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartResponse {
    /// Identifier of the new task, on success.
    pub task_id: Option<String>,
    /// Human-readable confirmation.
    pub message: Option<String>,
    /// Rejection reason, on failure.
    pub error: Option<String>,
}

/// Body of `POST /stop`.
#[derive(Debug, Clone, Serialize)]
pub struct StopRequest<'a> {
    /// Task to terminate.
    pub task_id: &'a TaskIdentifier,
}

/// Reply to `POST /stop`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopResponse {
    /// Human-readable confirmation.
    pub message: Option<String>,
    /// Rejection reason, on failure.
    pub error: Option<String>,
}

/// Nested tally used by some deployments.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WireSummary {
    /// Units that completed successfully.
    #[serde(default)]
    pub success: u64,
    /// Units that failed.
    #[serde(default)]
    pub failed: u64,
}

/// A log entry as the server sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireLogEntry {
    /// Target post.
    pub post_id: Option<String>,
    /// Comment body.
    #[serde(alias = "full_comment", alias = "comment")]
    pub comment_text: Option<String>,
    /// Completion time.
    #[serde(alias = "time")]
    pub timestamp: Option<String>,
    /// Access token the unit ran under.
    pub token: Option<String>,
    /// Account display name.
    #[serde(alias = "profile")]
    pub profile_name: Option<String>,
    /// Position within the job.
    #[serde(alias = "index")]
    pub sequence_number: Option<u64>,
    /// Status the executor observed.
    #[serde(alias = "status")]
    pub status_code: Option<u16>,
}

/// Reply to `GET /status`.
///
/// Counts arrive either flat (`success`, `failed`) or nested (`summary`).
/// Log content arrives as `logs`, `latest`, or the legacy `last_log` line.
/// Older servers report `stopped` instead of `running`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    /// Whether the task is still active.
    pub running: Option<bool>,
    /// Inverse of `running`, reported by older servers.
    pub stopped: Option<bool>,
    /// Flat success count.
    pub success: Option<u64>,
    /// Flat failure count.
    pub failed: Option<u64>,
    /// Nested counts.
    pub summary: Option<WireSummary>,
    /// Most recent entry only.
    pub latest: Option<WireLogEntry>,
    /// Complete log, oldest first.
    pub logs: Option<Vec<WireLogEntry>>,
    /// Most recent entry as a formatted line.
    pub last_log: Option<String>,
}
