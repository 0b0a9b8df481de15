use serde::Serialize;
use tracing::{info, info_span};

/// Operator action recorded on the `audit` target.
#[derive(Debug, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AuditEvent<'a> {
    /// The server accepted a start request.
    TaskStarted {
        /// Identifier assigned by the server.
        task_id: &'a str,
        /// Message the server returned with the identifier.
        message: &'a str,
    },
    /// A start request was refused or failed.
    StartRejected {
        /// Why the task did not start.
        reason: String,
    },
    /// The server acknowledged a stop request.
    StopAcknowledged {
        /// Task that was asked to stop.
        task_id: &'a str,
        /// Whether the task was the one being polled.
        tracked: bool,
    },
    /// A stop request was refused or failed.
    StopRejected {
        /// Task that was asked to stop.
        task_id: &'a str,
        /// Why the stop failed.
        reason: String,
    },
}

/// Logs an audit event as structured JSON on the `audit` target.
pub fn log_audit(event: &AuditEvent<'_>) {
    let span = info_span!(target: "audit", "audit_event");
    let _enter = span.enter();

    let json = serde_json::to_string(event).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"));
    info!(target: "audit", audit_json = %json, "Task Audit Event");
}
