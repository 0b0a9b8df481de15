//! Boundary adapter from wire shapes to canonical types.
//!
//! Every response-shape variant is resolved here so that the poller,
//! controller, and projector only ever see [`StatusUpdate`], [`Started`],
//! and [`Ack`].

use tracing::debug;

use super::wire::{StartResponse, StatusResponse, StopResponse, WireLogEntry};
use super::{Ack, Started};
use crate::error::{PollError, StartError, StopError};
use crate::task::{Counts, LogEntry, LogUpdate, StatusUpdate, TaskIdentifier};

const NOT_FOUND: u16 = 404;

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn is_server_error(status: u16) -> bool {
    status >= 500
}

impl From<WireLogEntry> for LogEntry {
    fn from(wire: WireLogEntry) -> Self {
        Self {
            post_id: wire.post_id,
            comment_text: wire.comment_text,
            timestamp: wire.timestamp,
            token: wire.token,
            profile_name: wire.profile_name,
            sequence_number: wire.sequence_number,
            status_code: wire.status_code,
        }
    }
}

/// Normalises a decoded status body.
///
/// Nested `summary` counts take precedence over flat ones; a full `logs`
/// sequence takes precedence over `latest`, which takes precedence over the
/// legacy `last_log` line.
///
/// # Errors
/// Returns `PollError::MalformedResponse` if the body says neither
/// `running` nor `stopped`.
pub fn normalize_status(body: StatusResponse) -> Result<StatusUpdate, PollError> {
    let running = body.running.or(body.stopped.map(|stopped| !stopped)).ok_or_else(|| {
        PollError::MalformedResponse("status carries neither `running` nor `stopped`".into())
    })?;

    let counts = match (body.summary, body.success, body.failed) {
        (Some(summary), _, _) => Some(Counts::new(summary.success, summary.failed)),
        (None, None, None) => None,
        (None, success, failed) => Some(Counts::new(success.unwrap_or(0), failed.unwrap_or(0))),
    };

    let log = if let Some(entries) = body.logs {
        LogUpdate::Full(entries.into_iter().map(LogEntry::from).collect())
    } else if let Some(latest) = body.latest {
        LogUpdate::Latest(latest.into())
    } else if let Some(entry) = body.last_log.as_deref().and_then(LogEntry::from_line) {
        LogUpdate::Latest(entry)
    } else {
        LogUpdate::Unchanged
    };

    Ok(StatusUpdate {
        running,
        counts,
        log,
    })
}

/// Decodes and normalises a raw `GET /status` reply.
///
/// # Errors
/// Returns `PollError::Transport` for non-2xx statuses and
/// `PollError::MalformedResponse` for bodies that do not decode.
pub fn interpret_status(status: u16, body: &str) -> Result<StatusUpdate, PollError> {
    if !is_success(status) {
        return Err(PollError::Transport(format!("HTTP {status}")));
    }
    let decoded: StatusResponse = serde_json::from_str(body)
        .map_err(|e| PollError::MalformedResponse(format!("Parse error: {e}")))?;
    normalize_status(decoded)
}

/// Interprets a raw `POST /` reply.
///
/// # Errors
/// Returns `StartError::Validation` when the server explains a 4xx rejection
/// and `StartError::Transport` for 5xx replies and anything else that is not
/// a valid start.
pub fn interpret_start(status: u16, body: &str) -> Result<Started, StartError> {
    if is_server_error(status) {
        return Err(StartError::Transport(format!("HTTP {status}")));
    }
    let decoded: StartResponse = match serde_json::from_str(body) {
        Ok(decoded) => decoded,
        Err(e) if is_success(status) => {
            return Err(StartError::Transport(format!("Parse error: {e}")));
        }
        Err(_) => return Err(StartError::Transport(format!("HTTP {status}"))),
    };

    if let Some(error) = decoded.error {
        return Err(StartError::Validation(error));
    }
    if !is_success(status) {
        return Err(StartError::Transport(format!("HTTP {status}")));
    }

    let raw_id = decoded
        .task_id
        .ok_or_else(|| StartError::Transport("response carries no task_id".into()))?;
    let id = TaskIdentifier::parse(&raw_id)
        .map_err(|e| StartError::Transport(format!("server issued unusable task id: {e}")))?;

    debug!(task_id = %id, "Start accepted");
    Ok(Started {
        message: decoded.message.unwrap_or_else(|| "Task started".to_string()),
        id,
    })
}

/// Interprets a raw `POST /stop` reply for `id`.
///
/// # Errors
/// Returns `StopError::NotFound` when the server rejects the identifier with
/// a non-5xx reply and `StopError::Transport` for any other failure.
pub fn interpret_stop(id: &TaskIdentifier, status: u16, body: &str) -> Result<Ack, StopError> {
    if is_server_error(status) {
        return Err(StopError::Transport(format!("HTTP {status}")));
    }
    let decoded: Option<StopResponse> = serde_json::from_str(body).ok();

    if decoded.as_ref().is_some_and(|d| d.error.is_some()) || status == NOT_FOUND {
        return Err(StopError::NotFound(id.clone()));
    }
    if !is_success(status) {
        return Err(StopError::Transport(format!("HTTP {status}")));
    }

    let decoded = decoded
        .ok_or_else(|| StopError::Transport("Parse error: stop reply is not JSON".into()))?;
    Ok(Ack {
        message: decoded.message.unwrap_or_else(|| format!("Stopped {id}")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> TaskIdentifier {
        TaskIdentifier::parse(raw).unwrap()
    }

    // =========================================================================
    // Status
    // =========================================================================

    #[test]
    fn test_nested_summary_and_latest() {
        let update = interpret_status(
            200,
            r#"{"running":true,"summary":{"success":2,"failed":0},"latest":{"post_id":"p1","timestamp":"t1"}}"#,
        )
        .unwrap();

        assert!(update.running);
        assert_eq!(update.counts, Some(Counts::new(2, 0)));
        let LogUpdate::Latest(entry) = update.log else {
            panic!("expected latest entry");
        };
        assert_eq!(entry.post_id.as_deref(), Some("p1"));
        assert_eq!(entry.timestamp.as_deref(), Some("t1"));
    }

    #[test]
    fn test_flat_counts_and_full_logs() {
        let update = interpret_status(
            200,
            r#"{"running":true,"success":4,"failed":1,"logs":[{"post_id":"a"},{"post_id":"b"}]}"#,
        )
        .unwrap();

        assert_eq!(update.counts, Some(Counts::new(4, 1)));
        let LogUpdate::Full(entries) = update.log else {
            panic!("expected full log");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].post_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_summary_wins_over_flat_counts() {
        let update = interpret_status(
            200,
            r#"{"running":true,"success":1,"failed":1,"summary":{"success":9,"failed":3}}"#,
        )
        .unwrap();
        assert_eq!(update.counts, Some(Counts::new(9, 3)));
    }

    #[test]
    fn test_logs_win_over_latest() {
        let update = interpret_status(
            200,
            r#"{"running":true,"latest":{"post_id":"x"},"logs":[{"post_id":"y"}]}"#,
        )
        .unwrap();
        assert!(matches!(update.log, LogUpdate::Full(ref e) if e.len() == 1));
    }

    #[test]
    fn test_legacy_shape() {
        let update = interpret_status(
            200,
            r#"{"success":3,"failed":1,"last_log":"[10:00:00] [Profile] Ana => 77 => hey => 200","stopped":false}"#,
        )
        .unwrap();

        assert!(update.running);
        assert_eq!(update.counts, Some(Counts::new(3, 1)));
        let LogUpdate::Latest(entry) = update.log else {
            panic!("expected latest entry");
        };
        assert_eq!(entry.post_id.as_deref(), Some("77"));
        assert_eq!(entry.status_code, Some(200));
    }

    #[test]
    fn test_legacy_waiting_placeholder() {
        let update = interpret_status(
            200,
            r#"{"success":0,"failed":0,"last_log":"Waiting...","stopped":false}"#,
        )
        .unwrap();
        assert_eq!(update.log, LogUpdate::Unchanged);
    }

    #[test]
    fn test_legacy_stopped_is_terminal() {
        let update = interpret_status(200, r#"{"stopped":true}"#).unwrap();
        assert!(update.is_terminal());
        assert_eq!(update.counts, None);
    }

    #[test]
    fn test_missing_running_is_malformed() {
        let err = interpret_status(200, r#"{"success":1}"#).unwrap_err();
        assert!(matches!(err, PollError::MalformedResponse(_)));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = interpret_status(200, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, PollError::MalformedResponse(msg) if msg.contains("Parse error")));
    }

    #[test]
    fn test_non_success_status_is_transport() {
        let err = interpret_status(502, "").unwrap_err();
        assert_eq!(err, PollError::Transport("HTTP 502".into()));
    }

    // =========================================================================
    // Start
    // =========================================================================

    #[test]
    fn test_start_success() {
        let started =
            interpret_start(200, r#"{"task_id":"abc123","message":"started"}"#).unwrap();
        assert_eq!(started.id, id("abc123"));
        assert_eq!(started.message, "started");
    }

    #[test]
    fn test_start_rejected_by_server() {
        let err = interpret_start(400, r#"{"error":"Missing required inputs"}"#).unwrap_err();
        assert!(matches!(err, StartError::Validation(msg) if msg == "Missing required inputs"));
    }

    #[test]
    fn test_start_server_error_without_body() {
        let err = interpret_start(500, "Internal Server Error").unwrap_err();
        assert!(matches!(err, StartError::Transport(msg) if msg == "HTTP 500"));
    }

    #[test]
    fn test_start_server_error_with_error_body() {
        let err = interpret_start(503, r#"{"error":"worker pool exhausted"}"#).unwrap_err();
        assert!(matches!(err, StartError::Transport(msg) if msg == "HTTP 503"));
    }

    #[test]
    fn test_start_without_task_id() {
        let err = interpret_start(200, r#"{"message":"ok"}"#).unwrap_err();
        assert!(matches!(err, StartError::Transport(_)));
    }

    // =========================================================================
    // Stop
    // =========================================================================

    #[test]
    fn test_stop_success() {
        let ack = interpret_stop(&id("abc"), 200, r#"{"message":"Stopped abc"}"#).unwrap();
        assert_eq!(ack.message, "Stopped abc");
    }

    #[test]
    fn test_stop_unknown_id() {
        let err = interpret_stop(&id("zzz"), 400, r#"{"error":"Invalid task ID"}"#).unwrap_err();
        assert!(matches!(err, StopError::NotFound(found) if found == id("zzz")));

        let err = interpret_stop(&id("zzz"), 404, "").unwrap_err();
        assert!(matches!(err, StopError::NotFound(_)));
    }

    #[test]
    fn test_stop_server_failure() {
        let err = interpret_stop(&id("abc"), 503, "unavailable").unwrap_err();
        assert!(matches!(err, StopError::Transport(msg) if msg == "HTTP 503"));
    }

    #[test]
    fn test_stop_server_error_with_error_body() {
        let err = interpret_stop(&id("abc123"), 500, r#"{"error":"database down"}"#).unwrap_err();
        assert!(matches!(err, StopError::Transport(msg) if msg == "HTTP 500"));
    }
}
