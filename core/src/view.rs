//! Projection of task state into something a front end can draw.
//!
//! [`project`] is pure: no network, no timers, no mutation. Missing values
//! render as [`PLACEHOLDER`] instead of failing.

use core::fmt;

use crate::task::{LogEntry, TaskSnapshot};

/// Shown wherever a value is absent.
pub const PLACEHOLDER: &str = "-";

/// Visible characters of a token before masking.
const TOKEN_VISIBLE: usize = 6;

/// Headline state of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    /// The server reports the task as active.
    Running,
    /// The task finished or was stopped.
    Stopped,
    /// The most recent poll failed.
    Error(String),
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => f.write_str("Running"),
            Self::Stopped => f.write_str("Stopped"),
            Self::Error(reason) => write!(f, "Error: {reason}"),
        }
    }
}

/// Display strings for one log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    /// Target post.
    pub post_id: String,
    /// Comment body.
    pub comment: String,
    /// Completion time.
    pub timestamp: String,
    /// Account display name.
    pub profile: String,
    /// Masked access token.
    pub token: String,
    /// Position within the job.
    pub sequence: String,
    /// Executor-observed status.
    pub status_code: String,
}

impl EntryView {
    /// A view with every field absent.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            post_id: PLACEHOLDER.into(),
            comment: PLACEHOLDER.into(),
            timestamp: PLACEHOLDER.into(),
            profile: PLACEHOLDER.into(),
            token: PLACEHOLDER.into(),
            sequence: PLACEHOLDER.into(),
            status_code: PLACEHOLDER.into(),
        }
    }

    /// One-line form for the scrollback panel.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "[{}] {} => {} => {} => {}",
            self.timestamp, self.profile, self.post_id, self.comment, self.status_code
        )
    }
}

impl From<&LogEntry> for EntryView {
    fn from(entry: &LogEntry) -> Self {
        Self {
            post_id: text(entry.post_id.as_deref()),
            comment: text(entry.comment_text.as_deref()),
            timestamp: text(entry.timestamp.as_deref()),
            profile: text(entry.profile_name.as_deref()),
            token: entry
                .token
                .as_deref()
                .map_or_else(|| PLACEHOLDER.to_string(), mask_token),
            sequence: entry
                .sequence_number
                .map_or_else(|| PLACEHOLDER.to_string(), |n| n.to_string()),
            status_code: entry
                .status_code
                .map_or_else(|| PLACEHOLDER.to_string(), |c| c.to_string()),
        }
    }
}

/// Everything a front end needs to draw one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderModel {
    /// Headline state.
    pub status: StatusLine,
    /// Server-reported success count.
    pub success: u64,
    /// Server-reported failure count.
    pub failed: u64,
    /// Most recent entry, all placeholders if none.
    pub latest: EntryView,
    /// Full scrollback, oldest first.
    pub log: Vec<EntryView>,
}

impl RenderModel {
    /// `Success: N | Failed: M`
    #[must_use]
    pub fn tally_line(&self) -> String {
        format!("Success: {} | Failed: {}", self.success, self.failed)
    }

    /// The summary block, one line per field.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Status: {}", self.status),
            self.tally_line(),
            format!("Post ID: {}", self.latest.post_id),
            format!("Comment: {}", self.latest.comment),
            format!("Time: {}", self.latest.timestamp),
        ]
    }
}

/// Maps a snapshot to its render model.
#[must_use]
pub fn project(snapshot: &TaskSnapshot) -> RenderModel {
    let status = match (snapshot.fault(), snapshot.running()) {
        (Some(reason), _) => StatusLine::Error(reason.to_string()),
        (None, true) => StatusLine::Running,
        (None, false) => StatusLine::Stopped,
    };

    RenderModel {
        status,
        success: snapshot.success_count(),
        failed: snapshot.failed_count(),
        latest: snapshot.latest().map_or_else(EntryView::empty, EntryView::from),
        log: snapshot.log().iter().map(EntryView::from).collect(),
    }
}

fn text(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(TOKEN_VISIBLE).collect();
    if visible.len() == token.len() {
        visible
    } else {
        format!("{visible}…")
    }
}
