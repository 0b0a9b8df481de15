//! Log entries describing completed units of work.

use std::sync::LazyLock;

use regex::Regex;

/// Placeholder line the collaborator reports before the first unit completes.
pub const WAITING_PLACEHOLDER: &str = "Waiting...";

/// `[HH:MM:SS] <rest>`
static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?P<time>[^\]]+)\]\s*(?P<rest>.*)$").expect("log line pattern is valid")
});

const FIELD_SEPARATOR: &str = " => ";

/// One completed unit of work as reported by the server.
///
/// Every field is optional because the collaborator omits fields freely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEntry {
    /// Target post the comment was placed on.
    pub post_id: Option<String>,
    /// Comment body that was posted.
    pub comment_text: Option<String>,
    /// Server-side completion time, kept verbatim.
    pub timestamp: Option<String>,
    /// Access token the unit ran under.
    pub token: Option<String>,
    /// Display name of the account behind the token.
    pub profile_name: Option<String>,
    /// Position of the unit within the job.
    pub sequence_number: Option<u64>,
    /// HTTP status the executor observed, when the server reports one.
    pub status_code: Option<u16>,
}

impl LogEntry {
    /// Two entries describe the same event when timestamp and post id match.
    #[must_use]
    pub fn same_event(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp && self.post_id == other.post_id
    }

    /// Parses one human-readable log line emitted by the collaborator.
    ///
    /// Recognised form: `[12:00:01] [Profile] Ana => 1234 => hello => 200`.
    /// Lines that do not split into fields keep their text as the comment.
    /// Returns `None` for blank lines and the waiting placeholder.
    #[must_use]
    pub fn from_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line == WAITING_PLACEHOLDER {
            return None;
        }

        let Some(caps) = LINE_PATTERN.captures(line) else {
            return Some(Self {
                comment_text: Some(line.to_string()),
                ..Self::default()
            });
        };

        let timestamp = Some(caps["time"].to_string());
        let rest = caps["rest"].trim();
        let fields: Vec<&str> = rest.split(FIELD_SEPARATOR).collect();

        if fields.len() < 4 {
            return Some(Self {
                timestamp,
                comment_text: non_empty(rest),
                ..Self::default()
            });
        }

        // Comment text may itself contain the separator.
        let last = fields.len() - 1;
        Some(Self {
            timestamp,
            profile_name: non_empty(fields[0]),
            post_id: non_empty(fields[1]),
            comment_text: non_empty(&fields[2..last].join(FIELD_SEPARATOR)),
            status_code: fields[last].trim().parse().ok(),
            ..Self::default()
        })
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
