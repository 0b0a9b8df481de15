//! Last-known task state and the merge policy for status updates.

use super::log::LogEntry;

/// Success and failure tallies as reported by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    /// Units that completed successfully.
    pub success: u64,
    /// Units that failed.
    pub failed: u64,
}

impl Counts {
    /// Creates a tally from raw values.
    #[must_use]
    pub const fn new(success: u64, failed: u64) -> Self {
        Self { success, failed }
    }
}

/// Log content carried by one status response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogUpdate {
    /// The response carried no log information.
    #[default]
    Unchanged,
    /// The server's complete log, oldest first.
    Full(Vec<LogEntry>),
    /// Only the most recent entry.
    Latest(LogEntry),
}

/// A status response normalised into one canonical shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Whether the server still considers the task active.
    pub running: bool,
    /// Counts, when the response carried any.
    pub counts: Option<Counts>,
    /// Log content.
    pub log: LogUpdate,
}

impl StatusUpdate {
    /// Returns `true` if this update ends polling.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !self.running
    }
}

/// What a merge changed in the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Entries that were not shown before.
    pub new_entries: usize,
    /// The local log was replaced by the server's sequence.
    pub replaced: bool,
}

/// Latest known status of a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSnapshot {
    running: bool,
    counts: Counts,
    log: Vec<LogEntry>,
    fault: Option<String>,
}

impl TaskSnapshot {
    /// Empty snapshot for a task the server just accepted.
    #[must_use]
    pub fn started() -> Self {
        Self {
            running: true,
            ..Self::default()
        }
    }

    /// Whether the server still considers the task active.
    #[must_use]
    pub fn running(&self) -> bool {
        self.running
    }

    /// Server-reported success count.
    #[must_use]
    pub fn success_count(&self) -> u64 {
        self.counts.success
    }

    /// Server-reported failure count.
    #[must_use]
    pub fn failed_count(&self) -> u64 {
        self.counts.failed
    }

    /// Known log entries, oldest first.
    #[must_use]
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Most recent known log entry.
    #[must_use]
    pub fn latest(&self) -> Option<&LogEntry> {
        self.log.last()
    }

    /// Reason the most recent poll failed, if it did.
    #[must_use]
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// Merges a successful status response.
    ///
    /// Counts are taken verbatim. A full log replaces the local one; a
    /// single latest entry is appended unless it is already the newest
    /// known entry. Any recorded fault is cleared.
    pub fn merge(&mut self, update: StatusUpdate) -> MergeOutcome {
        self.running = update.running;
        self.fault = None;
        if let Some(counts) = update.counts {
            self.counts = counts;
        }

        match update.log {
            LogUpdate::Unchanged => MergeOutcome::default(),
            LogUpdate::Full(entries) => {
                let known = self.log.len();
                let new_entries = entries.len().saturating_sub(known);
                self.log = entries;
                MergeOutcome {
                    new_entries,
                    replaced: true,
                }
            }
            LogUpdate::Latest(entry) => {
                if self.latest().is_some_and(|last| last.same_event(&entry)) {
                    return MergeOutcome::default();
                }
                self.log.push(entry);
                MergeOutcome {
                    new_entries: 1,
                    replaced: false,
                }
            }
        }
    }

    /// Records a failed poll without touching any reported state.
    pub fn record_fault(&mut self, reason: impl Into<String>) {
        self.fault = Some(reason.into());
    }

    /// Marks the task as no longer running after an acknowledged stop.
    ///
    /// Polling ends with the stop, so a pending fault no longer applies.
    pub fn mark_stopped(&mut self) {
        self.running = false;
        self.fault = None;
    }
}
