//! Identifier plus local view of one tracked task.

use super::id::TaskIdentifier;
use super::snapshot::TaskSnapshot;

/// The task a controller is currently tracking.
///
/// The identifier is fixed at construction; only the snapshot changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    id: TaskIdentifier,
    snapshot: TaskSnapshot,
}

impl TaskHandle {
    /// Creates a handle for a task the server just accepted.
    #[must_use]
    pub fn started(id: TaskIdentifier) -> Self {
        Self {
            id,
            snapshot: TaskSnapshot::started(),
        }
    }

    /// The task's identifier.
    #[must_use]
    pub fn id(&self) -> &TaskIdentifier {
        &self.id
    }

    /// Last known state.
    #[must_use]
    pub fn snapshot(&self) -> &TaskSnapshot {
        &self.snapshot
    }

    /// Returns `true` if `id` names this task.
    #[must_use]
    pub fn is(&self, id: &TaskIdentifier) -> bool {
        &self.id == id
    }

    pub(crate) fn snapshot_mut(&mut self) -> &mut TaskSnapshot {
        &mut self.snapshot
    }
}
