//! Handle to one running poll loop.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::event::SessionEnd;
use crate::task::TaskIdentifier;

/// Ephemeral state of one poll loop: the task it polls, its cancellation
/// flag, and the handle of the spawned loop.
///
/// Dropping a session cancels it.
#[derive(Debug)]
pub struct PollSession {
    generation: u64,
    id: TaskIdentifier,
    cancel: CancellationToken,
    handle: JoinHandle<SessionEnd>,
}

impl PollSession {
    pub(crate) fn new(
        generation: u64,
        id: TaskIdentifier,
        cancel: CancellationToken,
        handle: JoinHandle<SessionEnd>,
    ) -> Self {
        Self {
            generation,
            id,
            cancel,
            handle,
        }
    }

    /// Controller-assigned number distinguishing this session from earlier
    /// ones, including earlier sessions for the same task.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The task being polled.
    #[must_use]
    pub fn id(&self) -> &TaskIdentifier {
        &self.id
    }

    /// Prevents any further poll from being dispatched.
    ///
    /// A fetch already in flight completes, but its result is discarded.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Returns `true` once the loop has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancels the session and waits for the loop to exit.
    pub async fn shutdown(mut self) -> Option<SessionEnd> {
        self.cancel.cancel();
        (&mut self.handle).await.ok()
    }
}

impl Drop for PollSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
