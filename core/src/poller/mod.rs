//! Cooperative, cancelable status polling.
//!
//! A [`StatusPoller`] runs one loop per [`PollSession`]. Each poll is
//! scheduled only after the previous response has been handed to the owner,
//! so requests never overlap and a slow server never builds a backlog. The
//! loop does not touch task state itself; it reports [`PollEvent`]s and the
//! owner merges them on its own turn.
//!
//! The loop exits when:
//! 1. the server reports the task as not running,
//! 2. the session's cancellation token fires, or
//! 3. the owner's tracked task is no longer the one being polled.
//!
//! Failed fetches never end the loop.

pub mod clock;
pub mod event;
pub mod session;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::task::TaskIdentifier;
use crate::transport::TaskApi;

pub use clock::{Clock, TokioClock};
pub use event::{PollEvent, PollOutcome, SessionEnd};
pub use session::PollSession;

/// Default delay between the end of one poll and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Everything one session loop needs besides the poller itself.
pub struct SessionContext {
    /// Controller-assigned session number.
    pub generation: u64,
    /// Task to poll.
    pub id: TaskIdentifier,
    /// Set by the owner to stop scheduling polls.
    pub cancel: CancellationToken,
    /// The owner's currently tracked task.
    pub tracked: watch::Receiver<Option<TaskIdentifier>>,
    /// Where outcomes are reported.
    pub events: mpsc::Sender<PollEvent>,
}

impl SessionContext {
    /// Checks the cancellation and staleness conditions.
    fn halted(&self) -> Option<SessionEnd> {
        if self.cancel.is_cancelled() {
            return Some(SessionEnd::Cancelled);
        }
        if self.tracked.borrow().as_ref() != Some(&self.id) {
            return Some(SessionEnd::Superseded);
        }
        None
    }

    fn event(&self, outcome: PollOutcome) -> PollEvent {
        PollEvent {
            session: self.generation,
            task_id: self.id.clone(),
            outcome,
        }
    }
}

/// Fetches task status on a fixed cadence.
#[derive(Clone)]
pub struct StatusPoller {
    api: Arc<dyn TaskApi>,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl StatusPoller {
    /// Creates a poller over the given transport and time source.
    #[must_use]
    pub fn new(api: Arc<dyn TaskApi>, clock: Arc<dyn Clock>, interval: Duration) -> Self {
        Self {
            api,
            clock,
            interval,
        }
    }

    /// Delay between polls.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawns a session loop for `id` on the current tokio runtime.
    #[must_use]
    pub fn spawn(
        &self,
        generation: u64,
        id: TaskIdentifier,
        tracked: watch::Receiver<Option<TaskIdentifier>>,
        events: mpsc::Sender<PollEvent>,
    ) -> PollSession {
        let cancel = CancellationToken::new();
        let ctx = SessionContext {
            generation,
            id: id.clone(),
            cancel: cancel.clone(),
            tracked,
            events,
        };
        let span = info_span!("poll_session", task_id = %id, generation);
        let poller = self.clone();
        let handle = tokio::spawn(async move { poller.run(ctx).await }.instrument(span));
        PollSession::new(generation, id, cancel, handle)
    }

    /// Runs one session loop to completion.
    ///
    /// The first poll is dispatched immediately.
    pub async fn run(&self, ctx: SessionContext) -> SessionEnd {
        let mut polls: u64 = 0;

        let end = loop {
            if let Some(end) = ctx.halted() {
                break end;
            }

            polls += 1;
            let result = self.api.status(&ctx.id).await;

            // The fetch was allowed to finish, but nobody wants it now.
            if let Some(end) = ctx.halted() {
                debug!(polls, "Discarding status of halted session");
                break end;
            }

            let terminal = match &result {
                Ok(update) => update.is_terminal(),
                Err(error) => {
                    warn!(polls, error = %error, "Status poll failed, will retry");
                    false
                }
            };
            let outcome = match result {
                Ok(update) => PollOutcome::Updated(update),
                Err(error) => PollOutcome::Failed(error),
            };

            if ctx.events.send(ctx.event(outcome)).await.is_err() {
                break SessionEnd::Detached;
            }
            if terminal {
                break SessionEnd::Terminal;
            }

            tokio::select! {
                () = ctx.cancel.cancelled() => break SessionEnd::Cancelled,
                () = self.clock.sleep(self.interval) => {}
            }
        };

        info!(polls, end = ?end, "Poll session ended");
        // The owner may already be gone; nothing to do about it.
        let _ = ctx.events.send(ctx.event(PollOutcome::Finished(end))).await;
        end
    }
}
