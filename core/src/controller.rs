//! Task lifecycle orchestration.
//!
//! The [`TaskController`] is the single owner of the tracked task and its
//! poll session. Only [`start`](TaskController::start) and
//! [`stop`](TaskController::stop) change which task is tracked; poll results
//! arrive as events and are merged into the snapshot on the controller's own
//! turn, so no state is ever shared with the polling loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::error::{StartError, StopError};
use crate::infrastructure::audit::{AuditEvent, log_audit};
use crate::poller::{
    Clock, DEFAULT_POLL_INTERVAL, PollEvent, PollOutcome, PollSession, StatusPoller,
};
use crate::protocol::Ack;
use crate::task::{TaskHandle, TaskIdentifier};
use crate::transport::{JobForm, TaskApi};
use crate::view::{RenderModel, project};

const EVENT_CAPACITY: usize = 64;

/// Settings for the controller's poller.
#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    /// Delay between polls.
    pub poll_interval: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Owns the tracked task and drives its polling.
pub struct TaskController {
    api: Arc<dyn TaskApi>,
    poller: StatusPoller,
    tracked: Option<TaskHandle>,
    session: Option<PollSession>,
    generation: u64,
    tracked_tx: watch::Sender<Option<TaskIdentifier>>,
    events_tx: mpsc::Sender<PollEvent>,
    events_rx: mpsc::Receiver<PollEvent>,
    notice: Option<String>,
}

impl TaskController {
    /// Creates a controller with nothing tracked.
    #[must_use]
    pub fn new(api: Arc<dyn TaskApi>, clock: Arc<dyn Clock>, config: ControllerConfig) -> Self {
        let (tracked_tx, _) = watch::channel(None);
        let (events_tx, events_rx) = mpsc::channel(EVENT_CAPACITY);
        Self {
            poller: StatusPoller::new(Arc::clone(&api), clock, config.poll_interval),
            api,
            tracked: None,
            session: None,
            generation: 0,
            tracked_tx,
            events_tx,
            events_rx,
            notice: None,
        }
    }

    /// The tracked task, if any.
    #[must_use]
    pub fn tracked(&self) -> Option<&TaskHandle> {
        self.tracked.as_ref()
    }

    /// Identifier of the tracked task, if any.
    #[must_use]
    pub fn tracked_id(&self) -> Option<&TaskIdentifier> {
        self.tracked.as_ref().map(TaskHandle::id)
    }

    /// Latest operator-facing message from a start or stop.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Returns `true` while a poll session is active.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.session.is_some()
    }

    /// Render model of the tracked task.
    #[must_use]
    pub fn render(&self) -> Option<RenderModel> {
        self.tracked.as_ref().map(|h| project(h.snapshot()))
    }

    /// Submits a job and, on success, begins tracking and polling it.
    ///
    /// A previously tracked task is no longer polled but keeps running on
    /// the server; starting never stops anything.
    ///
    /// # Errors
    /// Returns `StartError` if the payload is rejected or the server cannot
    /// be reached. Tracked state is left untouched in that case.
    pub async fn start(&mut self, form: &JobForm) -> Result<TaskIdentifier, StartError> {
        let started = match self.api.start(form).await {
            Ok(started) => started,
            Err(e) => {
                warn!(error = %e, "Start failed");
                log_audit(&AuditEvent::StartRejected {
                    reason: e.to_string(),
                });
                self.notice = Some(e.to_string());
                return Err(e);
            }
        };
        let id = started.id;

        if let Some(previous) = self.session.take() {
            info!(previous = %previous.id(), "Detaching from previous task");
            previous.cancel();
        }

        self.tracked = Some(TaskHandle::started(id.clone()));
        self.tracked_tx.send_replace(Some(id.clone()));
        self.generation += 1;
        self.session = Some(self.poller.spawn(
            self.generation,
            id.clone(),
            self.tracked_tx.subscribe(),
            self.events_tx.clone(),
        ));

        info!(task_id = %id, message = %started.message, "Task started");
        log_audit(&AuditEvent::TaskStarted {
            task_id: id.as_str(),
            message: &started.message,
        });
        self.notice = Some(started.message);
        Ok(id)
    }

    /// Requests termination of the task named by `raw_id`.
    ///
    /// The identifier need not be the tracked one. When it is, polling halts
    /// and the snapshot is marked as stopped.
    ///
    /// # Errors
    /// Returns `StopError::InvalidIdentifier` without any network call if
    /// `raw_id` is empty or malformed, `StopError::NotFound` if the server
    /// does not know the task, and `StopError::Transport` otherwise.
    pub async fn stop(&mut self, raw_id: &str) -> Result<Ack, StopError> {
        let result = match TaskIdentifier::parse(raw_id) {
            Ok(id) => self.api.stop(&id).await.map(|ack| (id, ack)),
            Err(e) => Err(StopError::from(e)),
        };

        let (id, ack) = match result {
            Ok(ok) => ok,
            Err(e) => {
                warn!(error = %e, "Stop failed");
                log_audit(&AuditEvent::StopRejected {
                    task_id: raw_id.trim(),
                    reason: e.to_string(),
                });
                self.notice = Some(e.to_string());
                return Err(e);
            }
        };

        let tracked = if let Some(handle) = self.tracked.as_mut().filter(|h| h.is(&id)) {
            if let Some(session) = self.session.take() {
                session.cancel();
            }
            handle.snapshot_mut().mark_stopped();
            info!(task_id = %id, "Tracked task stopped");
            true
        } else {
            info!(task_id = %id, "Stopped untracked task");
            false
        };
        log_audit(&AuditEvent::StopAcknowledged {
            task_id: id.as_str(),
            tracked,
        });

        self.notice = Some(ack.message.clone());
        Ok(ack)
    }

    /// Merges one poll event into the tracked snapshot.
    ///
    /// Events from any session other than the active one are discarded.
    /// Returns `true` if the event was applied.
    pub fn apply(&mut self, event: PollEvent) -> bool {
        let active = self
            .session
            .as_ref()
            .is_some_and(|s| s.generation() == event.session && s.id() == &event.task_id);
        let Some(handle) = self.tracked.as_mut().filter(|h| active && h.is(&event.task_id)) else {
            debug!(task_id = %event.task_id, session = event.session, "Discarding stale poll event");
            return false;
        };

        match event.outcome {
            PollOutcome::Updated(update) => {
                let outcome = handle.snapshot_mut().merge(update);
                debug!(
                    task_id = %event.task_id,
                    new_entries = outcome.new_entries,
                    replaced = outcome.replaced,
                    "Status merged"
                );
            }
            PollOutcome::Failed(error) => {
                handle.snapshot_mut().record_fault(error.reason());
            }
            PollOutcome::Finished(end) => {
                debug!(task_id = %event.task_id, end = ?end, "Poll session finished");
                self.session = None;
            }
        }
        true
    }

    /// Waits for the next poll event without applying it.
    ///
    /// Pending forever while nothing is being polled.
    pub async fn next_event(&mut self) -> Option<PollEvent> {
        self.events_rx.recv().await
    }

    /// Applies every event already queued. Returns how many were applied.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Applies events until the active session ends, calling `on_change`
    /// after every applied event.
    pub async fn follow<F>(&mut self, mut on_change: F)
    where
        F: FnMut(&TaskHandle),
    {
        while self.session.is_some() {
            let Some(event) = self.events_rx.recv().await else {
                break;
            };
            if self.apply(event) {
                if let Some(handle) = &self.tracked {
                    on_change(handle);
                }
            }
        }
    }

    /// Stops polling. The tracked task is kept for display.
    pub fn shutdown(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(task_id = %session.id(), "Cancelling poll session");
            session.cancel();
        }
    }
}

impl Drop for TaskController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
