//! Shared test utilities for integration tests.
//!
//! Provides a mock job server with helpers for mounting the three endpoints
//! and a controller wired to it with a short poll interval.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::Url;
use serde_json::Value;
use taskwatch_core::poller::{PollEvent, TokioClock};
use taskwatch_core::{ControllerConfig, HttpConfig, HttpTaskApi, JobForm, TaskController};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Poll interval used by every test controller.
pub const FAST_POLL: Duration = Duration::from_millis(50);

/// Upper bound on how long a test waits for the poller.
pub const PATIENCE: Duration = Duration::from_secs(5);

/// A mock job server and a controller pointed at it.
pub struct TestContext {
    /// The mock job server.
    pub server: MockServer,
    /// Controller under test.
    pub controller: TaskController,
}

impl TestContext {
    /// Starts a mock server and a controller polling it every [`FAST_POLL`].
    pub async fn new() -> Result<Self> {
        Self::with_interval(FAST_POLL).await
    }

    /// Like [`new`](Self::new) with a custom poll interval.
    pub async fn with_interval(poll_interval: Duration) -> Result<Self> {
        let server = MockServer::start().await;
        let config = HttpConfig::new(Url::parse(&server.uri())?)
            .with_request_timeout(Some(Duration::from_secs(2)));
        let api = Arc::new(HttpTaskApi::new(config)?);
        let controller =
            TaskController::new(api, Arc::new(TokioClock), ControllerConfig { poll_interval });
        Ok(Self { server, controller })
    }

    /// Number of `GET /status` requests received for `task_id`.
    pub async fn status_requests(&self, task_id: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == "/status")
            .filter(|r| r.url.query_pairs().any(|(k, v)| k == "task_id" && v == task_id))
            .count()
    }

    /// Number of requests received on `path`.
    pub async fn requests_to(&self, endpoint: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == endpoint)
            .count()
    }

    /// Waits for the next poll event and applies it. Returns `false` if the
    /// event was stale.
    pub async fn apply_next(&mut self) -> Result<bool> {
        let event: PollEvent = tokio::time::timeout(PATIENCE, self.controller.next_event())
            .await?
            .ok_or_else(|| anyhow::anyhow!("event channel closed"))?;
        Ok(self.controller.apply(event))
    }
}

/// A minimal valid job form.
pub fn job_form() -> JobForm {
    JobForm::new()
        .with_field("post_ids", "111,222")
        .with_field("comments", "nice post")
        .with_field("delay", "1")
}

/// Mounts `POST /` answering with `task_id` for at most `times` requests.
pub async fn mount_start(server: &MockServer, task_id: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task_id": task_id,
            "message": format!("Commenting started for {task_id}"),
        })))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

/// Mounts `GET /status?task_id=` answering with `body` for at most `times`
/// requests, or forever if `times` is `None`.
pub async fn mount_status(server: &MockServer, task_id: &str, body: Value, times: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path("/status"))
        .and(query_param("task_id", task_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(body));
    let mock = match times {
        Some(n) => mock.up_to_n_times(n),
        None => mock,
    };
    mock.mount(server).await;
}

/// Mounts `GET /status?task_id=` answering with a bare HTTP status once.
pub async fn mount_status_failure(server: &MockServer, task_id: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path("/status"))
        .and(query_param("task_id", task_id))
        .respond_with(ResponseTemplate::new(status))
        .up_to_n_times(1)
        .mount(server)
        .await;
}
