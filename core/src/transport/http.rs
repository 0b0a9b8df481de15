//! HTTP implementation of [`TaskApi`].

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use tracing::{debug, warn};

use super::{JobForm, TaskApi};
use crate::error::{PollError, StartError, StopError};
use crate::protocol::wire::StopRequest;
use crate::protocol::{Ack, Started, interpret_start, interpret_status, interpret_stop};
use crate::task::{StatusUpdate, TaskIdentifier};

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Root of the job server; always ends with `/`.
    pub base_url: Url,
    /// Upper bound on a single request, `None` for the transport default.
    pub request_timeout: Option<Duration>,
}

impl HttpConfig {
    /// Creates a config with the default request timeout.
    #[must_use]
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }

    /// Sets the per-request timeout; `None` disables it.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Talks to the job server over HTTP.
pub struct HttpTaskApi {
    client: Client,
    config: HttpConfig,
}

impl HttpTaskApi {
    /// Creates the transport.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: HttpConfig) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    /// The server root requests are made against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, String> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| format!("Invalid URL join: {e}"))
    }

    fn status_url(&self, id: &TaskIdentifier) -> Result<Url, String> {
        let mut url = self.endpoint("status")?;
        url.query_pairs_mut().append_pair("task_id", id.as_str());
        Ok(url)
    }

    async fn multipart(form: &JobForm) -> Result<Form, StartError> {
        let mut body = Form::new();
        for (name, value) in form.fields() {
            body = body.text(name.clone(), value.clone());
        }
        for file in form.files() {
            let bytes = tokio::fs::read(&file.path).await.map_err(|e| {
                StartError::Validation(format!("cannot read {}: {e}", file.path.display()))
            })?;
            let part = Part::bytes(bytes).file_name(file_name(&file.path));
            body = body.part(file.name.clone(), part);
        }
        Ok(body)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned())
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    }
}

async fn read(res: Response) -> Result<(u16, String), String> {
    let status = res.status().as_u16();
    let body = res.text().await.map_err(|e| describe(&e))?;
    Ok((status, body))
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn start(&self, form: &JobForm) -> Result<Started, StartError> {
        form.validate()?;
        let body = Self::multipart(form).await?;
        let url = self.endpoint("").map_err(StartError::Transport)?;

        debug!(%url, fields = form.fields().len(), files = form.files().len(), "Submitting job");
        let res = self
            .client
            .post(url)
            .multipart(body)
            .send()
            .await
            .map_err(|e| StartError::Transport(describe(&e)))?;
        let (status, text) = read(res).await.map_err(StartError::Transport)?;

        interpret_start(status, &text).inspect_err(|e| warn!(status, error = %e, "Start rejected"))
    }

    async fn stop(&self, id: &TaskIdentifier) -> Result<Ack, StopError> {
        let url = self.endpoint("stop").map_err(StopError::Transport)?;

        debug!(task_id = %id, "Requesting stop");
        let res = self
            .client
            .post(url)
            .json(&StopRequest { task_id: id })
            .send()
            .await
            .map_err(|e| StopError::Transport(describe(&e)))?;
        let (status, text) = read(res).await.map_err(StopError::Transport)?;

        interpret_stop(id, status, &text)
    }

    async fn status(&self, id: &TaskIdentifier) -> Result<StatusUpdate, PollError> {
        let url = self.status_url(id).map_err(PollError::Transport)?;

        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PollError::Transport(describe(&e)))?;
        let (status, text) = read(res).await.map_err(PollError::Transport)?;

        interpret_status(status, &text)
    }
}
