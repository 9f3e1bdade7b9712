use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use exec_backend::{BackendError, ExecutionBackend, ExecutionResult, FileMap, Result, VmStatus};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{RemoteConfig, STATUS_TIMEOUT};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteBody<'a> {
    files: &'a FileMap,
    language: &'a str,
    timeout_ms: u64,
}

/// [`ExecutionBackend`] that forwards to a Firecracker service over HTTP.
///
/// Owns the connection pool. Clone is a cheap Arc refcount bump, so one
/// instance can be shared by every request handler.
#[derive(Clone)]
pub struct RemoteBackend {
    inner: Arc<Inner>,
}

struct Inner {
    client: Client,
    base_url: Url,
    token: Option<String>,
    grace: Duration,
}

impl RemoteBackend {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let base_url = config.parsed_base_url()?;
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| BackendError::InvalidConfig(format!("http client: {e}")))?;

        info!(
            base_url = %base_url,
            auth = config.token.is_some(),
            "remote backend initialized"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                base_url,
                token: config.token,
                grace: config.grace,
            }),
        })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        let base = &self.inner.base_url;
        url.path_segments_mut()
            .map_err(|()| BackendError::InvalidConfig(format!("base url {base} cannot be a base")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, timeout: Duration) -> RequestBuilder {
        let mut req = self.inner.client.request(method, url).timeout(timeout);
        if let Some(token) = &self.inner.token {
            req = req.bearer_auth(token);
        }
        req
    }
}

/// Turn a non-2xx response into [`BackendError::Status`].
async fn check_status(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    warn!(status = %status, "{what} rejected by backend: {body}");
    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ExecutionBackend for RemoteBackend {
    fn name(&self) -> &str {
        "remote"
    }

    async fn execute_code(
        &self,
        files: &FileMap,
        language: &str,
        timeout: Duration,
    ) -> Result<ExecutionResult> {
        let url = self.url(&["execute"])?;
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        let body = ExecuteBody {
            files,
            language,
            timeout_ms,
        };

        debug!(url = %url, files = files.len(), language, timeout_ms, "forwarding execution");

        let resp = self
            .request(Method::POST, url, timeout.saturating_add(self.inner.grace))
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Transport(format!("execute: {e}")))?;

        let resp = check_status(resp, "execute").await?;

        resp.json()
            .await
            .map_err(|e| BackendError::Decode(format!("execute: {e}")))
    }

    async fn vm_status(&self, vm_id: &str) -> Result<VmStatus> {
        let url = self.url(&["vms", vm_id, "status"])?;

        let resp = self
            .request(Method::GET, url, STATUS_TIMEOUT)
            .send()
            .await
            .map_err(|e| BackendError::Transport(format!("status: {e}")))?;

        let resp = check_status(resp, "status").await?;

        resp.json()
            .await
            .map(VmStatus)
            .map_err(|e| BackendError::Decode(format!("status: {e}")))
    }
}
