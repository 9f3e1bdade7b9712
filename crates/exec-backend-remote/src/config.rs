use std::time::Duration;

use exec_backend::{BackendError, Result};
use url::Url;

/// Time allowed to establish a TCP/TLS connection to the service.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Slack added on top of the guest timeout before the HTTP call is abandoned.
pub const DEFAULT_GRACE_MS: u64 = 5000;
pub const DEFAULT_GRACE: Duration = Duration::from_millis(DEFAULT_GRACE_MS);
/// Timeout for status lookups, which never run guest code.
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how to reach the Firecracker service.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    /// Sent as a bearer token when present.
    pub token: Option<String>,
    pub connect_timeout: Duration,
    pub grace: Duration,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            grace: DEFAULT_GRACE,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Parse and check `base_url`. Only `http` and `https` are accepted.
    pub(crate) fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| BackendError::InvalidConfig(format!("base url {}: {e}", self.base_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(BackendError::InvalidConfig(format!(
                "base url {}: unsupported scheme {other}",
                self.base_url
            ))),
        }
    }
}
