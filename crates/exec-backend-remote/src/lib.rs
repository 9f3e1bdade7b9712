//! HTTP client for a Firecracker execution service.
//!
//! Wire format:
//! - `POST {base}/execute` with `{"files": {name: content}, "language", "timeoutMs"}`,
//!   answered by an execution result object.
//! - `GET {base}/vms/{vmId}/status`, answered by an arbitrary JSON value.

mod backend;
mod config;

pub use backend::RemoteBackend;
pub use config::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_GRACE, DEFAULT_GRACE_MS, RemoteConfig, STATUS_TIMEOUT,
};
