use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use exec_backend::ExecutionBackend;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{GatewayError, GatewayResult};
use crate::run::{self, GatewayState};
use crate::stub::{self, StubState};

pub use exec_backend_remote::{DEFAULT_GRACE, DEFAULT_GRACE_MS};

pub const DEFAULT_PREFIX: &str = "/api/firecracker";
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Settings for the execution gateway router.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Mount point for `/run` and `/status/{vm_id}`. Empty or `/` mounts at the root.
    pub prefix: String,
    pub grace: Duration,
    pub max_body_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            grace: DEFAULT_GRACE,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Build the execution gateway app around a shared backend.
pub fn gateway_app(
    backend: Arc<dyn ExecutionBackend>,
    config: &GatewayConfig,
) -> GatewayResult<Router> {
    let prefix = normalize_prefix(&config.prefix)?;
    let routes = run::routes(GatewayState::new(backend, config.grace));
    let router = if prefix.is_empty() {
        routes
    } else {
        Router::new().nest(&prefix, routes)
    };
    Ok(common_layers(
        router.layer(DefaultBodyLimit::max(config.max_body_bytes)),
    ))
}

/// Build the placeholder API app.
pub fn stub_app(environment: &str) -> Router {
    common_layers(stub::routes(StubState::new(environment)))
}

fn common_layers(router: Router) -> Router {
    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// `"/api/fc/"` becomes `"/api/fc"`, `"/"` becomes `""`.
fn normalize_prefix(raw: &str) -> GatewayResult<String> {
    let prefix = raw.trim().trim_end_matches('/');
    if prefix.is_empty() {
        return Ok(String::new());
    }
    if !prefix.starts_with('/') {
        return Err(GatewayError::Config(format!(
            "prefix {raw:?} must start with '/'"
        )));
    }
    if prefix.contains(['{', '}', '*']) {
        return Err(GatewayError::Config(format!(
            "prefix {raw:?} must be a literal path"
        )));
    }
    Ok(prefix.to_string())
}

/// Serve `router` until SIGTERM or SIGINT, then drain in-flight requests.
pub async fn serve(listener: TcpListener, router: Router) -> GatewayResult<()> {
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate()).ok();
    let mut sigint = signal(SignalKind::interrupt()).ok();

    tokio::select! {
        _ = recv_signal(&mut sigterm) => info!("received SIGTERM, shutting down"),
        _ = recv_signal(&mut sigint) => info!("received SIGINT, shutting down"),
    }
}

/// Await a signal if registered, or pend forever if registration failed.
async fn recv_signal(sig: &mut Option<tokio::signal::unix::Signal>) {
    match sig {
        Some(s) => {
            s.recv().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_normalized() {
        assert_eq!(normalize_prefix("/api/firecracker").unwrap(), "/api/firecracker");
        assert_eq!(normalize_prefix(" /api/fc/ ").unwrap(), "/api/fc");
        assert_eq!(normalize_prefix("/").unwrap(), "");
        assert_eq!(normalize_prefix("").unwrap(), "");
    }

    #[test]
    fn default_grace_matches_cli_default() {
        let config = GatewayConfig::default();
        assert_eq!(config.grace, Duration::from_millis(DEFAULT_GRACE_MS));
        assert_eq!(config.grace, exec_backend_remote::DEFAULT_GRACE);
    }

    #[test]
    fn prefix_must_be_absolute_literal() {
        assert!(normalize_prefix("api").is_err());
        assert!(normalize_prefix("/api/{id}").is_err());
        assert!(normalize_prefix("/api/*rest").is_err());
    }
}
