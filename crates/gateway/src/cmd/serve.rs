use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use exec_backend_remote::{RemoteBackend, RemoteConfig};
use gateway::server::{DEFAULT_GRACE_MS, DEFAULT_MAX_BODY_BYTES, DEFAULT_PREFIX};
use gateway::{GatewayConfig, GatewayResult};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "GATEWAY_BIND", default_value = "0.0.0.0:3001")]
    pub bind: SocketAddr,
    /// Path prefix for the gateway routes
    #[arg(long, env = "GATEWAY_PREFIX", default_value = DEFAULT_PREFIX)]
    pub prefix: String,
    /// Base URL of the Firecracker service
    #[arg(long, env = "FIRECRACKER_SERVICE_URL")]
    pub backend_url: String,
    /// Bearer token for the Firecracker service
    #[arg(long, env = "FIRECRACKER_SERVICE_TOKEN", hide_env_values = true)]
    pub backend_token: Option<String>,
    /// Extra time (ms) allowed on top of a request's timeout before giving up
    #[arg(long, env = "GATEWAY_TIMEOUT_GRACE_MS", default_value_t = DEFAULT_GRACE_MS)]
    pub grace_ms: u64,
    /// Largest accepted request body in bytes
    #[arg(long, env = "GATEWAY_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}

pub async fn run_serve(args: ServeArgs) -> GatewayResult<()> {
    let grace = Duration::from_millis(args.grace_ms);
    let backend = RemoteBackend::new(
        RemoteConfig::new(args.backend_url)
            .with_token(args.backend_token)
            .with_grace(grace),
    )?;

    let config = GatewayConfig {
        prefix: args.prefix,
        grace,
        max_body_bytes: args.max_body_bytes,
    };
    let app = gateway::gateway_app(Arc::new(backend), &config)?;

    let listener = TcpListener::bind(args.bind).await?;
    info!(prefix = %config.prefix, grace_ms = args.grace_ms, "execution gateway starting");
    gateway::serve(listener, app).await
}
