use std::net::{Ipv4Addr, SocketAddr};

use clap::Args;
use gateway::GatewayResult;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Args)]
pub struct StubArgs {
    /// Port to listen on (all interfaces)
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
    /// Environment name reported by /api/health
    #[arg(long, env = "NODE_ENV", default_value = "production")]
    pub environment: String,
}

pub async fn run_stub(args: StubArgs) -> GatewayResult<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, args.port));
    let listener = TcpListener::bind(addr).await?;
    info!(environment = %args.environment, "stub api server starting");
    gateway::serve(listener, gateway::stub_app(&args.environment)).await
}
