//! API forwarding gateway.
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                  GATEWAY                     │
//!   Client Request   │  ┌────────┐    ┌──────────┐    ┌───────────┐ │
//!  ──────────────────┼─▶│  http  │───▶│ request  │───▶│ forwarder │─┼──▶ Upstream
//!                    │  │ server │    │ extract  │    │ +deadline │ │    origin
//!                    │  └────────┘    └──────────┘    └─────┬─────┘ │
//!   Client Response  │  ┌────────────────────────┐          │       │
//!  ◀─────────────────┼──│ relay reply / 502 env. │◀─────────┘       │
//!                    │  └────────────────────────┘                  │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use api_gateway::config::{resolve_config, ConfigOverrides};
use api_gateway::gateway::build_client;
use api_gateway::observability::{init_logging, init_metrics};
use api_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "api-gateway")]
#[command(about = "Forwards API requests to a single upstream origin", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Upstream origin URL (e.g. http://backend:9000).
    #[arg(long, env = "API_ORIGIN")]
    upstream_origin: Option<String>,

    /// Listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level when RUST_LOG is unset.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(
        cli.config.as_deref(),
        ConfigOverrides {
            upstream_origin: cli.upstream_origin,
            bind_address: cli.bind,
            log_level: cli.log_level,
        },
    )?;

    init_logging(&config.observability)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.origin,
        mount = %config.upstream.mount,
        timeout_ms = config.upstream.timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        init_metrics(addr)?;
    }

    let client = build_client()?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    let signals = shutdown.trigger_on_signal();

    let server = HttpServer::new(config, client);
    server.run(listener, shutdown_rx).await?;

    signals.abort();
    tracing::info!("Shutdown complete");
    Ok(())
}
