//! Single-Upstream Website Mirror
//!
//! Re-serves one fixed upstream site under the mirror's own host,
//! rewriting links, form actions, and stylesheet references in the
//! response body so they point back at the mirror.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌────────────────────────────────────────────────┐
//!                   │                    MIRROR                       │
//!                   │                                                 │
//!  Client Request   │  ┌─────────┐   ┌───────────┐   ┌───────────┐   │
//!  ─────────────────┼─▶│  http   │──▶│ validator │──▶│  fetcher  │───┼──▶ Upstream
//!                   │  │ server  │   │(allowlist)│   │ (reqwest) │   │    Origin
//!                   │  └─────────┘   └───────────┘   └─────┬─────┘   │
//!                   │                                      │         │
//!  Client Response  │  ┌──────────┐   ┌──────────┐         ▼         │
//!  ◀────────────────┼──│ security │◀──│ rewriter │◀── raw body ◀─────┼──── Upstream
//!                   │  │ headers  │   │ (regex)  │                   │     Response
//!                   │  └──────────┘   └──────────┘                   │
//!                   │                                                 │
//!                   │  config / lifecycle / tracing (cross-cutting)   │
//!                   └────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use site_mirror::config::{load_config, MirrorConfig};
use site_mirror::http::MirrorServer;
use site_mirror::lifecycle::Shutdown;

#[derive(Parser, Debug)]
#[command(name = "site-mirror", about = "Mirror a single upstream website under this host")]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => MirrorConfig::default(),
    };

    // Initialize tracing subscriber; RUST_LOG wins over the config level.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "site_mirror={},tower_http=info",
                    config.observability.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("site-mirror v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        target_url = %config.upstream.target_url,
        allowed_hosts = ?config.upstream.allowed_hosts,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = MirrorServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
