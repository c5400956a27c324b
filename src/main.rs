//! Contract Intake Gateway
//!
//! A small HTTP service in front of a workflow-automation webhook.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────┐
//!                    │               INTAKE GATEWAY                   │
//!                    │                                                │
//!   Form POST        │  ┌──────────┐   ┌───────────┐   ┌──────────┐  │
//!   ─────────────────┼─▶│ security │──▶│submission │──▶│ webhook  │──┼──▶ Workflow
//!                    │  │ gates    │   │ validate+ │   │ client   │  │    webhook
//!                    │  │ (ct/csrf/│   │ sanitize  │   │ (reqwest)│  │
//!                    │  │  limits) │   └───────────┘   └──────────┘  │
//!                    │  └──────────┘                                 │
//!                    │                                                │
//!                    │  ┌──────────────────────────────────────────┐ │
//!                    │  │          Cross-Cutting Concerns          │ │
//!                    │  │  config · observability · lifecycle      │ │
//!                    │  └──────────────────────────────────────────┘ │
//!                    └────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use contract_gateway::config::loader::load_config;
use contract_gateway::lifecycle::Shutdown;
use contract_gateway::observability::{logging, metrics};
use contract_gateway::HttpServer;

#[derive(Debug, Parser)]
#[command(name = "contract-gateway", version, about = "Contract intake gateway")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        webhook_url = %config.webhook.url,
        allowed_origins = config.cors.allowed_origins.len(),
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config)?;

    // Periodic eviction keeps the limiter table bounded to active clients.
    let limiter = server.limiter();
    let mut sweep_shutdown = shutdown.subscribe();
    let sweep_interval = Duration::from_secs(config.rate_limit.sweep_interval_secs.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    limiter.sweep();
                    metrics::record_tracked_clients(limiter.tracked_clients());
                }
                _ = sweep_shutdown.recv() => break,
            }
        }
    });

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
