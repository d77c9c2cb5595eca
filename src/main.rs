//! Health-check aggregator (v1)
//!
//! A single endpoint answering "are my backends healthy?", built with Tokio
//! and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │               HEALTH AGGREGATOR              │
//!                          │                                              │
//!     GET /?allowed_to_fail│  ┌─────────┐    ┌─────────┐    ┌──────────┐  │
//!     ─────────────────────┼─▶│   net   │───▶│  http   │───▶│ dispatch │──┼──▶ HEAD /health_check
//!                          │  │listener │    │ server  │    │ (1 task  │  │    Host: <hostname>
//!                          │  └─────────┘    └─────────┘    │ per host)│◀─┼─── (one per hostname)
//!                          │                                └────┬─────┘  │
//!     200 / 500 + JSON     │                 ┌───────────┐       │        │
//!     ◀────────────────────┼─────────────────│ aggregate │◀──────┘        │
//!                          │                 └───────────┘                │
//!                          │  config · observability · lifecycle          │
//!                          └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use health_aggregator::config::load_config;
use health_aggregator::lifecycle;
use health_aggregator::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "health-aggregator")]
#[command(about = "Aggregate backend health checks behind one endpoint", long_about = None)]
struct Cli {
    /// The port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), cli.port) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("health-aggregator: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);

    tracing::info!("health-aggregator v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.bind_address(),
        hostnames = config.backend.hostnames.len(),
        backend_port = config.backend.port,
        "Configuration loaded"
    );

    if let Err(e) = lifecycle::run(config).await {
        tracing::error!(error = %e, "Fatal startup error");
        std::process::exit(1);
    }

    tracing::info!("Shutdown complete");
}
