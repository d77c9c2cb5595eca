//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Bind the listener and build the server
//! - Forward OS signals into the shutdown broadcast
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last, after every other subsystem is ready

use thiserror::Error;

use crate::config::AggregatorConfig;
use crate::health::ProbeError;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::net::{self, ListenerError};
use crate::observability::metrics;

/// Errors that stop the process.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("failed to build prober: {0}")]
    Prober(#[from] ProbeError),

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Run the aggregator until a termination signal arrives.
pub async fn run(config: AggregatorConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener_config = config.listener.clone();
    let server = HttpServer::new(config)?;
    let listener = net::bind(&listener_config).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::forward_signals(shutdown));

    server.run(listener, server_shutdown).await?;
    Ok(())
}
