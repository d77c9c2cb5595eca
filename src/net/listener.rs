//! TCP listener setup.
//!
//! # Responsibilities
//! - Resolve the configured bind address
//! - Bind the socket the HTTP server accepts on
//!
//! Failing to bind is the one fatal startup error besides bad configuration.

use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("invalid bind address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Bind to the configured host and port.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, ListenerError> {
    let raw = format!("{}:{}", config.host, config.port);
    let address: SocketAddr = raw.parse().map_err(|source| ListenerError::Address {
        address: raw.clone(),
        source,
    })?;

    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ListenerError::Bind { address, source })?;

    let local_addr = listener
        .local_addr()
        .map_err(|source| ListenerError::Bind { address, source })?;
    tracing::info!(address = %local_addr, "Listener bound");

    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binds_configured_address() {
        let probe = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = probe.local_addr().unwrap().port();
        drop(probe);

        let config = ListenerConfig {
            host: "127.0.0.1".into(),
            port,
        };
        let listener = bind(&config).await.unwrap();
        assert_eq!(listener.local_addr().unwrap().port(), port);
    }

    #[tokio::test]
    async fn port_in_use_is_bind_error() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = ListenerConfig {
            host: "127.0.0.1".into(),
            port: taken.local_addr().unwrap().port(),
        };
        assert!(matches!(bind(&config).await, Err(ListenerError::Bind { .. })));
    }

    #[tokio::test]
    async fn hostname_is_not_an_address() {
        let config = ListenerConfig {
            host: "localhost".into(),
            port: 9292,
        };
        assert!(matches!(bind(&config).await, Err(ListenerError::Address { .. })));
    }
}
