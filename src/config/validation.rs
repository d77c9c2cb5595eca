//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ports, timeouts)
//! - Reject hostnames that can never be sent as a Host header
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AggregatorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::HeaderValue;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::AggregatorConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend.hostnames must list at least one host")]
    NoHostnames,

    #[error("backend.hostnames contains an invalid Host header value: {0:?}")]
    InvalidHostname(String),

    #[error("{0} must not be 0")]
    ZeroPort(&'static str),

    #[error("backend.address must not be empty")]
    EmptyBackendAddress,

    #[error("backend.path must start with '/': {0:?}")]
    InvalidPath(String),

    #[error("backend.timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("observability.metrics_address is not a socket address: {0:?}")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &AggregatorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let backend = &config.backend;

    if backend.hostnames.is_empty() {
        errors.push(ValidationError::NoHostnames);
    }
    for hostname in &backend.hostnames {
        if hostname.is_empty() || HeaderValue::from_str(hostname).is_err() {
            errors.push(ValidationError::InvalidHostname(hostname.clone()));
        }
    }

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort("listener.port"));
    }
    if backend.port == 0 {
        errors.push(ValidationError::ZeroPort("backend.port"));
    }
    if backend.address.trim().is_empty() {
        errors.push(ValidationError::EmptyBackendAddress);
    }
    if !backend.path.starts_with('/') {
        errors.push(ValidationError::InvalidPath(backend.path.clone()));
    }
    if backend.timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
