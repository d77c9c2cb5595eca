//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every section carries `#[serde(default)]` so a minimal file only needs
//! the hostnames to probe.

use serde::{Deserialize, Serialize};

/// Root configuration for the aggregator.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Targets and probe settings.
    pub backend: BackendConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl AggregatorConfig {
    /// Address the listener binds to, e.g. `0.0.0.0:9292`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listener.host, self.listener.port)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to listen on.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9292,
        }
    }
}

/// Probe targets and how each probe request is built.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Host header values probed on every request, in order.
    pub hostnames: Vec<String>,

    /// Local address every probe connects to.
    pub address: String,

    /// Port on the local address (usually 80).
    pub port: u16,

    /// Path requested with HEAD.
    pub path: String,

    /// Value sent in `X-Forwarded-Proto`.
    pub forwarded_proto: String,

    /// Per-probe timeout in seconds. Unset means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            hostnames: Vec::new(),
            address: "127.0.0.1".to_string(),
            port: 80,
            path: "/health_check".to_string(),
            forwarded_proto: "https".to_string(),
            timeout_secs: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Fallback filter directive when `RUST_LOG` is not set.
    pub log_level: String,

    /// Human readable or JSON lines.
    pub log_format: LogFormat,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "health_aggregator=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
