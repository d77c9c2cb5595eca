//! Metrics collection and exposition.
//!
//! # Metrics
//! - `health_probe_total` (counter): probes by hostname and check result
//! - `health_probe_duration_seconds` (histogram): probe latency by hostname
//! - `health_aggregate_total` (counter): aggregated requests by verdict
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::health::Outcome;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe(hostname: &str, outcome: Outcome, start: Instant) {
    counter!(
        "health_probe_total",
        "hostname" => hostname.to_string(),
        "check" => outcome.as_str()
    )
    .increment(1);
    histogram!("health_probe_duration_seconds", "hostname" => hostname.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_aggregate(verdict: Outcome) {
    counter!("health_aggregate_total", "verdict" => verdict.as_str()).increment(1);
}
