//! Health-check aggregator library.
//!
//! Fans out HEAD probes to a configured set of hosts and reports a combined
//! verdict plus per-host status codes as JSON.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::schema::AggregatorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
