//! Single-host health probes.
//!
//! # Responsibilities
//! - Build the HEAD request for one hostname
//! - Classify the response into an [`Outcome`]
//! - Map every transport problem to a failed [`CheckResult`]

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, StatusCode, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde::Serialize;
use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::BackendConfig;
use crate::observability::metrics;

/// Header telling the backend the original request arrived over TLS.
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Classification of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// `Success` for 200..=209, `Failure` for anything else.
    pub fn from_status(status: StatusCode) -> Self {
        if (200..=209).contains(&status.as_u16()) {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }

    pub fn is_failure(&self) -> bool {
        *self == Outcome::Failure
    }
}

/// Result of probing one hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub hostname: String,
    /// `None` when no response was obtained.
    pub status: Option<StatusCode>,
    pub outcome: Outcome,
}

impl CheckResult {
    /// Result for a probe that produced a response.
    pub fn from_response(hostname: impl Into<String>, status: StatusCode) -> Self {
        Self {
            hostname: hostname.into(),
            status: Some(status),
            outcome: Outcome::from_status(status),
        }
    }

    /// Result for a probe that produced no response.
    pub fn unreachable(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            status: None,
            outcome: Outcome::Failure,
        }
    }

    /// Numeric status, 0 when there was no response.
    pub fn status_code(&self) -> u16 {
        self.status.map(|s| s.as_u16()).unwrap_or(0)
    }
}

/// Why a probe produced no response.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid probe request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("connection error: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Transport seam used by the dispatcher.
pub trait Probe: Send + Sync + 'static {
    /// Probe one hostname. Never fails: errors become failed results.
    fn probe(&self, hostname: &str) -> impl Future<Output = CheckResult> + Send;
}

/// Probes hosts with a HEAD request to a shared local address.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client<HttpConnector, Body>,
    target: Uri,
    forwarded_proto: HeaderValue,
    timeout: Option<Duration>,
}

impl HttpProber {
    /// Build a prober from the backend section of the configuration.
    pub fn new(config: &BackendConfig) -> Result<Self, ProbeError> {
        let target = Uri::builder()
            .scheme("http")
            .authority(format!("{}:{}", config.address, config.port))
            .path_and_query(config.path.as_str())
            .build()?;
        let forwarded_proto = HeaderValue::from_str(&config.forwarded_proto)
            .map_err(axum::http::Error::from)?;

        // Pooled connections are fine; every probe still sends exactly one request.
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            client,
            target,
            forwarded_proto,
            timeout: config.timeout_secs.map(Duration::from_secs),
        })
    }

    /// URI every probe is sent to.
    pub fn target(&self) -> &Uri {
        &self.target
    }

    async fn send(&self, hostname: &str) -> Result<StatusCode, ProbeError> {
        let request = Request::builder()
            .method(Method::HEAD)
            .uri(self.target.clone())
            .header(header::HOST, hostname)
            .header(X_FORWARDED_PROTO, self.forwarded_proto.clone())
            .body(Body::empty())?;

        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.client.request(request))
                .await
                .map_err(|_| ProbeError::Timeout(limit))??,
            None => self.client.request(request).await?,
        };

        // The body is dropped unread; this releases the connection.
        Ok(response.status())
    }
}

impl Probe for HttpProber {
    async fn probe(&self, hostname: &str) -> CheckResult {
        let start = Instant::now();

        let result = match self.send(hostname).await {
            Ok(status) => {
                let result = CheckResult::from_response(hostname, status);
                if result.outcome.is_failure() {
                    tracing::warn!(hostname, status = %status, "Health check failed: status out of range");
                } else {
                    tracing::debug!(hostname, status = %status, "Health check passed");
                }
                result
            }
            Err(e) => {
                tracing::warn!(hostname, error = %e, "Health check failed: no response");
                CheckResult::unreachable(hostname)
            }
        };

        metrics::record_probe(hostname, result.outcome, start);
        result
    }
}
