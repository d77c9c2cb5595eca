//! HTTP server setup and the aggregate handler.
//!
//! # Responsibilities
//! - Create the Axum Router; every method and path reaches the same handler
//! - Wire up middleware (request ID, tracing)
//! - Run one dispatch round per request and answer with the aggregate
//! - Serve until the shutdown signal fires

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::AggregatorConfig;
use crate::health::{aggregate, Dispatcher, FilterSet, HttpProber, Probe, ProbeError};
use crate::http::request::{make_span, x_request_id, MakeRequestUuidV4};
use crate::observability::metrics;

/// Query parameter listing hosts whose failure is ignored.
pub const ALLOWED_TO_FAIL_PARAM: &str = "allowed_to_fail";

/// Query parameter listing hosts that must succeed.
pub const MUST_SUCCEED_PARAM: &str = "must_succeed";

/// Application state injected into handlers.
pub struct AppState<P> {
    pub dispatcher: Dispatcher<P>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

/// HTTP server for the aggregator.
pub struct HttpServer {
    router: Router,
    config: AggregatorConfig,
}

impl HttpServer {
    /// Create a server probing over HTTP as configured.
    pub fn new(config: AggregatorConfig) -> Result<Self, ProbeError> {
        let prober = HttpProber::new(&config.backend)?;
        tracing::info!(
            target_uri = %prober.target(),
            hostnames = ?config.backend.hostnames,
            timeout_secs = ?config.backend.timeout_secs,
            "Prober configured"
        );
        Ok(Self::with_prober(config, prober))
    }

    /// Create a server with a custom probe transport.
    pub fn with_prober<P: Probe>(config: AggregatorConfig, prober: P) -> Self {
        let dispatcher = Dispatcher::new(prober, config.backend.hostnames.clone());
        let router = Self::build_router(AppState { dispatcher });
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router<P: Probe>(state: AppState<P>) -> Router {
        Router::new()
            .fallback(aggregate_handler::<P>)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(x_request_id(), MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http().make_span_with(make_span))
                    .layer(PropagateRequestIdLayer::new(x_request_id())),
            )
    }

    /// The router, for embedding or in-process testing.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            hostnames = self.config.backend.hostnames.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// First value of `name`, or the empty string when absent.
fn first_param<'a>(params: &'a [(String, String)], name: &str) -> &'a str {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .unwrap_or("")
}

/// Probe every configured host and report the aggregate.
///
/// Method and path are ignored.
async fn aggregate_handler<P: Probe>(
    State(state): State<AppState<P>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let start = Instant::now();
    let filters = FilterSet::from_query(
        first_param(&params, ALLOWED_TO_FAIL_PARAM),
        first_param(&params, MUST_SUCCEED_PARAM),
    );

    let results = state.dispatcher.dispatch_all().await;
    let agg = aggregate(&results, &filters);

    tracing::info!(
        hosts = results.len(),
        verdict = agg.verdict.as_str(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Health round complete"
    );
    metrics::record_aggregate(agg.verdict);

    let body = match serde_json::to_vec(&agg.hosts) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize health report");
            Vec::new()
        }
    };

    let status = if agg.is_failure() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };

    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
