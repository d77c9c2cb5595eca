//! Concurrent fan-out of probes.
//!
//! # Responsibilities
//! - Spawn one probe task per configured hostname
//! - Collect exactly one result per hostname before returning
//!
//! # Design Decisions
//! - Results flow through a channel sized to the host count; each task sends once
//! - No overall deadline; a hung probe holds the round open unless a per-probe
//!   timeout is configured
//! - Spawned probes are detached, so they finish even if the caller goes away

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::health::probe::{CheckResult, Probe};

/// Runs one round of probes against every configured hostname.
#[derive(Debug)]
pub struct Dispatcher<P> {
    prober: Arc<P>,
    hostnames: Arc<[String]>,
}

impl<P> Clone for Dispatcher<P> {
    fn clone(&self) -> Self {
        Self {
            prober: Arc::clone(&self.prober),
            hostnames: Arc::clone(&self.hostnames),
        }
    }
}

impl<P: Probe> Dispatcher<P> {
    pub fn new(prober: P, hostnames: Vec<String>) -> Self {
        Self {
            prober: Arc::new(prober),
            hostnames: hostnames.into(),
        }
    }

    /// Configured hostnames, in configuration order.
    pub fn hostnames(&self) -> &[String] {
        &self.hostnames
    }

    /// Probe every hostname concurrently.
    ///
    /// Returns one result per configured hostname, in arrival order.
    pub async fn dispatch_all(&self) -> Vec<CheckResult> {
        let expected = self.hostnames.len();
        if expected == 0 {
            return Vec::new();
        }

        let (tx, mut rx) = mpsc::channel(expected);
        for hostname in self.hostnames.iter().cloned() {
            let prober = Arc::clone(&self.prober);
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = prober.probe(&hostname).await;
                // The receiver only goes away if the caller was dropped.
                let _ = tx.send(result).await;
            });
        }
        drop(tx);

        let mut pending: Vec<&str> = self.hostnames.iter().map(String::as_str).collect();
        let mut results = Vec::with_capacity(expected);
        while let Some(result) = rx.recv().await {
            if let Some(pos) = pending.iter().position(|h| *h == result.hostname) {
                pending.swap_remove(pos);
            }
            results.push(result);
        }

        // Every sender is gone; anything still pending lost its task.
        for hostname in pending {
            tracing::error!(hostname, "Probe task exited without a result");
            results.push(CheckResult::unreachable(hostname));
        }

        debug_assert_eq!(results.len(), expected);
        results
    }
}
