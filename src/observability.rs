//! Observability: tracing subscriber setup and in-process counters

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber, honouring `RUST_LOG` (default `info`)
///
/// Logs go to stderr; stdout carries only command output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    requests_received: AtomicU64,
    links_rejected: AtomicU64,
    links_resolved: AtomicU64,
    resolutions_failed: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_received(&self) {
        self.requests_received.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "requests_received", "Metric incremented");
    }

    pub fn link_rejected(&self) {
        self.links_rejected.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "links_rejected", "Metric incremented");
    }

    pub fn link_resolved(&self) {
        self.links_resolved.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "links_resolved", "Metric incremented");
    }

    pub fn resolution_failed(&self) {
        self.resolutions_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "resolutions_failed", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_received: self.requests_received.load(Ordering::Relaxed),
            links_rejected: self.links_rejected.load(Ordering::Relaxed),
            links_resolved: self.links_resolved.load(Ordering::Relaxed),
            resolutions_failed: self.resolutions_failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub requests_received: u64,
    pub links_rejected: u64,
    pub links_resolved: u64,
    pub resolutions_failed: u64,
}
