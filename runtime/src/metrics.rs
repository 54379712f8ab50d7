//! Prometheus metrics for observability and monitoring.
//!
//! Metric names recorded across the workspace:
//! - Store: actions processed, reducer latency, effects executed
//! - Reconciler: renders, store failures surfaced to the user
//! - Todo client: requests, request latency, request errors
//!
//! # Example
//!
//! ```rust,no_run
//! use todo_sync_runtime::metrics::MetricsServer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut server = MetricsServer::new("0.0.0.0:9090".parse()?);
//! server.start()?;
//! // Metrics available at http://localhost:9090/metrics
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other crates
pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics recorder
    #[error("Failed to install metrics recorder: {0}")]
    Install(String),
}

/// Prometheus metrics server.
///
/// Exposes metrics on an HTTP endpoint for Prometheus scraping.
pub struct MetricsServer {
    addr: SocketAddr,
    handle: Option<PrometheusHandle>,
}

impl MetricsServer {
    /// Create a new metrics server bound to `addr` once started
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self { addr, handle: None }
    }

    /// Install the global recorder and start serving `/metrics`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the exporter cannot be built or a recorder is
    /// already installed.
    pub fn start(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let (recorder, exporter) = PrometheusBuilder::new()
            .with_http_listener(self.addr)
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?
            .build()
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        let handle = recorder.handle();
        metrics::set_global_recorder(recorder)
            .map_err(|e| MetricsError::Install(e.to_string()))?;

        tokio::spawn(async move {
            if exporter.await.is_err() {
                tracing::error!("Metrics exporter stopped");
            }
        });

        tracing::info!(addr = %self.addr, "Metrics available at http://{}/metrics", self.addr);
        self.handle = Some(handle);
        Ok(())
    }

    /// Address the exporter listens on
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if the server hasn't been started.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
pub fn register_metrics() {
    // Store
    describe_counter!("store_actions_total", "Total number of actions reduced by the store");
    describe_counter!(
        "store_rejected_actions_total",
        "Actions rejected because the store was shutting down"
    );
    describe_histogram!("store_reducer_duration_seconds", "Time spent inside the reducer");
    describe_histogram!("store_effects_per_action", "Number of effects returned per action");
    describe_counter!("store_effects_executed_total", "Effects executed, by effect type");

    // Reconciler
    describe_counter!("reconciler_renders_total", "Render snapshots handed to the presenter");
    describe_counter!(
        "reconciler_store_failures_total",
        "Todo store failures surfaced to the user, by operation and kind"
    );

    // Todo client
    describe_counter!("todo_client_requests_total", "Requests sent to the todo store");
    describe_counter!("todo_client_errors_total", "Failed todo store requests");
    describe_histogram!(
        "todo_client_request_duration_seconds",
        "Round-trip time of todo store requests"
    );
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record one reducer call.
    #[allow(clippy::cast_precision_loss)] // effect counts are tiny
    pub fn record_action(duration: Duration, effects: usize) {
        counter!("store_actions_total").increment(1);
        histogram!("store_reducer_duration_seconds").record(duration.as_secs_f64());
        histogram!("store_effects_per_action").record(effects as f64);
    }

    /// Record an action rejected during shutdown.
    pub fn record_rejected() {
        counter!("store_rejected_actions_total").increment(1);
    }

    /// Record an effect execution.
    pub fn record_effect(kind: &'static str) {
        counter!("store_effects_executed_total", "type" => kind).increment(1);
    }
}

/// Reconciler metrics recorder.
pub struct ReconcilerMetrics;

impl ReconcilerMetrics {
    /// Record a snapshot handed to the presenter.
    pub fn record_render() {
        counter!("reconciler_renders_total").increment(1);
    }

    /// Record a store failure surfaced to the user.
    pub fn record_store_failure(operation: &'static str, kind: &'static str) {
        counter!(
            "reconciler_store_failures_total",
            "operation" => operation,
            "kind" => kind
        )
        .increment(1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn server_starts_without_handle() {
        let server = MetricsServer::new("127.0.0.1:0".parse().unwrap());
        assert!(server.handle().is_none());
        assert!(server.render().is_none());
    }

    #[test]
    fn recording_without_recorder_is_a_no_op() {
        register_metrics();
        StoreMetrics::record_action(Duration::from_millis(1), 2);
        StoreMetrics::record_effect("future");
        ReconcilerMetrics::record_render();
        ReconcilerMetrics::record_store_failure("list", "network");
    }
}
