//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by workflow, status
//! - `gateway_request_duration_seconds` (histogram): latency by workflow
//! - `gateway_config_reloads_total` (counter): reloads by result
//! - `gateway_capability_failures_total` (counter): engine failures by kind

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a tokio runtime. Failure is logged and the
/// gateway runs without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(workflow: &'static str, status: u16, start: Instant) {
    counter!("gateway_requests_total", "workflow" => workflow, "status" => status.to_string())
        .increment(1);
    histogram!("gateway_request_duration_seconds", "workflow" => workflow)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_config_reload(success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!("gateway_config_reloads_total", "result" => result).increment(1);
}

pub fn record_capability_failure(kind: &'static str) {
    counter!("gateway_capability_failures_total", "kind" => kind).increment(1);
}
