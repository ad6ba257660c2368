//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): forwarded requests by route, status
//! - `gateway_upstream_duration_seconds` (histogram): upstream latency by route
//! - `gateway_upstream_failures_total` (counter): transport or decode failures
//!
//! Recording is a no-op until a recorder is installed, so handlers and
//! tests run the same code with or without the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder with an HTTP scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(route: &'static str, status: u16) {
    ::metrics::counter!(
        "gateway_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_upstream_latency(route: &'static str, started: Instant) {
    ::metrics::histogram!("gateway_upstream_duration_seconds", "route" => route)
        .record(started.elapsed().as_secs_f64());
}

pub fn record_upstream_failure(route: &'static str) {
    ::metrics::counter!("gateway_upstream_failures_total", "route" => route).increment(1);
}
