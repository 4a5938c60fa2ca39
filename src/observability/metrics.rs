//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dev_proxy_requests_total` (counter): requests by route target and status
//! - `dev_proxy_request_duration_seconds` (histogram): latency by route target

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

use crate::routing::RouteTarget;

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()
}

/// Record one handled request.
pub fn record_request(target: RouteTarget, status: u16, start: Instant) {
    counter!(
        "dev_proxy_requests_total",
        "target" => target.label(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!("dev_proxy_request_duration_seconds", "target" => target.label())
        .record(start.elapsed().as_secs_f64());
}
