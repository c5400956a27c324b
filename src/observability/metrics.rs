//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_submissions_total` (counter): submissions by outcome
//! - `gateway_rate_limited_total` (counter): requests denied by the limiter
//! - `gateway_webhook_duration_seconds` (histogram): webhook round-trip time
//! - `gateway_rate_limiter_clients` (gauge): identifiers currently tracked

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr` and register descriptions.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    if let Err(e) = builder.install() {
        tracing::error!(error = %e, "Failed to install Prometheus exporter");
        return;
    }

    describe_counter!(
        "gateway_submissions_total",
        "Form submissions processed, labeled by outcome"
    );
    describe_counter!(
        "gateway_rate_limited_total",
        "Requests denied by the rate limiter"
    );
    describe_histogram!(
        "gateway_webhook_duration_seconds",
        "Round-trip time of webhook deliveries"
    );
    describe_gauge!(
        "gateway_rate_limiter_clients",
        "Client identifiers currently tracked by the rate limiter"
    );
    tracing::info!(address = %addr, "Metrics exporter listening");
}

pub fn record_submission(outcome: &'static str) {
    counter!("gateway_submissions_total", "outcome" => outcome).increment(1);
}

pub fn record_rate_limited() {
    counter!("gateway_rate_limited_total").increment(1);
}

pub fn record_webhook_duration(elapsed: Duration) {
    histogram!("gateway_webhook_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_tracked_clients(count: usize) {
    gauge!("gateway_rate_limiter_clients").set(count as f64);
}
