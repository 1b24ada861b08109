//! Metrics collection and exposition.
//!
//! # Metrics
//! - `control_requests_total` (counter): requests by method, route, status
//! - `control_request_duration_seconds` (histogram): latency distribution
//! - `control_config_updates_total` (counter): playlist replacements by outcome
//! - `control_layout_advances_total` (counter): scheduler-driven layout changes
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Route label uses the matched route template, never the raw path

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("control_requests_total", &labels).increment(1);
    metrics::histogram!("control_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record a playlist replacement attempt.
pub fn record_config_update(accepted: bool) {
    let outcome = if accepted { "accepted" } else { "rejected" };
    metrics::counter!("control_config_updates_total", "outcome" => outcome).increment(1);
}

/// Middleware timing every request.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
