//! Request metrics recording.
//!
//! # Metrics
//! - `graphql_listener_requests_total` (counter): cycles by method, status
//! - `graphql_listener_request_duration_seconds` (histogram): cycle latency
//! - `graphql_listener_failures_total` (counter): contained faults by method
//!
//! Recording goes through the `metrics` facade and is a no-op until the
//! host installs a recorder; exporter wiring is the host's concern.

use std::time::Instant;

use metrics::{counter, histogram};

/// Record the outcome of one request cycle.
pub fn record_request(method: &str, status: u16, started: Instant) {
    counter!(
        "graphql_listener_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("graphql_listener_request_duration_seconds")
        .record(started.elapsed().as_secs_f64());
}

/// Record a fault contained by the listener.
pub fn record_failure(method: &str) {
    counter!("graphql_listener_failures_total", "method" => method.to_string()).increment(1);
}
