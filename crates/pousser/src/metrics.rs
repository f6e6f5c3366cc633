//! Request metrics.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! application installs a recorder.

use metrics::{counter, histogram};
use std::time::Duration;

/// Metric names.
pub mod names {
    pub const REQUESTS_TOTAL: &str = "pousser_requests_total";
    pub const REQUEST_FAILURES_TOTAL: &str = "pousser_request_failures_total";
    pub const REQUEST_LATENCY_SECONDS: &str = "pousser_request_latency_seconds";
    pub const EVENTS_PUBLISHED_TOTAL: &str = "pousser_events_published_total";
}

/// Describe the client's metrics to the installed recorder.
pub fn describe_metrics() {
    metrics::describe_counter!(names::REQUESTS_TOTAL, "Requests dispatched to the REST API");
    metrics::describe_counter!(
        names::REQUEST_FAILURES_TOTAL,
        "Requests that failed in transport or returned a non-200 status"
    );
    metrics::describe_histogram!(
        names::REQUEST_LATENCY_SECONDS,
        "Time spent waiting on the transport"
    );
    metrics::describe_counter!(
        names::EVENTS_PUBLISHED_TOTAL,
        "Events accepted by the API (one per channel or batch entry)"
    );
}

/// Record a dispatched request.
pub fn record_request(method: &'static str) {
    counter!(names::REQUESTS_TOTAL, "method" => method).increment(1);
}

/// Record a failed request.
pub fn record_failure(reason: &'static str) {
    counter!(names::REQUEST_FAILURES_TOTAL, "reason" => reason).increment(1);
}

/// Record transport latency.
pub fn record_latency(elapsed: Duration) {
    histogram!(names::REQUEST_LATENCY_SECONDS).record(elapsed.as_secs_f64());
}

/// Record accepted events.
pub fn record_published(count: usize) {
    counter!(names::EVENTS_PUBLISHED_TOTAL).increment(count as u64);
}
