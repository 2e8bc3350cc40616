//! Gateway metrics

use prometheus::{register_counter_vec, register_histogram_vec, CounterVec, HistogramVec};

lazy_static::lazy_static! {
    /// Round trips by operation and outcome (`success`, `failure`, `error`)
    pub static ref GATEWAY_REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "openpay_requests_total",
        "Total Openpay requests",
        &["operation", "outcome"]
    )
    .expect("register openpay_requests_total");

    /// Round-trip latency by operation
    pub static ref GATEWAY_REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "openpay_request_duration_seconds",
        "Openpay request duration",
        &["operation"]
    )
    .expect("register openpay_request_duration_seconds");
}
