// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    REQUESTS_TOTAL,
    REQUEST_DURATION,
    DIAGNOSES_TOTAL,
    PROVIDER_API_CALLS,
    PROVIDER_API_DURATION,
    NORMALIZATION_DURATION,
    IMAGE_BYTES,
};

/// Helper to record request metrics
pub fn record_request(method: &str, endpoint: &str, status_code: u16, duration_secs: f64) {
    let status = status_code.to_string();
    REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status])
        .inc();

    REQUEST_DURATION
        .with_label_values(&[method, endpoint, &status])
        .observe(duration_secs);
}

/// Helper to record provider API call metrics
pub fn record_provider_call(provider: &str, status_code: u16, duration_secs: f64) {
    PROVIDER_API_CALLS
        .with_label_values(&[provider, &status_code.to_string()])
        .inc();

    PROVIDER_API_DURATION
        .with_label_values(&[provider])
        .observe(duration_secs);
}

/// Helper to record a finished diagnosis cycle
pub fn record_diagnosis(provider: &str, outcome: &str) {
    DIAGNOSES_TOTAL.with_label_values(&[provider, outcome]).inc();
}

/// Helper to record image normalization
pub fn record_normalization(source_bytes: usize, normalized_bytes: usize, duration_secs: f64) {
    IMAGE_BYTES
        .with_label_values(&["source"])
        .inc_by(source_bytes as f64);
    IMAGE_BYTES
        .with_label_values(&["normalized"])
        .inc_by(normalized_bytes as f64);

    NORMALIZATION_DURATION
        .with_label_values(&["normalize"])
        .observe(duration_secs);
}
