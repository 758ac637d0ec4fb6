// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    CounterVec, HistogramVec, Opts, Registry, TextEncoder, Encoder,
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // REQUEST METRICS
    // ============================================================================

    /// Total number of HTTP requests served
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("requests_total", "Total number of API requests"),
        &["method", "endpoint", "status_code"],
        REGISTRY
    ).unwrap();

    /// Request duration histogram
    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("request_duration_seconds", "Request duration in seconds")
            .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["method", "endpoint", "status_code"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // DIAGNOSIS METRICS
    // ============================================================================

    /// Finished diagnosis cycles by outcome
    pub static ref DIAGNOSES_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("diagnoses_total", "Total diagnosis cycles"),
        &["provider", "outcome"], // outcome: success or an error class
        REGISTRY
    ).unwrap();

    // ============================================================================
    // PROVIDER METRICS
    // ============================================================================

    /// Total provider API calls
    pub static ref PROVIDER_API_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("provider_api_calls_total", "Total provider API calls"),
        &["provider", "status_code"], // status_code 0: transport failure
        REGISTRY
    ).unwrap();

    /// Provider API call duration
    pub static ref PROVIDER_API_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("provider_api_duration_seconds", "Provider API call duration")
            .buckets(vec![0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["provider"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // IMAGE METRICS
    // ============================================================================

    /// Normalization duration
    pub static ref NORMALIZATION_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("normalization_duration_seconds", "Image normalization duration")
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
        &["stage"],
        REGISTRY
    ).unwrap();

    /// Image bytes before and after normalization
    pub static ref IMAGE_BYTES: CounterVec = register_counter_vec_with_registry!(
        Opts::new("image_bytes_total", "Image bytes processed"),
        &["stage"], // stage: source, normalized
        REGISTRY
    ).unwrap();
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        DIAGNOSES_TOTAL.with_label_values(&["openai", "success"]).inc();
        PROVIDER_API_CALLS.with_label_values(&["openai", "200"]).inc();
        IMAGE_BYTES.with_label_values(&["source"]).inc_by(1.0);

        let metrics = gather_metrics();
        assert!(metrics.contains("diagnoses_total"));
        assert!(metrics.contains("provider_api_calls_total"));
        assert!(metrics.contains("image_bytes_total"));
    }
}
