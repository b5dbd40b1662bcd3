//! Prometheus metrics for contentforge-service.
//!
//! Recording helpers are no-ops until `init_metrics` has run, so library code
//! and tests can call them unconditionally.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;
use std::time::Instant;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// HTTP metrics
pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

// Generation metrics
pub static GENERATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

// Store metrics
pub static STORE_OPERATION_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static STORE_FALLBACKS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Must be called once at startup.
pub fn init_metrics() {
    let registry = Registry::new();

    let http_requests_total = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )
    .expect("Failed to create http_requests_total metric");

    let http_request_duration = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0, 30.0]),
        &["method", "path"],
    )
    .expect("Failed to create http_request_duration_seconds metric");

    // persisted: "true" | "false"
    let generations = IntCounterVec::new(
        Opts::new("generations_total", "Total generation requests served"),
        &["persisted"],
    )
    .expect("Failed to create generations_total metric");

    let store_duration = HistogramVec::new(
        HistogramOpts::new(
            "store_operation_duration_seconds",
            "Generation store operation duration in seconds",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 30.0]),
        &["operation"],
    )
    .expect("Failed to create store_operation_duration_seconds metric");

    let store_fallbacks = IntCounterVec::new(
        Opts::new(
            "store_fallbacks_total",
            "Responses degraded because the store call failed",
        ),
        &["operation"],
    )
    .expect("Failed to create store_fallbacks_total metric");

    registry
        .register(Box::new(http_requests_total.clone()))
        .expect("Failed to register http_requests_total");
    registry
        .register(Box::new(http_request_duration.clone()))
        .expect("Failed to register http_request_duration_seconds");
    registry
        .register(Box::new(generations.clone()))
        .expect("Failed to register generations_total");
    registry
        .register(Box::new(store_duration.clone()))
        .expect("Failed to register store_operation_duration_seconds");
    registry
        .register(Box::new(store_fallbacks.clone()))
        .expect("Failed to register store_fallbacks_total");

    // Initialize globals
    let _ = REGISTRY.set(registry);
    let _ = HTTP_REQUESTS_TOTAL.set(http_requests_total);
    let _ = HTTP_REQUEST_DURATION_SECONDS.set(http_request_duration);
    let _ = GENERATIONS_TOTAL.set(generations);
    let _ = STORE_OPERATION_DURATION_SECONDS.set(store_duration);
    let _ = STORE_FALLBACKS_TOTAL.set(store_fallbacks);

    tracing::info!("Prometheus metrics initialized");
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => return "# Metrics registry not initialized\n".to_string(),
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

/// Axum middleware recording request count and latency.
pub async fn http_metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    // Route templates keep label cardinality bounded.
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    record_http_request(&method, &path, &status, start.elapsed().as_secs_f64());

    response
}

pub fn record_http_request(method: &str, path: &str, status: &str, duration_secs: f64) {
    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[method, path, status]).inc();
    }
    if let Some(histogram) = HTTP_REQUEST_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }
}

pub fn record_generation(persisted: bool) {
    if let Some(counter) = GENERATIONS_TOTAL.get() {
        let label = if persisted { "true" } else { "false" };
        counter.with_label_values(&[label]).inc();
    }
}

pub fn record_store_operation(operation: &str, duration_secs: f64) {
    if let Some(histogram) = STORE_OPERATION_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&[operation])
            .observe(duration_secs);
    }
}

pub fn record_store_fallback(operation: &str) {
    if let Some(counter) = STORE_FALLBACKS_TOTAL.get() {
        counter.with_label_values(&[operation]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_after_init_is_exported() {
        init_metrics();
        record_generation(false);
        record_store_fallback("insert");

        let text = get_metrics();
        assert!(text.contains("generations_total"));
        assert!(text.contains("store_fallbacks_total"));
    }
}
