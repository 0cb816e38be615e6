//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, path, and status
//! - HTTP request latency histograms
//! - Chat rooms created
//! - Join and leave attempts by outcome
//! - Database connection pool gauges

use once_cell::sync::Lazy;
use prometheus::{
    GaugeVec, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

const NAMESPACE: &str = "tikichat";

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace(NAMESPACE),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace(NAMESPACE)
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

pub static CHAT_ROOMS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("chat_rooms_created_total", "Total number of chat rooms created")
            .namespace(NAMESPACE),
    )
    .expect("Failed to create CHAT_ROOMS_CREATED_TOTAL metric")
});

/// Join attempts by result ("success", "room_full", "duplicate", "error")
pub static CHAT_ROOM_JOINS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("chat_room_joins_total", "Chat room join attempts by result")
            .namespace(NAMESPACE),
        &["result"],
    )
    .expect("Failed to create CHAT_ROOM_JOINS_TOTAL metric")
});

/// Leave attempts by result ("success", "not_member", "error")
pub static CHAT_ROOM_LEAVES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("chat_room_leaves_total", "Chat room leave attempts by result")
            .namespace(NAMESPACE),
        &["result"],
    )
    .expect("Failed to create CHAT_ROOM_LEAVES_TOTAL metric")
});

/// Database connection pool stats
pub static DB_POOL_CONNECTIONS: Lazy<GaugeVec> = Lazy::new(|| {
    GaugeVec::new(
        Opts::new("db_pool_connections", "Database connection pool statistics")
            .namespace(NAMESPACE),
        &["state"], // "idle", "active"
    )
    .expect("Failed to create DB_POOL_CONNECTIONS metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(CHAT_ROOMS_CREATED_TOTAL.clone()))
        .expect("Failed to register CHAT_ROOMS_CREATED_TOTAL");
    registry
        .register(Box::new(CHAT_ROOM_JOINS_TOTAL.clone()))
        .expect("Failed to register CHAT_ROOM_JOINS_TOTAL");
    registry
        .register(Box::new(CHAT_ROOM_LEAVES_TOTAL.clone()))
        .expect("Failed to register CHAT_ROOM_LEAVES_TOTAL");
    registry
        .register(Box::new(DB_POOL_CONNECTIONS.clone()))
        .expect("Failed to register DB_POOL_CONNECTIONS");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    match encoder.encode_to_string(&metric_families) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            String::new()
        }
    }
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

pub fn record_chat_room_created() {
    CHAT_ROOMS_CREATED_TOTAL.inc();
}

pub fn record_join(result: &str) {
    CHAT_ROOM_JOINS_TOTAL.with_label_values(&[result]).inc();
}

pub fn record_leave(result: &str) {
    CHAT_ROOM_LEAVES_TOTAL.with_label_values(&[result]).inc();
}

/// Helper to update database pool stats
pub fn update_db_pool_stats(idle: u32, active: u32) {
    DB_POOL_CONNECTIONS
        .with_label_values(&["idle"])
        .set(f64::from(idle));
    DB_POOL_CONNECTIONS
        .with_label_values(&["active"])
        .set(f64::from(active));
}
