//! Request Logging and Metrics Middleware

use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request},
    http,
    middleware::Next,
    response::Response,
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::Level;

use crate::infrastructure::metrics;

/// Add an HTTP trace span per request, logging status and latency on response
pub fn add_tracing(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().path().to_string();
                tracing::span!(Level::INFO, "http", %method, %uri)
            })
            .on_response(|res: &http::Response<_>, latency: Duration, _span: &tracing::Span| {
                tracing::info!(
                    status = %res.status(),
                    elapsed_ms = latency.as_millis() as u64,
                    "response"
                );
            }),
    )
}

/// Record request count and latency, labelled by route template
pub async fn track_http_metrics(req: Request, next: Next) -> Response {
    let method = req.method().as_str().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    let response = next.run(req).await;

    metrics::record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}
