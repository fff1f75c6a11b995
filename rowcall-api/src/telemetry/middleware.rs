//! Axum Middleware for HTTP Request Tracing and Metrics
//!
//! Wraps every request in a tracing span, records Prometheus metrics and
//! logs completion.

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info_span, Instrument};

use super::metrics::RowcallMetrics;

/// Metrics label for requests that matched no route. Keeps unknown paths
/// out of the label set.
pub const UNMATCHED_ROUTE: &str = "unmatched";

fn route_label(request: &Request) -> &str {
    request
        .extensions()
        .get::<MatchedPath>()
        .map_or(UNMATCHED_ROUTE, MatchedPath::as_str)
}

/// Observability middleware for Axum.
pub async fn observability_middleware(
    State(metrics): State<Arc<RowcallMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let route = route_label(&request).to_string();

    let span = info_span!(
        "http_request",
        http.method = %method,
        http.target = %path,
        http.route = %route,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    let status = response.status();
    metrics.record_http_request(
        method.as_str(),
        &route,
        status.as_u16(),
        duration.as_secs_f64(),
    );

    tracing::info!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        duration_ms = duration.as_millis() as u64,
        "Request completed"
    );

    response
}
