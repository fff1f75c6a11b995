//! Prometheus Metrics Definitions
//!
//! Metrics live in a registry owned by the application state, so every
//! router built in tests gets its own counters.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
/// Covers: 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s, 30s, 60s
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
];

/// Container for all ROWCALL metrics.
#[derive(Clone)]
pub struct RowcallMetrics {
    registry: Registry,

    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// Dispatch outcomes per row - labels: outcome
    pub calls_dispatched_total: CounterVec,

    /// Webhook events by outcome - labels: outcome
    pub webhook_events_total: CounterVec,
}

fn register<C>(registry: &Registry, collector: C, name: &str) -> ApiResult<C>
where
    C: prometheus::core::Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|e| ApiError::internal_error(format!("Failed to register {}: {}", name, e)))?;
    Ok(collector)
}

fn counter_vec(name: &str, help: &str, labels: &[&str]) -> ApiResult<CounterVec> {
    CounterVec::new(Opts::new(name, help), labels)
        .map_err(|e| ApiError::internal_error(format!("Failed to create {}: {}", name, e)))
}

impl RowcallMetrics {
    /// Create and register all metrics in a fresh registry.
    pub fn new() -> ApiResult<Self> {
        let registry = Registry::new();

        let http_requests_total = register(
            &registry,
            counter_vec(
                "rowcall_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"],
            )?,
            "http_requests_total",
        )?;

        let http_request_duration_seconds = register(
            &registry,
            HistogramVec::new(
                HistogramOpts::new(
                    "rowcall_http_request_duration_seconds",
                    "HTTP request duration in seconds",
                )
                .buckets(HTTP_LATENCY_BUCKETS.to_vec()),
                &["method", "path"],
            )
            .map_err(|e| {
                ApiError::internal_error(format!(
                    "Failed to create http_request_duration_seconds: {}",
                    e
                ))
            })?,
            "http_request_duration_seconds",
        )?;

        let calls_dispatched_total = register(
            &registry,
            counter_vec(
                "rowcall_calls_dispatched_total",
                "Rows processed by dispatch passes",
                &["outcome"],
            )?,
            "calls_dispatched_total",
        )?;

        let webhook_events_total = register(
            &registry,
            counter_vec(
                "rowcall_webhook_events_total",
                "Webhook events received",
                &["outcome"],
            )?,
            "webhook_events_total",
        )?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            calls_dispatched_total,
            webhook_events_total,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Record `count` rows with the given dispatch outcome.
    pub fn record_dispatch(&self, outcome: &str, count: usize) {
        if count > 0 {
            self.calls_dispatched_total
                .with_label_values(&[outcome])
                .inc_by(count as f64);
        }
    }

    /// Record one webhook event.
    pub fn record_webhook_event(&self, outcome: &str) {
        self.webhook_events_total.with_label_values(&[outcome]).inc();
    }

    /// Encode every metric in Prometheus text format.
    pub fn encode(&self) -> ApiResult<Vec<u8>> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| ApiError::internal_error(format!("Failed to encode metrics: {}", e)))?;
        Ok(buffer)
    }
}

/// Handler for GET /metrics endpoint.
pub async fn metrics_handler(State(metrics): State<Arc<RowcallMetrics>>) -> impl IntoResponse {
    match metrics.encode() {
        Ok(buffer) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                e.message.into_bytes(),
            )
        }
    }
}
