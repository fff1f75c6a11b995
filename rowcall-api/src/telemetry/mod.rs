//! ROWCALL Telemetry - Observability Infrastructure
//!
//! Structured logging and Prometheus metrics for the HTTP layer.

pub mod metrics;
pub mod middleware;
pub mod tracer;

pub use metrics::{metrics_handler, RowcallMetrics};
pub use middleware::observability_middleware;
pub use tracer::{init_tracer, LogFormat, TelemetryConfig};
