//! Health endpoints.
//!
//! `/health/ping` and `/health/live` only prove the process answers.
//! `/health/ready` reads the task list once and reports 503 if it cannot.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use rowcall_storage::RowLedger;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Outcome of the readiness read against the row store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StoreCheck {
    Healthy { rows: usize, latency_ms: u64 },
    Unhealthy { error: String },
}

impl StoreCheck {
    fn status(&self) -> HealthStatus {
        match self {
            StoreCheck::Healthy { .. } => HealthStatus::Healthy,
            StoreCheck::Unhealthy { .. } => HealthStatus::Unhealthy,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub status: HealthStatus,
    pub store: StoreCheck,
    pub version: String,
    pub uptime_seconds: u64,
}

/// GET /health/ping
pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, "pong")
}

/// GET /health/live
pub async fn liveness() -> impl IntoResponse {
    Json(serde_json::json!({ "status": HealthStatus::Healthy }))
}

/// GET /health/ready
///
/// Reads without the lease, so a running dispatch pass does not block it.
pub async fn readiness(
    State(ledger): State<Arc<RowLedger>>,
    State(start_time): State<Instant>,
) -> impl IntoResponse {
    let started = Instant::now();
    let store = match ledger.read_unleased().await {
        Ok(rows) => StoreCheck::Healthy {
            rows: rows.len(),
            latency_ms: started.elapsed().as_millis() as u64,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StoreCheck::Unhealthy {
                error: e.to_string(),
            }
        }
    };

    let status = store.status();
    let code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    let report = ReadinessReport {
        status,
        store,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: start_time.elapsed().as_secs(),
    };
    (code, Json(report))
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health/ping", get(ping))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
}
