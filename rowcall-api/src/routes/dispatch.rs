//! Dispatch Endpoint
//!
//! `POST /start-calls` runs one dispatch pass and returns its report.

use axum::{extract::State, routing::post, Json, Router};
use rowcall_core::RowcallResult;

use crate::error::{ApiError, ApiResult};
use crate::services::{run_dispatch, DispatchReport, DispatchStage};
use crate::state::AppState;

/// Run a pass and record its outcome counters.
async fn dispatch_and_record(state: AppState) -> RowcallResult<DispatchReport> {
    let report = run_dispatch(
        &state.ledger,
        state.provider.as_ref(),
        &state.config.provider,
    )
    .await?;

    let write_failures = report
        .failed
        .iter()
        .filter(|failure| failure.stage == DispatchStage::Write)
        .count();
    let metrics = &state.metrics;
    metrics.record_dispatch("initiated", report.initiated.len());
    metrics.record_dispatch("skipped", report.skipped);
    metrics.record_dispatch("provider_failed", report.failed.len() - write_failures);
    metrics.record_dispatch("write_failed", write_failures);
    Ok(report)
}

/// POST /start-calls - Dispatch every eligible row
///
/// The pass runs on its own task and finishes even if the caller goes away,
/// so a placed call is always written back to its row.
pub async fn start_calls(State(state): State<AppState>) -> ApiResult<Json<DispatchReport>> {
    let pass = tokio::spawn(dispatch_and_record(state));

    let report = pass
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Dispatch task did not complete");
            ApiError::internal_error(format!("Dispatch task did not complete: {}", e))
        })?
        .map_err(|e| {
            tracing::error!(error = %e, "Dispatch pass failed");
            ApiError::from(e)
        })?;

    Ok(Json(report))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/start-calls", post(start_calls))
}
