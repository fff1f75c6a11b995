//! Provider Webhook Endpoint
//!
//! `POST /webhook/bolna` reconciles one call event into the task list.
//!
//! Responses: `200 ok` for every processed event (matched or not), a JSON
//! `400` for a malformed event, and `500 error` when the store fails so the
//! provider redelivers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use rowcall_core::{CallEvent, RowcallError};

use crate::error::ApiError;
use crate::services::handle_event;
use crate::state::AppState;

/// Plain-text acknowledgement returned to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookAck {
    Ok,
    Error,
}

impl IntoResponse for WebhookAck {
    fn into_response(self) -> Response {
        match self {
            WebhookAck::Ok => (StatusCode::OK, "ok").into_response(),
            WebhookAck::Error => (StatusCode::INTERNAL_SERVER_ERROR, "error").into_response(),
        }
    }
}

/// POST /webhook/bolna - Apply a provider event
pub async fn bolna_webhook(
    State(state): State<AppState>,
    payload: Result<Json<CallEvent>, JsonRejection>,
) -> Response {
    let Json(event) = match payload {
        Ok(event) => event,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Rejected malformed webhook body");
            state.metrics.record_webhook_event("invalid");
            return ApiError::invalid_input(rejection.body_text()).into_response();
        }
    };

    tracing::debug!(
        call_id = ?event.id,
        status = ?event.status,
        has_transcript = event.transcript.is_some(),
        extracted_data = ?event.extracted_data,
        "Webhook event received"
    );

    match handle_event(&state.ledger, state.config.status_policy, &event).await {
        Ok(outcome) => {
            state.metrics.record_webhook_event(outcome.label());
            WebhookAck::Ok.into_response()
        }
        Err(RowcallError::Validation(e)) => {
            tracing::warn!(error = %e, "Rejected invalid webhook event");
            state.metrics.record_webhook_event("invalid");
            ApiError::from(e).into_response()
        }
        Err(e) => {
            tracing::error!(call_id = ?event.id, error = %e, "Webhook processing failed");
            state.metrics.record_webhook_event("error");
            WebhookAck::Error.into_response()
        }
    }
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/webhook/bolna", post(bolna_webhook))
}
