//! Reconcile Service
//!
//! Applies provider webhook events to the row that holds the matching call id.

use rowcall_core::{
    now_timestamp, CallEvent, CallOutcome, CallStatus, PositionedRow, Row, RowPosition,
    RowcallResult, StatusPolicy, ValidatedEvent,
};
use rowcall_storage::RowLedger;

/// Written to `result_text` when a completed call carries no transcript.
pub const COMPLETED_FALLBACK_TEXT: &str = "completed";

/// What happened to a webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The matching row was updated.
    Applied { row: RowPosition, status: CallStatus },
    /// No row carries this call id.
    Unmatched { call_id: String },
    /// The row was found but the status policy refused the transition.
    Ignored {
        row: RowPosition,
        current: CallStatus,
        incoming: CallStatus,
    },
}

impl ReconcileOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ReconcileOutcome::Applied { .. } => "applied",
            ReconcileOutcome::Unmatched { .. } => "unmatched",
            ReconcileOutcome::Ignored { .. } => "ignored",
        }
    }
}

/// The row as it should look after `event`.
///
/// A completed call overwrites status, result text, timestamp and extracted
/// field. Any other status overwrites only status and timestamp.
pub fn apply_event(row: &Row, event: &ValidatedEvent, now: &str) -> Row {
    match &event.outcome {
        CallOutcome::Completed {
            transcript,
            extracted_interest,
        } => Row {
            call_status: CallStatus::Completed.to_string(),
            result_text: transcript
                .clone()
                .unwrap_or_else(|| COMPLETED_FALLBACK_TEXT.to_string()),
            updated_at: now.to_string(),
            extracted_field: extracted_interest.clone().unwrap_or_default(),
            ..row.clone()
        },
        CallOutcome::Progress { status, .. } => Row {
            call_status: status.clone(),
            updated_at: now.to_string(),
            ..row.clone()
        },
    }
}

fn find_by_call_id(rows: Vec<PositionedRow>, call_id: &str) -> Option<PositionedRow> {
    if call_id.is_empty() {
        return None;
    }
    rows.into_iter().find(|candidate| candidate.row.call_id == call_id)
}

/// Reconcile one webhook event.
///
/// Validation failures surface as `RowcallError::Validation`. Store failures
/// propagate so the caller can ask the provider to redeliver.
pub async fn handle_event(
    ledger: &RowLedger,
    policy: StatusPolicy,
    event: &CallEvent,
) -> RowcallResult<ReconcileOutcome> {
    let event = event.validate()?;
    let incoming = event.status();

    let lease = ledger.lease().await;
    let rows = lease.snapshot().await?;

    let Some(PositionedRow { position, row }) = find_by_call_id(rows, &event.call_id) else {
        tracing::warn!(call_id = %event.call_id, status = %incoming, "No row found for call id");
        return Ok(ReconcileOutcome::Unmatched {
            call_id: event.call_id,
        });
    };

    let current = row.status();
    if !policy.permits(&current, &incoming) {
        tracing::info!(
            row = %position,
            call_id = %event.call_id,
            current = %current,
            incoming = %incoming,
            "Ignoring out-of-order status"
        );
        return Ok(ReconcileOutcome::Ignored {
            row: position,
            current,
            incoming,
        });
    }

    match &event.outcome {
        CallOutcome::Completed {
            extracted_interest: None,
            ..
        } => {
            tracing::warn!(
                row = %position,
                call_id = %event.call_id,
                "Completed call has no extracted user_interest"
            );
        }
        CallOutcome::Progress {
            error_message: Some(error_message),
            ..
        } => {
            tracing::warn!(
                row = %position,
                call_id = %event.call_id,
                status = %incoming,
                error = %error_message,
                "Provider reported call error"
            );
        }
        _ => {}
    }

    let updated = apply_event(&row, &event, &now_timestamp());
    lease.write_row(position, &updated).await?;

    tracing::info!(
        row = %position,
        call_id = %event.call_id,
        status = %event.status_text(),
        "Row reconciled"
    );
    Ok(ReconcileOutcome::Applied {
        row: position,
        status: incoming,
    })
}

// =============================================================================
// TESTS
// =============================================================================
