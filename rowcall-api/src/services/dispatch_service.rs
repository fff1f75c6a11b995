//! Dispatch Service
//!
//! One pass over the task list: every eligible row gets one call, and every
//! accepted call is written back as `initiated`.

use rowcall_core::{
    now_timestamp, CallProvider, CallRequest, PositionedRow, ProviderConfig, Row, RowPosition,
    RowcallResult, UserData,
};
use rowcall_storage::RowLedger;
use serde::{Deserialize, Serialize};

/// A row whose call was accepted and recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchedCall {
    pub row: RowPosition,
    pub phone: String,
    pub execution_id: String,
}

/// Where a row dropped out of the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStage {
    /// The provider refused or could not be reached. Nothing was written.
    Provider,
    /// The call was placed but the row could not be updated.
    Write,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchFailure {
    pub row: RowPosition,
    pub phone: String,
    pub stage: DispatchStage,
    pub error: String,
}

/// Result of one dispatch pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub initiated: Vec<DispatchedCall>,
    /// Rows passed over as ineligible.
    pub skipped: usize,
    pub failed: Vec<DispatchFailure>,
}

/// Build the provider request for a row.
pub fn call_request(config: &ProviderConfig, row: &Row) -> CallRequest {
    CallRequest {
        agent_id: config.agent_id.clone(),
        recipient_phone_number: row.phone.clone(),
        from_phone_number: config.from_phone_number.clone(),
        scheduled_at: None,
        user_data: UserData {
            variable1: row.name.clone(),
            variable2: config.context_role.clone(),
            variable3: config.context_instruction.clone(),
        },
    }
}

/// Run one dispatch pass.
///
/// Holds the store lease for the whole pass. Only a failure to read the rows
/// fails the pass; provider and write failures are reported per row.
pub async fn run_dispatch(
    ledger: &RowLedger,
    provider: &dyn CallProvider,
    config: &ProviderConfig,
) -> RowcallResult<DispatchReport> {
    let lease = ledger.lease().await;
    let rows = lease.snapshot().await?;
    let mut report = DispatchReport::default();

    for PositionedRow { position, row } in rows {
        if !row.is_eligible() {
            tracing::trace!(
                row = %position,
                has_phone = row.has_phone(),
                call_status = %row.call_status,
                "Skipping ineligible row"
            );
            report.skipped += 1;
            continue;
        }

        let request = call_request(config, &row);
        let initiated = match provider.initiate_call(&request).await {
            Ok(initiated) => initiated,
            Err(e) => {
                tracing::warn!(
                    row = %position,
                    provider = provider.name(),
                    error = %e,
                    "Call initiation failed, row left eligible"
                );
                report.failed.push(DispatchFailure {
                    row: position,
                    phone: row.phone.clone(),
                    stage: DispatchStage::Provider,
                    error: e.to_string(),
                });
                continue;
            }
        };

        tracing::info!(
            row = %position,
            status = %initiated.status,
            message = %initiated.message,
            execution_id = %initiated.execution_id,
            "Call initiated"
        );
        if initiated.execution_id.is_empty() {
            tracing::warn!(row = %position, "Provider returned no execution id");
        }

        let claimed = row.initiated(&initiated.execution_id, &now_timestamp());
        if let Err(e) = lease.write_dispatch(position, &claimed).await {
            tracing::error!(
                row = %position,
                execution_id = %initiated.execution_id,
                error = %e,
                "Failed to record initiated call"
            );
            report.failed.push(DispatchFailure {
                row: position,
                phone: row.phone,
                stage: DispatchStage::Write,
                error: e.to_string(),
            });
            continue;
        }

        report.initiated.push(DispatchedCall {
            row: position,
            phone: row.phone,
            execution_id: initiated.execution_id,
        });
    }

    tracing::info!(
        initiated = report.initiated.len(),
        skipped = report.skipped,
        failed = report.failed.len(),
        "Dispatch pass completed"
    );
    Ok(report)
}

// =============================================================================
// TESTS
// =============================================================================
