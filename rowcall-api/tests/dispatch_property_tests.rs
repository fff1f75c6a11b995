//! Property-Based Tests for Dispatch and Reconciliation
//!
//! For any task list, a dispatch pass calls each eligible row exactly once,
//! never calls a row without a phone, and leaves nothing eligible behind for
//! a second pass. Webhook events land on the row holding their call id and
//! rewrite only the columns their outcome owns.

use proptest::prelude::*;
use rowcall_api::{handle_event, run_dispatch, ReconcileOutcome};
use rowcall_core::{CallEvent, Row, RowPosition, StatusPolicy};
use rowcall_storage::RowLedger;
use rowcall_test_utils::fixtures::{initiated_row, store_with, test_config};
use rowcall_test_utils::generators::{arb_event, arb_sheet};
use rowcall_test_utils::{InMemoryRowStore, MockCallProvider};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::runtime::Runtime;

// ============================================================================
// TEST CONFIGURATION
// ============================================================================

fn test_runtime() -> Result<Runtime, TestCaseError> {
    Runtime::new().map_err(|e| TestCaseError::fail(format!("Failed to create runtime: {}", e)))
}

fn snapshot(store: &InMemoryRowStore, len: usize) -> Vec<Row> {
    (0..len)
        .map(|index| {
            store
                .row(RowPosition::from_data_index(index))
                .map(|values| Row::from_values(&values))
                .unwrap_or_default()
        })
        .collect()
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A pass calls exactly the eligible rows, once each, and never a row
    /// with an empty phone.
    #[test]
    fn prop_one_call_per_eligible_row(sheet in arb_sheet(12)) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let eligible: Vec<RowPosition> = sheet
                .iter()
                .enumerate()
                .filter(|(_, row)| row.is_eligible())
                .map(|(index, _)| RowPosition::from_data_index(index))
                .collect();

            let store = store_with(&sheet);
            let ledger = RowLedger::new(Arc::new(store.clone()));
            let provider = MockCallProvider::new();
            let config = test_config("http://localhost").provider;

            let report = run_dispatch(&ledger, &provider, &config)
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            let claimed: Vec<RowPosition> = report.initiated.iter().map(|c| c.row).collect();
            let unique: HashSet<RowPosition> = claimed.iter().copied().collect();
            prop_assert_eq!(unique.len(), claimed.len());
            prop_assert_eq!(&claimed, &eligible);
            prop_assert_eq!(provider.call_count(), eligible.len());
            prop_assert_eq!(report.skipped, sheet.len() - eligible.len());

            for request in provider.requests() {
                prop_assert!(!request.recipient_phone_number.is_empty());
            }
            Ok(())
        })?;
    }

    /// A second pass over the result of a first pass changes nothing.
    #[test]
    fn prop_second_pass_is_noop(sheet in arb_sheet(12)) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let store = store_with(&sheet);
            let ledger = RowLedger::new(Arc::new(store.clone()));
            let provider = MockCallProvider::new();
            let config = test_config("http://localhost").provider;

            run_dispatch(&ledger, &provider, &config)
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let after_first = snapshot(&store, sheet.len());
            let writes = store.write_count();
            let calls = provider.call_count();

            let report = run_dispatch(&ledger, &provider, &config)
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            prop_assert!(report.initiated.is_empty());
            prop_assert_eq!(store.write_count(), writes);
            prop_assert_eq!(provider.call_count(), calls);
            prop_assert_eq!(snapshot(&store, sheet.len()), after_first);
            Ok(())
        })?;
    }

    /// An event for a dispatched call id updates that row and no other.
    #[test]
    fn prop_event_lands_on_claimed_row(
        sheet in arb_sheet(10),
        pick in any::<prop::sample::Index>(),
    ) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let store = store_with(&sheet);
            let ledger = RowLedger::new(Arc::new(store.clone()));
            let provider = MockCallProvider::new();
            let config = test_config("http://localhost").provider;

            let report = run_dispatch(&ledger, &provider, &config)
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assume!(!report.initiated.is_empty());

            let target = &report.initiated[pick.index(report.initiated.len())];
            let before = snapshot(&store, sheet.len());
            let event = CallEvent {
                id: Some(target.execution_id.clone()),
                status: Some("completed".to_string()),
                transcript: Some("hello".to_string()),
                error_message: None,
                extracted_data: None,
            };

            let outcome = handle_event(&ledger, StatusPolicy::Monotonic, &event)
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let applied = matches!(outcome, ReconcileOutcome::Applied { row, .. } if row == target.row);
            prop_assert!(applied);

            let after = snapshot(&store, sheet.len());
            for (index, (old, new)) in before.iter().zip(after.iter()).enumerate() {
                if RowPosition::from_data_index(index) == target.row {
                    prop_assert_eq!(&new.call_id, &target.execution_id);
                    prop_assert_eq!(new.call_status.as_str(), "completed");
                    prop_assert_eq!(new.result_text.as_str(), "hello");
                } else {
                    prop_assert_eq!(old, new);
                }
            }
            Ok(())
        })?;
    }

    /// Completion rewrites status, result, timestamp and extracted field;
    /// any other status rewrites status and timestamp only.
    #[test]
    fn prop_event_write_shape(event in arb_event("ex-1".to_string())) {
        let rt = test_runtime()?;
        rt.block_on(async {
            let mut original = initiated_row("u1", "+15551234567", "ex-1");
            original.result_text = "earlier".to_string();
            original.extracted_field = "earlier".to_string();
            let store = store_with(&[original.clone()]);
            let ledger = RowLedger::new(Arc::new(store.clone()));

            handle_event(&ledger, StatusPolicy::LastEventWins, &event)
                .await
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            let row = snapshot(&store, 1).remove(0);
            let status = event.status.clone().unwrap_or_default();
            prop_assert_eq!(&row.call_status, &status);
            prop_assert_ne!(&row.updated_at, &original.updated_at);
            prop_assert_eq!(&row.id, &original.id);
            prop_assert_eq!(&row.phone, &original.phone);
            prop_assert_eq!(&row.name, &original.name);
            prop_assert_eq!(&row.call_id, &original.call_id);

            if status == "completed" {
                let expected_text = event
                    .transcript
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or("completed")
                    .to_string();
                prop_assert_eq!(&row.result_text, &expected_text);
                let expected_interest = event
                    .extracted_data
                    .as_ref()
                    .and_then(|data| data.get("user_interest"))
                    .and_then(|value| value.as_str())
                    .unwrap_or_default()
                    .to_string();
                prop_assert_eq!(&row.extracted_field, &expected_interest);
            } else {
                prop_assert_eq!(&row.result_text, &original.result_text);
                prop_assert_eq!(&row.extracted_field, &original.extracted_field);
            }
            Ok(())
        })?;
    }
}
