//! ROWCALL Test Utilities
//!
//! Shared test infrastructure for the ROWCALL workspace:
//! - Mock call provider and fault-injecting row store
//! - Proptest generators for rows and webhook events
//! - Fixtures for common sheet layouts
//! - Custom assertions

pub use rowcall_core::{
    CallEvent, CallInitiated, CallProvider, CallRequest, CallStatus, PositionedRow,
    ProviderConfig, ProviderError, Row, RowPosition, RowcallConfig, RowcallError, RowcallResult,
    ServerConfig, SheetConfig, StatusPolicy, StoreError,
};
pub use rowcall_storage::{InMemoryRowStore, RowStore};

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// MOCK PROVIDERS
// ============================================================================

/// Mock call provider.
///
/// Records every request. Answers with a scripted response per phone number
/// when one is set, otherwise with a fresh `exec-<n>` execution id.
#[derive(Debug, Clone, Default)]
pub struct MockCallProvider {
    requests: Arc<Mutex<Vec<CallRequest>>>,
    scripted: Arc<Mutex<HashMap<String, VecDeque<Result<CallInitiated, ProviderError>>>>>,
    counter: Arc<AtomicUsize>,
}

impl MockCallProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next call to `phone`.
    pub fn respond(&self, phone: impl Into<String>, response: Result<CallInitiated, ProviderError>) {
        if let Ok(mut scripted) = self.scripted.lock() {
            scripted.entry(phone.into()).or_default().push_back(response);
        }
    }

    /// Make the next call to `phone` fail with an HTTP status.
    pub fn fail_for(&self, phone: impl Into<String>, status: u16) {
        self.respond(
            phone,
            Err(ProviderError::Status {
                provider: "mock".to_string(),
                status,
                body: "scripted failure".to_string(),
            }),
        );
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<CallRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|requests| requests.len()).unwrap_or(0)
    }
}

#[async_trait]
impl CallProvider for MockCallProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn initiate_call(&self, request: &CallRequest) -> RowcallResult<CallInitiated> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let scripted = self
            .scripted
            .lock()
            .ok()
            .and_then(|mut scripted| {
                scripted
                    .get_mut(&request.recipient_phone_number)
                    .and_then(VecDeque::pop_front)
            });

        match scripted {
            Some(response) => response.map_err(RowcallError::from),
            None => {
                let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(CallInitiated {
                    status: "queued".to_string(),
                    message: "done".to_string(),
                    execution_id: format!("exec-{}", n),
                })
            }
        }
    }
}

/// Row store that delegates to an [`InMemoryRowStore`] and fails on demand.
#[derive(Debug, Clone, Default)]
pub struct FailingRowStore {
    inner: InMemoryRowStore,
    fail_reads: Arc<Mutex<bool>>,
    fail_writes_at: Arc<Mutex<HashSet<u32>>>,
}

impl FailingRowStore {
    pub fn new(inner: InMemoryRowStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Make every read fail until reset.
    pub fn fail_reads(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_reads.lock() {
            *flag = fail;
        }
    }

    /// Make writes to `position` fail.
    pub fn fail_writes_at(&self, position: u32) {
        if let Ok(mut set) = self.fail_writes_at.lock() {
            set.insert(position);
        }
    }

    pub fn inner(&self) -> &InMemoryRowStore {
        &self.inner
    }
}

#[async_trait]
impl RowStore for FailingRowStore {
    async fn read_rows(&self) -> RowcallResult<Vec<Vec<String>>> {
        let fail = self.fail_reads.lock().map(|flag| *flag).unwrap_or(false);
        if fail {
            return Err(StoreError::Status {
                status: 503,
                body: "scripted read failure".to_string(),
            }
            .into());
        }
        self.inner.read_rows().await
    }

    async fn update_row(&self, position: RowPosition, values: &[String]) -> RowcallResult<()> {
        let fail = self
            .fail_writes_at
            .lock()
            .map(|set| set.contains(&position.get()))
            .unwrap_or(false);
        if fail {
            return Err(StoreError::Status {
                status: 500,
                body: "scripted write failure".to_string(),
            }
            .into());
        }
        self.inner.update_row(position, values).await
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for ROWCALL types.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_phone() -> impl Strategy<Value = String> {
        "\\+91[6-9][0-9]{9}"
    }

    /// Phone cell that is sometimes empty.
    pub fn arb_phone_cell() -> impl Strategy<Value = String> {
        prop_oneof![3 => arb_phone(), 1 => Just(String::new())]
    }

    pub fn arb_status_cell() -> impl Strategy<Value = String> {
        prop_oneof![
            4 => Just(String::new()),
            1 => Just("initiated".to_string()),
            1 => Just("ringing".to_string()),
            1 => Just("completed".to_string()),
            1 => Just("failed".to_string()),
        ]
    }

    pub fn arb_row() -> impl Strategy<Value = Row> {
        (
            "[a-z0-9]{1,6}",
            arb_phone_cell(),
            "[A-Za-z ]{0,12}",
            arb_status_cell(),
        )
            .prop_map(|(id, phone, name, call_status)| {
                let call_id = if call_status.is_empty() {
                    String::new()
                } else {
                    format!("prior-{}", id)
                };
                Row {
                    id,
                    phone,
                    name,
                    call_status,
                    call_id,
                    ..Row::default()
                }
            })
    }

    /// Claimed rows are keyed by position, so no two share a call id and
    /// none collides with the `exec-N` ids of `MockCallProvider`.
    pub fn arb_sheet(max_rows: usize) -> impl Strategy<Value = Vec<Row>> {
        proptest::collection::vec(arb_row(), 0..=max_rows).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(index, row)| {
                    if row.call_id.is_empty() {
                        row
                    } else {
                        Row {
                            call_id: format!("prior-{}-{}", index, row.id),
                            ..row
                        }
                    }
                })
                .collect()
        })
    }

    pub fn arb_event_status() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("queued".to_string()),
            Just("ringing".to_string()),
            Just("in-progress".to_string()),
            Just("completed".to_string()),
            Just("failed".to_string()),
            Just("busy".to_string()),
            Just("no-answer".to_string()),
        ]
    }

    pub fn arb_event(call_id: String) -> impl Strategy<Value = CallEvent> {
        (
            arb_event_status(),
            proptest::option::of("[a-z ]{0,20}"),
            proptest::option::of("(high|low|none)"),
        )
            .prop_map(move |(status, transcript, interest)| CallEvent {
                id: Some(call_id.clone()),
                status: Some(status),
                transcript,
                error_message: None,
                extracted_data: interest.map(|i| serde_json::json!({ "user_interest": i })),
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built fixtures for common sheet layouts.

    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    /// Configuration pointing both adapters at `base_url`.
    pub fn test_config(base_url: &str) -> RowcallConfig {
        RowcallConfig {
            provider: ProviderConfig {
                api_key: "test-key".to_string(),
                agent_id: "agent-test".to_string(),
                base_url: base_url.to_string(),
                from_phone_number: None,
                context_role: "student".to_string(),
                context_instruction: "say that you are proud of him".to_string(),
            },
            sheet: SheetConfig {
                spreadsheet_id: "sheet-test".to_string(),
                sheet_name: "Sheet1".to_string(),
                credentials_path: PathBuf::from("./sheet.json"),
                base_url: base_url.to_string(),
            },
            server: ServerConfig {
                bind_host: "127.0.0.1".to_string(),
                port: 0,
            },
            http_timeout: Duration::from_secs(5),
            status_policy: StatusPolicy::Monotonic,
        }
    }

    pub fn pending_row(id: &str, phone: &str, name: &str) -> Row {
        Row {
            id: id.to_string(),
            phone: phone.to_string(),
            name: name.to_string(),
            ..Row::default()
        }
    }

    /// Row already dispatched with `call_id`.
    pub fn initiated_row(id: &str, phone: &str, call_id: &str) -> Row {
        Row {
            id: id.to_string(),
            phone: phone.to_string(),
            name: "Asha".to_string(),
            call_status: "initiated".to_string(),
            call_id: call_id.to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
            ..Row::default()
        }
    }

    /// In-memory store seeded with `rows` starting at row 2.
    pub fn store_with(rows: &[Row]) -> InMemoryRowStore {
        InMemoryRowStore::with_rows(rows.iter().map(Row::to_values))
    }

    /// Three pending rows, the middle one without a phone.
    pub fn mixed_sheet() -> Vec<Row> {
        vec![
            pending_row("u1", "+919800000001", "Asha"),
            pending_row("u2", "", "Ravi"),
            pending_row("u3", "+919800000003", "Meera"),
        ]
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertions for ROWCALL results and rows.

    use super::*;

    /// Assert that a RowcallResult is Ok.
    #[track_caller]
    pub fn assert_ok<T: std::fmt::Debug>(result: &RowcallResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    /// Assert that a RowcallResult is a Store error.
    #[track_caller]
    pub fn assert_store_error<T: std::fmt::Debug>(result: &RowcallResult<T>) {
        match result {
            Err(RowcallError::Store(_)) => {}
            other => panic!("Expected Store error, got: {:?}", other),
        }
    }

    /// Assert that a RowcallResult is a Provider error.
    #[track_caller]
    pub fn assert_provider_error<T: std::fmt::Debug>(result: &RowcallResult<T>) {
        match result {
            Err(RowcallError::Provider(_)) => {}
            other => panic!("Expected Provider error, got: {:?}", other),
        }
    }

    /// Assert that a RowcallResult is a Validation error.
    #[track_caller]
    pub fn assert_validation_error<T: std::fmt::Debug>(result: &RowcallResult<T>) {
        match result {
            Err(RowcallError::Validation(_)) => {}
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    /// Assert the `call_status` column of a row.
    #[track_caller]
    pub fn assert_row_status(row: &Row, expected: CallStatus) {
        assert_eq!(
            row.status(),
            expected,
            "Row {} status mismatch: expected {:?}, got {:?}",
            row.id,
            expected,
            row.call_status
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
