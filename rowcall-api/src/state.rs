//! Shared application state for Axum routers.

use rowcall_core::{CallProvider, RowcallConfig};
use rowcall_storage::{RowLedger, RowStore};
use std::sync::Arc;
use std::time::Instant;

use crate::error::ApiResult;
use crate::telemetry::RowcallMetrics;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RowcallConfig>,
    /// Single-writer lease in front of the row store.
    pub ledger: Arc<RowLedger>,
    pub provider: Arc<dyn CallProvider>,
    pub metrics: Arc<RowcallMetrics>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        config: Arc<RowcallConfig>,
        store: Arc<dyn RowStore>,
        provider: Arc<dyn CallProvider>,
    ) -> ApiResult<Self> {
        Ok(Self {
            config,
            ledger: Arc::new(RowLedger::new(store)),
            provider,
            metrics: Arc::new(RowcallMetrics::new()?),
            start_time: Instant::now(),
        })
    }
}

crate::impl_from_ref!(Arc<RowcallConfig>, config);
crate::impl_from_ref!(Arc<RowLedger>, ledger);
crate::impl_from_ref!(Arc<dyn CallProvider>, provider);
crate::impl_from_ref!(Arc<RowcallMetrics>, metrics);
crate::impl_from_ref!(Instant, start_time);
