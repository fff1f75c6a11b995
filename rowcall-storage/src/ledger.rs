//! Single-writer lease over a row store.
//!
//! The backend offers no transactions or version checks, so every
//! read-modify-write window (a dispatch pass, a webhook reconciliation) holds
//! the lease from its first read to its last write. Windows are therefore
//! applied one after another and never lose each other's updates.

use rowcall_core::{PositionedRow, Row, RowPosition, RowcallResult};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, MutexGuard};

use crate::RowStore;

/// Serialization point in front of a [`RowStore`].
pub struct RowLedger {
    store: Arc<dyn RowStore>,
    gate: Mutex<()>,
}

impl RowLedger {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            store,
            gate: Mutex::new(()),
        }
    }

    /// Wait for exclusive access to the store.
    pub async fn lease(&self) -> RowLease<'_> {
        let waited = Instant::now();
        let guard = self.gate.lock().await;
        tracing::trace!(wait_ms = waited.elapsed().as_millis() as u64, "Row store lease acquired");
        RowLease {
            store: self.store.as_ref(),
            _guard: guard,
        }
    }

    /// Read without taking the lease. Only for callers that never write.
    pub async fn read_unleased(&self) -> RowcallResult<Vec<Vec<String>>> {
        self.store.read_rows().await
    }
}

/// Exclusive access to the row store for one read-modify-write window.
pub struct RowLease<'a> {
    store: &'a dyn RowStore,
    _guard: MutexGuard<'a, ()>,
}

impl RowLease<'_> {
    /// Fresh snapshot of every data row with its position.
    pub async fn snapshot(&self) -> RowcallResult<Vec<PositionedRow>> {
        let rows = self.store.read_rows().await?;
        Ok(PositionedRow::from_snapshot(&rows))
    }

    /// Write the dispatch columns (A..G) of a row.
    pub async fn write_dispatch(&self, position: RowPosition, row: &Row) -> RowcallResult<()> {
        self.store.update_row(position, &row.dispatch_values()).await
    }

    /// Write every owned column (A..H) of a row.
    pub async fn write_row(&self, position: RowPosition, row: &Row) -> RowcallResult<()> {
        self.store.update_row(position, &row.to_values()).await
    }
}
