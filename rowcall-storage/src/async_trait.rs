//! Async row store trait.
//!
//! The task list is read as a whole and written one row at a time. There is
//! no partial-column update: a write replaces the addressed row's cells
//! starting at column A with exactly the values given.

use ::async_trait::async_trait;
use rowcall_core::{RowPosition, RowcallResult};
use std::sync::Arc;

/// Async storage trait for the positional task list.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Read every data row in store order, header excluded.
    ///
    /// An empty store yields an empty vec. Rows may be shorter than the row
    /// model when the backend trims trailing empty cells.
    async fn read_rows(&self) -> RowcallResult<Vec<Vec<String>>>;

    /// Replace the cells of the row at `position`, starting at column A.
    async fn update_row(&self, position: RowPosition, values: &[String]) -> RowcallResult<()>;
}

#[async_trait]
impl<S: RowStore + ?Sized> RowStore for Arc<S> {
    async fn read_rows(&self) -> RowcallResult<Vec<Vec<String>>> {
        (**self).read_rows().await
    }

    async fn update_row(&self, position: RowPosition, values: &[String]) -> RowcallResult<()> {
        (**self).update_row(position, values).await
    }
}
