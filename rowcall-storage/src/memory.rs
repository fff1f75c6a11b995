//! In-memory row store for tests and local dry runs.

use ::async_trait::async_trait;
use rowcall_core::{RowPosition, RowcallError, RowcallResult, StoreError};
use std::sync::{Arc, RwLock};

use crate::RowStore;

/// Row store backed by a vector of rows.
///
/// Mirrors the spreadsheet's behaviour: trailing empty cells are trimmed on
/// read, empty rows past the last populated one are omitted, and writing
/// past the end grows the sheet with blank rows.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRowStore {
    rows: Arc<RwLock<Vec<Vec<String>>>>,
    writes: Arc<RwLock<Vec<(RowPosition, Vec<String>)>>>,
}

impl InMemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with data rows (header excluded).
    pub fn with_rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect::<Vec<String>>())
            .collect();
        Self {
            rows: Arc::new(RwLock::new(rows)),
            writes: Arc::default(),
        }
    }

    /// Raw cells of a row, untrimmed, or `None` past the end.
    pub fn row(&self, position: RowPosition) -> Option<Vec<String>> {
        let rows = self.rows.read().ok()?;
        rows.get(position.data_index()).cloned()
    }

    /// Every write applied so far, in order.
    pub fn writes(&self) -> Vec<(RowPosition, Vec<String>)> {
        self.writes
            .read()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }

    pub fn write_count(&self) -> usize {
        self.writes.read().map(|writes| writes.len()).unwrap_or(0)
    }
}

#[async_trait]
impl RowStore for InMemoryRowStore {
    async fn read_rows(&self) -> RowcallResult<Vec<Vec<String>>> {
        let rows = self
            .rows
            .read()
            .map_err(|_| RowcallError::Store(StoreError::LockPoisoned))?;

        let mut snapshot: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                let len = row.iter().rposition(|cell| !cell.is_empty()).map_or(0, |i| i + 1);
                row[..len].to_vec()
            })
            .collect();
        while snapshot.last().is_some_and(|row| row.is_empty()) {
            snapshot.pop();
        }
        Ok(snapshot)
    }

    async fn update_row(&self, position: RowPosition, values: &[String]) -> RowcallResult<()> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| RowcallError::Store(StoreError::LockPoisoned))?;

        let idx = position.data_index();
        if rows.len() <= idx {
            rows.resize(idx + 1, Vec::new());
        }
        let row = &mut rows[idx];
        if row.len() < values.len() {
            row.resize(values.len(), String::new());
        }
        row[..values.len()].clone_from_slice(values);
        drop(rows);

        self.writes
            .write()
            .map_err(|_| RowcallError::Store(StoreError::LockPoisoned))?
            .push((position, values.to_vec()));
        Ok(())
    }
}
