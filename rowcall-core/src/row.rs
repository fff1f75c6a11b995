//! Positional row model for the task list.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CallStatus, ValidationError};

/// Number of columns the row model owns (A..H).
pub const ROW_WIDTH: usize = 8;

/// Number of columns written by a dispatch (A..G).
pub const DISPATCH_WIDTH: usize = 7;

/// 1-based sheet row number. Row 1 is the header, so data rows start at 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RowPosition(u32);

impl RowPosition {
    pub const FIRST_DATA_ROW: RowPosition = RowPosition(2);

    pub fn new(position: u32) -> Result<Self, ValidationError> {
        if position < Self::FIRST_DATA_ROW.0 {
            return Err(ValidationError::InvalidValue {
                field: "row_position".to_string(),
                reason: format!("row {} is the header or out of range", position),
            });
        }
        Ok(Self(position))
    }

    /// Position of the `index`-th data row (0-based) in a read snapshot.
    pub fn from_data_index(index: usize) -> Self {
        Self(Self::FIRST_DATA_ROW.0 + index as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Index of this row inside a header-exclusive snapshot.
    pub fn data_index(self) -> usize {
        (self.0 - Self::FIRST_DATA_ROW.0) as usize
    }
}

impl TryFrom<u32> for RowPosition {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RowPosition> for u32 {
    fn from(position: RowPosition) -> Self {
        position.0
    }
}

impl fmt::Display for RowPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One task-list row, in fixed column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub phone: String,
    pub name: String,
    pub call_status: String,
    pub call_id: String,
    pub result_text: String,
    pub updated_at: String,
    pub extracted_field: String,
}

impl Row {
    /// Build a row from raw store cells.
    ///
    /// Stores trim trailing empty cells, so short rows are padded with empty
    /// strings. Cells past column H are not part of the model and are dropped.
    pub fn from_values<S: AsRef<str>>(values: &[S]) -> Self {
        let cell = |idx: usize| {
            values
                .get(idx)
                .map(|v| v.as_ref().to_string())
                .unwrap_or_default()
        };
        Self {
            id: cell(0),
            phone: cell(1),
            name: cell(2),
            call_status: cell(3),
            call_id: cell(4),
            result_text: cell(5),
            updated_at: cell(6),
            extracted_field: cell(7),
        }
    }

    /// All owned columns, A..H.
    pub fn to_values(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.phone.clone(),
            self.name.clone(),
            self.call_status.clone(),
            self.call_id.clone(),
            self.result_text.clone(),
            self.updated_at.clone(),
            self.extracted_field.clone(),
        ]
    }

    /// Dispatch write shape, A..G. Column H is left to the store untouched.
    pub fn dispatch_values(&self) -> Vec<String> {
        let mut values = self.to_values();
        values.truncate(DISPATCH_WIDTH);
        values
    }

    pub fn status(&self) -> CallStatus {
        CallStatus::parse(&self.call_status)
    }

    pub fn has_phone(&self) -> bool {
        !self.phone.is_empty()
    }

    /// Eligible for dispatch: has a phone and has never been claimed.
    pub fn is_eligible(&self) -> bool {
        self.has_phone() && self.call_status.trim().is_empty()
    }

    /// Row claimed for a fresh call. Clears the previous cycle's result.
    pub fn initiated(&self, execution_id: &str, now: &str) -> Self {
        Self {
            call_status: CallStatus::Initiated.to_string(),
            call_id: execution_id.to_string(),
            result_text: String::new(),
            updated_at: now.to_string(),
            ..self.clone()
        }
    }
}

/// A row together with the position it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionedRow {
    pub position: RowPosition,
    pub row: Row,
}

impl PositionedRow {
    /// Attach positions to a header-exclusive snapshot, in store order.
    pub fn from_snapshot(snapshot: &[Vec<String>]) -> Vec<Self> {
        snapshot
            .iter()
            .enumerate()
            .map(|(idx, values)| Self {
                position: RowPosition::from_data_index(idx),
                row: Row::from_values(values),
            })
            .collect()
    }
}
