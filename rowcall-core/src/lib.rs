//! ROWCALL Core - Row and Call Types
//!
//! Pure data structures shared by the store adapters, the call provider
//! client and the HTTP layer. No I/O lives here.

pub mod call;
pub mod config;
pub mod error;
pub mod provider;
pub mod row;
pub mod status;

pub use call::{CallEvent, CallInitiated, CallOutcome, CallRequest, UserData, ValidatedEvent};
pub use config::{ProviderConfig, RowcallConfig, ServerConfig, SheetConfig};
pub use error::{
    ConfigError, ProviderError, RowcallError, RowcallResult, StoreError, ValidationError,
};
pub use provider::CallProvider;
pub use row::{PositionedRow, Row, RowPosition, DISPATCH_WIDTH, ROW_WIDTH};
pub use status::{CallStatus, StatusPolicy};

use chrono::{DateTime, SecondsFormat, Utc};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// ISO-8601 text stored in the `updated_at` column, e.g.
/// `2026-01-01T09:30:00.000Z`.
pub fn format_timestamp(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time in the `updated_at` column format.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}
