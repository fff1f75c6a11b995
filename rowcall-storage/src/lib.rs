//! ROWCALL Storage - Row Store Trait, Lease and In-Memory Backend
//!
//! Defines the storage abstraction for the positional task list.
//! The spreadsheet-backed implementation lives in rowcall-api.

pub mod async_trait;
pub mod ledger;
pub mod memory;

pub use async_trait::RowStore;
pub use ledger::{RowLease, RowLedger};
pub use memory::InMemoryRowStore;
