//! Production row store backends.

pub mod sheets;

pub use sheets::{SheetsRowStore, TokenSource, SHEETS_SCOPE};
