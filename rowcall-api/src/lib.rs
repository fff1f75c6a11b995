//! ROWCALL API - HTTP Layer and Production Adapters
//!
//! Exposes the dispatch and webhook endpoints (Axum), the Google Sheets row
//! store, and the Bolna call provider client.
//!
//! Every read-modify-write against the sheet goes through the
//! `RowLedger` held in [`AppState`], so dispatch passes and webhook
//! reconciliations never interleave.

pub mod config;
pub mod error;
pub mod macros;
pub mod providers;
pub mod routes;
pub mod services;
pub mod state;
pub mod stores;
pub mod telemetry;

// Re-export commonly used types
pub use config::{http_client, load_config, resolve_bind_addr};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use providers::BolnaClient;
pub use routes::create_router;
pub use services::{
    handle_event, run_dispatch, DispatchFailure, DispatchReport, DispatchStage, DispatchedCall,
    ReconcileOutcome,
};
pub use state::AppState;
pub use stores::{SheetsRowStore, TokenSource};
