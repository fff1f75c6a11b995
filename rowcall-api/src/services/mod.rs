//! Service Layer
//!
//! Dispatch and reconciliation logic. Routes translate HTTP to these calls
//! and back; services never see axum types.

mod dispatch_service;
mod reconcile_service;

pub use dispatch_service::*;
pub use reconcile_service::*;
