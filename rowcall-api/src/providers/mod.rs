//! Call provider implementations.
//!
//! The `CallProvider` trait lives in `rowcall_core::provider`; the HTTP
//! clients that implement it live here.

pub mod bolna;

pub use bolna::BolnaClient;

use rowcall_core::{ProviderError, RowcallError};

pub(crate) fn transport_failed(provider: &str, reason: impl std::fmt::Display) -> RowcallError {
    ProviderError::Transport {
        provider: provider.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

pub(crate) fn status_failed(provider: &str, status: u16, body: String) -> RowcallError {
    ProviderError::Status {
        provider: provider.to_string(),
        status,
        body,
    }
    .into()
}

pub(crate) fn decode_failed(provider: &str, reason: impl std::fmt::Display) -> RowcallError {
    ProviderError::Decode {
        provider: provider.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
