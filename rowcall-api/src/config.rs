//! Process Configuration Loading
//!
//! Reads an optional `.env` file, then builds the immutable
//! [`RowcallConfig`] every component shares.

use rowcall_core::RowcallConfig;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{ApiError, ApiResult};

/// Load configuration for the server process.
///
/// A missing `.env` file is not an error; a malformed one is logged and
/// ignored.
pub fn load_config() -> ApiResult<RowcallConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }
    RowcallConfig::from_env().map_err(|e| ApiError::internal_error(e.to_string()))
}

/// Socket address the server listens on.
pub fn resolve_bind_addr(config: &RowcallConfig) -> ApiResult<SocketAddr> {
    let addr = format!("{}:{}", config.server.bind_host, config.server.port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
}

/// Shared outbound HTTP client with the configured request timeout.
pub fn http_client(timeout: Duration) -> ApiResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ApiError::internal_error(format!("Failed to create HTTP client: {}", e)))
}
