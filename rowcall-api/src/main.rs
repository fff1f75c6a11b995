//! ROWCALL API Server Entry Point
//!
//! Loads configuration, builds the Sheets store and the Bolna client, and
//! serves the router until Ctrl-C. On shutdown, in-flight requests finish and
//! any dispatch pass still running is allowed to record its calls.

use std::sync::Arc;

use rowcall_api::telemetry::{init_tracer, TelemetryConfig};
use rowcall_api::{
    create_router, http_client, load_config, resolve_bind_addr, ApiError, ApiResult, AppState,
    BolnaClient, SheetsRowStore,
};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::from_env();
    init_tracer(&telemetry_config)?;

    let config = Arc::new(load_config()?);
    let client = http_client(config.http_timeout)?;

    let store = Arc::new(SheetsRowStore::from_config(&config.sheet, client.clone())?);
    let provider = Arc::new(BolnaClient::new(&config.provider, client));
    let state = AppState::new(config.clone(), store, provider)?;
    let ledger = state.ledger.clone();
    let app = create_router(state);

    let addr = resolve_bind_addr(&config)?;
    tracing::info!(
        %addr,
        sheet = %config.sheet.sheet_name,
        status_policy = ?config.status_policy,
        "Starting ROWCALL server"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;

    // A detached pass holds the lease until its last row is written.
    let _drained = ledger.lease().await;
    tracing::info!("Row store drained, exiting");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
