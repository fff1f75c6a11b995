//! HTTP Routes
//!
//! Builds the full router: dispatch, webhook, health and metrics, wrapped
//! in the observability middleware.

pub mod dispatch;
pub mod health;
pub mod webhook;

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware};

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let metrics = state.metrics.clone();
    Router::new()
        .merge(dispatch::create_router())
        .merge(webhook::create_router())
        .merge(health::create_router())
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn_with_state(
            metrics,
            observability_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
