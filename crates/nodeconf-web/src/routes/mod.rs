//! HTTP route handlers for the node configuration surface.

pub mod config;

use crate::AppState;
use axum::{response::Redirect, routing::get, Router};

/// Create the main Axum router with all routes.
///
/// Routes are organized as:
/// - `/` - Redirects to the configuration page
/// - `/config` - HTML page and form submission
/// - `/config.json`, `/config/reload` - JSON view and reload
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/config") }))
        .merge(config::routes())
        .with_state(state)
}
