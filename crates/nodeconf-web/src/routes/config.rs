//! Node configuration routes.
//!
//! # Endpoints
//!
//! ### `GET /config`
//! Returns the HTML configuration page, pre-filled with current values.
//!
//! ### `POST /config`
//! Applies an urlencoded form submission and saves the settings file.
//! Unchecked checkboxes are absent from the submission and read as off.
//!
//! **Response:** `303 See Other` back to `/config`, `400` with per-field
//! errors in strict mode, `413` when the encoded settings exceed the file
//! size limit, `500` when the file cannot be written. On `413` and `500`
//! the submitted values stay active in memory but are not persisted.
//!
//! ### `GET /config.json`
//! Returns the current settings. Secret fields are masked.
//!
//! ### `POST /config/reload`
//! Re-reads the settings file.
//!
//! **Response:**
//! ```json
//! {
//!   "applied": ["alarmActive", "dataStoreDelay"],
//!   "skipped": [],
//!   "ignored": []
//! }
//! ```

use std::collections::HashMap;

use axum::{
    extract::State,
    response::{Html, Json, Redirect},
    routing::{get, post},
    Form, Router,
};
use nodeconf_core::LoadReport;
use tracing::{info, warn};

use crate::error::WebError;
use crate::page::config_page;
use crate::AppState;

/// Create configuration routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/config", get(get_config_page).post(post_config_form))
        .route("/config.json", get(get_config_json))
        .route("/config/reload", post(reload_config))
}

/// GET /config
async fn get_config_page(State(state): State<AppState>) -> Html<String> {
    let config = state.config.read().await;
    Html(config_page(&config))
}

/// POST /config
async fn post_config_form(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Redirect, WebError> {
    let mut config = state.config.write().await;

    if state.options.strict_forms {
        config.apply_form_strict(&form)?;
    } else {
        config.apply_form(&form);
    }

    config.save(state.storage.as_ref()).map_err(|e| {
        warn!("Config submitted but not saved: {}", e);
        e
    })?;

    info!("Config updated from form submission");
    Ok(Redirect::to("/config"))
}

/// GET /config.json
async fn get_config_json(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.config.read().await;
    Json(serde_json::Value::Object(config.to_json_masked()))
}

/// POST /config/reload
async fn reload_config(State(state): State<AppState>) -> Result<Json<LoadReport>, WebError> {
    let mut config = state.config.write().await;
    let report = config.load(state.storage.as_ref())?;
    Ok(Json(report))
}
