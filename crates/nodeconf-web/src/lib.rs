//! # nodeconf-web
//!
//! Configuration web page and REST endpoints for the sensor/alarm node.
//!
//! This crate provides:
//! - The HTML configuration page and its form submission handler
//! - A JSON view of the current settings (secrets masked)
//! - A reload endpoint that re-reads the settings file
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nodeconf_web::{create_router, ServerState, WebOptions};
//!
//! let state = ServerState::new(store, storage, WebOptions::default());
//! let app = create_router(Arc::new(state));
//!
//! let listener = TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod error;
pub mod page;
pub mod routes;

// Re-exports
pub use error::WebError;
pub use routes::create_router;

use std::sync::Arc;

use nodeconf_core::{ConfigStore, Storage};
use tokio::sync::RwLock;

/// Behaviour switches for the web layer.
#[derive(Debug, Clone, Default)]
pub struct WebOptions {
    /// Reject malformed numbers instead of reading them as zero.
    pub strict_forms: bool,
}

/// Shared server state for all route handlers.
///
/// Form submission and reload take the write lock for the whole
/// apply-then-save sequence, so concurrent requests never interleave
/// partial updates.
pub struct ServerState {
    pub config: RwLock<ConfigStore>,
    pub storage: Arc<dyn Storage>,
    pub options: WebOptions,
}

impl ServerState {
    /// Create new server state.
    pub fn new(config: ConfigStore, storage: Arc<dyn Storage>, options: WebOptions) -> Self {
        Self {
            config: RwLock::new(config),
            storage,
            options,
        }
    }
}

/// Type alias for shared state in Axum handlers.
pub type AppState = Arc<ServerState>;
