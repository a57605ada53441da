mod service;

use std::sync::Arc;

use nodeconf_core::{ConfigStore, FileStorage, LoadError, NodeConfig};
use nodeconf_web::{create_router, ServerState, WebOptions};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::service::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,nodeconf_core=debug,nodeconf_web=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Node configuration server starting...");

    let service = ServiceConfig::from_env()?;
    let storage = Arc::new(FileStorage::open(&service.data_dir)?);
    tracing::info!("Settings storage: {}", storage.root().display());

    // Load failures are not fatal: the node runs on defaults.
    let mut config = ConfigStore::node();
    match config.load(storage.as_ref()) {
        Ok(_) => {}
        Err(LoadError::Open { .. }) => {
            tracing::info!("No saved settings found, using defaults");
        }
        Err(e) => {
            tracing::warn!("Using defaults: {}", e);
        }
    }
    log_summary(&config);

    let state = Arc::new(ServerState::new(
        config,
        storage,
        WebOptions {
            strict_forms: service.strict_forms,
        },
    ));
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(service.bind_addr).await?;
    tracing::info!("HTTP server listening on {}", service.bind_addr);
    tracing::info!("   Config page: http://{}/config", service.bind_addr);

    let server = tokio::spawn(async move { axum::serve(listener, app).await });

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        result = server => {
            match result {
                Ok(Ok(())) => tracing::warn!("HTTP server stopped"),
                Ok(Err(e)) => tracing::error!("HTTP server error: {}", e),
                Err(e) => tracing::error!("HTTP server task failed: {}", e),
            }
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Log the settings that drive the node's behaviour.
fn log_summary(config: &ConfigStore) {
    match NodeConfig::try_from(config) {
        Ok(node) => {
            tracing::info!(
                hostname = %node.hostname,
                alarm_active = node.alarm_active,
                temperature_alarm = node.t_alarm_active,
                report_every_secs = node.data_store_delay,
                "Active settings"
            );
        }
        Err(e) => tracing::warn!("Settings do not match the node schema: {}", e),
    }
}
