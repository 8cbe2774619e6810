//! Pods HTTP API
//!
//! Wires configuration, shared clients and routes into a server.

use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

pub mod api;
pub mod config;
pub mod openapi;
pub mod state;

use config::Config;
use state::AppState;

pub async fn run() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let state = AppState::from_config(&config).await?;

    let router = axum_helpers::create_router::<openapi::ApiDoc>(api::routes(&state))?;

    // - /health: liveness check with app name/version
    // - /ready: readiness check against the vector store
    let app = router
        .merge(health_router(config.app))
        .merge(api::ready_router(state.clone()));

    info!(
        name = config.app.name,
        version = config.app.version,
        "Starting pods API"
    );

    create_production_app(app, &config.server, async {
        info!("Pod writes are persisted per request; nothing to flush");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Pods API shutdown complete");
    Ok(())
}
