//! ==============================================================================
//! main.rs - air quality hub entry point
//! ==============================================================================
//!
//! purpose:
//!     the hub that sensor nodes report into. it registers every new sensor,
//!     derives an aqi from each report, keeps the latest reading plus a short
//!     history per sensor, and serves all of it to the map page.
//!
//! responsibilities:
//!     - load configuration (hub.toml, defaults, env override for the key)
//!     - set up logging
//!     - build the ingestion service (registry + store + location assigner)
//!     - serve the api and the static map page until ctrl-c
//!
//! relationships:
//!     - uses: config.rs (HubConfig)
//!     - uses: service.rs (IngestionService)
//!     - uses: server.rs (router)
//!
//! architecture:
//!
//!     ┌──────────────┐  POST /api/report   ┌──────────────────────────────┐
//!     │ sensor nodes │ ──────────────────▶ │ server.rs                    │
//!     └──────────────┘                     │   └─ service.rs              │
//!     ┌──────────────┐  GET /api/...       │        ├─ registry.rs        │
//!     │  map page    │ ◀────────────────── │        │    └─ location.rs   │
//!     └──────────────┘                     │        └─ store.rs           │
//!                                          │             ├─ aqi.rs        │
//!                                          │             └─ history.rs    │
//!                                          └──────────────────────────────┘
//!
//!     all state lives in memory for the lifetime of the process.
//!
//! ==============================================================================

mod aqi;
mod config;
mod domain;
mod error;
mod history;
mod location;
mod registry;
mod server;
mod service;
mod store;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // step 1: load configuration
    let (config, config_notes) = config::HubConfig::load_or_default();

    // step 2: logging (RUST_LOG wins over the config file)
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("===========================================================");
    tracing::info!("  Air Quality Hub");
    tracing::info!("===========================================================");
    for note in &config_notes {
        tracing::info!("[CONFIG] {}", note);
    }
    config.print_summary();

    // step 3: shared service state
    let service = Arc::new(service::IngestionService::from_config(&config));
    tracing::info!("[STARTUP] ✓ Sensor registry and reading store ready");

    // step 4: serve
    let app = server::router(service, &config.server.static_dir);
    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_address))?;
    tracing::info!("[STARTUP] ✓ Map live at http://{}", config.server.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("web server error")?;

    tracing::info!("[SHUTDOWN] stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
