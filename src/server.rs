//! ==============================================================================
//! server.rs - http surface
//! ==============================================================================
//!
//! routes:
//!     POST /api/report              sensor nodes push readings here
//!     GET  /api/pollution-data      latest reading + location per sensor
//!     GET  /api/history/:name       up to 30 readings, oldest first
//!     GET  /api/zones               configured discovery zones
//!     GET  /health                  liveness + registered sensor count
//!     GET  /                        map page (static_dir/map.html)
//!
//! ==============================================================================

use crate::domain::{IngestAck, Reading, SensorReport, SensorSnapshot};
use crate::error::IngestError;
use crate::service::IngestionService;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

pub type SharedService = Arc<IngestionService>;

/// api routes only, no static files
pub fn api_router(service: SharedService) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/report", post(report_handler))
        .route("/api/pollution-data", get(pollution_data_handler))
        .route("/api/history/:sensor_name", get(history_handler))
        .route("/api/zones", get(zones_handler))
        .with_state(service)
}

/// full application: api plus the map page
pub fn router(service: SharedService, static_dir: impl Into<PathBuf>) -> Router {
    let static_dir = static_dir.into();
    api_router(service)
        .route_service("/", ServeFile::new(static_dir.join("map.html")))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
}

async fn health_handler(State(service): State<SharedService>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "sensors": service.registry().len().await }))
}

async fn report_handler(
    State(service): State<SharedService>,
    payload: Result<Json<SensorReport>, JsonRejection>,
) -> Result<Json<IngestAck>, IngestError> {
    let Json(report) = payload.map_err(|rejection| {
        tracing::warn!("[INGEST] malformed report: {}", rejection.body_text());
        IngestError::MalformedInput(rejection.body_text())
    })?;

    service.ingest(report).await.map(Json)
}

async fn pollution_data_handler(State(service): State<SharedService>) -> Json<Vec<SensorSnapshot>> {
    Json(service.snapshot().await)
}

async fn history_handler(
    State(service): State<SharedService>,
    Path(sensor_name): Path<String>,
) -> Json<Vec<Reading>> {
    Json(service.history(&sensor_name).await)
}

async fn zones_handler(State(service): State<SharedService>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "zones": service.zones().await }))
}
