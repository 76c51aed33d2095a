//! Route definitions for the Sembrando Bits dashboard API

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Devices and their readings
        .nest("/devices", device_routes())
        .route("/sensors/fields", get(handlers::list_sensor_fields))
        // Crop catalog and compatibility
        .nest("/crops", crop_routes())
        // Dashboard selection
        .nest("/session", session_routes())
        // User ratings
        .nest("/ratings", rating_routes())
}

/// Device routes
fn device_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_devices))
        .route("/:device_id/readings", get(handlers::get_device_readings))
        .route("/:device_id/gauges", get(handlers::get_device_gauges))
}

/// Crop routes
fn crop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_crops))
        .route("/:crop_id/compatibility", get(handlers::get_crop_compatibility))
}

/// Session routes
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_session))
        .route("/medium", put(handlers::select_medium))
        .route("/device", put(handlers::select_device))
        .route("/crop", put(handlers::select_crop))
        .route("/compatibility", get(handlers::get_session_compatibility))
}

/// Rating routes
fn rating_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_ratings).post(handlers::submit_rating))
        .route("/summary", get(handlers::get_rating_summary))
}
