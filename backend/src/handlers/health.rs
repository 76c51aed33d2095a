//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub upstream: String,
    pub cached_devices: usize,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check sensor service connectivity
    let upstream_status = if state.client.ping().await {
        "connected".to_string()
    } else {
        "disconnected".to_string()
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        upstream: upstream_status,
        cached_devices: state.cache.device_count(),
    })
}

/// Root endpoint
pub async fn root() -> &'static str {
    "Sembrando Bits Sensor Dashboard API v1.0"
}
