//! HTTP handlers for the crop catalog and compatibility reports

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::{assess, CompatibilityReport, CropProfile, DeviceId};

use crate::error::AppResult;
use crate::AppState;

/// List every crop profile
pub async fn list_crops(State(state): State<AppState>) -> Json<Vec<CropProfile>> {
    Json(state.catalog.iter().cloned().collect())
}

/// Query parameters for a compatibility report
#[derive(Debug, Deserialize)]
pub struct CompatibilityQuery {
    /// Device to score against; falls back to the polling priority
    pub device: Option<u8>,
}

/// Compatibility of a crop with the current readings
pub async fn get_crop_compatibility(
    State(state): State<AppState>,
    Path(crop_id): Path<String>,
    Query(query): Query<CompatibilityQuery>,
) -> AppResult<Json<CompatibilityReport>> {
    let selected = query.device.filter(|id| *id > 0).map(DeviceId);
    if let Some(device) = selected {
        state.cache.refresh(state.client.as_ref(), device).await;
    }

    let report = assess(
        &state.catalog,
        &crop_id,
        selected,
        &state.cache.snapshot(),
        &state.config.polling.device_ids(),
    )?;
    Ok(Json(report))
}
