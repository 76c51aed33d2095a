//! HTTP handlers for the dashboard selection

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::{CompatibilityReport, DeviceId, Medium};

use crate::error::AppResult;
use crate::services::SessionView;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SelectMediumInput {
    pub medium: Medium,
}

#[derive(Debug, Deserialize)]
pub struct SelectDeviceInput {
    pub device: Option<DeviceId>,
}

#[derive(Debug, Deserialize)]
pub struct SelectCropInput {
    pub crop: Option<String>,
}

/// Current selection
pub async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.lock().await.view())
}

/// Select a medium, or deselect it when already selected
pub async fn select_medium(
    State(state): State<AppState>,
    Json(input): Json<SelectMediumInput>,
) -> Json<SessionView> {
    let mut session = state.session.lock().await;
    session.select_medium(input.medium);
    Json(session.view())
}

/// Select the device to poll closely
pub async fn select_device(
    State(state): State<AppState>,
    Json(input): Json<SelectDeviceInput>,
) -> AppResult<Json<SessionView>> {
    let mut session = state.session.lock().await;
    session.select_device(input.device)?;
    Ok(Json(session.view()))
}

/// Select a crop
pub async fn select_crop(
    State(state): State<AppState>,
    Json(input): Json<SelectCropInput>,
) -> AppResult<Json<SessionView>> {
    let mut session = state.session.lock().await;
    session.select_crop(input.crop)?;
    Ok(Json(session.view()))
}

/// Compatibility of the selected crop
pub async fn get_session_compatibility(
    State(state): State<AppState>,
) -> AppResult<Json<CompatibilityReport>> {
    let report = state.session.lock().await.compatibility()?;
    Ok(Json(report))
}
