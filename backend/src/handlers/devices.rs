//! HTTP handlers for devices, readings and sensor fields

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{gauges_for, Device, DeviceId, Gauge, SensorFieldCatalog, SensorReading};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Readings of one device with their freshness
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceReadingsResponse {
    pub device: DeviceId,
    pub readings: SensorReading,
    pub fetched_at: Option<DateTime<Utc>>,
    pub stale: bool,
    pub last_error: Option<String>,
}

fn checked_device(device: u8) -> AppResult<DeviceId> {
    if device == 0 {
        return Err(AppError::Validation {
            field: "device".to_string(),
            message: "Device numbers start at 1".to_string(),
            message_es: "Los dispositivos se numeran desde 1".to_string(),
        });
    }
    Ok(DeviceId(device))
}

/// List the devices known to the sensor service
pub async fn list_devices(State(state): State<AppState>) -> AppResult<Json<Vec<Device>>> {
    let devices = state.client.list_devices().await?;
    Ok(Json(devices))
}

/// Refresh and return the readings of a device.
///
/// A failed refresh still answers with whatever was cached before, flagged stale.
pub async fn get_device_readings(
    State(state): State<AppState>,
    Path(device): Path<u8>,
) -> AppResult<Json<DeviceReadingsResponse>> {
    let device = checked_device(device)?;
    state.cache.refresh(state.client.as_ref(), device).await;

    let entry = state.cache.entry(device).unwrap_or_default();
    Ok(Json(DeviceReadingsResponse {
        device,
        stale: entry.is_stale(),
        readings: entry.readings,
        fetched_at: entry.fetched_at,
        last_error: entry.last_error,
    }))
}

/// Gauge cards for the parameters a device reports
pub async fn get_device_gauges(
    State(state): State<AppState>,
    Path(device): Path<u8>,
) -> AppResult<Json<Vec<Gauge>>> {
    let device = checked_device(device)?;
    let readings = state.cache.refresh(state.client.as_ref(), device).await;
    Ok(Json(gauges_for(&readings)))
}

/// Sensor fields grouped by device
pub async fn list_sensor_fields(
    State(state): State<AppState>,
) -> AppResult<Json<SensorFieldCatalog>> {
    let catalog = state.client.list_sensor_fields().await?;
    Ok(Json(catalog))
}
