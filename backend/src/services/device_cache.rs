//! Last-known-good cache of per-device readings
//!
//! A failed refresh never clears data: the previous readings stay visible and
//! the entry is marked stale until the next successful fetch.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{DeviceId, SensorReading};

use crate::error::AppError;
use crate::external::SensorDataSource;

/// Cached state of one device
#[derive(Debug, Clone, Default, Serialize)]
pub struct CachedReadings {
    pub readings: SensorReading,
    /// Time of the last successful fetch
    pub fetched_at: Option<DateTime<Utc>>,
    /// Message of the last failed fetch, cleared on success
    pub last_error: Option<String>,
    pub last_error_at: Option<DateTime<Utc>>,
}

impl CachedReadings {
    /// True when the newest attempt failed and the readings are older than it
    pub fn is_stale(&self) -> bool {
        self.last_error.is_some()
    }
}

/// Shared device cache, cloned into handlers and polling tasks
#[derive(Debug, Clone, Default)]
pub struct DeviceCache {
    entries: Arc<RwLock<HashMap<DeviceId, CachedReadings>>>,
}

impl DeviceCache {
    pub fn new() -> Self {
        Self::default()
    }

    // A panicked writer leaves a usable map behind, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<DeviceId, CachedReadings>> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<DeviceId, CachedReadings>> {
        self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the readings of `device`
    pub fn record_success(&self, device: DeviceId, readings: SensorReading) {
        let mut entries = self.write();
        let entry = entries.entry(device).or_default();
        entry.readings = readings;
        entry.fetched_at = Some(Utc::now());
        entry.last_error = None;
        entry.last_error_at = None;
    }

    /// Mark `device` as failed, keeping whatever it reported before
    pub fn record_failure(&self, device: DeviceId, error: &AppError) {
        let mut entries = self.write();
        let entry = entries.entry(device).or_default();
        entry.last_error = Some(error.to_string());
        entry.last_error_at = Some(Utc::now());
    }

    /// Fetch `device` from `source` and store the outcome.
    ///
    /// Returns the readings now held for the device: fresh ones on success,
    /// the retained ones (possibly empty) on failure.
    pub async fn refresh<S: SensorDataSource>(&self, source: &S, device: DeviceId) -> SensorReading {
        match source.fetch_device_readings(device).await {
            Ok(readings) => {
                tracing::debug!("Device {} refreshed with {} fields", device, readings.len());
                self.record_success(device, readings.clone());
                readings
            }
            Err(e) => {
                tracing::warn!("Refreshing device {} failed: {}", device, e);
                self.record_failure(device, &e);
                self.readings(device).unwrap_or_default()
            }
        }
    }

    /// Readings currently held for `device`
    pub fn readings(&self, device: DeviceId) -> Option<SensorReading> {
        self.read().get(&device).map(|entry| entry.readings.clone())
    }

    /// Full cache entry for `device`
    pub fn entry(&self, device: DeviceId) -> Option<CachedReadings> {
        self.read().get(&device).cloned()
    }

    /// Non-empty reading sets of every device, the evaluator's input
    pub fn snapshot(&self) -> HashMap<DeviceId, SensorReading> {
        self.read()
            .iter()
            .filter(|(_, entry)| !entry.readings.is_empty())
            .map(|(id, entry)| (*id, entry.readings.clone()))
            .collect()
    }

    /// Number of devices holding readings
    pub fn device_count(&self) -> usize {
        self.read()
            .values()
            .filter(|entry| !entry.readings.is_empty())
            .count()
    }
}
