//! Dashboard selection state
//!
//! Mirrors the controls of the dashboard: a medium (soil or air), a device and
//! a crop. The selected device is polled at the fine interval for as long as
//! it stays selected.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use shared::{assess, validate_device_id, CompatibilityReport, CropCatalog, DeviceId, Medium};

use crate::error::{AppError, AppResult};
use crate::external::SensorDataSource;
use crate::services::device_cache::DeviceCache;
use crate::services::polling::{Poller, PollerHandle};

/// Serializable view of the current selection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub medium: Option<Medium>,
    pub device: Option<DeviceId>,
    pub crop: Option<String>,
    pub pending_rating: Option<u8>,
    pub fine_polling: bool,
}

/// Selection state of the dashboard
pub struct DashboardSession<S: SensorDataSource> {
    source: Arc<S>,
    cache: DeviceCache,
    catalog: Arc<CropCatalog>,
    priority: Vec<DeviceId>,
    fine_interval: Duration,

    medium: Option<Medium>,
    device: Option<DeviceId>,
    crop: Option<String>,
    pending_rating: Option<u8>,
    fine_poller: Option<PollerHandle>,
}

impl<S: SensorDataSource> DashboardSession<S> {
    pub fn new(
        source: Arc<S>,
        cache: DeviceCache,
        catalog: Arc<CropCatalog>,
        priority: Vec<DeviceId>,
        fine_interval: Duration,
    ) -> Self {
        Self {
            source,
            cache,
            catalog,
            priority,
            fine_interval,
            medium: None,
            device: None,
            crop: None,
            pending_rating: None,
            fine_poller: None,
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            medium: self.medium,
            device: self.device,
            crop: self.crop.clone(),
            pending_rating: self.pending_rating,
            fine_polling: self.fine_poller.as_ref().is_some_and(PollerHandle::is_running),
        }
    }

    pub fn medium(&self) -> Option<Medium> {
        self.medium
    }

    pub fn device(&self) -> Option<DeviceId> {
        self.device
    }

    pub fn crop(&self) -> Option<&str> {
        self.crop.as_deref()
    }

    pub fn pending_rating(&self) -> Option<u8> {
        self.pending_rating
    }

    /// Choose a medium; choosing the current one again deselects it.
    /// Either way the device and crop selections are cleared.
    pub fn select_medium(&mut self, medium: Medium) {
        self.medium = if self.medium == Some(medium) {
            None
        } else {
            Some(medium)
        };
        self.select_device_unchecked(None);
        self.crop = None;
    }

    /// Choose the device to follow closely, restarting the fine poller
    pub fn select_device(&mut self, device: Option<DeviceId>) -> AppResult<()> {
        if let Some(id) = device {
            let known = self.priority.iter().map(DeviceId::get).max().unwrap_or(0);
            validate_device_id(id, usize::from(known)).map_err(|msg| AppError::Validation {
                field: "device".to_string(),
                message: msg.to_string(),
                message_es: format!("Dispositivo {} no válido", id),
            })?;
        }
        self.select_device_unchecked(device);
        Ok(())
    }

    fn select_device_unchecked(&mut self, device: Option<DeviceId>) {
        if let Some(poller) = self.fine_poller.take() {
            poller.stop();
        }

        self.device = device;
        self.fine_poller = device.map(|id| {
            Poller::spawn(
                format!("device-{}", id),
                self.fine_interval,
                vec![id],
                Arc::clone(&self.source),
                self.cache.clone(),
            )
        });
    }

    /// Choose a crop from the catalog
    pub fn select_crop(&mut self, crop: Option<String>) -> AppResult<()> {
        if let Some(crop_id) = &crop {
            if !self.catalog.contains(crop_id) {
                return Err(AppError::NotFound(format!("crop {}", crop_id)));
            }
        }
        self.crop = crop;
        Ok(())
    }

    /// Remember the star value the user is about to submit
    pub fn set_pending_rating(&mut self, rating: u8) {
        self.pending_rating = Some(rating);
    }

    /// Forget the pending rating; called after every submission attempt
    pub fn clear_pending_rating(&mut self) {
        self.pending_rating = None;
    }

    /// Compatibility of the selected crop with the freshest available readings
    pub fn compatibility(&self) -> AppResult<CompatibilityReport> {
        let crop_id = self.crop.as_deref().ok_or_else(|| AppError::Validation {
            field: "crop".to_string(),
            message: "No crop selected".to_string(),
            message_es: "No se ha seleccionado un cultivo".to_string(),
        })?;

        let report = assess(
            &self.catalog,
            crop_id,
            self.device,
            &self.cache.snapshot(),
            &self.priority,
        )?;
        Ok(report)
    }
}
