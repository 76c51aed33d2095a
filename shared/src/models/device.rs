//! Device and sensor field models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::DeviceId;

/// A physical sensor unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Logical number used by the readings endpoint
    pub id: DeviceId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Identifier assigned by the sensor service
    pub upstream_id: String,
}

/// A field a sensor reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorField {
    pub field_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
}

/// A sensor and the fields it reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorDescriptor {
    pub sensor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_device_id: Option<String>,
    pub active: bool,
    pub fields: Vec<SensorField>,
}

/// Bucket for sensors not linked to any device
pub const UNASSIGNED_DEVICE: &str = "unassigned";

/// Per-device listing of the fields its sensors report, used to render
/// readings dynamically. Not an input to the compatibility check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorFieldCatalog {
    pub devices: BTreeMap<String, Vec<SensorDescriptor>>,
}

impl SensorFieldCatalog {
    /// Group active sensors by the upstream device they are linked to
    pub fn from_sensors(sensors: impl IntoIterator<Item = SensorDescriptor>) -> Self {
        let mut devices: BTreeMap<String, Vec<SensorDescriptor>> = BTreeMap::new();
        for sensor in sensors.into_iter().filter(|s| s.active) {
            let key = sensor
                .upstream_device_id
                .clone()
                .unwrap_or_else(|| UNASSIGNED_DEVICE.to_string());
            devices.entry(key).or_default().push(sensor);
        }
        Self { devices }
    }

    /// Field names reported by the sensors of one upstream device
    pub fn field_names(&self, upstream_device_id: &str) -> Vec<&str> {
        self.devices
            .get(upstream_device_id)
            .map(|sensors| {
                sensors
                    .iter()
                    .flat_map(|s| s.fields.iter().map(|f| f.field_name.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn sensor_count(&self) -> usize {
        self.devices.values().map(Vec::len).sum()
    }
}
