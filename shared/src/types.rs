//! Common types used across the dashboard

use serde::{Deserialize, Serialize};

/// Logical device number as exposed by the sensor service (1-based position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub u8);

impl DeviceId {
    pub fn new(id: u8) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for DeviceId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

/// Fallback order used when no device is selected
pub const DEFAULT_DEVICE_PRIORITY: [DeviceId; 3] = [DeviceId(1), DeviceId(2), DeviceId(3)];

/// Monitoring medium chosen at the top of the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    /// Soil sensors
    Terreno,
    /// Air sensors
    Aire,
}

impl Medium {
    pub fn code(&self) -> &'static str {
        match self {
            Medium::Terreno => "terreno",
            Medium::Aire => "aire",
        }
    }
}

impl std::fmt::Display for Medium {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Medium {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "terreno" | "soil" => Ok(Medium::Terreno),
            "aire" | "air" => Ok(Medium::Aire),
            other => Err(format!("unknown medium: {}", other)),
        }
    }
}
