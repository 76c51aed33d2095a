//! Configuration management for the Sembrando Bits dashboard service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with SB_ prefix

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{CatalogError, CropCatalog, CropProfile, DeviceId, DEFAULT_DEVICE_PRIORITY};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Sensor service configuration
    pub upstream: UpstreamConfig,

    /// Polling loop configuration
    pub polling: PollingConfig,

    /// Crop profiles replacing the built-in catalog
    #[serde(default)]
    pub crops: Option<Vec<CropProfile>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the sensor/measurement service
    pub base_url: String,

    /// Per-request timeout; unset means requests wait indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    /// Interval of the loop refreshing every device
    pub coarse_interval_secs: u64,

    /// Interval of the loop refreshing the selected device
    pub fine_interval_secs: u64,

    /// Devices polled by the coarse loop, also the fallback order for scoring
    pub devices: Vec<u8>,
}

impl UpstreamConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl PollingConfig {
    pub fn coarse_interval(&self) -> Duration {
        Duration::from_secs(self.coarse_interval_secs.max(1))
    }

    pub fn fine_interval(&self) -> Duration {
        Duration::from_secs(self.fine_interval_secs.max(1))
    }

    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.devices.iter().copied().map(DeviceId).collect()
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("SB_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let default_devices: Vec<i64> = DEFAULT_DEVICE_PRIORITY
            .iter()
            .map(|id| i64::from(id.get()))
            .collect();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("upstream.base_url", "http://localhost:8860")?
            .set_default("polling.coarse_interval_secs", 30)?
            .set_default("polling.fine_interval_secs", 5)?
            .set_default("polling.devices", default_devices)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SB_ prefix)
            .add_source(
                Environment::with_prefix("SB")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("polling.devices")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Build the crop catalog, validating any configured profiles
    pub fn crop_catalog(&self) -> Result<CropCatalog, CatalogError> {
        match &self.crops {
            Some(profiles) => CropCatalog::new(profiles.clone()),
            None => Ok(CropCatalog::builtin()),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            coarse_interval_secs: 30,
            fine_interval_secs: 5,
            devices: DEFAULT_DEVICE_PRIORITY.iter().map(DeviceId::get).collect(),
        }
    }
}
