//! Sensor service client
//!
//! Talks to the measurement service that stores devices, sensors, readings and
//! ratings. All interchange is schema-less JSON; only the fields the dashboard
//! needs are decoded.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shared::{
    Device, DeviceId, RatingRecord, RatingSubmission, RatingSummary, SensorDescriptor,
    SensorField, SensorFieldCatalog, SensorReading,
};

use crate::error::{AppError, AppResult};

/// Source of per-device readings, consumed by the cache and polling loops
pub trait SensorDataSource: Send + Sync + 'static {
    /// Latest reading set of one device, or an error the caller recovers from
    fn fetch_device_readings(
        &self,
        device: DeviceId,
    ) -> impl Future<Output = AppResult<SensorReading>> + Send;
}

/// HTTP client for the sensor service
#[derive(Clone)]
pub struct SensorApiClient {
    client: Client,
    base_url: String,
}

/// Device document as listed by the service
#[derive(Debug, Deserialize)]
struct DeviceDocument {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "nombre")]
    name: String,
    #[serde(default, rename = "ubicacion")]
    location: Option<String>,
}

/// Latest values of a logical device
#[derive(Debug, Deserialize)]
struct DeviceDataResponse {
    #[serde(default, rename = "datos")]
    data: SensorReading,
}

#[derive(Debug, Deserialize)]
struct SensorDocument {
    #[serde(rename = "sensor")]
    name: String,
    #[serde(default, rename = "activo")]
    active: bool,
    #[serde(default, rename = "dispositivo_id")]
    device_id: Option<String>,
    #[serde(default, rename = "campos")]
    fields: Vec<FieldDocument>,
}

#[derive(Debug, Deserialize)]
struct FieldDocument {
    #[serde(rename = "nombre_campo")]
    name: String,
    #[serde(default, rename = "tipo_campo")]
    field_type: Option<String>,
    #[serde(default = "default_active", rename = "activo")]
    active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct RatingListResponse {
    #[serde(default, rename = "votaciones")]
    ratings: Vec<RatingRecord>,
}

/// Aggregates over every stored rating
#[derive(Debug, Deserialize)]
struct RatingStatisticsResponse {
    #[serde(default, rename = "total_votaciones")]
    total: u32,
    #[serde(default, rename = "promedio_rating")]
    average: Option<f64>,
    #[serde(default, rename = "distribucion")]
    distribution: BTreeMap<String, u32>,
}

impl From<RatingStatisticsResponse> for RatingSummary {
    fn from(stats: RatingStatisticsResponse) -> Self {
        RatingSummary::from_statistics(
            stats.total,
            stats.average,
            stats
                .distribution
                .iter()
                .map(|(stars, count)| (stars.as_str(), *count)),
        )
    }
}

impl From<SensorDocument> for SensorDescriptor {
    fn from(doc: SensorDocument) -> Self {
        SensorDescriptor {
            sensor_name: doc.name,
            upstream_device_id: doc.device_id,
            active: doc.active,
            fields: doc
                .fields
                .into_iter()
                .filter(|f| f.active)
                .map(|f| SensorField {
                    field_name: f.name,
                    field_type: f.field_type,
                })
                .collect(),
        }
    }
}

impl SensorApiClient {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> AppResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List devices; logical ids follow the order the service returns them in
    pub async fn list_devices(&self) -> AppResult<Vec<Device>> {
        let documents: Vec<DeviceDocument> = self.get_json("/dispositivos").await?;

        Ok(documents
            .into_iter()
            .enumerate()
            .map(|(position, doc)| Device {
                id: DeviceId((position + 1).min(u8::MAX as usize) as u8),
                name: doc.name,
                location: doc.location,
                upstream_id: doc.id,
            })
            .collect())
    }

    /// Latest reading set of a logical device
    pub async fn get_device_readings(&self, device: DeviceId) -> AppResult<SensorReading> {
        let response: DeviceDataResponse =
            self.get_json(&format!("/dispositivo/{}", device)).await?;
        Ok(response.data)
    }

    /// Sensors and their fields, grouped per device
    pub async fn list_sensor_fields(&self) -> AppResult<SensorFieldCatalog> {
        let documents: Vec<SensorDocument> = self.get_json("/listar_sensores_campos").await?;
        Ok(SensorFieldCatalog::from_sensors(
            documents.into_iter().map(SensorDescriptor::from),
        ))
    }

    /// Store a rating. Sent once; failures are reported, never retried.
    pub async fn submit_rating(&self, submission: &RatingSubmission) -> AppResult<()> {
        let url = format!("{}/votacion", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(submission)
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("POST {}: {}", url, e)))?;

        Self::check_status(response).await.map(|_| ())
    }

    /// Most recent ratings, newest first
    pub async fn list_ratings(&self, limit: u32) -> AppResult<Vec<RatingRecord>> {
        let response: RatingListResponse =
            self.get_json(&format!("/votaciones?limit={}", limit)).await?;
        Ok(response.ratings)
    }

    /// Totals, mean and per-star counts over all stored ratings
    pub async fn rating_statistics(&self) -> AppResult<RatingSummary> {
        let response: RatingStatisticsResponse =
            self.get_json("/votaciones/estadisticas").await?;
        Ok(response.into())
    }

    /// Whether the service answers on its root endpoint
    pub async fn ping(&self) -> bool {
        match self.client.get(format!("{}/", self.base_url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("GET {}: {}", url, e)))?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::UpstreamResponse(format!("GET {}: {}", url, e)))
    }

    async fn check_status(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::UpstreamUnavailable(format!(
            "{} returned {} - {}",
            url, status, body
        )))
    }
}

impl SensorDataSource for SensorApiClient {
    fn fetch_device_readings(
        &self,
        device: DeviceId,
    ) -> impl Future<Output = AppResult<SensorReading>> + Send {
        self.get_device_readings(device)
    }
}
