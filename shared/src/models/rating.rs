//! User rating models

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::types::{DeviceId, Medium};

/// A 1-5 star rating submitted from the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RatingSubmission {
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: u8,
    #[serde(default, rename = "dispositivo")]
    pub device: Option<DeviceId>,
    #[serde(default, rename = "cultivo")]
    pub crop: Option<String>,
    #[serde(default, rename = "medio")]
    pub medium: Option<Medium>,
}

impl RatingSubmission {
    pub fn new(rating: u8) -> Self {
        Self {
            rating,
            device: None,
            crop: None,
            medium: None,
        }
    }
}

/// A stored rating as listed by the sensor service.
///
/// The service stores whatever clients sent, so every field other than the id
/// decodes leniently: a value that cannot be understood becomes `None` instead
/// of failing the whole listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<u8>,
    #[serde(default, rename = "dispositivo", deserialize_with = "lenient_device")]
    pub device: Option<DeviceId>,
    #[serde(default, rename = "cultivo", deserialize_with = "lenient_text")]
    pub crop: Option<String>,
    #[serde(default, rename = "medio", deserialize_with = "lenient_medium")]
    pub medium: Option<Medium>,
    /// Naive UTC timestamp as written by the service
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<NaiveDateTime>,
}

/// Small non-negative integer from a JSON number or numeric string
fn small_integer(value: &Value) -> Option<u8> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (number.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&number)).then_some(number as u8)
}

fn lenient_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    Ok(small_integer(&Value::deserialize(deserializer)?))
}

fn lenient_device<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DeviceId>, D::Error> {
    Ok(small_integer(&Value::deserialize(deserializer)?).map(DeviceId))
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    })
}

fn lenient_medium<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Medium>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s.parse().ok(),
        _ => None,
    })
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s.parse().ok(),
        _ => None,
    })
}

/// Aggregate statistics over a set of ratings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub total: u32,
    /// Mean rating rounded to two decimals, 0 when there are no ratings
    pub average: f64,
    /// Count per star value, index 0 holds one-star ratings
    pub distribution: [u32; 5],
}

impl RatingSummary {
    /// Summary from the service's aggregate figures. Counts for star values
    /// outside 1-5 are ignored and the average is rounded to two decimals.
    pub fn from_statistics<'a>(
        total: u32,
        average: Option<f64>,
        distribution: impl IntoIterator<Item = (&'a str, u32)>,
    ) -> Self {
        let mut counts = [0u32; 5];
        for (stars, count) in distribution {
            if let Ok(stars @ 1..=5) = stars.trim().parse::<usize>() {
                counts[stars - 1] = count;
            }
        }

        let average = average
            .filter(|avg| avg.is_finite() && total > 0)
            .map_or(0.0, |avg| (avg * 100.0).round() / 100.0);

        Self {
            total,
            average,
            distribution: counts,
        }
    }
}
