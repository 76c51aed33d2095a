//! Crop compatibility scoring
//!
//! Each tracked parameter that both the crop profile constrains and the
//! reading set provides counts as one check. Parameters missing on either
//! side are skipped entirely; they never count as failures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{CropCatalog, CropProfile, SensorReading};
use crate::types::DeviceId;

use super::{resolve_parameter, CompatibilityError, Parameter, ReferenceRange};

/// Percentage at or above which a crop is considered compatible
pub const COMPATIBLE_THRESHOLD: u8 = 80;
/// Percentage at or above which a crop needs review instead of rejection
pub const REVIEW_THRESHOLD: u8 = 50;

/// Three-level compatibility status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompatibilityStatus {
    Compatible,
    #[serde(rename = "revisar")]
    Review,
    #[serde(rename = "no-compatible")]
    NotCompatible,
}

impl CompatibilityStatus {
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            p if p >= COMPATIBLE_THRESHOLD => CompatibilityStatus::Compatible,
            p if p >= REVIEW_THRESHOLD => CompatibilityStatus::Review,
            _ => CompatibilityStatus::NotCompatible,
        }
    }
}

impl std::fmt::Display for CompatibilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompatibilityStatus::Compatible => write!(f, "Compatible"),
            CompatibilityStatus::Review => write!(f, "Revisar"),
            CompatibilityStatus::NotCompatible => write!(f, "No compatible"),
        }
    }
}

/// Outcome of scoring one reading set against one crop profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityResult {
    pub compatibility_percentage: u8,
    pub passed_checks: u32,
    pub total_checks: u32,
    pub status: CompatibilityStatus,
    pub compatible: bool,
    pub issues: Vec<String>,
}

impl CompatibilityResult {
    /// Build a result from raw counts. No checks at all scores 100.
    pub fn from_counts(passed_checks: u32, total_checks: u32, issues: Vec<String>) -> Self {
        let compatibility_percentage = percentage(passed_checks, total_checks);
        Self {
            compatibility_percentage,
            passed_checks,
            total_checks,
            status: CompatibilityStatus::from_percentage(compatibility_percentage),
            compatible: compatibility_percentage >= COMPATIBLE_THRESHOLD,
            issues,
        }
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// `round(passed / total * 100)`, half away from zero; 100 when `total == 0`
pub fn percentage(passed: u32, total: u32) -> u8 {
    if total == 0 {
        return 100;
    }
    let passed = passed.min(total) as u64;
    let total = total as u64;
    ((passed * 200 + total) / (total * 2)) as u8
}

/// Score `readings` against `profile`
pub fn evaluate(profile: &CropProfile, readings: &SensorReading) -> CompatibilityResult {
    let mut passed = 0;
    let mut total = 0;
    let mut issues = Vec::new();

    for parameter in Parameter::ALL {
        let Some(range_text) = parameter.range_of(profile) else {
            continue;
        };
        let Some(range) = ReferenceRange::parse(range_text) else {
            continue;
        };
        let Some(value) = resolve_parameter(readings, parameter) else {
            continue;
        };

        total += 1;
        if range.contains(value) {
            passed += 1;
        } else {
            issues.push(issue_message(parameter, value, range_text));
        }
    }

    CompatibilityResult::from_counts(passed, total, issues)
}

/// `"<Label> fuera de rango (actual: <value><unit>, ideal: <range>)"`
pub fn issue_message(parameter: Parameter, value: f64, range_text: &str) -> String {
    format!(
        "{} fuera de rango (actual: {}{}, ideal: {})",
        parameter.label(),
        value,
        parameter.unit(),
        range_text
    )
}

/// Recommendation shown next to a scored crop
pub fn recommendation_text(profile: &CropProfile, result: &CompatibilityResult) -> String {
    if result.has_issues() {
        format!(
            "Compatibilidad: {}%. {}",
            result.compatibility_percentage,
            result.issues.join(". ")
        )
    } else {
        let summary = format!(
            "Compatibilidad: {}% ({}/{} parámetros dentro de rango)",
            result.compatibility_percentage, result.passed_checks, result.total_checks
        );
        match profile.recommendation.trim() {
            "" => summary,
            recommendation => format!("{} {}", recommendation, summary),
        }
    }
}

/// Pick the reading set to score.
///
/// The selected device wins when it has data; otherwise the first device in
/// `priority` with any reading is used.
pub fn select_reading_source<'a>(
    selected: Option<DeviceId>,
    readings_by_device: &'a HashMap<DeviceId, SensorReading>,
    priority: &[DeviceId],
) -> Option<(DeviceId, &'a SensorReading)> {
    let has_data = move |id: &DeviceId| {
        readings_by_device
            .get(id)
            .filter(|readings| !readings.is_empty())
            .map(|readings| (*id, readings))
    };

    selected
        .as_ref()
        .and_then(has_data)
        .or_else(|| priority.iter().find_map(has_data))
}

/// Compatibility view of one crop: static profile data plus the score when
/// some device has produced readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReport {
    pub crop_id: String,
    pub crop_name: String,
    pub status: CompatibilityStatus,
    pub compatible: bool,
    pub compatibility_percentage: u8,
    pub recommendation: String,
    pub issues: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_device: Option<DeviceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<CompatibilityResult>,
}

impl CompatibilityReport {
    /// Static profile, shown before any device has reported
    pub fn unscored(profile: &CropProfile) -> Self {
        Self {
            crop_id: profile.id.clone(),
            crop_name: profile.name.clone(),
            status: profile.status,
            compatible: profile.compatible,
            compatibility_percentage: 100,
            recommendation: profile.recommendation.clone(),
            issues: Vec::new(),
            source_device: None,
            score: None,
        }
    }

    pub fn scored(profile: &CropProfile, device: DeviceId, result: CompatibilityResult) -> Self {
        Self {
            crop_id: profile.id.clone(),
            crop_name: profile.name.clone(),
            status: result.status,
            compatible: result.compatible,
            compatibility_percentage: result.compatibility_percentage,
            recommendation: recommendation_text(profile, &result),
            issues: result.issues.clone(),
            source_device: Some(device),
            score: Some(result),
        }
    }

    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }
}

/// Full assessment for `crop_id` using the best available reading source
pub fn assess(
    catalog: &CropCatalog,
    crop_id: &str,
    selected: Option<DeviceId>,
    readings_by_device: &HashMap<DeviceId, SensorReading>,
    priority: &[DeviceId],
) -> Result<CompatibilityReport, CompatibilityError> {
    let profile = catalog
        .get(crop_id)
        .ok_or_else(|| CompatibilityError::UnknownCrop(crop_id.to_string()))?;

    let report = match select_reading_source(selected, readings_by_device, priority) {
        Some((device, readings)) => {
            CompatibilityReport::scored(profile, device, evaluate(profile, readings))
        }
        None => CompatibilityReport::unscored(profile),
    };
    Ok(report)
}
