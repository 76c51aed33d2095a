//! Crop reference profiles

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compatibility::{CompatibilityStatus, Parameter};
use crate::validation::validate_range;

/// Reference agronomic ranges for a named crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropProfile {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph_range: Option<String>,
    /// Electrical conductivity, shown as "nutrients" on the dashboard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrients_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nitrogen_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phosphorus_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potassium_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_temp_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_temp_range: Option<String>,
    pub recommendation: String,
    /// Status shown before any reading has been scored
    #[serde(default = "default_status")]
    pub status: CompatibilityStatus,
    #[serde(default = "default_compatible")]
    pub compatible: bool,
}

fn default_status() -> CompatibilityStatus {
    CompatibilityStatus::Compatible
}

fn default_compatible() -> bool {
    true
}

impl CropProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            humidity_range: None,
            ph_range: None,
            nutrients_range: None,
            nitrogen_range: None,
            phosphorus_range: None,
            potassium_range: None,
            soil_temp_range: None,
            air_temp_range: None,
            recommendation: String::new(),
            status: default_status(),
            compatible: default_compatible(),
        }
    }

    /// Set the range string for one parameter
    pub fn with_range(mut self, parameter: Parameter, range: impl Into<String>) -> Self {
        let slot = match parameter {
            Parameter::Humidity => &mut self.humidity_range,
            Parameter::Ph => &mut self.ph_range,
            Parameter::ElectricalConductivity => &mut self.nutrients_range,
            Parameter::Nitrogen => &mut self.nitrogen_range,
            Parameter::Phosphorus => &mut self.phosphorus_range,
            Parameter::Potassium => &mut self.potassium_range,
            Parameter::SoilTemperature => &mut self.soil_temp_range,
            Parameter::AirTemperature => &mut self.air_temp_range,
        };
        *slot = Some(range.into());
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = recommendation.into();
        self
    }

    /// Static status, with `compatible` kept in step
    pub fn with_status(mut self, status: CompatibilityStatus) -> Self {
        self.status = status;
        self.compatible = status == CompatibilityStatus::Compatible;
        self
    }

    /// Parameters this profile constrains, in evaluation order
    pub fn defined_parameters(&self) -> impl Iterator<Item = Parameter> + '_ {
        Parameter::ALL
            .into_iter()
            .filter(move |p| p.range_of(self).is_some())
    }
}

/// Errors detected while building the crop catalog
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate crop id: {0}")]
    DuplicateCrop(String),

    #[error("Invalid {parameter} range for crop {crop}: {value:?}")]
    InvalidRange {
        crop: String,
        parameter: Parameter,
        value: String,
    },

    #[error("Crop catalog is empty")]
    Empty,
}

/// Immutable lookup table of crop profiles, built once at startup
#[derive(Debug, Clone)]
pub struct CropCatalog {
    profiles: Vec<CropProfile>,
    index: HashMap<String, usize>,
}

impl CropCatalog {
    /// Validate and index `profiles`. Every defined range must parse with
    /// its minimum not above its maximum.
    pub fn new(profiles: Vec<CropProfile>) -> Result<Self, CatalogError> {
        if profiles.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut index = HashMap::with_capacity(profiles.len());
        for (position, profile) in profiles.iter().enumerate() {
            for parameter in Parameter::ALL {
                if let Some(range) = parameter.range_of(profile) {
                    if validate_range(range).is_err() {
                        return Err(CatalogError::InvalidRange {
                            crop: profile.id.clone(),
                            parameter,
                            value: range.to_string(),
                        });
                    }
                }
            }
            if index.insert(profile.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateCrop(profile.id.clone()));
            }
        }

        Ok(Self { profiles, index })
    }

    /// The crops offered by the dashboard out of the box
    pub fn builtin() -> Self {
        let profiles = builtin_profiles();
        let index = profiles
            .iter()
            .enumerate()
            .map(|(position, profile)| (profile.id.clone(), position))
            .collect();
        Self { profiles, index }
    }

    pub fn get(&self, crop_id: &str) -> Option<&CropProfile> {
        self.index.get(crop_id).map(|&position| &self.profiles[position])
    }

    pub fn contains(&self, crop_id: &str) -> bool {
        self.index.contains_key(crop_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CropProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for CropCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_profiles() -> Vec<CropProfile> {
    use Parameter::{ElectricalConductivity, Humidity, Ph};

    vec![
        CropProfile::new("maiz", "Maíz")
            .with_range(Humidity, "60-70%")
            .with_range(Ph, "6.0-7.0")
            .with_range(ElectricalConductivity, "2.0-3.0 dS/m")
            .with_recommendation(
                "Excelente opción. El suelo tiene las condiciones perfectas para cultivar maíz. \
                 La humedad y pH están en niveles ideales.",
            )
            .with_status(CompatibilityStatus::Compatible),
        CropProfile::new("tabaco", "Tabaco")
            .with_range(Humidity, "50-60%")
            .with_range(Ph, "5.5-6.5")
            .with_range(ElectricalConductivity, "1.5-2.5 dS/m")
            .with_recommendation(
                "El nivel de humedad actual es ligeramente alto para tabaco. \
                 Se sugiere mejorar el drenaje.",
            )
            .with_status(CompatibilityStatus::Review),
        CropProfile::new("nopal", "Nopal")
            .with_range(Humidity, "30-50%")
            .with_range(Ph, "6.0-8.0")
            .with_range(ElectricalConductivity, "1.0-2.0 dS/m")
            .with_recommendation(
                "El nopal prefiere suelos más secos. La humedad actual es muy alta para este cultivo.",
            )
            .with_status(CompatibilityStatus::NotCompatible),
        CropProfile::new("lima", "Lima")
            .with_range(Humidity, "60-70%")
            .with_range(Ph, "6.0-7.0")
            .with_range(ElectricalConductivity, "2.0-3.5 dS/m")
            .with_recommendation(
                "Buena opción. Las condiciones del suelo son favorables para lima. \
                 El pH y la humedad están en rangos óptimos.",
            )
            .with_status(CompatibilityStatus::Compatible),
        CropProfile::new("frijoles", "Frijoles")
            .with_range(Humidity, "60-75%")
            .with_range(Ph, "6.0-7.5")
            .with_range(ElectricalConductivity, "1.5-3.0 dS/m")
            .with_recommendation(
                "Muy recomendado. Los frijoles prosperarán en estas condiciones. \
                 El suelo tiene nutrientes adecuados.",
            )
            .with_status(CompatibilityStatus::Compatible),
    ]
}
