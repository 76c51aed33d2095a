//! Agronomic parameters tracked by the compatibility check

use serde::{Deserialize, Serialize};

use crate::models::CropProfile;

/// Canonical parameter a crop profile can constrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Humidity,
    Ph,
    ElectricalConductivity,
    Nitrogen,
    Phosphorus,
    Potassium,
    SoilTemperature,
    AirTemperature,
}

impl Parameter {
    /// Evaluation order; issues are reported in this order
    pub const ALL: [Parameter; 8] = [
        Parameter::Humidity,
        Parameter::Ph,
        Parameter::ElectricalConductivity,
        Parameter::Nitrogen,
        Parameter::Phosphorus,
        Parameter::Potassium,
        Parameter::SoilTemperature,
        Parameter::AirTemperature,
    ];

    /// Field-name patterns, most specific first. Lists are parameter-local:
    /// a `temp` key may satisfy soil temperature only after every more
    /// specific soil pattern failed to match.
    pub fn patterns(&self) -> &'static [&'static str] {
        match self {
            Parameter::Humidity => &["humedad", "humidity", "hum", "soilhum"],
            Parameter::Ph => &["ph_nivel", "ph_suelo", "ph"],
            Parameter::ElectricalConductivity => &["conductividad", "conductivity", "ec"],
            Parameter::Nitrogen => &["nitrogeno", "nitrógeno", "nitrogen"],
            Parameter::Phosphorus => &["fosforo", "fósforo", "phosphorus"],
            Parameter::Potassium => &["potasio", "potassium"],
            Parameter::SoilTemperature => &[
                "temperatura_suelo",
                "temp_suelo",
                "soil_temp",
                "soiltemp",
                "temperatura",
                "temp",
            ],
            Parameter::AirTemperature => &[
                "temperatura_aire",
                "temp_aire",
                "air_temp",
                "airtemp",
                "temperatura_ambiente",
            ],
        }
    }

    /// Label used in issue messages
    pub fn label(&self) -> &'static str {
        match self {
            Parameter::Humidity => "Humedad",
            Parameter::Ph => "pH",
            Parameter::ElectricalConductivity => "Conductividad eléctrica",
            Parameter::Nitrogen => "Nitrógeno",
            Parameter::Phosphorus => "Fósforo",
            Parameter::Potassium => "Potasio",
            Parameter::SoilTemperature => "Temperatura del suelo",
            Parameter::AirTemperature => "Temperatura del aire",
        }
    }

    /// Unit suffix appended directly after the value
    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::Humidity => "%",
            Parameter::Ph => "",
            Parameter::ElectricalConductivity => " dS/m",
            Parameter::Nitrogen | Parameter::Phosphorus | Parameter::Potassium => " ppm",
            Parameter::SoilTemperature | Parameter::AirTemperature => "°C",
        }
    }

    /// Reference range string the profile defines for this parameter
    pub fn range_of<'a>(&self, profile: &'a CropProfile) -> Option<&'a str> {
        let range = match self {
            Parameter::Humidity => &profile.humidity_range,
            Parameter::Ph => &profile.ph_range,
            Parameter::ElectricalConductivity => &profile.nutrients_range,
            Parameter::Nitrogen => &profile.nitrogen_range,
            Parameter::Phosphorus => &profile.phosphorus_range,
            Parameter::Potassium => &profile.potassium_range,
            Parameter::SoilTemperature => &profile.soil_temp_range,
            Parameter::AirTemperature => &profile.air_temp_range,
        };
        range.as_deref()
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
