//! Per-reading gauge status shown on sensor cards

use serde::{Deserialize, Serialize};

use crate::compatibility::{resolve_parameter, Parameter};
use crate::models::SensorReading;

/// Traffic-light status of a single reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GaugeStatus {
    Good,
    Warning,
    Danger,
}

/// Classify a value using the generic card thresholds.
///
/// These are crop-independent and only drive card colouring; parameters
/// without thresholds are always `Good`.
pub fn classify_gauge(parameter: Parameter, value: f64) -> GaugeStatus {
    let within = |lo: f64, hi: f64| value >= lo && value <= hi;
    match parameter {
        Parameter::Humidity => {
            if within(60.0, 80.0) {
                GaugeStatus::Good
            } else if value >= 40.0 {
                GaugeStatus::Warning
            } else {
                GaugeStatus::Danger
            }
        }
        Parameter::SoilTemperature | Parameter::AirTemperature => {
            if within(20.0, 30.0) {
                GaugeStatus::Good
            } else if within(15.0, 35.0) {
                GaugeStatus::Warning
            } else {
                GaugeStatus::Danger
            }
        }
        Parameter::Ph => {
            if within(6.0, 7.5) {
                GaugeStatus::Good
            } else if within(5.5, 8.0) {
                GaugeStatus::Warning
            } else {
                GaugeStatus::Danger
            }
        }
        Parameter::Nitrogen => {
            if within(40.0, 80.0) {
                GaugeStatus::Good
            } else if value >= 20.0 {
                GaugeStatus::Warning
            } else {
                GaugeStatus::Danger
            }
        }
        _ => GaugeStatus::Good,
    }
}

/// One resolved parameter with its card status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub parameter: Parameter,
    pub label: String,
    pub value: f64,
    pub unit: String,
    pub status: GaugeStatus,
}

/// Gauges for every tracked parameter the reading set provides
pub fn gauges_for(readings: &SensorReading) -> Vec<Gauge> {
    Parameter::ALL
        .into_iter()
        .filter_map(|parameter| {
            let value = resolve_parameter(readings, parameter)?;
            Some(Gauge {
                parameter,
                label: parameter.label().to_string(),
                value,
                unit: parameter.unit().trim().to_string(),
                status: classify_gauge(parameter, value),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humidity_thresholds() {
        assert_eq!(classify_gauge(Parameter::Humidity, 65.0), GaugeStatus::Good);
        assert_eq!(classify_gauge(Parameter::Humidity, 85.0), GaugeStatus::Warning);
        assert_eq!(classify_gauge(Parameter::Humidity, 45.0), GaugeStatus::Warning);
        assert_eq!(classify_gauge(Parameter::Humidity, 39.9), GaugeStatus::Danger);
    }

    #[test]
    fn ph_thresholds() {
        assert_eq!(classify_gauge(Parameter::Ph, 6.8), GaugeStatus::Good);
        assert_eq!(classify_gauge(Parameter::Ph, 5.6), GaugeStatus::Warning);
        assert_eq!(classify_gauge(Parameter::Ph, 8.5), GaugeStatus::Danger);
    }

    #[test]
    fn temperature_thresholds() {
        assert_eq!(classify_gauge(Parameter::SoilTemperature, 22.0), GaugeStatus::Good);
        assert_eq!(classify_gauge(Parameter::AirTemperature, 34.0), GaugeStatus::Warning);
        assert_eq!(classify_gauge(Parameter::AirTemperature, 40.0), GaugeStatus::Danger);
    }

    #[test]
    fn untracked_thresholds_are_good() {
        assert_eq!(classify_gauge(Parameter::Potassium, 1.0), GaugeStatus::Good);
    }

    #[test]
    fn gauges_skip_missing_parameters() {
        let readings = SensorReading::new()
            .with("humedad_suelo", 65.0)
            .with("ph", "9.1")
            .with("bomba", true);
        let gauges = gauges_for(&readings);

        assert_eq!(gauges.len(), 2);
        assert_eq!(gauges[0].parameter, Parameter::Humidity);
        assert_eq!(gauges[0].unit, "%");
        assert_eq!(gauges[1].status, GaugeStatus::Danger);
    }
}
