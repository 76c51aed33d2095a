//! Resolution of canonical parameters against producer-defined field names

use crate::models::SensorReading;

use super::Parameter;

/// Find the value for a prioritized pattern list.
///
/// Patterns are tried in order. For each one, the first key in reported order
/// that equals or contains the pattern (case-insensitively) decides the
/// outcome; a non-numeric value there yields `None`.
pub fn resolve_field(readings: &SensorReading, patterns: &[&str]) -> Option<f64> {
    patterns.iter().find_map(|pattern| {
        let pattern = pattern.to_lowercase();
        readings
            .iter()
            .find(|(key, _)| key.to_lowercase().contains(&pattern))
            .map(|(_, value)| value.as_number())
    })?
}

/// Resolve a tracked parameter using its own pattern list
pub fn resolve_parameter(readings: &SensorReading, parameter: Parameter) -> Option<f64> {
    resolve_field(readings, parameter.patterns())
}
