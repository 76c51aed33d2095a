//! Sensor reading models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single reported value. Producers send numbers, numeric strings,
/// booleans (`"true"`/`"false"` after upstream normalisation) or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingValue {
    Number(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl ReadingValue {
    /// Numeric interpretation of the value, if any.
    ///
    /// Native numbers and trimmed numeric strings are accepted; anything that
    /// does not yield a finite number is treated as absent.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            ReadingValue::Number(n) => *n,
            ReadingValue::Text(s) => s.trim().parse::<f64>().ok()?,
            ReadingValue::Bool(_) | ReadingValue::Null => return None,
        };
        value.is_finite().then_some(value)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ReadingValue::Null)
    }
}

impl From<f64> for ReadingValue {
    fn from(value: f64) -> Self {
        ReadingValue::Number(value)
    }
}

impl From<&str> for ReadingValue {
    fn from(value: &str) -> Self {
        ReadingValue::Text(value.to_string())
    }
}

impl From<bool> for ReadingValue {
    fn from(value: bool) -> Self {
        ReadingValue::Bool(value)
    }
}

impl From<Value> for ReadingValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map_or(ReadingValue::Null, ReadingValue::Number),
            Value::Bool(b) => ReadingValue::Bool(b),
            Value::String(s) => ReadingValue::Text(s),
            Value::Null => ReadingValue::Null,
            // Nested documents are kept verbatim but never read as numbers
            other => ReadingValue::Text(other.to_string()),
        }
    }
}

impl From<ReadingValue> for Value {
    fn from(value: ReadingValue) -> Self {
        match value {
            ReadingValue::Number(n) => serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number),
            ReadingValue::Bool(b) => Value::Bool(b),
            ReadingValue::Text(s) => Value::String(s),
            ReadingValue::Null => Value::Null,
        }
    }
}

/// Latest values reported by one device, keyed by producer-defined field name.
///
/// Fields keep the order the producer sent them in; parameter resolution
/// depends on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct SensorReading {
    fields: Vec<(String, ReadingValue)>,
}

impl SensorReading {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures
    pub fn with(mut self, field: impl Into<String>, value: impl Into<ReadingValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field. A new field goes last; an existing one keeps its position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<ReadingValue>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&ReadingValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Fields in reported order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReadingValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the device has not reported any field at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<ReadingValue>> FromIterator<(K, V)> for SensorReading {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut reading = Self::new();
        for (field, value) in iter {
            reading.insert(field, value);
        }
        reading
    }
}

// serde_json is built with `preserve_order`, so the map iterates in document order.
impl From<Map<String, Value>> for SensorReading {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().map(|(k, v)| (k, ReadingValue::from(v))).collect()
    }
}

impl From<SensorReading> for Map<String, Value> {
    fn from(reading: SensorReading) -> Self {
        reading
            .fields
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect()
    }
}
