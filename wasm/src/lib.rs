//! WebAssembly module for the Sembrando Bits dashboard
//!
//! Provides client-side computation for:
//! - Crop compatibility scoring
//! - Reference range parsing
//! - Gauge classification
//! - Rating validation

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::compatibility::*;
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("sembrando-bits wasm ready"));
}

/// Score a reading set (JSON object of field -> value) against a built-in crop
#[wasm_bindgen]
pub fn evaluate_crop(crop_id: &str, readings_json: &str) -> Result<String, JsValue> {
    let catalog = CropCatalog::builtin();
    let profile = catalog
        .get(crop_id)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown crop: {}", crop_id)))?;

    let readings: SensorReading = serde_json::from_str(readings_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid readings JSON: {}", e)))?;

    let result = evaluate(profile, &readings);
    serde_json::to_string(&result).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse `"<min>-<max>"` into `[min, max]`
#[wasm_bindgen]
pub fn parse_reference_range(range: &str) -> Option<Box<[f64]>> {
    ReferenceRange::parse(range).map(|r| vec![r.min, r.max].into_boxed_slice())
}

/// Status code for a compatibility percentage
#[wasm_bindgen]
pub fn classify_compatibility(percentage: u8) -> String {
    match CompatibilityStatus::from_percentage(percentage) {
        CompatibilityStatus::Compatible => "compatible",
        CompatibilityStatus::Review => "revisar",
        CompatibilityStatus::NotCompatible => "no-compatible",
    }
    .to_string()
}

/// Card colour for a reading of `parameter` (snake_case name)
#[wasm_bindgen]
pub fn classify_reading(parameter: &str, value: f64) -> Option<String> {
    let parameter: Parameter =
        serde_json::from_value(serde_json::Value::String(parameter.to_string())).ok()?;

    let status = match classify_gauge(parameter, value) {
        GaugeStatus::Good => "good",
        GaugeStatus::Warning => "warning",
        GaugeStatus::Danger => "danger",
    };
    Some(status.to_string())
}

/// Whether a star value can be submitted
#[wasm_bindgen]
pub fn validate_rating_value(rating: i32) -> bool {
    validate_rating(i64::from(rating)).is_ok()
}

/// Ids of the built-in crops, in display order
#[wasm_bindgen]
pub fn crop_ids() -> js_sys::Array {
    CropCatalog::builtin()
        .iter()
        .map(|profile| JsValue::from_str(&profile.id))
        .collect()
}
