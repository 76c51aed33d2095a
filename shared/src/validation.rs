//! Validation utilities for the sensor dashboard

use crate::compatibility::ReferenceRange;
use crate::types::DeviceId;

// ============================================================================
// Rating Validations
// ============================================================================

/// Validate a star rating (1-5 inclusive)
pub fn validate_rating(rating: i64) -> Result<u8, &'static str> {
    if !(1..=5).contains(&rating) {
        return Err("Rating must be between 1 and 5");
    }
    Ok(rating as u8)
}

// ============================================================================
// Selection Validations
// ============================================================================

/// Validate a logical device number against the number of known devices
pub fn validate_device_id(id: DeviceId, device_count: usize) -> Result<(), &'static str> {
    if id.get() == 0 {
        return Err("Device numbers start at 1");
    }
    if usize::from(id.get()) > device_count {
        return Err("Device number exceeds the number of devices");
    }
    Ok(())
}

// ============================================================================
// Reference Range Validations
// ============================================================================

/// Validate a reference range string and return the parsed interval
pub fn validate_range(range: &str) -> Result<ReferenceRange, &'static str> {
    let parsed = ReferenceRange::parse(range).ok_or("Range must look like \"<min>-<max>\"")?;
    if parsed.min > parsed.max {
        return Err("Range minimum must not exceed maximum");
    }
    Ok(parsed)
}
