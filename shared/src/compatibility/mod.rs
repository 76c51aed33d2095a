//! Crop compatibility assessment
//!
//! Maps inconsistent sensor field names onto canonical agronomic parameters,
//! compares them against a crop's reference ranges and aggregates the result
//! into a percentage and a three-level status.

mod evaluator;
mod parameter;
mod range;
mod resolver;

pub use evaluator::*;
pub use parameter::*;
pub use range::*;
pub use resolver::*;

use thiserror::Error;

/// Errors raised while assessing a crop
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompatibilityError {
    #[error("Unknown crop: {0}")]
    UnknownCrop(String),
}
