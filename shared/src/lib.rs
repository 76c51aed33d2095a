//! Shared types and models for the Sembrando Bits sensor dashboard
//!
//! This crate contains the pure domain logic shared between the backend
//! service and the browser (via WASM): reading models, crop profiles and the
//! crop compatibility assessment.

pub mod compatibility;
pub mod models;
pub mod types;
pub mod validation;

pub use compatibility::*;
pub use models::*;
pub use types::*;
pub use validation::*;
