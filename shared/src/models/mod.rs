//! Domain models for the sensor dashboard

mod crop;
mod device;
mod gauge;
mod rating;
mod reading;

pub use crop::*;
pub use device::*;
pub use gauge::*;
pub use rating::*;
pub use reading::*;
