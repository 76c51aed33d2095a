//! HTTP handlers for the Sembrando Bits dashboard API

pub mod crops;
pub mod devices;
pub mod health;
pub mod ratings;
pub mod session;

pub use crops::*;
pub use devices::*;
pub use health::*;
pub use ratings::*;
pub use session::*;
