//! Business logic services for the Sembrando Bits dashboard

pub mod dashboard;
pub mod device_cache;
pub mod polling;
pub mod rating;

pub use dashboard::{DashboardSession, SessionView};
pub use device_cache::{CachedReadings, DeviceCache};
pub use polling::{Poller, PollerHandle};
pub use rating::RatingService;
