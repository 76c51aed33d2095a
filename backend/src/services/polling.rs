//! Periodic refresh of device readings
//!
//! Each loop is a tokio task owned by a [`PollerHandle`]; stopping or dropping
//! the handle aborts the task.

use std::sync::Arc;
use std::time::Duration;

use shared::DeviceId;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::external::SensorDataSource;
use crate::services::device_cache::DeviceCache;

/// Spawns polling loops
pub struct Poller;

impl Poller {
    /// Refresh `devices` into `cache` every `period`, starting immediately
    pub fn spawn<S: SensorDataSource>(
        name: impl Into<String>,
        period: Duration,
        devices: Vec<DeviceId>,
        source: Arc<S>,
        cache: DeviceCache,
    ) -> PollerHandle {
        let name = name.into();
        let task_name = name.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                tracing::trace!("{} poll tick for {} devices", task_name, devices.len());
                for device in &devices {
                    cache.refresh(source.as_ref(), *device).await;
                }
            }
        });

        tracing::info!("Started {} poller every {:?}", name, period);
        PollerHandle { name, handle }
    }
}

/// Owner of a running polling loop
#[derive(Debug)]
pub struct PollerHandle {
    name: String,
    handle: JoinHandle<()>,
}

impl PollerHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Abort the loop, dropping any request in flight
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::info!("Stopped {} poller", self.name);
    }
}
