//! Clock and timing utilities for the event loop.
//!
//! Every pointer sample and dwell tick is stamped against one monotonic epoch
//! captured when the service starts, in whole milliseconds. Wall-clock time
//! is kept only for log output.

use std::time::Instant;

/// A monotonic clock anchored to the moment the service started.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    /// The instant the service started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl MonotonicClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Local::now().to_rfc3339(),
        }
    }

    /// Milliseconds elapsed since the epoch.
    pub fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Wall-clock time at the epoch.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

/// Fixed-cadence gate for periodic work such as dwell-timeout checks.
#[derive(Debug)]
pub struct RateController {
    interval_ms: u64,
    last_tick_ms: Option<u64>,
}

impl RateController {
    /// Create a controller firing at most once per `interval_ms`.
    pub fn every_ms(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            last_tick_ms: None,
        }
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, now_ms: u64) -> bool {
        match self.last_tick_ms {
            None => {
                self.last_tick_ms = Some(now_ms);
                true
            }
            Some(last) if now_ms >= last.saturating_add(self.interval_ms) => {
                self.last_tick_ms = Some(now_ms);
                true
            }
            _ => false,
        }
    }

    /// Target interval in milliseconds.
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}
