//! ShakeFind Input Tracker
//!
//! Feeds pointer samples and dwell ticks into the enlargement controller as
//! a single serialized stream. Uses a pluggable backend architecture to
//! support different sample sources:
//!
//! - **Win32:** `GetCursorPos` polling or a `WH_MOUSE_LL` hook (Windows)
//! - **Scripted:** JSONL position scripts paced against the service clock
//! - **Stub:** pre-loaded samples, or none at all on other platforms
//!
//! [`replay`] runs a script through the controller in virtual time instead.

pub mod backends;
pub mod replay;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use shakefind_common::clock::{MonotonicClock, RateController};
use shakefind_common::config::TrackingConfig;
use shakefind_common::error::ShakefindResult;
use shakefind_controller::EnlargementController;
use shakefind_platform_core::{CursorHost, InputBackend};

pub use backends::{detect_best_backend, ScriptedBackend, StubBackend};
pub use replay::{replay, ReplayEvent};

/// The event loop that coordinates a backend with the controller.
pub struct ShakeTracker<H: CursorHost> {
    controller: EnlargementController<H>,
    backend: Box<dyn InputBackend>,
    clock: MonotonicClock,
    ticks: RateController,
    poll_interval_ms: u64,
    stop_flag: Arc<AtomicBool>,
    samples_seen: u64,
}

impl<H: CursorHost> ShakeTracker<H> {
    pub fn new(
        controller: EnlargementController<H>,
        backend: Box<dyn InputBackend>,
        clock: MonotonicClock,
        config: &TrackingConfig,
    ) -> Self {
        Self {
            controller,
            backend,
            clock,
            ticks: RateController::every_ms(config.tick_interval_ms),
            poll_interval_ms: config.poll_interval_ms.max(1),
            stop_flag: Arc::new(AtomicBool::new(false)),
            samples_seen: 0,
        }
    }

    /// Run the loop until the stop flag is set, then shut the controller down.
    ///
    /// Declined installs and restores are logged and the loop carries on.
    /// Returns the number of samples delivered to the controller.
    pub async fn run(&mut self) -> ShakefindResult<u64> {
        tracing::info!(
            backend = %self.backend.name(),
            host = %self.controller.host().name(),
            poll_interval_ms = self.poll_interval_ms,
            tick_interval_ms = self.ticks.interval_ms(),
            clock_epoch = %self.clock.epoch_wall(),
            "Shake tracker started"
        );

        let poll_interval = tokio::time::Duration::from_millis(self.poll_interval_ms);
        while !self.stop_flag.load(Ordering::Relaxed) {
            let now_ms = self.clock.now_ms();
            self.step(now_ms);
            tokio::time::sleep(poll_interval).await;
        }

        self.controller.shutdown()?;
        tracing::info!(samples = self.samples_seen, "Shake tracker stopped");
        Ok(self.samples_seen)
    }

    /// Drain every pending sample, then tick if one is due at `now_ms`.
    pub fn step(&mut self, now_ms: u64) {
        loop {
            match self.backend.poll() {
                Ok(Some(sample)) => {
                    self.samples_seen += 1;
                    if let Err(e) = self
                        .controller
                        .on_sample(sample.position, sample.timestamp_ms)
                    {
                        tracing::debug!(error = %e, "Sample handling failed");
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, backend = %self.backend.name(), "Input tracking error");
                    break;
                }
            }
        }

        if self.ticks.should_tick(now_ms) {
            if let Err(e) = self.controller.on_tick(now_ms) {
                tracing::debug!(error = %e, "Tick handling failed");
            }
        }
    }

    /// Set the stop flag.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    pub fn controller(&self) -> &EnlargementController<H> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut EnlargementController<H> {
        &mut self.controller
    }

    /// Number of samples delivered so far.
    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakefind_platform_core::{PointerSample, RecordingHost};

    fn shake_samples(start_ms: u64) -> Vec<PointerSample> {
        (0..=10)
            .map(|i| {
                let x = if i % 2 == 0 { 400 } else { 450 };
                PointerSample::new(x, 300, start_ms + i * 40)
            })
            .collect()
    }

    fn tracker(samples: Vec<PointerSample>) -> ShakeTracker<RecordingHost> {
        let controller = EnlargementController::start(RecordingHost::new()).unwrap();
        ShakeTracker::new(
            controller,
            Box::new(StubBackend::new(samples)),
            MonotonicClock::start(),
            &TrackingConfig::default(),
        )
    }

    #[test]
    fn step_drains_all_pending_samples() {
        let mut tracker = tracker(shake_samples(0));
        tracker.step(400);

        assert_eq!(tracker.samples_seen(), 11);
        assert!(tracker.controller().state().is_enlarged());
        assert_eq!(tracker.controller().host().install_count(), 1);
    }

    #[test]
    fn ticks_follow_the_rate_controller() {
        let mut tracker = tracker(shake_samples(0));
        tracker.step(400);

        // Dwell has passed but the next tick is not due until 500.
        tracker.step(450);
        assert!(tracker.controller().state().is_enlarged());

        tracker.step(901);
        assert!(!tracker.controller().state().is_enlarged());
        assert_eq!(tracker.controller().host().restore_count(), 1);
    }

    #[test]
    fn declined_restore_is_retried_by_later_steps() {
        let mut tracker = tracker(shake_samples(0));
        tracker.step(400);
        tracker.controller_mut().host_mut().fail_next_restores(1);

        tracker.step(1_000);
        assert!(tracker.controller().state().is_enlarged());

        tracker.step(1_100);
        assert!(!tracker.controller().state().is_enlarged());
    }

    #[tokio::test]
    async fn run_with_stop_flag_set_still_shuts_down() {
        let mut tracker = tracker(Vec::new());
        tracker.stop();

        let samples = tracker.run().await.unwrap();
        assert_eq!(samples, 0);
        assert!(tracker.controller().is_shut_down());
        assert_eq!(tracker.controller().host().default_restore_count(), 1);
    }
}
