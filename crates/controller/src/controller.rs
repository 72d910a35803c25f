//! Normal / Enlarged state machine.

use serde::Serialize;
use shakefind_common::error::{ShakefindError, ShakefindResult};
use shakefind_cursor_transform::scale;
use shakefind_gesture::GestureDetector;
use shakefind_platform_core::CursorHost;
use shakefind_pointer_model::{PointerImage, PointerPosition, TimestampMs};

/// How much bigger the pointer gets while enlarged.
pub const ENLARGE_FACTOR: f64 = 3.0;

/// How long the enlarged pointer stays up (ms). Restoration happens on the
/// first tick strictly after this much time.
pub const DWELL_MS: u64 = 500;

/// Whether the enlarged pointer is currently installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EnlargementState {
    #[default]
    Normal,
    Enlarged {
        since_ms: TimestampMs,
    },
}

impl EnlargementState {
    pub fn is_enlarged(&self) -> bool {
        matches!(self, Self::Enlarged { .. })
    }
}

#[derive(Debug)]
struct PointerPair {
    original: PointerImage,
    enlarged: PointerImage,
}

/// Drives pointer enlargement from a stream of samples and ticks.
///
/// Calls must be serialized by the caller. The controller restores the
/// system pointer set when dropped if [`shutdown`](Self::shutdown) has not
/// completed yet.
pub struct EnlargementController<H: CursorHost> {
    host: H,
    detector: GestureDetector,
    state: EnlargementState,
    /// `None` once shutdown has completed.
    pointers: Option<PointerPair>,
}

impl<H: CursorHost> EnlargementController<H> {
    /// Capture the current pointer, pre-scale it, and start in `Normal`.
    ///
    /// Capture and scale failures are fatal. The host is asked to reload its
    /// pointer set before the error is returned.
    pub fn start(mut host: H) -> ShakefindResult<Self> {
        match prepare_pointers(&mut host) {
            Ok((original, enlarged)) => {
                tracing::info!(
                    host = %host.name(),
                    original = %format!("{}x{}", original.width, original.height),
                    enlarged = %format!("{}x{}", enlarged.width, enlarged.height),
                    "Pointer enlargement ready"
                );
                Ok(Self::new(host, GestureDetector::new(), original, enlarged))
            }
            Err(e) => {
                tracing::error!(error = %e, "Pointer enlargement failed to start");
                if let Err(restore_err) = host.restore_default_set() {
                    tracing::warn!(error = %restore_err, "Failed to reload pointer set");
                }
                Err(e)
            }
        }
    }

    /// Controller with already prepared pointer images.
    pub fn new(
        host: H,
        detector: GestureDetector,
        original: PointerImage,
        enlarged: PointerImage,
    ) -> Self {
        Self {
            host,
            detector,
            state: EnlargementState::Normal,
            pointers: Some(PointerPair { original, enlarged }),
        }
    }

    /// Feed one absolute pointer observation.
    ///
    /// A shake while `Normal` installs the enlarged pointer and anchors the
    /// dwell timer at `timestamp_ms`. A shake while already `Enlarged` does
    /// nothing. A declined install leaves the state `Normal`.
    pub fn on_sample(
        &mut self,
        position: PointerPosition,
        timestamp_ms: TimestampMs,
    ) -> ShakefindResult<()> {
        let Some(pointers) = &self.pointers else {
            return Ok(());
        };

        if !self.detector.observe(position, timestamp_ms) {
            return Ok(());
        }

        if let Some(metrics) = self.detector.last_metrics() {
            tracing::debug!(
                direction_changes = metrics.direction_changes,
                avg_speed_px_per_sec = metrics.avg_speed_px_per_sec,
                total_time_ms = metrics.total_time_ms,
                enlarged = self.state.is_enlarged(),
                "Shake detected"
            );
        }

        if self.state.is_enlarged() {
            return Ok(());
        }

        if let Err(e) = self.host.install(&pointers.enlarged) {
            tracing::warn!(error = %e, "Host declined enlarged pointer");
            return Err(e);
        }

        self.state = EnlargementState::Enlarged {
            since_ms: timestamp_ms,
        };
        tracing::info!(at_ms = timestamp_ms, "Pointer enlarged");
        Ok(())
    }

    /// Periodic dwell check.
    ///
    /// Once more than [`DWELL_MS`] has passed since enlargement the original
    /// pointer is restored. A declined restore keeps the state `Enlarged` so
    /// the next tick tries again.
    pub fn on_tick(&mut self, now_ms: TimestampMs) -> ShakefindResult<()> {
        let Some(pointers) = &self.pointers else {
            return Ok(());
        };
        let EnlargementState::Enlarged { since_ms } = self.state else {
            return Ok(());
        };

        if now_ms.saturating_sub(since_ms) <= DWELL_MS {
            return Ok(());
        }

        if let Err(e) = self.host.restore(&pointers.original) {
            tracing::warn!(error = %e, "Host declined original pointer, retrying next tick");
            return Err(e);
        }

        self.state = EnlargementState::Normal;
        tracing::info!(
            at_ms = now_ms,
            dwell_ms = now_ms - since_ms,
            "Pointer restored"
        );
        Ok(())
    }

    /// Reload the system pointer set and release the pointer images.
    ///
    /// Safe to call repeatedly. Once a reload succeeds later calls are
    /// no-ops; after a failed reload the next call tries again.
    pub fn shutdown(&mut self) -> ShakefindResult<()> {
        if self.pointers.is_none() {
            return Ok(());
        }

        self.state = EnlargementState::Normal;
        self.host.restore_default_set().map_err(|e| {
            tracing::warn!(error = %e, "Failed to reload pointer set on shutdown");
            e
        })?;

        self.pointers = None;
        tracing::info!(host = %self.host.name(), "Pointer enlargement shut down");
        Ok(())
    }

    pub fn state(&self) -> EnlargementState {
        self.state
    }

    pub fn is_shut_down(&self) -> bool {
        self.pointers.is_none()
    }

    pub fn detector(&self) -> &GestureDetector {
        &self.detector
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The captured pointer. `None` after shutdown.
    pub fn original(&self) -> Option<&PointerImage> {
        self.pointers.as_ref().map(|p| &p.original)
    }

    /// The pre-scaled pointer. `None` after shutdown.
    pub fn enlarged(&self) -> Option<&PointerImage> {
        self.pointers.as_ref().map(|p| &p.enlarged)
    }
}

impl<H: CursorHost> Drop for EnlargementController<H> {
    fn drop(&mut self) {
        if self.pointers.is_some() {
            let _ = self.shutdown();
        }
    }
}

fn prepare_pointers(host: &mut impl CursorHost) -> ShakefindResult<(PointerImage, PointerImage)> {
    let original = host.capture_default_pointer()?;
    original
        .validate()
        .map_err(|e| ShakefindError::capture(format!("captured pointer is malformed: {e}")))?;
    let enlarged = scale(&original, ENLARGE_FACTOR)?;
    Ok((original, enlarged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakefind_platform_core::{HostCommand, RecordingHost};

    fn controller() -> EnlargementController<RecordingHost> {
        EnlargementController::start(RecordingHost::new()).unwrap()
    }

    /// Seed at `start_ms` then ten alternating ±50 px steps 40 ms apart.
    /// The last step is the one that completes the shake.
    fn shake(controller: &mut EnlargementController<RecordingHost>, start_ms: u64) -> u64 {
        let mut t = start_ms;
        controller.on_sample(PointerPosition::new(500, 500), t).unwrap();
        for i in 0..10 {
            t += 40;
            let x = if i % 2 == 0 { 550 } else { 500 };
            let _ = controller.on_sample(PointerPosition::new(x, 500), t);
        }
        t
    }

    #[test]
    fn start_captures_and_prescales() {
        let controller = controller();
        assert_eq!(controller.state(), EnlargementState::Normal);
        assert_eq!(controller.host().commands(), &[HostCommand::Capture]);

        let enlarged = controller.enlarged().unwrap();
        assert_eq!((enlarged.width, enlarged.height), (96, 96));
        assert_eq!(controller.original().unwrap().width, 32);
    }

    #[test]
    fn capture_failure_is_fatal() {
        let err = EnlargementController::start(RecordingHost::new().fail_capture())
            .err()
            .unwrap();
        assert!(err.is_fatal());
        assert!(matches!(err, ShakefindError::Capture { .. }));
    }

    #[test]
    fn shake_installs_enlarged_pointer() {
        let mut controller = controller();
        let t = shake(&mut controller, 1_000);

        assert_eq!(controller.state(), EnlargementState::Enlarged { since_ms: t });
        assert_eq!(controller.host().install_count(), 1);
        assert_eq!(controller.host().current_pointer().width, 96);
    }

    #[test]
    fn repeated_shake_does_not_move_dwell_anchor() {
        let mut controller = controller();
        let t = shake(&mut controller, 1_000);

        // The window keeps sliding and keeps reporting a shake.
        let _ = controller.on_sample(PointerPosition::new(550, 500), t + 40);
        let _ = controller.on_sample(PointerPosition::new(500, 500), t + 80);

        assert_eq!(controller.state(), EnlargementState::Enlarged { since_ms: t });
        assert_eq!(controller.host().install_count(), 1);
    }

    #[test]
    fn tick_restores_only_after_dwell() {
        let mut controller = controller();
        let t = shake(&mut controller, 1_000);

        controller.on_tick(t + DWELL_MS).unwrap();
        assert!(controller.state().is_enlarged());
        assert_eq!(controller.host().restore_count(), 0);

        controller.on_tick(t + DWELL_MS + 1).unwrap();
        assert_eq!(controller.state(), EnlargementState::Normal);
        assert_eq!(controller.host().restore_count(), 1);
        assert_eq!(controller.host().current_pointer().width, 32);
    }

    #[test]
    fn tick_while_normal_is_a_no_op() {
        let mut controller = controller();
        controller.on_tick(10_000).unwrap();
        assert_eq!(controller.host().commands(), &[HostCommand::Capture]);
    }

    #[test]
    fn declined_install_stays_normal_and_next_shake_retries() {
        let mut controller = controller();
        controller.host_mut().fail_next_installs(1);

        let mut t = 1_000;
        controller.on_sample(PointerPosition::new(500, 500), t).unwrap();
        let mut errors = 0;
        for i in 0..11 {
            t += 40;
            let x = if i % 2 == 0 { 550 } else { 500 };
            if controller.on_sample(PointerPosition::new(x, 500), t).is_err() {
                errors += 1;
            }
        }

        assert_eq!(errors, 1);
        assert_eq!(controller.state(), EnlargementState::Enlarged { since_ms: t });
        assert_eq!(controller.host().install_count(), 1);
    }

    #[test]
    fn declined_restore_is_retried_on_next_tick() {
        let mut controller = controller();
        let t = shake(&mut controller, 1_000);
        controller.host_mut().fail_next_restores(1);

        let err = controller.on_tick(t + 600).unwrap_err();
        assert!(!err.is_fatal());
        assert!(controller.state().is_enlarged());

        controller.on_tick(t + 700).unwrap();
        assert_eq!(controller.state(), EnlargementState::Normal);
        assert_eq!(controller.host().restore_count(), 1);
    }

    #[test]
    fn shutdown_mid_enlargement_forces_normal() {
        let mut controller = controller();
        shake(&mut controller, 1_000);

        controller.shutdown().unwrap();
        assert_eq!(controller.state(), EnlargementState::Normal);
        assert!(controller.is_shut_down());
        assert!(controller.enlarged().is_none());
        assert_eq!(controller.host().default_restore_count(), 1);
    }

    #[test]
    fn failed_shutdown_can_be_retried() {
        let mut controller = controller();
        controller.host_mut().fail_next_default_restores(1);

        assert!(controller.shutdown().is_err());
        assert!(!controller.is_shut_down());

        controller.shutdown().unwrap();
        controller.shutdown().unwrap();
        assert_eq!(controller.host().default_restore_count(), 1);
    }

    #[test]
    fn samples_after_shutdown_are_ignored() {
        let mut controller = controller();
        controller.shutdown().unwrap();
        let commands = controller.host().commands().len();

        shake(&mut controller, 5_000);
        controller.on_tick(9_000).unwrap();
        assert_eq!(controller.host().commands().len(), commands);
        assert_eq!(controller.state(), EnlargementState::Normal);
    }

    #[test]
    fn starts_normal() {
        assert_eq!(EnlargementState::default(), EnlargementState::Normal);
        assert!(!EnlargementState::Normal.is_enlarged());
        assert!(EnlargementState::Enlarged { since_ms: 0 }.is_enlarged());
    }
}
