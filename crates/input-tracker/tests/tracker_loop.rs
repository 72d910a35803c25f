use std::sync::atomic::Ordering;
use std::time::Duration;

use shakefind_common::clock::MonotonicClock;
use shakefind_common::config::TrackingConfig;
use shakefind_controller::EnlargementController;
use shakefind_input_tracker::{ScriptedBackend, ShakeTracker};
use shakefind_platform_core::RecordingHost;
use shakefind_pointer_model::{horizontal_shake, PointerPosition};

#[tokio::test]
async fn scripted_shake_enlarges_and_shutdown_reloads_pointer_set() {
    let clock = MonotonicClock::start();
    let script = horizontal_shake(PointerPosition::new(640, 360), 0, 11, 40, 60);
    let backend = ScriptedBackend::new(script, clock.clone());

    let controller = EnlargementController::start(RecordingHost::new()).unwrap();
    let mut tracker = ShakeTracker::new(
        controller,
        Box::new(backend),
        clock,
        &TrackingConfig::default(),
    );

    let stop = tracker.stop_flag();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        stop.store(true, Ordering::SeqCst);
    });

    let samples = tracker.run().await.unwrap();

    assert_eq!(samples, 11);
    let host = tracker.controller().host();
    assert_eq!(host.install_count(), 1);
    assert_eq!(host.restore_count(), 1);
    assert_eq!(host.default_restore_count(), 1);
    assert!(tracker.controller().is_shut_down());
}
