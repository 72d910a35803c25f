//! Run the shake-to-find service until Ctrl+C.

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use anyhow::Context;
use shakefind_common::clock::MonotonicClock;
use shakefind_common::config::{AppConfig, TrackingMode};
use shakefind_controller::EnlargementController;
use shakefind_input_tracker::{detect_best_backend, ScriptedBackend, ShakeTracker};
use shakefind_platform_core::{CursorHost, InputBackend, RecordingHost};
use shakefind_platform_windows::{is_elevated, Win32CursorHost};
use shakefind_pointer_model::parse_position_script;

pub async fn run(config: AppConfig, dry_run: bool, script: Option<PathBuf>) -> anyhow::Result<()> {
    let clock = MonotonicClock::start();
    let backend = match &script {
        Some(path) => scripted_backend(path, &clock)?,
        None => detect_best_backend(config.tracking.mode, &clock),
    };

    if config.tracking.mode == TrackingMode::Hook && script.is_none() && !is_elevated() {
        tracing::warn!("Not elevated: moves over elevated windows will not be seen");
    }

    if dry_run {
        let tracker = track(RecordingHost::new(), backend, clock, &config).await?;
        let host = tracker.controller().host();
        println!(
            "Dry run: {} install(s), {} restore(s), {} default reload(s)",
            host.install_count(),
            host.restore_count(),
            host.default_restore_count()
        );
    } else {
        track(Win32CursorHost::new(), backend, clock, &config).await?;
    }

    Ok(())
}

fn scripted_backend(path: &Path, clock: &MonotonicClock) -> anyhow::Result<Box<dyn InputBackend>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let positions = parse_position_script(&content)
        .with_context(|| format!("failed to parse script {}", path.display()))?;
    tracing::info!(positions = positions.len(), script = %path.display(), "Loaded position script");
    Ok(Box::new(ScriptedBackend::new(positions, clock.clone())))
}

async fn track<H: CursorHost>(
    host: H,
    backend: Box<dyn InputBackend>,
    clock: MonotonicClock,
    config: &AppConfig,
) -> anyhow::Result<ShakeTracker<H>> {
    let controller =
        EnlargementController::start(host).context("failed to prepare the enlarged pointer")?;
    let mut tracker = ShakeTracker::new(controller, backend, clock, &config.tracking);

    let stop = tracker.stop_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Stopping...");
            stop.store(true, Ordering::SeqCst);
        }
    });

    println!("Shake the mouse to enlarge the pointer. Press Ctrl+C to stop.");
    let samples = tracker.run().await?;
    println!("Stopped after {samples} samples.");
    Ok(tracker)
}
