//! Replay a position script in virtual time.

use std::path::PathBuf;

use anyhow::Context;
use shakefind_controller::{EnlargementController, EnlargementState};
use shakefind_input_tracker::replay;
use shakefind_platform_core::RecordingHost;
use shakefind_pointer_model::parse_position_script;

pub fn run(script: PathBuf, tick_ms: u64) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&script)
        .with_context(|| format!("failed to read script {}", script.display()))?;
    let positions = parse_position_script(&content)
        .with_context(|| format!("failed to parse script {}", script.display()))?;

    println!("Replaying {} positions from {}", positions.len(), script.display());

    let mut controller = EnlargementController::start(RecordingHost::new())?;
    let events = replay(&mut controller, &positions, tick_ms);
    controller.shutdown()?;

    if events.is_empty() {
        println!("No shake detected.");
    }
    for event in &events {
        let label = match event.state {
            EnlargementState::Enlarged { .. } => "enlarged",
            EnlargementState::Normal => "restored",
        };
        println!("{:>8} ms  {label}", event.at_ms);
    }

    let host = controller.host();
    println!();
    println!(
        "Host: {} install(s), {} restore(s), {} default reload(s)",
        host.install_count(),
        host.restore_count(),
        host.default_restore_count()
    );
    tracing::debug!(commands = ?host.commands(), "Recorded host commands");

    Ok(())
}
