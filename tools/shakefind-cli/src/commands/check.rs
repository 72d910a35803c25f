//! Check system capabilities.

use shakefind_common::clock::MonotonicClock;
use shakefind_common::config::{config_file_path, AppConfig, TrackingMode};
use shakefind_input_tracker::detect_best_backend;
use shakefind_platform_core::CursorHost;
use shakefind_platform_windows::{is_elevated, Win32CursorHost};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("ShakeFind System Check");
    println!("{}", "=".repeat(50));

    println!("[OK] Platform: {}", std::env::consts::OS);
    println!("     Config: {}", config_file_path().display());
    println!("     Tracking mode: {}", config.tracking.mode);

    // Cursor host
    let mut host = Win32CursorHost::new();
    let cursor_ok = match host.capture_default_pointer() {
        Ok(image) => {
            println!(
                "[OK] System arrow: {}x{} hotspot ({}, {}){}",
                image.width,
                image.height,
                image.hotspot.x,
                image.hotspot.y,
                if image.is_monochrome() {
                    " (monochrome)"
                } else {
                    ""
                }
            );
            true
        }
        Err(e) => {
            println!("[WARN] System arrow: {e}");
            false
        }
    };

    if is_elevated() {
        println!("[OK] Running elevated");
    } else {
        println!("[--] Not elevated (pointers of elevated windows are not seen in hook mode)");
    }

    // Input backends
    let clock = MonotonicClock::start();
    let mut any_input = false;
    for mode in [TrackingMode::Hook, TrackingMode::Polling] {
        let backend = detect_best_backend(mode, &clock);
        let available = backend.is_available() && backend.name() != "stub";
        any_input |= available;
        println!(
            "{} Input ({mode}): {}",
            if available { "[OK]" } else { "[WARN]" },
            backend.name()
        );
    }

    println!();
    if cursor_ok && any_input {
        println!("All required capabilities are available. ShakeFind is ready.");
    } else {
        println!("Some required capabilities are missing. `shakefind run --dry-run` still works.");
    }

    Ok(())
}
