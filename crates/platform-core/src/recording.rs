//! In-memory cursor host.
//!
//! Records every command it receives instead of touching the system pointer.
//! Failures can be queued per command kind to exercise the controller's
//! retry paths.

use serde::Serialize;
use shakefind_common::error::{ShakefindError, ShakefindResult};
use shakefind_pointer_model::{Hotspot, PointerImage};

use crate::CursorHost;

/// A command the host accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HostCommand {
    Capture,
    Install {
        width: u32,
        height: u32,
        hotspot: Hotspot,
    },
    Restore {
        width: u32,
        height: u32,
    },
    RestoreDefaultSet,
}

#[derive(Debug, Clone)]
pub struct RecordingHost {
    pointer: PointerImage,
    commands: Vec<HostCommand>,
    fail_capture: bool,
    install_failures: u32,
    restore_failures: u32,
    restore_default_failures: u32,
}

impl RecordingHost {
    /// Host whose default pointer is the built-in arrow.
    pub fn new() -> Self {
        Self::with_pointer(PointerImage::synthetic_arrow())
    }

    pub fn with_pointer(pointer: PointerImage) -> Self {
        Self {
            pointer,
            commands: Vec::new(),
            fail_capture: false,
            install_failures: 0,
            restore_failures: 0,
            restore_default_failures: 0,
        }
    }

    /// Make every capture fail.
    pub fn fail_capture(mut self) -> Self {
        self.fail_capture = true;
        self
    }

    /// Decline the next `count` installs.
    pub fn fail_next_installs(&mut self, count: u32) {
        self.install_failures = count;
    }

    /// Decline the next `count` restores.
    pub fn fail_next_restores(&mut self, count: u32) {
        self.restore_failures = count;
    }

    /// Decline the next `count` full pointer-set reloads.
    pub fn fail_next_default_restores(&mut self, count: u32) {
        self.restore_default_failures = count;
    }

    /// Commands accepted so far, oldest first.
    pub fn commands(&self) -> &[HostCommand] {
        &self.commands
    }

    pub fn count(&self, matches: impl Fn(&HostCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| matches(c)).count()
    }

    pub fn install_count(&self) -> usize {
        self.count(|c| matches!(c, HostCommand::Install { .. }))
    }

    pub fn restore_count(&self) -> usize {
        self.count(|c| matches!(c, HostCommand::Restore { .. }))
    }

    pub fn default_restore_count(&self) -> usize {
        self.count(|c| matches!(c, HostCommand::RestoreDefaultSet))
    }

    /// The pointer the host currently shows.
    pub fn current_pointer(&self) -> &PointerImage {
        &self.pointer
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

fn take_failure(counter: &mut u32) -> bool {
    if *counter == 0 {
        return false;
    }
    *counter -= 1;
    true
}

impl CursorHost for RecordingHost {
    fn capture_default_pointer(&mut self) -> ShakefindResult<PointerImage> {
        if self.fail_capture {
            return Err(ShakefindError::capture("recording host has no pointer"));
        }
        self.commands.push(HostCommand::Capture);
        Ok(self.pointer.clone())
    }

    fn install(&mut self, image: &PointerImage) -> ShakefindResult<()> {
        if take_failure(&mut self.install_failures) {
            tracing::debug!("Recording host declined install");
            return Err(ShakefindError::install("recording host declined install"));
        }
        self.commands.push(HostCommand::Install {
            width: image.width,
            height: image.height,
            hotspot: image.hotspot,
        });
        self.pointer = image.clone();
        Ok(())
    }

    fn restore(&mut self, original: &PointerImage) -> ShakefindResult<()> {
        if take_failure(&mut self.restore_failures) {
            tracing::debug!("Recording host declined restore");
            return Err(ShakefindError::restore("recording host declined restore"));
        }
        self.commands.push(HostCommand::Restore {
            width: original.width,
            height: original.height,
        });
        self.pointer = original.clone();
        Ok(())
    }

    fn restore_default_set(&mut self) -> ShakefindResult<()> {
        if take_failure(&mut self.restore_default_failures) {
            tracing::debug!("Recording host declined pointer set reload");
            return Err(ShakefindError::restore(
                "recording host declined pointer set reload",
            ));
        }
        self.commands.push(HostCommand::RestoreDefaultSet);
        self.pointer = PointerImage::synthetic_arrow();
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_commands_in_order() {
        let mut host = RecordingHost::new();
        let original = host.capture_default_pointer().unwrap();
        host.install(&original).unwrap();
        host.restore(&original).unwrap();
        host.restore_default_set().unwrap();

        assert_eq!(
            host.commands(),
            &[
                HostCommand::Capture,
                HostCommand::Install {
                    width: 32,
                    height: 32,
                    hotspot: Hotspot::new(0, 0)
                },
                HostCommand::Restore {
                    width: 32,
                    height: 32
                },
                HostCommand::RestoreDefaultSet,
            ]
        );
    }

    #[test]
    fn queued_failures_are_consumed() {
        let mut host = RecordingHost::new();
        let original = host.capture_default_pointer().unwrap();
        host.fail_next_installs(2);

        assert!(host.install(&original).is_err());
        assert!(host.install(&original).is_err());
        assert!(host.install(&original).is_ok());
        assert_eq!(host.install_count(), 1);
    }

    #[test]
    fn failed_capture_is_fatal() {
        let mut host = RecordingHost::new().fail_capture();
        let err = host.capture_default_pointer().unwrap_err();
        assert!(err.is_fatal());
        assert!(host.commands().is_empty());
    }

    #[test]
    fn commands_serialize_with_tag() {
        let json = serde_json::to_value(HostCommand::Install {
            width: 96,
            height: 96,
            hotspot: Hotspot::new(3, 6),
        })
        .unwrap();
        assert_eq!(json["command"], "install");
        assert_eq!(json["hotspot"]["x"], 3);
        assert_eq!(
            serde_json::to_string(&HostCommand::RestoreDefaultSet).unwrap(),
            r#"{"command":"restore_default_set"}"#
        );
    }
}
