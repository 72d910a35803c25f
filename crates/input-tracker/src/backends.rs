//! Pointer sample backends.
//!
//! Each backend provides a different way to observe the absolute pointer
//! position. Samples are stamped against the service's monotonic clock so
//! they share a time base with dwell ticks.

use std::collections::VecDeque;

use shakefind_common::clock::MonotonicClock;
use shakefind_common::config::TrackingMode;
use shakefind_common::error::ShakefindResult;
use shakefind_platform_core::{InputBackend, PointerSample};
use shakefind_pointer_model::ScriptedPosition;

/// Stub backend for testing. Hands out pre-loaded samples once.
pub struct StubBackend {
    samples: VecDeque<PointerSample>,
}

impl StubBackend {
    /// Create a stub backend with pre-loaded samples.
    pub fn new(samples: Vec<PointerSample>) -> Self {
        Self {
            samples: samples.into(),
        }
    }

    /// Create an empty stub that never produces samples.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl InputBackend for StubBackend {
    fn poll(&mut self) -> ShakefindResult<Option<PointerSample>> {
        Ok(self.samples.pop_front())
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Plays a position script back in real time.
///
/// Script timestamps are taken relative to the first entry and shifted to
/// the clock time at which the backend was created. An entry is handed out
/// once the clock reaches its shifted timestamp.
pub struct ScriptedBackend {
    positions: VecDeque<ScriptedPosition>,
    clock: MonotonicClock,
    started_ms: u64,
    script_origin_ms: u64,
}

impl ScriptedBackend {
    pub fn new(positions: Vec<ScriptedPosition>, clock: MonotonicClock) -> Self {
        let started_ms = clock.now_ms();
        Self::starting_at(positions, clock, started_ms)
    }

    /// Backend whose first entry is due at `started_ms`.
    pub fn starting_at(
        positions: Vec<ScriptedPosition>,
        clock: MonotonicClock,
        started_ms: u64,
    ) -> Self {
        let script_origin_ms = positions.first().map_or(0, |p| p.timestamp_ms);
        Self {
            positions: positions.into(),
            clock,
            started_ms,
            script_origin_ms,
        }
    }

    /// Entries not yet handed out.
    pub fn remaining(&self) -> usize {
        self.positions.len()
    }

    fn due_ms(&self, position: &ScriptedPosition) -> u64 {
        self.started_ms
            .saturating_add(position.timestamp_ms.saturating_sub(self.script_origin_ms))
    }
}

impl InputBackend for ScriptedBackend {
    fn poll(&mut self) -> ShakefindResult<Option<PointerSample>> {
        let Some(next) = self.positions.front() else {
            return Ok(None);
        };

        let due_ms = self.due_ms(next);
        if due_ms > self.clock.now_ms() {
            return Ok(None);
        }

        let sample = PointerSample {
            position: next.position(),
            timestamp_ms: due_ms,
        };
        self.positions.pop_front();
        Ok(Some(sample))
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Detect the best available input backend for the current system.
///
/// `mode` picks between the hook and polling backends where the platform
/// offers both. Falls back to a stub that never produces samples.
pub fn detect_best_backend(mode: TrackingMode, clock: &MonotonicClock) -> Box<dyn InputBackend> {
    platform_backend(mode, clock)
}

#[cfg(windows)]
fn platform_backend(mode: TrackingMode, clock: &MonotonicClock) -> Box<dyn InputBackend> {
    use shakefind_platform_windows::{CursorPosBackend, LowLevelHookBackend};

    if mode == TrackingMode::Hook {
        match LowLevelHookBackend::install(clock.clone()) {
            Ok(backend) => {
                tracing::info!("Using low-level mouse hook backend");
                return Box::new(backend);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install mouse hook, falling back to polling");
            }
        }
    }

    tracing::info!("Using cursor position polling backend");
    Box::new(CursorPosBackend::new(clock.clone()))
}

#[cfg(not(windows))]
fn platform_backend(mode: TrackingMode, _clock: &MonotonicClock) -> Box<dyn InputBackend> {
    tracing::warn!(%mode, "Pointer input requires Windows; using stub backend");
    Box::new(StubBackend::empty())
}
