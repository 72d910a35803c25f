//! Stand-ins for non-Windows targets. Every operation reports `Unsupported`.

use shakefind_common::clock::MonotonicClock;
use shakefind_common::error::{ShakefindError, ShakefindResult};
use shakefind_platform_core::{CursorHost, InputBackend, PointerSample};
use shakefind_pointer_model::PointerImage;

fn unsupported<T>(what: &str) -> ShakefindResult<T> {
    Err(ShakefindError::unsupported(format!("{what} requires Windows")))
}

#[derive(Debug, Default)]
pub struct Win32CursorHost;

impl Win32CursorHost {
    pub fn new() -> Self {
        Self
    }
}

impl CursorHost for Win32CursorHost {
    fn capture_default_pointer(&mut self) -> ShakefindResult<PointerImage> {
        unsupported("system cursor capture")
    }

    fn install(&mut self, _image: &PointerImage) -> ShakefindResult<()> {
        unsupported("SetSystemCursor")
    }

    fn restore(&mut self, _original: &PointerImage) -> ShakefindResult<()> {
        unsupported("SetSystemCursor")
    }

    fn restore_default_set(&mut self) -> ShakefindResult<()> {
        unsupported("SPI_SETCURSORS")
    }

    fn name(&self) -> &str {
        "win32"
    }
}

pub struct CursorPosBackend;

impl CursorPosBackend {
    pub fn new(_clock: MonotonicClock) -> Self {
        Self
    }
}

impl InputBackend for CursorPosBackend {
    fn poll(&mut self) -> ShakefindResult<Option<PointerSample>> {
        unsupported("GetCursorPos")
    }

    fn name(&self) -> &str {
        "cursor-pos"
    }

    fn is_available(&self) -> bool {
        false
    }
}

pub struct LowLevelHookBackend;

impl LowLevelHookBackend {
    pub fn install(_clock: MonotonicClock) -> ShakefindResult<Self> {
        unsupported("WH_MOUSE_LL")
    }
}

impl InputBackend for LowLevelHookBackend {
    fn poll(&mut self) -> ShakefindResult<Option<PointerSample>> {
        unsupported("WH_MOUSE_LL")
    }

    fn name(&self) -> &str {
        "mouse-hook"
    }

    fn is_available(&self) -> bool {
        false
    }
}
