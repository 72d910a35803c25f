//! ShakeFind platform core contracts.
//!
//! This crate contains the seams between the enlargement core and a concrete
//! OS backend: where pointer positions come from and where pointer images go.
//! Nothing in here touches a real windowing system.

pub mod recording;

use shakefind_common::error::ShakefindResult;
use shakefind_pointer_model::{PointerImage, PointerPosition, TimestampMs};

pub use recording::{HostCommand, RecordingHost};

/// The host's pointer-management subsystem.
///
/// Implementations are assumed synchronous and fast; the controller calls
/// them inline while handling a sample or a tick.
pub trait CursorHost: Send {
    /// Copy the current default pointer image.
    fn capture_default_pointer(&mut self) -> ShakefindResult<PointerImage>;

    /// Make `image` the system pointer.
    fn install(&mut self, image: &PointerImage) -> ShakefindResult<()>;

    /// Put the captured original pointer back after an enlargement.
    fn restore(&mut self, original: &PointerImage) -> ShakefindResult<()>;

    /// Reload the whole system pointer set from the user's settings.
    fn restore_default_set(&mut self) -> ShakefindResult<()>;

    /// Host name for logging.
    fn name(&self) -> &str;
}

impl<H: CursorHost + ?Sized> CursorHost for Box<H> {
    fn capture_default_pointer(&mut self) -> ShakefindResult<PointerImage> {
        (**self).capture_default_pointer()
    }

    fn install(&mut self, image: &PointerImage) -> ShakefindResult<()> {
        (**self).install(image)
    }

    fn restore(&mut self, original: &PointerImage) -> ShakefindResult<()> {
        (**self).restore(original)
    }

    fn restore_default_set(&mut self) -> ShakefindResult<()> {
        (**self).restore_default_set()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// One absolute pointer observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerSample {
    pub position: PointerPosition,
    pub timestamp_ms: TimestampMs,
}

impl PointerSample {
    pub fn new(x: i32, y: i32, timestamp_ms: TimestampMs) -> Self {
        Self {
            position: PointerPosition::new(x, y),
            timestamp_ms,
        }
    }
}

/// Trait for pointer position sources.
pub trait InputBackend: Send {
    /// Poll for the next sample. Returns `None` if no sample is available.
    fn poll(&mut self) -> ShakefindResult<Option<PointerSample>>;

    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Check if the backend is available on this system.
    fn is_available(&self) -> bool;
}

impl<B: InputBackend + ?Sized> InputBackend for Box<B> {
    fn poll(&mut self) -> ShakefindResult<Option<PointerSample>> {
        (**self).poll()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}
