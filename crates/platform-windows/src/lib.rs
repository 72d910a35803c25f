//! Windows platform integration.
//!
//! Replaces the system arrow cursor with `SetSystemCursor`, reloads the
//! user's pointer set on shutdown, and samples the pointer either by polling
//! `GetCursorPos` or through a `WH_MOUSE_LL` hook. On other targets the same
//! types exist but every operation fails with `Unsupported`.

pub mod convert;

#[cfg(windows)]
mod cursor;
#[cfg(windows)]
mod handles;
#[cfg(windows)]
mod input;
#[cfg(not(windows))]
mod unsupported;

#[cfg(windows)]
pub use cursor::Win32CursorHost;
#[cfg(windows)]
pub use input::{CursorPosBackend, LowLevelHookBackend, DEFAULT_POLL_INTERVAL_MS};
#[cfg(not(windows))]
pub use unsupported::{CursorPosBackend, LowLevelHookBackend, Win32CursorHost};

/// Whether the process runs with administrator rights.
#[cfg(windows)]
pub fn is_elevated() -> bool {
    unsafe { windows::Win32::UI::Shell::IsUserAnAdmin() }.as_bool()
}

#[cfg(not(windows))]
pub fn is_elevated() -> bool {
    false
}
