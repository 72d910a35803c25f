//! Owned GDI and cursor handles.

use windows::Win32::Graphics::Gdi::{DeleteObject, GetDC, ReleaseDC, HBITMAP, HDC};
use windows::Win32::UI::WindowsAndMessaging::{DestroyCursor, HCURSOR};

/// A bitmap deleted on drop.
pub struct OwnedBitmap(HBITMAP);

impl OwnedBitmap {
    /// Take ownership of `bitmap`. Returns `None` for a null handle.
    pub fn new(bitmap: HBITMAP) -> Option<Self> {
        if bitmap.is_invalid() {
            None
        } else {
            Some(Self(bitmap))
        }
    }

    pub fn handle(&self) -> HBITMAP {
        self.0
    }
}

impl Drop for OwnedBitmap {
    fn drop(&mut self) {
        unsafe {
            let _ = DeleteObject(self.0);
        }
    }
}

/// The screen device context, released on drop.
pub struct ScreenDc(HDC);

impl ScreenDc {
    pub fn acquire() -> Option<Self> {
        let dc = unsafe { GetDC(None) };
        if dc.is_invalid() {
            None
        } else {
            Some(Self(dc))
        }
    }

    pub fn handle(&self) -> HDC {
        self.0
    }
}

impl Drop for ScreenDc {
    fn drop(&mut self) {
        unsafe {
            ReleaseDC(None, self.0);
        }
    }
}

/// A cursor destroyed on drop unless ownership moves to the system.
pub struct OwnedCursor(Option<HCURSOR>);

impl OwnedCursor {
    pub fn new(cursor: HCURSOR) -> Self {
        Self(Some(cursor))
    }

    pub fn handle(&self) -> HCURSOR {
        self.0.unwrap_or_default()
    }

    /// Give up ownership. Used after `SetSystemCursor` accepted the handle,
    /// since the system destroys it from then on.
    pub fn release(mut self) -> HCURSOR {
        self.0.take().unwrap_or_default()
    }
}

impl Drop for OwnedCursor {
    fn drop(&mut self) {
        if let Some(cursor) = self.0.take() {
            unsafe {
                let _ = DestroyCursor(cursor);
            }
        }
    }
}
