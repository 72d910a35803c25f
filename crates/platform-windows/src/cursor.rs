//! System arrow cursor capture and replacement.

use std::ffi::c_void;
use std::mem;

use shakefind_common::error::{ShakefindError, ShakefindResult};
use shakefind_platform_core::CursorHost;
use shakefind_pointer_model::{Hotspot, MaskPlane, PointerImage};
use windows::Win32::Foundation::BOOL;
use windows::Win32::Graphics::Gdi::{
    CreateBitmap, CreateDIBSection, GetDIBits, GetObjectW, BITMAP, BITMAPINFO, BITMAPINFOHEADER,
    BI_RGB, DIB_RGB_COLORS, HBITMAP, RGBQUAD,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateIconIndirect, GetIconInfo, LoadCursorW, SetSystemCursor, SystemParametersInfoW,
    HCURSOR, ICONINFO, IDC_ARROW, OCR_NORMAL, SPIF_SENDCHANGE, SPI_SETCURSORS,
};

use crate::convert::{
    bgra_from_color_plane, color_plane_from_bgra, dib_stride, mono_bitmap_stride, repack_rows,
};
use crate::handles::{OwnedBitmap, OwnedCursor, ScreenDc};

/// `BITMAPINFO` with room for the two-entry palette of a 1-bpp DIB.
#[repr(C)]
struct MonoBitmapInfo {
    header: BITMAPINFOHEADER,
    colors: [RGBQUAD; 2],
}

/// Replaces the system arrow (`OCR_NORMAL`) through `SetSystemCursor`.
#[derive(Debug, Default)]
pub struct Win32CursorHost;

impl Win32CursorHost {
    pub fn new() -> Self {
        Self
    }

    fn set_arrow(&self, image: &PointerImage) -> Result<(), String> {
        let cursor = unsafe { create_cursor(image)? };
        unsafe { SetSystemCursor(cursor.handle(), OCR_NORMAL) }
            .map_err(|e| format!("SetSystemCursor failed: {e}"))?;
        // The system owns the handle now.
        cursor.release();
        Ok(())
    }
}

impl CursorHost for Win32CursorHost {
    fn capture_default_pointer(&mut self) -> ShakefindResult<PointerImage> {
        let arrow = unsafe { LoadCursorW(None, IDC_ARROW) }
            .map_err(|e| ShakefindError::capture(format!("LoadCursorW failed: {e}")))?;
        let image = unsafe { read_cursor(arrow) }.map_err(ShakefindError::capture)?;

        tracing::debug!(
            width = image.width,
            height = image.height,
            hotspot_x = image.hotspot.x,
            hotspot_y = image.hotspot.y,
            monochrome = image.is_monochrome(),
            "Captured system arrow cursor"
        );
        Ok(image)
    }

    fn install(&mut self, image: &PointerImage) -> ShakefindResult<()> {
        self.set_arrow(image).map_err(ShakefindError::install)
    }

    fn restore(&mut self, original: &PointerImage) -> ShakefindResult<()> {
        self.set_arrow(original).map_err(ShakefindError::restore)
    }

    fn restore_default_set(&mut self) -> ShakefindResult<()> {
        unsafe { SystemParametersInfoW(SPI_SETCURSORS, 0, None, SPIF_SENDCHANGE) }
            .map_err(|e| ShakefindError::restore(format!("SPI_SETCURSORS failed: {e}")))
    }

    fn name(&self) -> &str {
        "win32"
    }
}

unsafe fn read_cursor(cursor: HCURSOR) -> Result<PointerImage, String> {
    let mut info = ICONINFO::default();
    GetIconInfo(cursor, &mut info).map_err(|e| format!("GetIconInfo failed: {e}"))?;

    // GetIconInfo hands us copies of both bitmaps.
    let color = OwnedBitmap::new(info.hbmColor);
    let mask = OwnedBitmap::new(info.hbmMask).ok_or("cursor has no mask bitmap")?;
    let hotspot = Hotspot::new(info.xHotspot, info.yHotspot);

    let (mask_width, mask_height) = bitmap_size(mask.handle())?;
    let dc = ScreenDc::acquire().ok_or("GetDC failed")?;

    match color {
        Some(color) => {
            let (width, height) = bitmap_size(color.handle())?;
            let mut mask_plane = read_mask(&dc, mask.handle(), width, height)?;
            let bgra = read_bgra(&dc, color.handle(), width, height)?;
            let color_plane = color_plane_from_bgra(width, height, &bgra, &mut mask_plane)
                .map_err(|e| e.to_string())?;
            PointerImage::with_color(color_plane, mask_plane, hotspot).map_err(|e| e.to_string())
        }
        None => {
            let height = mask_height / 2;
            let stacked = read_mask(&dc, mask.handle(), mask_width, mask_height)?;
            let and_half = stacked.rows(0, height);
            let xor_half = stacked.rows(height, height);
            PointerImage::monochrome(&and_half, &xor_half, hotspot).map_err(|e| e.to_string())
        }
    }
}

unsafe fn bitmap_size(bitmap: HBITMAP) -> Result<(u32, u32), String> {
    let mut bm = BITMAP::default();
    let written = GetObjectW(
        bitmap,
        mem::size_of::<BITMAP>() as i32,
        Some(&mut bm as *mut _ as *mut c_void),
    );
    if written == 0 || bm.bmWidth <= 0 || bm.bmHeight <= 0 {
        return Err("GetObjectW returned no bitmap".to_string());
    }
    Ok((bm.bmWidth as u32, bm.bmHeight as u32))
}

fn top_down_header(width: u32, height: u32, bit_count: u16) -> BITMAPINFOHEADER {
    BITMAPINFOHEADER {
        biSize: mem::size_of::<BITMAPINFOHEADER>() as u32,
        biWidth: width as i32,
        biHeight: -(height as i32),
        biPlanes: 1,
        biBitCount: bit_count,
        biCompression: BI_RGB.0,
        ..Default::default()
    }
}

unsafe fn read_mask(
    dc: &ScreenDc,
    bitmap: HBITMAP,
    width: u32,
    height: u32,
) -> Result<MaskPlane, String> {
    let stride = dib_stride(width, 1);
    let mut bits = vec![0u8; stride * height as usize];
    let mut info = MonoBitmapInfo {
        header: top_down_header(width, height, 1),
        colors: [RGBQUAD::default(); 2],
    };

    let rows = GetDIBits(
        dc.handle(),
        bitmap,
        0,
        height,
        Some(bits.as_mut_ptr() as *mut c_void),
        &mut info as *mut MonoBitmapInfo as *mut BITMAPINFO,
        DIB_RGB_COLORS,
    );
    if rows != height as i32 {
        return Err(format!("GetDIBits read {rows} of {height} mask rows"));
    }

    let packed = repack_rows(&bits, stride, (width as usize).div_ceil(8), height);
    MaskPlane::from_packed(width, height, packed).map_err(|e| e.to_string())
}

unsafe fn read_bgra(
    dc: &ScreenDc,
    bitmap: HBITMAP,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, String> {
    let mut bgra = vec![0u8; width as usize * height as usize * 4];
    let mut info = BITMAPINFO {
        bmiHeader: top_down_header(width, height, 32),
        ..Default::default()
    };

    let rows = GetDIBits(
        dc.handle(),
        bitmap,
        0,
        height,
        Some(bgra.as_mut_ptr() as *mut c_void),
        &mut info,
        DIB_RGB_COLORS,
    );
    if rows != height as i32 {
        return Err(format!("GetDIBits read {rows} of {height} color rows"));
    }
    Ok(bgra)
}

unsafe fn create_cursor(image: &PointerImage) -> Result<OwnedCursor, String> {
    let mask = create_mask_bitmap(&image.mask)?;
    let color = match &image.color {
        Some(plane) => {
            let bgra = bgra_from_color_plane(plane);
            Some(create_color_bitmap(plane.width(), plane.height(), &bgra)?)
        }
        None => None,
    };

    let info = ICONINFO {
        fIcon: BOOL::from(false),
        xHotspot: image.hotspot.x,
        yHotspot: image.hotspot.y,
        hbmMask: mask.handle(),
        hbmColor: color.as_ref().map(OwnedBitmap::handle).unwrap_or_default(),
    };

    // CreateIconIndirect copies the bitmaps; ours are deleted on return.
    let icon = CreateIconIndirect(&info).map_err(|e| format!("CreateIconIndirect failed: {e}"))?;
    Ok(OwnedCursor::new(HCURSOR(icon.0)))
}

unsafe fn create_mask_bitmap(mask: &MaskPlane) -> Result<OwnedBitmap, String> {
    let bits = repack_rows(
        mask.as_bytes(),
        mask.stride(),
        mono_bitmap_stride(mask.width()),
        mask.height(),
    );
    let bitmap = CreateBitmap(
        mask.width() as i32,
        mask.height() as i32,
        1,
        1,
        Some(bits.as_ptr() as *const c_void),
    );
    OwnedBitmap::new(bitmap).ok_or_else(|| "CreateBitmap failed for mask".to_string())
}

unsafe fn create_color_bitmap(width: u32, height: u32, bgra: &[u8]) -> Result<OwnedBitmap, String> {
    let dc = ScreenDc::acquire().ok_or("GetDC failed")?;
    let info = BITMAPINFO {
        bmiHeader: top_down_header(width, height, 32),
        ..Default::default()
    };

    let mut bits: *mut c_void = std::ptr::null_mut();
    let bitmap = CreateDIBSection(dc.handle(), &info, DIB_RGB_COLORS, &mut bits, None, 0)
        .map_err(|e| format!("CreateDIBSection failed: {e}"))?;
    let bitmap = OwnedBitmap::new(bitmap).ok_or("CreateDIBSection returned null")?;
    if bits.is_null() {
        return Err("CreateDIBSection returned no pixel buffer".to_string());
    }

    std::ptr::copy_nonoverlapping(bgra.as_ptr(), bits as *mut u8, bgra.len());
    Ok(bitmap)
}
