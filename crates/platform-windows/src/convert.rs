//! Pixel layout conversions between GDI bitmaps and pointer planes.
//!
//! GDI hands out BGRA rows padded to 4 bytes (DIBs) and monochrome rows
//! padded to 2 bytes (DDBs). Pointer planes use RGBA and unpadded mask rows.

use shakefind_pointer_model::{ColorPlane, ImageGeometryError, MaskPlane};

/// Row stride of a device-independent bitmap.
pub fn dib_stride(width: u32, bits_per_pixel: u32) -> usize {
    ((width as usize * bits_per_pixel as usize + 31) / 32) * 4
}

/// Row stride `CreateBitmap` expects for a 1-bpp bitmap.
pub fn mono_bitmap_stride(width: u32) -> usize {
    ((width as usize + 15) / 16) * 2
}

/// Copy `rows` rows between buffers with different row strides.
///
/// Rows are truncated or zero-padded to `dst_stride`.
pub fn repack_rows(src: &[u8], src_stride: usize, dst_stride: usize, rows: u32) -> Vec<u8> {
    let copy = src_stride.min(dst_stride);
    let mut out = vec![0u8; dst_stride * rows as usize];
    for (row, chunk) in src.chunks(src_stride).take(rows as usize).enumerate() {
        let len = copy.min(chunk.len());
        out[row * dst_stride..row * dst_stride + len].copy_from_slice(&chunk[..len]);
    }
    out
}

/// Build a color plane from top-down BGRA rows.
///
/// Legacy cursors carry no alpha. When every alpha byte is zero, opacity is
/// taken from the AND mask instead. A set mask bit over a non-black pixel
/// inverts the screen; an RGBA plane cannot express that, so such pixels are
/// kept opaque in their own color and their mask bit is cleared.
pub fn color_plane_from_bgra(
    width: u32,
    height: u32,
    bgra: &[u8],
    mask: &mut MaskPlane,
) -> Result<ColorPlane, ImageGeometryError> {
    let has_alpha = bgra.chunks_exact(4).any(|px| px[3] != 0);

    let mut rgba = Vec::with_capacity(bgra.len());
    for (i, px) in bgra.chunks_exact(4).enumerate() {
        let x = (i % width.max(1) as usize) as u32;
        let y = (i / width.max(1) as usize) as u32;
        let masked = y < mask.height() && mask.get(x, y);
        let inverts = masked && px[..3] != [0, 0, 0];
        let alpha = if has_alpha {
            px[3]
        } else if masked && !inverts {
            0
        } else {
            255
        };
        if !has_alpha && inverts {
            mask.set(x, y, false);
        }
        rgba.extend_from_slice(&[px[2], px[1], px[0], alpha]);
    }

    ColorPlane::from_rgba(width, height, rgba)
}

/// Top-down BGRA rows for a color plane.
pub fn bgra_from_color_plane(plane: &ColorPlane) -> Vec<u8> {
    let mut bgra = Vec::with_capacity(plane.as_bytes().len());
    for px in plane.as_bytes().chunks_exact(4) {
        bgra.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
    }
    bgra
}
