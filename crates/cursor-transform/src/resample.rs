//! Plane resampling on top of `image`.
//!
//! Color is filtered in premultiplied space so transparent neighbours do not
//! darken the pointer's edges. Masks are filtered as 8-bit coverage and then
//! thresholded back to one bit.

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbaImage};
use shakefind_pointer_model::{ColorPlane, ImageGeometryError, MaskPlane};

/// Smooth interpolation. Nearest-neighbour would give a blocky pointer.
pub const RESAMPLE_FILTER: FilterType = FilterType::Triangle;

/// Coverage at or above this value becomes a set mask bit.
pub const MASK_THRESHOLD: u8 = 128;

/// Resample a color plane to `width` x `height`.
pub fn resample_color(
    plane: &ColorPlane,
    width: u32,
    height: u32,
) -> Result<ColorPlane, ImageGeometryError> {
    let mut premultiplied = plane.as_bytes().to_vec();
    for px in premultiplied.chunks_exact_mut(4) {
        premultiply(px);
    }

    let source = RgbaImage::from_raw(plane.width(), plane.height(), premultiplied).ok_or(
        ImageGeometryError::BufferLength {
            plane: "color",
            expected: plane.width() as usize * plane.height() as usize * 4,
            actual: plane.as_bytes().len(),
        },
    )?;

    let mut resized = imageops::resize(&source, width, height, RESAMPLE_FILTER).into_raw();
    for px in resized.chunks_exact_mut(4) {
        unpremultiply(px);
    }

    ColorPlane::from_rgba(width, height, resized)
}

/// Resample a mask plane to `width` x `height`.
pub fn resample_mask(
    plane: &MaskPlane,
    width: u32,
    height: u32,
) -> Result<MaskPlane, ImageGeometryError> {
    let luma = plane.to_luma();
    let actual = luma.len();
    let source = GrayImage::from_raw(plane.width(), plane.height(), luma).ok_or(
        ImageGeometryError::BufferLength {
            plane: "mask",
            expected: plane.width() as usize * plane.height() as usize,
            actual,
        },
    )?;

    let resized = imageops::resize(&source, width, height, RESAMPLE_FILTER);
    Ok(MaskPlane::from_luma(
        width,
        height,
        resized.as_raw(),
        MASK_THRESHOLD,
    ))
}

fn premultiply(px: &mut [u8]) {
    let a = px[3] as u32;
    for c in &mut px[..3] {
        *c = ((*c as u32 * a + 127) / 255) as u8;
    }
}

fn unpremultiply(px: &mut [u8]) {
    let a = px[3] as u32;
    if a == 0 {
        px[..3].fill(0);
        return;
    }
    for c in &mut px[..3] {
        *c = ((*c as u32 * 255 + a / 2) / a).min(255) as u8;
    }
}
