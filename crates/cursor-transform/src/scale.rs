//! Pointer image scaling.

use shakefind_common::error::ShakefindError;
use shakefind_pointer_model::{Hotspot, ImageGeometryError, MaskPlane, PointerImage};

use crate::resample::{resample_color, resample_mask};

/// Largest edge length the compositor will allocate for a pointer surface.
pub const MAX_SCALED_DIMENSION: u32 = 4096;

/// Why a pointer image could not be scaled.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScaleError {
    #[error("scale factor must be finite and positive, got {0}")]
    InvalidFactor(f64),

    #[error("source pointer image is malformed: {0}")]
    MalformedSource(#[from] ImageGeometryError),

    #[error("scaling {width}x{height} by {factor} leaves no pixels")]
    Degenerate { width: u32, height: u32, factor: f64 },

    #[error("cannot allocate a {width}x{height} pointer surface")]
    Allocation { width: f64, height: f64 },
}

impl From<ScaleError> for ShakefindError {
    fn from(err: ScaleError) -> Self {
        ShakefindError::scale(err.to_string())
    }
}

/// Scale a pointer image by `factor`.
///
/// Both dimensions and the hotspot are multiplied by `factor` and rounded.
/// The hotspot is kept inside the new bounds. Color and mask planes are
/// resampled with the same geometry; a monochrome mask is resampled one
/// half at a time.
pub fn scale(image: &PointerImage, factor: f64) -> Result<PointerImage, ScaleError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(ScaleError::InvalidFactor(factor));
    }
    image.validate()?;

    let (width, height) = scaled_size(image.width, image.height, factor)?;
    let hotspot = Hotspot::new(
        scaled_coord(image.hotspot.x, factor, width),
        scaled_coord(image.hotspot.y, factor, height),
    );

    let scaled = match &image.color {
        Some(color) => PointerImage {
            color: Some(resample_color(color, width, height)?),
            mask: resample_mask(&image.mask, width, height)?,
            width,
            height,
            hotspot,
        },
        None => {
            let and_half = resample_mask(&image.mask.rows(0, image.height), width, height)?;
            let xor_half = resample_mask(
                &image.mask.rows(image.height, image.height),
                width,
                height,
            )?;
            PointerImage {
                color: None,
                mask: MaskPlane::stacked(&and_half, &xor_half)?,
                width,
                height,
                hotspot,
            }
        }
    };

    scaled.validate()?;

    tracing::debug!(
        from = %format!("{}x{}", image.width, image.height),
        to = %format!("{width}x{height}"),
        factor,
        monochrome = image.is_monochrome(),
        "Scaled pointer image"
    );

    Ok(scaled)
}

fn scaled_size(width: u32, height: u32, factor: f64) -> Result<(u32, u32), ScaleError> {
    let w = (width as f64 * factor).round();
    let h = (height as f64 * factor).round();

    if w < 1.0 || h < 1.0 {
        return Err(ScaleError::Degenerate {
            width,
            height,
            factor,
        });
    }
    if w > MAX_SCALED_DIMENSION as f64 || h > MAX_SCALED_DIMENSION as f64 {
        return Err(ScaleError::Allocation {
            width: w,
            height: h,
        });
    }
    Ok((w as u32, h as u32))
}

fn scaled_coord(coord: u32, factor: f64, limit: u32) -> u32 {
    let scaled = (coord as f64 * factor).round() as u32;
    scaled.min(limit.saturating_sub(1))
}
