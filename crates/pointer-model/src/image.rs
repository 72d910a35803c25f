//! Pointer bitmap types.
//!
//! A pointer image follows the classic cursor layout: an optional straight
//! alpha RGBA color plane plus a 1-bit mask plane. A set mask bit is an AND
//! bit, meaning the screen shows through at that pixel.
//!
//! Monochrome (mask-only) pointers stack the AND half above the XOR half in
//! the mask plane, so that plane is twice as tall as the image.

use serde::{Deserialize, Serialize};

/// The pixel that represents the logical click point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: u32,
    pub y: u32,
}

impl Hotspot {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Geometry violations detected by [`PointerImage::validate`] and the plane
/// constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageGeometryError {
    #[error("image has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("{plane} plane holds {actual} bytes, expected {expected}")]
    BufferLength {
        plane: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{plane} plane is {actual_w}x{actual_h}, expected {expected_w}x{expected_h}")]
    PlaneSize {
        plane: &'static str,
        expected_w: u32,
        expected_h: u32,
        actual_w: u32,
        actual_h: u32,
    },

    #[error("hotspot ({x}, {y}) lies outside {width}x{height}")]
    HotspotOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// Straight-alpha RGBA8 pixels, row-major, no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPlane {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl ColorPlane {
    /// Fully transparent plane.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Wrap an existing RGBA buffer, checking its length.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, ImageGeometryError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(ImageGeometryError::BufferLength {
                plane: "color",
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.rgba[i..i + 4].copy_from_slice(&rgba);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.rgba
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

/// 1 bit per pixel, MSB first, rows padded to whole bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskPlane {
    width: u32,
    height: u32,
    bits: Vec<u8>,
}

impl MaskPlane {
    /// Plane with every bit set to `value`.
    pub fn filled(width: u32, height: u32, value: bool) -> Self {
        let stride = Self::stride_for(width);
        let mut plane = Self {
            width,
            height,
            bits: vec![0; stride * height as usize],
        };
        if value {
            for y in 0..height {
                for x in 0..width {
                    plane.set(x, y, true);
                }
            }
        }
        plane
    }

    /// Wrap packed rows, checking the buffer length against the stride.
    pub fn from_packed(width: u32, height: u32, bits: Vec<u8>) -> Result<Self, ImageGeometryError> {
        let expected = Self::stride_for(width) * height as usize;
        if bits.len() != expected {
            return Err(ImageGeometryError::BufferLength {
                plane: "mask",
                expected,
                actual: bits.len(),
            });
        }
        Ok(Self {
            width,
            height,
            bits,
        })
    }

    /// Build a plane from one byte per pixel; values `>= threshold` become set bits.
    pub fn from_luma(width: u32, height: u32, luma: &[u8], threshold: u8) -> Self {
        let mut plane = Self::filled(width, height, false);
        for y in 0..height {
            for x in 0..width {
                let value = luma[y as usize * width as usize + x as usize];
                if value >= threshold {
                    plane.set(x, y, true);
                }
            }
        }
        plane
    }

    /// One byte per pixel: 255 for set bits, 0 otherwise.
    pub fn to_luma(&self) -> Vec<u8> {
        let mut luma = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                luma.push(if self.get(x, y) { 255 } else { 0 });
            }
        }
        luma
    }

    /// Copy of `row_count` rows starting at `first_row`.
    pub fn rows(&self, first_row: u32, row_count: u32) -> Self {
        let stride = self.stride();
        let start = first_row as usize * stride;
        let end = start + row_count as usize * stride;
        Self {
            width: self.width,
            height: row_count,
            bits: self.bits[start..end].to_vec(),
        }
    }

    /// Stack `top` above `bottom`. Both must share a width.
    pub fn stacked(top: &MaskPlane, bottom: &MaskPlane) -> Result<Self, ImageGeometryError> {
        if top.width != bottom.width {
            return Err(ImageGeometryError::PlaneSize {
                plane: "mask",
                expected_w: top.width,
                expected_h: bottom.height,
                actual_w: bottom.width,
                actual_h: bottom.height,
            });
        }
        let mut bits = Vec::with_capacity(top.bits.len() + bottom.bits.len());
        bits.extend_from_slice(&top.bits);
        bits.extend_from_slice(&bottom.bits);
        Ok(Self {
            width: top.width,
            height: top.height + bottom.height,
            bits,
        })
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        let (byte, bit) = self.locate(x, y);
        self.bits[byte] & bit != 0
    }

    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        let (byte, bit) = self.locate(x, y);
        if value {
            self.bits[byte] |= bit;
        } else {
            self.bits[byte] &= !bit;
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        Self::stride_for(self.width)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    fn stride_for(width: u32) -> usize {
        (width as usize + 7) / 8
    }

    fn locate(&self, x: u32, y: u32) -> (usize, u8) {
        let byte = y as usize * self.stride() + x as usize / 8;
        let bit = 0x80u8 >> (x % 8);
        (byte, bit)
    }
}

/// A complete pointer image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerImage {
    /// Color plane; `None` for monochrome pointers.
    pub color: Option<ColorPlane>,
    /// AND mask (color pointers) or stacked AND/XOR mask (monochrome).
    pub mask: MaskPlane,
    /// Logical width in pixels.
    pub width: u32,
    /// Logical height in pixels.
    pub height: u32,
    pub hotspot: Hotspot,
}

impl PointerImage {
    /// Color pointer; the mask must match the color plane's size.
    pub fn with_color(
        color: ColorPlane,
        mask: MaskPlane,
        hotspot: Hotspot,
    ) -> Result<Self, ImageGeometryError> {
        let image = Self {
            width: color.width(),
            height: color.height(),
            color: Some(color),
            mask,
            hotspot,
        };
        image.validate()?;
        Ok(image)
    }

    /// Monochrome pointer from stacked AND/XOR halves.
    pub fn monochrome(
        and_mask: &MaskPlane,
        xor_mask: &MaskPlane,
        hotspot: Hotspot,
    ) -> Result<Self, ImageGeometryError> {
        if and_mask.height() != xor_mask.height() {
            return Err(ImageGeometryError::PlaneSize {
                plane: "xor mask",
                expected_w: and_mask.width(),
                expected_h: and_mask.height(),
                actual_w: xor_mask.width(),
                actual_h: xor_mask.height(),
            });
        }
        let image = Self {
            width: and_mask.width(),
            height: and_mask.height(),
            color: None,
            mask: MaskPlane::stacked(and_mask, xor_mask)?,
            hotspot,
        };
        image.validate()?;
        Ok(image)
    }

    /// Whether the pointer carries a color plane.
    pub fn is_monochrome(&self) -> bool {
        self.color.is_none()
    }

    /// Expected mask plane height for this image's layout.
    pub fn mask_height(&self) -> u32 {
        if self.is_monochrome() {
            self.height * 2
        } else {
            self.height
        }
    }

    /// AND and XOR halves of a monochrome mask.
    pub fn monochrome_halves(&self) -> Option<(MaskPlane, MaskPlane)> {
        if !self.is_monochrome() {
            return None;
        }
        Some((
            self.mask.rows(0, self.height),
            self.mask.rows(self.height, self.height),
        ))
    }

    /// Check that plane sizes and the hotspot agree with the logical size.
    pub fn validate(&self) -> Result<(), ImageGeometryError> {
        if self.width == 0 || self.height == 0 {
            return Err(ImageGeometryError::Empty {
                width: self.width,
                height: self.height,
            });
        }

        if let Some(color) = &self.color {
            if color.width() != self.width || color.height() != self.height {
                return Err(ImageGeometryError::PlaneSize {
                    plane: "color",
                    expected_w: self.width,
                    expected_h: self.height,
                    actual_w: color.width(),
                    actual_h: color.height(),
                });
            }
            let expected = self.width as usize * self.height as usize * 4;
            if color.as_bytes().len() != expected {
                return Err(ImageGeometryError::BufferLength {
                    plane: "color",
                    expected,
                    actual: color.as_bytes().len(),
                });
            }
        }

        if self.mask.width() != self.width || self.mask.height() != self.mask_height() {
            return Err(ImageGeometryError::PlaneSize {
                plane: "mask",
                expected_w: self.width,
                expected_h: self.mask_height(),
                actual_w: self.mask.width(),
                actual_h: self.mask.height(),
            });
        }
        let expected = self.mask.stride() * self.mask.height() as usize;
        if self.mask.as_bytes().len() != expected {
            return Err(ImageGeometryError::BufferLength {
                plane: "mask",
                expected,
                actual: self.mask.as_bytes().len(),
            });
        }

        if self.hotspot.x >= self.width || self.hotspot.y >= self.height {
            return Err(ImageGeometryError::HotspotOutOfBounds {
                x: self.hotspot.x,
                y: self.hotspot.y,
                width: self.width,
                height: self.height,
            });
        }

        Ok(())
    }

    /// Built-in 32x32 arrow with its hotspot at the tip.
    ///
    /// Stands in for the system pointer on hosts that cannot capture one.
    pub fn synthetic_arrow() -> Self {
        const SIZE: u32 = 32;
        const BLACK: [u8; 4] = [0, 0, 0, 255];
        const WHITE: [u8; 4] = [255, 255, 255, 255];

        let mut color = ColorPlane::transparent(SIZE, SIZE);
        let mut mask = MaskPlane::filled(SIZE, SIZE, true);

        // Right edge of the arrow on row y: a 45 degree slope that stops
        // widening two thirds of the way down.
        let edge = |y: u32| -> Option<u32> {
            match y {
                0..=15 => Some(y * 2 / 3),
                16..=20 => Some(10 - (y - 16)),
                _ => None,
            }
        };

        for y in 0..SIZE {
            let Some(right) = edge(y) else { continue };
            for x in 0..=right {
                let outline = x == 0 || x == right || y == 20;
                color.set_pixel(x, y, if outline { BLACK } else { WHITE });
                mask.set(x, y, false);
            }
        }

        Self {
            width: SIZE,
            height: SIZE,
            color: Some(color),
            mask,
            hotspot: Hotspot::new(0, 0),
        }
    }
}
