//! ShakeFind Cursor Transform
//!
//! Produces an enlarged copy of a pointer image:
//! - **Scale:** New geometry and a proportionally moved hotspot
//! - **Resample:** Smooth filtering of the color and mask planes with
//!   identical geometry so they stay pixel-aligned
//!
//! The source image is never modified and the result shares no buffers
//! with it. A failure at any step returns an error and no image.

pub mod resample;
pub mod scale;

pub use scale::{scale, ScaleError, MAX_SCALED_DIMENSION};
