//! ShakeFind Pointer Model
//!
//! Defines the core data contracts shared by detection, scaling and the
//! host layer:
//! - **Motion:** Absolute pointer positions and the relative samples derived
//!   from consecutive positions
//! - **Image:** Pointer bitmaps (optional color plane, 1-bit mask plane,
//!   hotspot)
//! - **Script:** JSONL position scripts used for replay
//!
//! Positions are physical screen pixels; timestamps are milliseconds on the
//! service's monotonic clock.

pub mod image;
pub mod motion;
pub mod script;

pub use image::*;
pub use motion::*;
pub use script::*;
