//! Pointer positions and motion samples.

use serde::{Deserialize, Serialize};

/// Monotonic timestamp in milliseconds since the service clock epoch.
pub type TimestampMs = u64;

/// Absolute pointer position in physical screen pixels.
///
/// Coordinates may be negative on multi-monitor layouts whose virtual
/// desktop extends left of or above the primary display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Displacement from `previous` to `self`.
    pub fn delta_from(&self, previous: PointerPosition) -> (i32, i32) {
        (
            self.x.wrapping_sub(previous.x),
            self.y.wrapping_sub(previous.y),
        )
    }
}

/// Relative motion between two consecutive observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Horizontal displacement (pixels).
    pub dx: i32,
    /// Vertical displacement (pixels).
    pub dy: i32,
    /// Elapsed time since the previous observation (ms), always positive.
    pub dt_ms: u64,
}

impl Sample {
    pub fn new(dx: i32, dy: i32, dt_ms: u64) -> Self {
        Self { dx, dy, dt_ms }
    }

    /// Euclidean length of the displacement.
    pub fn distance(&self) -> f64 {
        (self.dx as f64).hypot(self.dy as f64)
    }

    /// Average speed over the sample in pixels per second.
    pub fn speed_px_per_sec(&self) -> f64 {
        if self.dt_ms == 0 {
            return 0.0;
        }
        self.distance() / self.dt_ms as f64 * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_current_minus_previous() {
        let prev = PointerPosition::new(100, 200);
        let cur = PointerPosition::new(60, 230);
        assert_eq!(cur.delta_from(prev), (-40, 30));
    }

    #[test]
    fn speed_is_pixels_per_second() {
        let sample = Sample::new(30, 40, 50);
        assert!((sample.distance() - 50.0).abs() < 1e-9);
        assert!((sample.speed_px_per_sec() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn zero_duration_has_zero_speed() {
        assert_eq!(Sample::new(10, 0, 0).speed_px_per_sec(), 0.0);
    }
}
