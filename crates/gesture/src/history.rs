//! Bounded motion history and the metrics computed over it.

use std::collections::VecDeque;

use serde::Serialize;
use shakefind_pointer_model::Sample;

/// Number of samples the shake predicate looks at.
pub const HISTORY_SIZE: usize = 10;

/// Fixed-capacity FIFO of the most recent motion samples, oldest first.
#[derive(Debug, Clone)]
pub struct MotionHistory {
    samples: VecDeque<Sample>,
    capacity: usize,
}

/// Summary of the samples currently in the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShakeMetrics {
    /// Sign reversals summed over both axes.
    pub direction_changes: u32,
    /// Mean of per-sample speeds (px/s).
    pub avg_speed_px_per_sec: f64,
    /// Sum of sample durations (ms).
    pub total_time_ms: u64,
}

impl MotionHistory {
    /// History holding [`HISTORY_SIZE`] samples.
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one when over capacity.
    pub fn push(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Samples in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Metrics over every sample currently held. `None` when empty.
    pub fn metrics(&self) -> Option<ShakeMetrics> {
        if self.samples.is_empty() {
            return None;
        }

        let mut x_axis = AxisReversals::default();
        let mut y_axis = AxisReversals::default();
        let mut total_speed = 0.0;
        let mut total_time_ms = 0u64;

        for sample in &self.samples {
            x_axis.observe(sample.dx);
            y_axis.observe(sample.dy);
            total_speed += sample.speed_px_per_sec();
            total_time_ms += sample.dt_ms;
        }

        Some(ShakeMetrics {
            direction_changes: x_axis.changes + y_axis.changes,
            avg_speed_px_per_sec: total_speed / self.samples.len() as f64,
            total_time_ms,
        })
    }
}

impl Default for MotionHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts sign reversals along one axis.
///
/// Zero displacement neither counts as a reversal nor clears the remembered
/// direction, so `+, 0, -` is one reversal.
#[derive(Debug, Default)]
struct AxisReversals {
    last_direction: i32,
    changes: u32,
}

impl AxisReversals {
    fn observe(&mut self, displacement: i32) {
        let direction = displacement.signum();
        if direction == 0 {
            return;
        }
        if self.last_direction != 0 && direction != self.last_direction {
            self.changes += 1;
        }
        self.last_direction = direction;
    }
}
