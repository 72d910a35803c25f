//! Shake detection over absolute pointer positions.

use shakefind_pointer_model::{PointerPosition, Sample, TimestampMs};

use crate::history::{MotionHistory, ShakeMetrics, HISTORY_SIZE};

/// The window must span at most this many milliseconds.
pub const MAX_WINDOW_MS: u64 = 500;

/// Minimum sign reversals across both axes.
pub const MIN_DIRECTION_CHANGES: u32 = 5;

/// Minimum average speed over the window (px/s).
pub const MIN_SPEED_PX_PER_SEC: f64 = 800.0;

impl ShakeMetrics {
    /// Whether the metrics describe a shake.
    pub fn is_shake(&self) -> bool {
        self.total_time_ms <= MAX_WINDOW_MS
            && self.direction_changes >= MIN_DIRECTION_CHANGES
            && self.avg_speed_px_per_sec >= MIN_SPEED_PX_PER_SEC
    }
}

/// Sliding-window shake classifier.
///
/// Feed it one absolute observation at a time. The window keeps sliding
/// after a positive result, so a continuing shake reports `true` repeatedly.
#[derive(Debug, Clone, Default)]
pub struct GestureDetector {
    history: MotionHistory,
    last: Option<(PointerPosition, TimestampMs)>,
    last_metrics: Option<ShakeMetrics>,
}

impl GestureDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one observation and report whether the window is a shake.
    ///
    /// The first observation only seeds the reference point. Observations
    /// whose timestamp does not advance past the previous one are ignored
    /// entirely.
    pub fn observe(&mut self, position: PointerPosition, timestamp_ms: TimestampMs) -> bool {
        let Some((last_position, last_ms)) = self.last else {
            self.last = Some((position, timestamp_ms));
            return false;
        };

        if timestamp_ms <= last_ms {
            return false;
        }

        let (dx, dy) = position.delta_from(last_position);
        self.history.push(Sample::new(dx, dy, timestamp_ms - last_ms));
        self.last = Some((position, timestamp_ms));

        if self.history.len() < HISTORY_SIZE {
            return false;
        }

        let metrics = self.history.metrics();
        self.last_metrics = metrics;
        metrics.is_some_and(|m| m.is_shake())
    }

    /// The motion window.
    pub fn history(&self) -> &MotionHistory {
        &self.history
    }

    /// Metrics from the most recent full-window evaluation.
    pub fn last_metrics(&self) -> Option<ShakeMetrics> {
        self.last_metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed `(dx, dy, dt)` steps after a seed observation at the origin.
    /// Returns the result of every step.
    fn feed(detector: &mut GestureDetector, steps: &[(i32, i32, u64)]) -> Vec<bool> {
        let mut position = PointerPosition::new(1000, 1000);
        let mut t = 10_000;
        detector.observe(position, t);
        steps
            .iter()
            .map(|&(dx, dy, dt)| {
                position = PointerPosition::new(position.x + dx, position.y + dy);
                t += dt;
                detector.observe(position, t)
            })
            .collect()
    }

    fn alternating(count: usize, amplitude: i32, dt: u64) -> Vec<(i32, i32, u64)> {
        (0..count)
            .map(|i| {
                let dx = if i % 2 == 0 { amplitude } else { -amplitude };
                (dx, 0, dt)
            })
            .collect()
    }

    #[test]
    fn first_observation_only_seeds() {
        let mut detector = GestureDetector::new();
        assert!(!detector.observe(PointerPosition::new(5, 5), 100));
        assert!(detector.history().is_empty());
    }

    #[test]
    fn fast_alternating_shake_fires_on_tenth_sample() {
        let mut detector = GestureDetector::new();
        let results = feed(&mut detector, &alternating(10, 50, 40));

        assert!(results[..9].iter().all(|r| !r));
        assert!(results[9]);

        let metrics = detector.last_metrics().unwrap();
        assert_eq!(metrics.direction_changes, 9);
        assert_eq!(metrics.total_time_ms, 400);
        assert!((metrics.avg_speed_px_per_sec - 1250.0).abs() < 1e-9);
    }

    #[test]
    fn slow_window_is_rejected_regardless_of_speed() {
        let mut detector = GestureDetector::new();
        let results = feed(&mut detector, &[(5, 0, 100); 10]);
        assert!(results.iter().all(|r| !r));
        assert_eq!(detector.last_metrics().unwrap().total_time_ms, 1000);
    }

    #[test]
    fn window_just_over_limit_is_rejected() {
        let mut steps = alternating(10, 200, 50);
        steps[9].2 = 51; // 501 ms total
        let mut detector = GestureDetector::new();
        let results = feed(&mut detector, &steps);
        assert!(!results[9]);
        assert_eq!(detector.last_metrics().unwrap().total_time_ms, 501);
    }

    #[test]
    fn window_exactly_at_limit_is_accepted() {
        let mut detector = GestureDetector::new();
        let results = feed(&mut detector, &alternating(10, 200, 50));
        assert!(results[9]);
    }

    #[test]
    fn stationary_pointer_never_shakes() {
        let mut detector = GestureDetector::new();
        let results = feed(&mut detector, &[(0, 0, 10); 20]);
        assert!(results.iter().all(|r| !r));
        let metrics = detector.last_metrics().unwrap();
        assert_eq!(metrics.direction_changes, 0);
        assert_eq!(metrics.avg_speed_px_per_sec, 0.0);
    }

    #[test]
    fn too_few_reversals_is_rejected() {
        // Fast straight line with a single reversal.
        let mut steps = vec![(100, 0, 20); 9];
        steps.push((-100, 0, 20));
        let mut detector = GestureDetector::new();
        let results = feed(&mut detector, &steps);
        assert!(!results[9]);
        assert_eq!(detector.last_metrics().unwrap().direction_changes, 1);
    }

    #[test]
    fn slow_wiggle_is_rejected() {
        // 10 px every 40 ms = 250 px/s.
        let mut detector = GestureDetector::new();
        let results = feed(&mut detector, &alternating(10, 10, 40));
        assert!(!results[9]);
    }

    #[test]
    fn duplicate_timestamp_does_not_touch_history() {
        let mut detector = GestureDetector::new();
        detector.observe(PointerPosition::new(0, 0), 100);
        detector.observe(PointerPosition::new(10, 0), 120);
        assert_eq!(detector.history().len(), 1);

        assert!(!detector.observe(PointerPosition::new(500, 0), 120));
        assert!(!detector.observe(PointerPosition::new(500, 0), 90));
        assert_eq!(detector.history().len(), 1);

        // Reference point is still (10, 0) @ 120.
        detector.observe(PointerPosition::new(15, 0), 130);
        let last = detector.history().iter().last().copied().unwrap();
        assert_eq!(last, Sample::new(5, 0, 10));
    }

    #[test]
    fn continuing_shake_keeps_reporting_true() {
        let mut detector = GestureDetector::new();
        let results = feed(&mut detector, &alternating(14, 50, 40));
        assert!(results[9..].iter().all(|r| *r));
        assert_eq!(detector.history().len(), HISTORY_SIZE);
    }

    #[test]
    fn zero_samples_inside_shake_do_not_break_reversal_chain() {
        // +90, 0, -90, 0, ... keeps reversing on x despite pauses.
        let steps: Vec<(i32, i32, u64)> = (0..10)
            .map(|i| match i % 4 {
                0 => (90, 0, 30),
                2 => (-90, 0, 30),
                _ => (0, 0, 30),
            })
            .collect();
        let mut detector = GestureDetector::new();
        let results = feed(&mut detector, &steps);
        let metrics = detector.last_metrics().unwrap();
        assert_eq!(metrics.direction_changes, 4);
        assert!(!results[9]);
    }
}
