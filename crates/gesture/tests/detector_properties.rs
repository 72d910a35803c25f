use proptest::prelude::*;

use shakefind_gesture::history::HISTORY_SIZE;
use shakefind_gesture::GestureDetector;
use shakefind_pointer_model::PointerPosition;

fn step() -> impl Strategy<Value = (i32, i32, u64)> {
    (-400i32..=400, -400i32..=400, 0u64..=120)
}

proptest! {
    #[test]
    fn fewer_than_ten_samples_never_shake(steps in prop::collection::vec(step(), 0..=HISTORY_SIZE)) {
        let mut detector = GestureDetector::new();
        let mut position = PointerPosition::new(0, 0);
        let mut t = 1_000u64;
        prop_assert!(!detector.observe(position, t));

        for (i, (dx, dy, dt)) in steps.into_iter().enumerate() {
            position = PointerPosition::new(position.x + dx, position.y + dy);
            t += dt;
            let shaking = detector.observe(position, t);
            if detector.history().len() < HISTORY_SIZE {
                prop_assert!(!shaking, "step {} fired with {} samples", i, detector.history().len());
            }
        }
    }

    #[test]
    fn window_length_tracks_accepted_samples(steps in prop::collection::vec(step(), 0..40)) {
        let mut detector = GestureDetector::new();
        let mut position = PointerPosition::new(0, 0);
        let mut t = 1_000u64;
        detector.observe(position, t);

        let mut accepted = 0usize;
        for (dx, dy, dt) in steps {
            position = PointerPosition::new(position.x + dx, position.y + dy);
            t += dt;
            detector.observe(position, t);
            if dt > 0 {
                accepted += 1;
            }
            prop_assert_eq!(detector.history().len(), accepted.min(HISTORY_SIZE));
        }
    }

    #[test]
    fn slow_windows_never_shake(amplitude in 1i32..2_000, dt in 51u64..200) {
        // Ten samples of more than 50 ms always exceed the 500 ms window.
        let mut detector = GestureDetector::new();
        let mut t = 0u64;
        let mut x = 0i32;
        detector.observe(PointerPosition::new(x, 0), t);
        for i in 0..HISTORY_SIZE * 2 {
            x += if i % 2 == 0 { amplitude } else { -amplitude };
            t += dt;
            prop_assert!(!detector.observe(PointerPosition::new(x, 0), t));
        }
    }
}
