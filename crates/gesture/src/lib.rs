//! ShakeFind Gesture Detection
//!
//! Classifies a rapid, direction-reversing pointer shake:
//! - **Motion History:** Bounded FIFO of the most recent motion samples
//! - **Shake Metrics:** Direction changes, average speed and window span
//! - **Gesture Detector:** Turns absolute positions into samples and applies
//!   the shake predicate
//!
//! This crate is pure computation. It knows nothing about whether the
//! pointer is currently enlarged.

pub mod detector;
pub mod history;

pub use detector::GestureDetector;
pub use history::{MotionHistory, ShakeMetrics};
