//! ShakeFind Enlargement Controller
//!
//! Couples the shake detector with a cursor host: a detected shake installs
//! the enlarged pointer, and a periodic tick puts the original back once the
//! dwell time has passed.
//!
//! The controller is a plain owned value. The event-dispatch layer feeds it
//! samples and ticks one at a time and calls [`EnlargementController::shutdown`]
//! on the way out.

pub mod controller;

pub use controller::{EnlargementController, EnlargementState, DWELL_MS, ENLARGE_FACTOR};
