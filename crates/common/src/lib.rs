//! ShakeFind Common Utilities
//!
//! Shared infrastructure for all ShakeFind crates:
//! - Error types and result aliases
//! - Monotonic clock and tick pacing
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
