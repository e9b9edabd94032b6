//! Click timing humanization
//!
//! Provides the delay model the click loop uses between clicks:
//! - A fixed base delay derived from the target click rate
//! - Uniform random variance around it, scaled by the jitter percentage
//! - An absolute floor so no delay collapses to zero

pub mod delay;

pub use delay::*;
