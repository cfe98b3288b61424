//! Media engine implementations for PlayerView
//!
//! Real decoding lives outside this crate behind [`crate::session::MediaEngine`].
//! The simulated engine stands in for it in the demo binary and in tests
//! that need genuinely asynchronous callbacks.

mod simulated;

pub use simulated::{SimulatedEngine, DEFAULT_LOAD_LATENCY, DEFAULT_TICK_INTERVAL};
