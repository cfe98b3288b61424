//! Utility module for PlayerView
//!
//! This module provides common utilities used throughout the crate:
//! - Error handling with custom error types
//! - Configuration management
//! - Property observation
//! - Common helper functions

pub mod config;
pub mod error;
pub mod observable;

// Re-export commonly used items
pub use config::{Config, FullscreenConfig, OverlayConfig, PlaybackConfig, ScrubberConfig};
pub use error::{PlayerViewError, Result};
pub use observable::{Observable, Signal, Subscription};

/// Format a duration for display
///
/// # Returns
///
/// Formatted string in the format "HH:MM:SS" or "MM:SS" for durations under an hour
pub fn format_duration(duration: std::time::Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
