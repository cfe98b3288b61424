//! Error types for PlayerView
//!
//! This module defines the error type shared by every component of the
//! playback view. We use thiserror for the library error type and anyhow
//! for application-level error handling in the binary.

use std::time::Duration;
use thiserror::Error;

/// Main error type for PlayerView
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerViewError {
    /// Scrubber bounds misconfigured
    #[error("Invalid range: minimum {min} must be below maximum {max}")]
    InvalidRange { min: f32, max: f32 },

    /// Seek target outside the known duration
    #[error("Seek target {requested:?} is outside 0..={duration:?}")]
    OutOfRange { requested: Duration, duration: Duration },

    /// The media engine could not open or decode the source
    #[error("Load failure: {0}")]
    LoadFailure(String),

    /// Command requires a loaded media source
    #[error("No media loaded")]
    NoMedia,

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Media engine command failed
    #[error("Engine error: {0}")]
    Engine(String),

    /// Host chrome (status bar / layout) request failed
    #[error("Host chrome error: {0}")]
    Chrome(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File error: {0}")]
    FileIO(String),

    /// Generic error for unexpected situations
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for PlayerViewError {
    fn from(err: std::io::Error) -> Self {
        PlayerViewError::FileIO(err.to_string())
    }
}

impl PlayerViewError {
    /// Create an engine error from string
    pub fn engine_error<S: Into<String>>(msg: S) -> Self {
        PlayerViewError::Engine(msg.into())
    }

    /// Whether this error is a caller mistake rather than a collaborator failure
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            PlayerViewError::InvalidRange { .. }
                | PlayerViewError::OutOfRange { .. }
                | PlayerViewError::NoMedia
                | PlayerViewError::InvalidInput(_)
        )
    }
}

/// Convenience type alias for Results in PlayerView
pub type Result<T> = std::result::Result<T, PlayerViewError>;

/// Extension trait for converting other errors to PlayerViewError
pub trait IntoPlayerError<T> {
    /// Convert this error into a PlayerViewError with the given context
    fn config_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> IntoPlayerError<T> for std::result::Result<T, E> {
    fn config_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerViewError::Config(format!("{}: {}", context, e)))
    }
}

/// Helper macro for creating internal errors with file and line information
#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::utils::error::PlayerViewError::Internal(
            format!("{} at {}:{}", $msg, file!(), line!())
        )
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::utils::error::PlayerViewError::Internal(
            format!("{} at {}:{}", format!($fmt, $($arg)*), file!(), line!())
        )
    };
}
