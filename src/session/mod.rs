//! Playback session module for PlayerView
//!
//! The session wraps the opaque media engine. It owns the current source,
//! duration and position, forwards play/pause/seek commands, and runs the
//! playback state machine. Engine callbacks carry the [`Generation`] of the
//! load they belong to so that callbacks for a superseded source are
//! discarded.

mod controller;
mod state;

pub use controller::PlaybackSession;
pub use state::{PlaybackState, Trigger};

use crate::utils::error::Result;
use std::fmt;
use std::time::Duration;

/// Opaque media resource identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaSource(String);

impl MediaSource {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaSource {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for MediaSource {
    fn from(url: String) -> Self {
        Self(url)
    }
}

/// Monotonically increasing load token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Asynchronous notifications from the media engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Source opened, duration known
    Ready { duration: Duration },

    /// Source could not be opened or decoded
    Failed { reason: String },

    /// End of media reached
    Ended,

    /// Periodic position report while playing
    PositionTick { position: Duration },
}

/// Engine event tagged with the load generation it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct EngineCallback {
    pub generation: Generation,
    pub event: EngineEvent,
}

impl EngineCallback {
    pub fn new(generation: Generation, event: EngineEvent) -> Self {
        Self { generation, event }
    }
}

/// Media engine capability consumed by the session
///
/// Commands are issued on the UI thread. Results of `load` and the playback
/// clock come back asynchronously as [`EngineCallback`]s tagged with the
/// generation passed to `load`, and must be marshalled onto the UI thread
/// before reaching [`PlaybackSession::handle_engine`].
pub trait MediaEngine {
    /// Start opening `source`; callbacks for it carry `generation`
    fn load(&mut self, source: &MediaSource, generation: Generation) -> Result<()>;

    /// Abandon an in-flight load
    fn cancel_load(&mut self, generation: Generation) {
        let _ = generation;
    }

    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    fn seek(&mut self, position: Duration) -> Result<()>;
}

/// Where a position change came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionOrigin {
    /// Engine clock tick during playback
    Playback,

    /// A seek command (including the implicit rewind when replaying)
    Seek,
}

/// Changes published by the session to its owner
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StateChanged {
        from: PlaybackState,
        to: PlaybackState,
    },
    PositionChanged {
        position: Duration,
        origin: PositionOrigin,
    },
}
