//! Playback state machine
//!
//! [`PlaybackState::next`] is the complete transition table of a playback
//! session. The session applies side effects (engine commands, position
//! bookkeeping) around it but never changes state any other way.

use std::fmt;

/// Playback state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No media source assigned
    #[default]
    Idle,

    /// Source handed to the engine, waiting for it to become ready
    Loading,

    /// Duration known, playback not started
    ReadyToPlay,

    /// Currently playing
    Playing,

    /// Playback paused
    Paused,

    /// End of media reached
    Ended,

    /// The engine reported a failure; terminal until a new source is set
    Failed(String),
}

/// Inputs that drive the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A new source was assigned (after the reset to `Idle`)
    SourceAssigned,

    /// The source was cleared
    SourceCleared,

    /// Engine finished loading
    EngineReady,

    /// Engine reported a failure
    EngineFailed(String),

    /// Engine reached the end of the media
    EngineEnded,

    Play,
    Pause,

    /// Seek to a position strictly before the end
    SeekBeforeEnd,
}

impl PlaybackState {
    /// State reached from `self` on `trigger`, or `None` if the trigger
    /// does not apply in this state.
    pub fn next(&self, trigger: &Trigger) -> Option<PlaybackState> {
        use PlaybackState::*;

        match (self, trigger) {
            (_, Trigger::SourceCleared) => Some(Idle),
            (Idle, Trigger::SourceAssigned) => Some(Loading),

            (Loading, Trigger::EngineReady) => Some(ReadyToPlay),

            (Idle, Trigger::EngineFailed(_)) => None,
            (_, Trigger::EngineFailed(reason)) => Some(Failed(reason.clone())),

            (ReadyToPlay | Paused | Ended, Trigger::Play) => Some(Playing),
            (ReadyToPlay | Playing, Trigger::Pause) => Some(Paused),

            (Playing, Trigger::EngineEnded) => Some(Ended),
            (Ended, Trigger::SeekBeforeEnd) => Some(Paused),

            _ => None,
        }
    }

    /// Whether a media source is loaded and its duration known
    pub fn has_media(&self) -> bool {
        matches!(
            self,
            PlaybackState::ReadyToPlay
                | PlaybackState::Playing
                | PlaybackState::Paused
                | PlaybackState::Ended
        )
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PlaybackState::Failed(_))
    }

    /// Failure reason, if any
    pub fn failure(&self) -> Option<&str> {
        match self {
            PlaybackState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Loading => write!(f, "loading"),
            PlaybackState::ReadyToPlay => write!(f, "ready"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
            PlaybackState::Ended => write!(f, "ended"),
            PlaybackState::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}
