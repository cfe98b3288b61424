//! Playback session implementation for PlayerView
//!
//! This module provides the PlaybackSession that drives the media engine,
//! applies the playback state machine and publishes state, duration and
//! position changes.

use crate::session::{
    EngineCallback, EngineEvent, Generation, MediaEngine, MediaSource, PlaybackState,
    PositionOrigin, SessionEvent, Trigger,
};
use crate::utils::error::{PlayerViewError, Result};
use crate::utils::observable::Observable;
use log::{debug, error, info, warn};
use std::time::Duration;

/// Wraps the media engine and owns the playback state machine
pub struct PlaybackSession {
    engine: Box<dyn MediaEngine>,

    // Observable properties
    source: Observable<Option<MediaSource>>,
    state: Observable<PlaybackState>,
    position: Observable<Duration>,
    duration: Observable<Option<Duration>>,

    /// Token of the current load; callbacks with any other token are stale
    generation: Generation,

    // Commands issued while loading, replayed once ready
    pending_seek: Option<Duration>,
    pending_play: bool,

    /// Changes not yet drained by the owner
    events: Vec<SessionEvent>,
}

impl PlaybackSession {
    /// Create an idle session around an engine
    pub fn new(engine: Box<dyn MediaEngine>) -> Self {
        Self {
            engine,
            source: Observable::new(None),
            state: Observable::new(PlaybackState::Idle),
            position: Observable::new(Duration::ZERO),
            duration: Observable::new(None),
            generation: Generation::default(),
            pending_seek: None,
            pending_play: false,
            events: Vec::new(),
        }
    }

    /// Assign a new media source and start loading it.
    ///
    /// Any in-flight load is cancelled and prior duration and position are
    /// discarded. A synchronous engine refusal lands in `Failed` like an
    /// asynchronous one; it is not returned as an error.
    pub fn set_url<S: Into<MediaSource>>(&mut self, url: S) -> Result<()> {
        let source = url.into();
        if source.as_str().trim().is_empty() {
            return Err(PlayerViewError::InvalidInput("Media URL is empty".to_string()));
        }

        info!("Loading source {}", source);
        self.reset();
        self.generation = self.generation.next();
        self.source.set(Some(source.clone()));
        self.apply(Trigger::SourceAssigned);

        if let Err(e) = self.engine.load(&source, self.generation) {
            error!("Engine refused {}: {}", source, e);
            self.apply(Trigger::EngineFailed(e.to_string()));
        }

        Ok(())
    }

    /// Drop the current source and return to `Idle`
    pub fn clear_source(&mut self) {
        if self.source.get().is_none() {
            return;
        }

        info!("Clearing source");
        self.reset();
        self.generation = self.generation.next();
        self.source.set(None);
    }

    /// Cancel outstanding work for the current source and go back to `Idle`
    fn reset(&mut self) {
        if *self.state.get() == PlaybackState::Loading {
            debug!("Cancelling load {}", self.generation);
            self.engine.cancel_load(self.generation);
        }

        self.pending_seek = None;
        self.pending_play = false;
        self.duration.set(None);
        self.position.set(Duration::ZERO);
        self.apply(Trigger::SourceCleared);
    }

    /// Start or resume playback.
    ///
    /// From `Ended` the session rewinds to zero first. While loading, the
    /// request is remembered and honoured once the source is ready.
    pub fn play(&mut self) -> Result<()> {
        match self.state.get().clone() {
            PlaybackState::Idle | PlaybackState::Failed(_) => Err(PlayerViewError::NoMedia),
            PlaybackState::Loading => {
                debug!("Play requested while loading, deferring");
                self.pending_play = true;
                Ok(())
            }
            PlaybackState::Playing => Ok(()),
            PlaybackState::Ended => {
                self.engine.seek(Duration::ZERO)?;
                self.publish_position(Duration::ZERO, PositionOrigin::Seek);
                self.engine.play()?;
                self.apply(Trigger::Play);
                Ok(())
            }
            PlaybackState::ReadyToPlay | PlaybackState::Paused => {
                self.engine.play()?;
                self.apply(Trigger::Play);
                Ok(())
            }
        }
    }

    /// Pause playback. A no-op outside `Playing`, except that it turns
    /// `ReadyToPlay` into `Paused` and cancels a deferred play.
    pub fn pause(&mut self) -> Result<()> {
        match self.state.get().clone() {
            PlaybackState::Playing => {
                self.engine.pause()?;
                self.apply(Trigger::Pause);
            }
            PlaybackState::ReadyToPlay => {
                self.apply(Trigger::Pause);
            }
            PlaybackState::Loading => {
                self.pending_play = false;
            }
            _ => {}
        }
        Ok(())
    }

    /// Writable `playing` property
    pub fn set_playing(&mut self, playing: bool) -> Result<()> {
        if playing {
            self.play()
        } else {
            self.pause()
        }
    }

    /// Toggle play/pause
    pub fn toggle_play(&mut self) -> Result<()> {
        let playing = self.is_playing() || (self.is_loading() && self.pending_play);
        self.set_playing(!playing)
    }

    /// Seek to an absolute position.
    ///
    /// Fails with `OutOfRange` past the known duration. While loading, the
    /// last requested position is queued and applied once ready.
    pub fn seek(&mut self, position: Duration) -> Result<()> {
        let state = self.state.get().clone();
        match state {
            PlaybackState::Idle | PlaybackState::Failed(_) => Err(PlayerViewError::NoMedia),
            PlaybackState::Loading => {
                debug!("Seek to {:?} queued until ready", position);
                self.pending_seek = Some(position);
                Ok(())
            }
            _ => {
                let duration = self.duration();
                if position > duration {
                    return Err(PlayerViewError::OutOfRange {
                        requested: position,
                        duration,
                    });
                }

                debug!("Seeking to {:?}", position);
                self.engine.seek(position)?;
                self.publish_position(position, PositionOrigin::Seek);

                if state == PlaybackState::Ended && position < duration {
                    self.apply(Trigger::SeekBeforeEnd);
                }
                Ok(())
            }
        }
    }

    /// Seek by a signed number of seconds, saturating at both ends
    pub fn seek_relative(&mut self, delta_secs: f64) -> Result<()> {
        if !delta_secs.is_finite() {
            return Err(PlayerViewError::InvalidInput(format!(
                "Invalid seek delta {}",
                delta_secs
            )));
        }
        if !self.state.get().has_media() {
            return Err(PlayerViewError::NoMedia);
        }

        let target = (self.position().as_secs_f64() + delta_secs)
            .clamp(0.0, self.duration().as_secs_f64());
        self.seek(Duration::from_secs_f64(target))
    }

    /// Apply an engine callback that has been marshalled onto the UI thread.
    ///
    /// Returns false if the callback was stale or did not apply in the
    /// current state.
    pub fn handle_engine(&mut self, callback: EngineCallback) -> bool {
        if callback.generation != self.generation {
            debug!(
                "Discarding stale engine callback {:?} for {} (current {})",
                callback.event, callback.generation, self.generation
            );
            return false;
        }

        match callback.event {
            EngineEvent::Ready { duration } => self.on_ready(duration),
            EngineEvent::Failed { reason } => {
                error!("Playback failed: {}", reason);
                self.pending_seek = None;
                self.pending_play = false;
                self.apply(Trigger::EngineFailed(reason))
            }
            EngineEvent::Ended => {
                if !self.is_playing() {
                    return false;
                }
                let duration = self.duration();
                self.publish_position(duration, PositionOrigin::Playback);
                self.apply(Trigger::EngineEnded)
            }
            EngineEvent::PositionTick { position } => {
                if !self.is_playing() {
                    return false;
                }
                let position = position.min(self.duration());
                self.publish_position(position, PositionOrigin::Playback);
                true
            }
        }
    }

    fn on_ready(&mut self, duration: Duration) -> bool {
        if *self.state.get() != PlaybackState::Loading {
            return false;
        }

        info!("Source ready, duration {:?}", duration);
        self.duration.set(Some(duration));
        self.apply(Trigger::EngineReady);

        if let Some(position) = self.pending_seek.take() {
            match self.seek(position) {
                Ok(()) => {}
                Err(e @ PlayerViewError::OutOfRange { .. }) => {
                    warn!("Dropping queued seek: {}", e);
                }
                Err(e) => {
                    self.apply(Trigger::EngineFailed(e.to_string()));
                    return true;
                }
            }
        }

        if std::mem::take(&mut self.pending_play) {
            if let Err(e) = self.play() {
                error!("Deferred play failed: {}", e);
                self.apply(Trigger::EngineFailed(e.to_string()));
            }
        }

        true
    }

    /// Run the state machine, publishing the change if the trigger applies
    fn apply(&mut self, trigger: Trigger) -> bool {
        let from = self.state.get().clone();
        let Some(to) = from.next(&trigger) else {
            debug!("Ignoring {:?} in state {}", trigger, from);
            return false;
        };

        if self.state.set(to.clone()) {
            info!("Playback state changed: {} -> {}", from, to);
            self.events.push(SessionEvent::StateChanged { from, to });
        }
        true
    }

    fn publish_position(&mut self, position: Duration, origin: PositionOrigin) {
        self.position.set(position);
        self.events.push(SessionEvent::PositionChanged { position, origin });
    }

    /// Drain the changes published since the last call
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> &PlaybackState {
        self.state.get()
    }

    pub fn is_playing(&self) -> bool {
        self.state.get().is_playing()
    }

    pub fn is_loading(&self) -> bool {
        *self.state.get() == PlaybackState::Loading
    }

    pub fn position(&self) -> Duration {
        *self.position.get()
    }

    /// Media duration, zero until known
    pub fn duration(&self) -> Duration {
        self.duration.get().unwrap_or_default()
    }

    pub fn known_duration(&self) -> Option<Duration> {
        *self.duration.get()
    }

    pub fn source(&self) -> Option<&MediaSource> {
        self.source.get().as_ref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The current failure as an error value
    pub fn load_error(&self) -> Option<PlayerViewError> {
        self.state
            .get()
            .failure()
            .map(|reason| PlayerViewError::LoadFailure(reason.to_string()))
    }

    pub fn state_observable(&mut self) -> &mut Observable<PlaybackState> {
        &mut self.state
    }

    pub fn position_observable(&mut self) -> &mut Observable<Duration> {
        &mut self.position
    }

    pub fn duration_observable(&mut self) -> &mut Observable<Option<Duration>> {
        &mut self.duration
    }

    pub fn source_observable(&mut self) -> &mut Observable<Option<MediaSource>> {
        &mut self.source
    }
}
