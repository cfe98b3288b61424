//! Playback view for PlayerView
//!
//! The view owns the session, scrubber, overlay and fullscreen controllers
//! and reconciles them on the UI thread. The scrubber follows the session
//! position only while the user is not dragging; during a drag, position
//! updates are discarded and scrubber changes become seeks instead.

mod input;
mod surface;

pub use input::{Key, Rect, Touch, TouchPhase, TransportCommand};
pub use surface::{LogSurface, RenderSurface};

use crate::fullscreen::{FullscreenController, HostChrome};
use crate::overlay::{OverlayController, OverlayTransition, Visibility};
use crate::scrubber::{Color, Scrubber, ScrubberStyle};
use crate::session::{
    EngineCallback, MediaEngine, MediaSource, PlaybackSession, PlaybackState, SessionEvent,
};
use crate::utils::config::Config;
use crate::utils::error::Result;
use crate::utils::observable::Observable;
use crate::utils::{clamp, format_duration};
use log::{debug, warn};
use std::time::Duration;
use tokio::time::Instant;

/// Embeddable playback control surface
pub struct PlaybackView {
    session: PlaybackSession,
    scrubber: Scrubber,
    overlay: OverlayController,
    fullscreen: FullscreenController,

    // Host collaborators
    chrome: Box<dyn HostChrome>,
    surface: Box<dyn RenderSurface>,

    /// Where the scrubber sits in view coordinates
    scrubber_frame: Rect,

    auto_play: bool,
    seek_step: Duration,
    seek_debounce: Duration,

    // Continuous-drag seek debouncing
    last_drag_seek: Option<Instant>,
    pending_drag_seek: Option<f32>,
}

impl PlaybackView {
    /// Build a view around its collaborators
    ///
    /// # Arguments
    ///
    /// * `engine` - Media engine driven by the session
    /// * `chrome` - Host window chrome for fullscreen
    /// * `surface` - Presentation surface
    /// * `config` - View configuration
    pub fn new(
        engine: Box<dyn MediaEngine>,
        chrome: Box<dyn HostChrome>,
        surface: Box<dyn RenderSurface>,
        config: &Config,
    ) -> Result<Self> {
        let mut scrubber = Scrubber::new();
        scrubber.set_continuous(config.scrubber.continuous);
        scrubber.set_style(ScrubberStyle {
            stroke_color: Color::from_hex(&config.scrubber.stroke_color)?,
            fill_color: Color::from_hex(&config.scrubber.fill_color)?,
        });

        let mut view = Self {
            session: PlaybackSession::new(engine),
            scrubber,
            overlay: OverlayController::new(&config.overlay),
            fullscreen: FullscreenController::new(&config.fullscreen),
            chrome,
            surface,
            scrubber_frame: Rect::default(),
            auto_play: config.playback.auto_play,
            seek_step: Duration::from_secs(config.playback.seek_step_secs),
            seek_debounce: config.scrubber.seek_debounce(),
            last_drag_seek: None,
            pending_drag_seek: None,
        };

        if config.fullscreen.start_fullscreen {
            view.set_fullscreen(true)?;
        }

        Ok(view)
    }

    // Transport

    pub fn set_url<S: Into<MediaSource>>(&mut self, url: S) -> Result<()> {
        self.abandon_drag();
        let mut result = self.session.set_url(url);
        if result.is_ok() && self.auto_play && self.session.is_loading() {
            result = self.session.play();
        }
        self.sync_session(Instant::now());
        result
    }

    pub fn clear_source(&mut self) {
        self.abandon_drag();
        self.session.clear_source();
        self.sync_session(Instant::now());
    }

    pub fn play(&mut self) -> Result<()> {
        let result = self.session.play();
        self.sync_session(Instant::now());
        result
    }

    pub fn pause(&mut self) -> Result<()> {
        let result = self.session.pause();
        self.sync_session(Instant::now());
        result
    }

    pub fn set_playing(&mut self, playing: bool) -> Result<()> {
        let result = self.session.set_playing(playing);
        self.sync_session(Instant::now());
        result
    }

    pub fn toggle_play(&mut self) -> Result<()> {
        let result = self.session.toggle_play();
        self.sync_session(Instant::now());
        result
    }

    pub fn seek(&mut self, position: Duration) -> Result<()> {
        let result = self.session.seek(position);
        self.sync_session(Instant::now());
        result
    }

    pub fn seek_relative(&mut self, delta_secs: f64) -> Result<()> {
        let result = self.session.seek_relative(delta_secs);
        self.sync_session(Instant::now());
        result
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_playing()
    }

    /// Media duration, zero until known
    pub fn duration(&self) -> Duration {
        self.session.duration()
    }

    pub fn state(&self) -> &PlaybackState {
        self.session.state()
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    // Overlay

    pub fn controls_visible(&self) -> bool {
        self.overlay.controls_visible()
    }

    pub fn set_controls_visible(&mut self, visible: bool, animated: bool) {
        let transition = self.overlay.set_controls_visible(visible, animated, Instant::now());
        self.present(transition);
    }

    /// Plain property write, never animated
    pub fn set_controls_visible_flag(&mut self, visible: bool) {
        self.set_controls_visible(visible, false);
    }

    // Fullscreen

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_fullscreen()
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()> {
        self.fullscreen.set_fullscreen(fullscreen, self.chrome.as_mut())?;
        Ok(())
    }

    pub fn set_status_bar_override(&mut self, hidden: Option<bool>) -> Result<()> {
        self.fullscreen.set_status_bar_override(hidden, self.chrome.as_mut())
    }

    // Scrubber

    pub fn scrubber(&self) -> &Scrubber {
        &self.scrubber
    }

    /// Scrubber access for subscriptions and styling
    pub fn scrubber_mut(&mut self) -> &mut Scrubber {
        &mut self.scrubber
    }

    pub fn set_scrubber_frame(&mut self, frame: Rect) {
        self.scrubber_frame = frame;
        self.scrubber.set_track(frame.track());
        self.draw();
    }

    pub fn set_continuous(&mut self, continuous: bool) {
        self.scrubber.set_continuous(continuous);
        self.pending_drag_seek = None;
    }

    /// Time shown next to the scrubber, following the drag while one is active
    pub fn displayed_position(&self) -> Duration {
        if self.scrubber.is_dragging() {
            Duration::from_secs_f64(self.scrubber.value().max(0.0) as f64)
        } else {
            self.session.position()
        }
    }

    pub fn elapsed_label(&self) -> String {
        format_duration(self.displayed_position())
    }

    pub fn remaining_label(&self) -> String {
        let remaining = self.duration().saturating_sub(self.displayed_position());
        format!("-{}", format_duration(remaining))
    }

    // Input

    /// Route a touch. Every touch counts as an interaction; one that begins
    /// on the scrubber while the controls are showing starts a drag.
    pub fn handle_touch(&mut self, touch: Touch) -> Result<()> {
        let now = Instant::now();
        let was_visible = self.overlay.controls_visible();
        let transition = self.overlay.on_interaction(now);
        self.present(transition);

        let result = match touch.phase {
            TouchPhase::Began => {
                if was_visible && self.can_drag() && self.scrubber_frame.contains(touch.x, touch.y) {
                    self.scrubber.begin_drag(touch.x);
                    debug!("Scrubber drag started at {:.2}", self.scrubber.value());
                }
                Ok(())
            }
            TouchPhase::Moved => match self.scrubber.drag_to(touch.x) {
                Some(change) => self.drag_seek(change.value, now),
                None => Ok(()),
            },
            TouchPhase::Ended => {
                if self.scrubber.is_dragging() {
                    self.finish_drag(touch.x)
                } else {
                    Ok(())
                }
            }
            TouchPhase::Cancelled => {
                self.abandon_drag();
                Ok(())
            }
        };

        self.overlay.set_held(self.scrubber.is_dragging(), now);
        self.sync_session(now);
        result
    }

    pub fn handle_key(&mut self, key: Key) -> Result<()> {
        let transition = self.overlay.on_interaction(Instant::now());
        self.present(transition);

        match key {
            Key::Space => self.toggle_play(),
            Key::F => {
                let target = !self.is_fullscreen();
                self.set_fullscreen(target)
            }
            Key::Escape if self.is_fullscreen() => self.set_fullscreen(false),
            Key::Left => self.seek_relative(-self.seek_step.as_secs_f64()),
            Key::Right => self.seek_relative(self.seek_step.as_secs_f64()),
            _ => Ok(()),
        }
    }

    pub fn handle_command(&mut self, command: TransportCommand) -> Result<()> {
        // Applied as requested, without the interaction reveal first
        if let TransportCommand::SetControlsVisible { visible, animated } = command {
            self.set_controls_visible(visible, animated);
            return Ok(());
        }

        let transition = self.overlay.on_interaction(Instant::now());
        self.present(transition);

        match command {
            TransportCommand::Play => self.play(),
            TransportCommand::Pause => self.pause(),
            TransportCommand::TogglePlay => self.toggle_play(),
            TransportCommand::Seek(position) => self.seek(position),
            TransportCommand::SeekRelative(delta) => self.seek_relative(delta),
            TransportCommand::SetFullscreen(fullscreen) => self.set_fullscreen(fullscreen),
            TransportCommand::ToggleFullscreen => {
                let target = !self.is_fullscreen();
                self.set_fullscreen(target)
            }
            TransportCommand::SetControlsVisible { .. } => Ok(()),
        }
    }

    /// Apply an engine callback already marshalled onto the UI thread
    pub fn handle_engine(&mut self, callback: EngineCallback) -> bool {
        let applied = self.session.handle_engine(callback);
        self.sync_session(Instant::now());
        applied
    }

    // Timers

    /// Earliest instant at which `poll_timers` has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        let drag_deadline = self.drag_seek_deadline();
        match (self.overlay.deadline(), drag_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Flush a debounced drag seek and run the idle timer
    pub fn poll_timers(&mut self) {
        let now = Instant::now();

        if let (Some(deadline), Some(value)) = (self.drag_seek_deadline(), self.pending_drag_seek) {
            if now >= deadline {
                self.pending_drag_seek = None;
                self.last_drag_seek = Some(now);
                if let Err(e) = seek_to_value(&mut self.session, value) {
                    warn!("Debounced drag seek failed: {}", e);
                }
            }
        }

        let transition = self.overlay.poll(now);
        self.present(transition);
        self.sync_session(now);
    }

    // Observable properties

    pub fn state_observable(&mut self) -> &mut Observable<PlaybackState> {
        self.session.state_observable()
    }

    pub fn position_observable(&mut self) -> &mut Observable<Duration> {
        self.session.position_observable()
    }

    pub fn duration_observable(&mut self) -> &mut Observable<Option<Duration>> {
        self.session.duration_observable()
    }

    pub fn source_observable(&mut self) -> &mut Observable<Option<MediaSource>> {
        self.session.source_observable()
    }

    pub fn controls_visible_observable(&mut self) -> &mut Observable<Visibility> {
        self.overlay.visibility_observable()
    }

    pub fn fullscreen_observable(&mut self) -> &mut Observable<bool> {
        self.fullscreen.fullscreen_observable()
    }

    // Reconciliation

    /// Route drained session events to the scrubber and overlay
    fn sync_session(&mut self, now: Instant) {
        for event in self.session.take_events() {
            match event {
                SessionEvent::StateChanged { to, .. } => {
                    match &to {
                        PlaybackState::ReadyToPlay => self.reset_scrubber_range(),
                        PlaybackState::Idle | PlaybackState::Failed(_) => self.abandon_drag(),
                        _ => {}
                    }
                    let transition = self.overlay.on_session_state(to.is_playing(), now);
                    self.present(transition);
                }
                SessionEvent::PositionChanged { position, .. } => {
                    if self.scrubber.is_dragging() {
                        debug!("Discarding position {:?} during drag", position);
                    } else {
                        self.scrubber.set_value(position.as_secs_f32());
                    }
                }
            }
        }
        self.draw();
    }

    fn reset_scrubber_range(&mut self) {
        let duration = self.session.duration().as_secs_f32();
        let max = if duration > 0.0 {
            duration
        } else {
            debug!("Zero-length media, scrubber falls back to [0, 1]");
            1.0
        };
        if let Err(e) = self.scrubber.set_range(0.0, max) {
            warn!("Keeping scrubber range: {}", e);
        }
        self.scrubber.set_value(self.session.position().as_secs_f32());
    }

    fn can_drag(&self) -> bool {
        matches!(self.session.known_duration(), Some(d) if !d.is_zero())
            && self.session.state().has_media()
    }

    /// Seek for an intermediate drag value, at most once per debounce window
    fn drag_seek(&mut self, value: f32, now: Instant) -> Result<()> {
        let due = match self.last_drag_seek {
            Some(last) => now >= last + self.seek_debounce,
            None => true,
        };

        if !due {
            debug!("Debouncing drag seek to {:.2}s", value);
            self.pending_drag_seek = Some(value);
            return Ok(());
        }

        self.pending_drag_seek = None;
        self.last_drag_seek = Some(now);
        seek_to_value(&mut self.session, value)
    }

    fn drag_seek_deadline(&self) -> Option<Instant> {
        self.pending_drag_seek?;
        self.last_drag_seek.map(|last| last + self.seek_debounce)
    }

    /// End the drag, seeking to the final value before the drag is released
    fn finish_drag(&mut self, x: f32) -> Result<()> {
        self.pending_drag_seek = None;
        self.last_drag_seek = None;

        let session = &mut self.session;
        let mut outcome = Ok(());
        self.scrubber.end_drag_with(x, |change| {
            outcome = seek_to_value(session, change.value);
        });
        outcome
    }

    fn abandon_drag(&mut self) {
        self.pending_drag_seek = None;
        self.last_drag_seek = None;
        self.overlay.set_held(false, Instant::now());
        if self.scrubber.cancel_drag() {
            debug!("Scrubber drag cancelled");
            self.scrubber.set_value(self.session.position().as_secs_f32());
        }
    }

    fn present(&mut self, transition: Option<OverlayTransition>) {
        if let Some(transition) = transition {
            self.surface.transition_overlay(&transition);
        }
    }

    fn draw(&mut self) {
        let frame = self.scrubber.frame();
        self.surface.draw_scrubber(&frame);
    }
}

fn seek_to_value(session: &mut PlaybackSession, value: f32) -> Result<()> {
    let target = clamp(value as f64, 0.0, session.duration().as_secs_f64());
    session.seek(Duration::from_secs_f64(target))
}
