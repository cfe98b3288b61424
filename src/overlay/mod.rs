//! Controls overlay visibility for PlayerView
//!
//! The overlay is visible whenever playback is not running. While playing,
//! it hides after a period without interaction; any interaction brings it
//! back and restarts the full idle window.

mod timer;

pub use timer::IdleTimer;

use crate::utils::config::OverlayConfig;
use crate::utils::observable::Observable;
use log::debug;
use std::time::Duration;
use tokio::time::Instant;

/// Overlay visibility state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    pub fn from_visible(visible: bool) -> Self {
        if visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Visibility::Visible)
    }
}

/// Show/hide request for the rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayTransition {
    pub visible: bool,
    pub animated: bool,

    /// Zero when not animated
    pub duration: Duration,
}

/// Owns the overlay visibility and its idle-hide timer
#[derive(Debug)]
pub struct OverlayController {
    visibility: Observable<Visibility>,
    timer: IdleTimer,
    idle_duration: Duration,
    fade: Duration,
    animate_show: bool,

    /// Mirror of the session state, fed by `on_session_state`
    session_playing: bool,

    /// A gesture is in progress, so the controls must not hide
    held: bool,
}

impl OverlayController {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            visibility: Observable::new(Visibility::Visible),
            timer: IdleTimer::new(),
            idle_duration: config.idle_hide(),
            fade: config.fade(),
            animate_show: config.animate_show,
            session_playing: false,
            held: false,
        }
    }

    pub fn controls_visible(&self) -> bool {
        self.visibility.get().is_visible()
    }

    pub fn visibility(&self) -> Visibility {
        *self.visibility.get()
    }

    pub fn idle_duration(&self) -> Duration {
        self.idle_duration
    }

    pub fn set_idle_duration(&mut self, idle: Duration, now: Instant) {
        self.idle_duration = idle;
        self.rearm(now);
    }

    /// When the idle timer will next fire
    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    /// A touch, key or transport command happened
    pub fn on_interaction(&mut self, now: Instant) -> Option<OverlayTransition> {
        let transition = if self.controls_visible() {
            None
        } else {
            self.change_visibility(true, self.animate_show)
        };
        self.rearm(now);
        transition
    }

    /// The session entered or left `Playing`.
    ///
    /// Leaving playback reveals hidden controls, since paused, loading and
    /// ended states always show them.
    pub fn on_session_state(&mut self, playing: bool, now: Instant) -> Option<OverlayTransition> {
        self.session_playing = playing;

        let transition = if !playing && !self.controls_visible() {
            self.change_visibility(true, self.animate_show)
        } else {
            None
        };
        self.rearm(now);
        transition
    }

    /// Suspend the idle timer while a gesture holds the controls. Releasing
    /// restarts the full idle window.
    pub fn set_held(&mut self, held: bool, now: Instant) {
        if self.held == held {
            return;
        }
        self.held = held;
        self.rearm(now);
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Explicit override of the visibility
    pub fn set_controls_visible(
        &mut self,
        visible: bool,
        animated: bool,
        now: Instant,
    ) -> Option<OverlayTransition> {
        let transition = self.change_visibility(visible, animated);
        self.rearm(now);
        transition
    }

    /// Hide the overlay if the idle timer has fired
    pub fn poll(&mut self, now: Instant) -> Option<OverlayTransition> {
        if !self.timer.fire_if_due(now) {
            return None;
        }
        if !(self.session_playing && self.controls_visible()) {
            return None;
        }

        debug!("Overlay idle for {:?}, hiding", self.idle_duration);
        self.change_visibility(false, true)
    }

    fn change_visibility(&mut self, visible: bool, animated: bool) -> Option<OverlayTransition> {
        if !self.visibility.set(Visibility::from_visible(visible)) {
            return None;
        }

        Some(OverlayTransition {
            visible,
            animated,
            duration: if animated { self.fade } else { Duration::ZERO },
        })
    }

    /// The timer runs only while visible during playback and not held; every
    /// call restarts the full window
    fn rearm(&mut self, now: Instant) {
        if self.session_playing && self.controls_visible() && !self.held {
            self.timer.arm(now, self.idle_duration);
        } else {
            self.timer.disarm();
        }
    }

    pub fn visibility_observable(&mut self) -> &mut Observable<Visibility> {
        &mut self.visibility
    }
}
