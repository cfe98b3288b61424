//! Scrubber control for PlayerView
//!
//! A draggable, continuously valued control rendering a filled track. The
//! scrubber owns no playback knowledge: it only keeps its value inside
//! `[minimum_value, maximum_value]`, tracks the drag lifecycle, and tells
//! its owner when the value changed and who changed it.

mod style;

pub use style::{Color, ScrubberFrame, ScrubberStyle, Track};

use crate::utils::error::{PlayerViewError, Result};
use crate::utils::observable::{Observable, Signal};
use log::debug;

/// Who caused a value change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrigin {
    /// Written through `set_value` or a range change
    Programmatic,

    /// Produced by a drag
    User,
}

/// Value-changed control event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueChanged {
    pub value: f32,
    pub origin: ValueOrigin,

    /// Set on the notification emitted by drag end
    pub is_final: bool,
}

impl ValueChanged {
    pub fn is_user(&self) -> bool {
        self.origin == ValueOrigin::User
    }
}

/// Scrubber control state
#[derive(Debug)]
pub struct Scrubber {
    value: Observable<f32>,
    minimum_value: Observable<f32>,
    maximum_value: Observable<f32>,
    continuous: Observable<bool>,
    dragging: Observable<bool>,
    value_changed: Signal<ValueChanged>,

    track: Track,
    style: ScrubberStyle,

    /// Value before the current drag, restored on cancel
    drag_start_value: Option<f32>,
}

impl Default for Scrubber {
    fn default() -> Self {
        Self::new()
    }
}

impl Scrubber {
    /// Create a scrubber with range `[0, 1]`, value 0 and continuous updates
    pub fn new() -> Self {
        Self {
            value: Observable::new(0.0),
            minimum_value: Observable::new(0.0),
            maximum_value: Observable::new(1.0),
            continuous: Observable::new(true),
            dragging: Observable::new(false),
            value_changed: Signal::new(),
            track: Track::default(),
            style: ScrubberStyle::default(),
            drag_start_value: None,
        }
    }

    pub fn value(&self) -> f32 {
        *self.value.get()
    }

    pub fn minimum_value(&self) -> f32 {
        *self.minimum_value.get()
    }

    pub fn maximum_value(&self) -> f32 {
        *self.maximum_value.get()
    }

    pub fn is_continuous(&self) -> bool {
        *self.continuous.get()
    }

    pub fn is_dragging(&self) -> bool {
        *self.dragging.get()
    }

    pub fn track(&self) -> Track {
        self.track
    }

    pub fn style(&self) -> ScrubberStyle {
        self.style
    }

    /// Set both bounds at once, clamping the current value into them.
    pub fn set_range(&mut self, min: f32, max: f32) -> Result<()> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(PlayerViewError::InvalidRange { min, max });
        }

        // Widen first so observers never see min above max
        if min > self.maximum_value() {
            self.maximum_value.set(max);
            self.minimum_value.set(min);
        } else {
            self.minimum_value.set(min);
            self.maximum_value.set(max);
        }

        let clamped = self.value().clamp(min, max);
        if self.value.set(clamped) {
            let origin = if self.is_dragging() {
                ValueOrigin::User
            } else {
                ValueOrigin::Programmatic
            };
            self.value_changed.emit(&ValueChanged {
                value: clamped,
                origin,
                is_final: false,
            });
        }
        Ok(())
    }

    /// Write the value from outside. Ignored during a drag.
    ///
    /// Returns whether the stored value changed.
    pub fn set_value(&mut self, value: f32) -> bool {
        if self.is_dragging() {
            debug!("Scrubber: ignoring external value {} during drag", value);
            return false;
        }
        if !value.is_finite() {
            return false;
        }

        let clamped = value.clamp(self.minimum_value(), self.maximum_value());
        if !self.value.set(clamped) {
            return false;
        }

        self.value_changed.emit(&ValueChanged {
            value: clamped,
            origin: ValueOrigin::Programmatic,
            is_final: false,
        });
        true
    }

    pub fn set_continuous(&mut self, continuous: bool) {
        self.continuous.set(continuous);
    }

    pub fn set_track(&mut self, track: Track) {
        self.track = track;
    }

    pub fn set_style(&mut self, style: ScrubberStyle) {
        self.style = style;
    }

    /// Value under a touch at `x` by linear interpolation over the track
    pub fn value_at(&self, x: f32) -> f32 {
        let min = self.minimum_value();
        let max = self.maximum_value();
        (min + self.track.fraction_at(x) * (max - min)).clamp(min, max)
    }

    /// Start a drag at `x`. The value jumps under the finger without a notification.
    pub fn begin_drag(&mut self, x: f32) {
        if self.is_dragging() {
            return;
        }

        self.drag_start_value = Some(self.value());
        self.dragging.set(true);
        self.value.set(self.value_at(x));
    }

    /// Move an active drag to `x`.
    ///
    /// In continuous mode every move produces a user-originated notification,
    /// even when the value did not change.
    pub fn drag_to(&mut self, x: f32) -> Option<ValueChanged> {
        if !self.is_dragging() {
            return None;
        }

        let value = self.value_at(x);
        self.value.set(value);

        if !self.is_continuous() {
            return None;
        }

        let change = ValueChanged {
            value,
            origin: ValueOrigin::User,
            is_final: false,
        };
        self.value_changed.emit(&change);
        Some(change)
    }

    /// Finish a drag at `x`, emitting exactly one final notification.
    pub fn end_drag(&mut self, x: f32) -> Option<ValueChanged> {
        self.end_drag_with(x, |_| {})
    }

    /// Finish a drag at `x`, running `before_release` with the final
    /// notification while the scrubber still reports itself as dragging.
    pub fn end_drag_with<F>(&mut self, x: f32, before_release: F) -> Option<ValueChanged>
    where
        F: FnOnce(&ValueChanged),
    {
        if !self.is_dragging() {
            return None;
        }

        let value = self.value_at(x);
        self.value.set(value);

        let change = ValueChanged {
            value,
            origin: ValueOrigin::User,
            is_final: true,
        };
        self.value_changed.emit(&change);
        before_release(&change);

        self.drag_start_value = None;
        self.dragging.set(false);
        Some(change)
    }

    /// Abandon an active drag, restoring the value it started from.
    pub fn cancel_drag(&mut self) -> bool {
        if !self.is_dragging() {
            return false;
        }

        if let Some(start) = self.drag_start_value.take() {
            self.value.set(start);
        }
        self.dragging.set(false);
        true
    }

    /// `(value - min) / (max - min)`
    pub fn fill_fraction(&self) -> f32 {
        let min = self.minimum_value();
        let max = self.maximum_value();
        ((self.value() - min) / (max - min)).clamp(0.0, 1.0)
    }

    /// Current render description
    pub fn frame(&self) -> ScrubberFrame {
        let fill_fraction = self.fill_fraction();
        ScrubberFrame {
            fill_fraction,
            fill_length: fill_fraction * self.track.length.max(0.0),
            dragging: self.is_dragging(),
            style: self.style,
        }
    }

    pub fn value_observable(&mut self) -> &mut Observable<f32> {
        &mut self.value
    }

    pub fn minimum_value_observable(&mut self) -> &mut Observable<f32> {
        &mut self.minimum_value
    }

    pub fn maximum_value_observable(&mut self) -> &mut Observable<f32> {
        &mut self.maximum_value
    }

    pub fn continuous_observable(&mut self) -> &mut Observable<bool> {
        &mut self.continuous
    }

    pub fn dragging_observable(&mut self) -> &mut Observable<bool> {
        &mut self.dragging
    }

    /// Value-changed control events
    pub fn value_changed(&mut self) -> &mut Signal<ValueChanged> {
        &mut self.value_changed
    }
}
