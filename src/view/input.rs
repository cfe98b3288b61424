//! Input types routed through the playback view

use crate::scrubber::Track;
use std::time::Duration;

/// Axis-aligned rectangle in view coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Horizontal track spanning the rectangle
    pub fn track(&self) -> Track {
        Track::new(self.x, self.width)
    }
}

/// Touch lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

/// A single-finger touch sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub phase: TouchPhase,
    pub x: f32,
    pub y: f32,
}

impl Touch {
    pub fn began(x: f32, y: f32) -> Self {
        Self { phase: TouchPhase::Began, x, y }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self { phase: TouchPhase::Moved, x, y }
    }

    pub fn ended(x: f32, y: f32) -> Self {
        Self { phase: TouchPhase::Ended, x, y }
    }

    pub fn cancelled(x: f32, y: f32) -> Self {
        Self { phase: TouchPhase::Cancelled, x, y }
    }
}

/// Keyboard keys the view reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Escape,
    Left,
    Right,
    F,
    Other(char),
}

/// Transport controls exposed by the overlay
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCommand {
    Play,
    Pause,
    TogglePlay,
    Seek(Duration),
    SeekRelative(f64),
    SetFullscreen(bool),
    ToggleFullscreen,
    SetControlsVisible { visible: bool, animated: bool },
}
