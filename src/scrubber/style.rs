//! Scrubber geometry and presentation
//!
//! Everything here is a pure function of the scrubber's value and layout:
//! the track maps touch positions to fractions, and [`ScrubberFrame`]
//! describes what the rendering surface should draw.

use crate::utils::error::{PlayerViewError, Result};

/// Color representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create color from RGBA values (0-255)
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create color from a `#RRGGBB` or `#RRGGBBAA` string
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| PlayerViewError::InvalidInput(format!("Hex color must start with '#': {}", hex)))?;

        if (digits.len() != 6 && digits.len() != 8) || !digits.is_ascii() {
            return Err(PlayerViewError::InvalidInput(
                "Hex color must be 6 or 8 digits".to_string(),
            ));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| PlayerViewError::InvalidInput(format!("Invalid hex color: {}", hex)))
        };

        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::from_rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
}

/// Stroke and fill colours of the track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrubberStyle {
    pub stroke_color: Color,
    pub fill_color: Color,
}

impl Default for ScrubberStyle {
    fn default() -> Self {
        Self {
            stroke_color: Color::WHITE,
            fill_color: Color::WHITE,
        }
    }
}

/// Horizontal extent of the track in view coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    /// X coordinate where the track starts
    pub origin: f32,

    /// Visual length of the track
    pub length: f32,
}

impl Track {
    pub fn new(origin: f32, length: f32) -> Self {
        Self { origin, length }
    }

    /// Fraction of the track covered at `x`, clamped to `[0, 1]`.
    ///
    /// A degenerate track maps everything to 0.
    pub fn fraction_at(&self, x: f32) -> f32 {
        if self.length <= 0.0 || !self.length.is_finite() || !x.is_finite() {
            return 0.0;
        }
        ((x - self.origin) / self.length).clamp(0.0, 1.0)
    }
}

impl Default for Track {
    fn default() -> Self {
        Self { origin: 0.0, length: 0.0 }
    }
}

/// Render description handed to the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrubberFrame {
    /// `(value - min) / (max - min)`
    pub fill_fraction: f32,

    /// Filled length along the track
    pub fill_length: f32,

    /// Whether the user is dragging
    pub dragging: bool,

    pub style: ScrubberStyle,
}
