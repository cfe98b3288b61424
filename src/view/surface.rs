//! Rendering surface capability
//!
//! The surface is purely presentational: it receives what to draw and never
//! feeds decisions back into the view.

use crate::overlay::OverlayTransition;
use crate::scrubber::ScrubberFrame;
use log::debug;

/// Draws the scrubber and animates the overlay
pub trait RenderSurface {
    /// Redraw the scrubber track
    ///
    /// # Arguments
    ///
    /// * `frame` - Fill fraction, fill length and colours to draw
    fn draw_scrubber(&mut self, frame: &ScrubberFrame);

    /// Show or hide the overlay controls
    ///
    /// # Arguments
    ///
    /// * `transition` - Target visibility and animation
    fn transition_overlay(&mut self, transition: &OverlayTransition);
}

/// Surface that only logs, for headless embedding
#[derive(Debug, Default)]
pub struct LogSurface;

impl RenderSurface for LogSurface {
    fn draw_scrubber(&mut self, frame: &ScrubberFrame) {
        debug!(
            "Scrubber fill {:.1}% ({:.1}px){}",
            frame.fill_fraction * 100.0,
            frame.fill_length,
            if frame.dragging { " [dragging]" } else { "" }
        );
    }

    fn transition_overlay(&mut self, transition: &OverlayTransition) {
        debug!(
            "Overlay {} over {:?}",
            if transition.visible { "shown" } else { "hidden" },
            transition.duration
        );
    }
}
