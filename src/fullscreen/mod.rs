//! Fullscreen coordination for PlayerView
//!
//! Fullscreen is a single boolean, but switching it touches two pieces of
//! host chrome: status-bar visibility and the media layer presentation mode.
//! Both requests are applied together or not at all.

use crate::utils::config::FullscreenConfig;
use crate::utils::error::Result;
use crate::utils::observable::Observable;
use log::{info, warn};

/// How the media layer fills the view bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationMode {
    /// Letterboxed, whole frame visible
    #[default]
    AspectFit,

    /// Expanded to fill, edges may be cropped
    AspectFill,
}

impl PresentationMode {
    pub fn for_fullscreen(fullscreen: bool) -> Self {
        if fullscreen {
            PresentationMode::AspectFill
        } else {
            PresentationMode::AspectFit
        }
    }
}

/// Host window chrome consumed by the fullscreen controller
pub trait HostChrome {
    /// Show or hide the status bar
    ///
    /// # Arguments
    ///
    /// * `hidden` - Whether the status bar should be hidden
    fn set_status_bar_hidden(&mut self, hidden: bool) -> Result<()>;

    /// Ask the host to lay the media surface out again
    ///
    /// # Arguments
    ///
    /// * `mode` - Presentation mode for the media layer
    fn request_layout(&mut self, mode: PresentationMode) -> Result<()>;
}

/// Owns the fullscreen flag and the chrome state it implies
#[derive(Debug)]
pub struct FullscreenController {
    fullscreen: Observable<bool>,

    /// When set, pins the status bar regardless of fullscreen
    status_bar_override: Option<bool>,

    /// Last status-bar state successfully applied to the host
    status_bar_hidden: bool,
}

impl FullscreenController {
    pub fn new(config: &FullscreenConfig) -> Self {
        Self {
            fullscreen: Observable::new(false),
            status_bar_override: config.status_bar_override,
            status_bar_hidden: false,
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        *self.fullscreen.get()
    }

    pub fn status_bar_override(&self) -> Option<bool> {
        self.status_bar_override
    }

    /// Pin or release the status bar. The host is updated right away when
    /// the effective visibility changes; on failure the override is unchanged.
    pub fn set_status_bar_override(
        &mut self,
        hidden: Option<bool>,
        chrome: &mut dyn HostChrome,
    ) -> Result<()> {
        let effective = hidden.unwrap_or(self.is_fullscreen());
        if effective != self.status_bar_hidden {
            chrome.set_status_bar_hidden(effective)?;
            self.status_bar_hidden = effective;
        }
        self.status_bar_override = hidden;
        Ok(())
    }

    /// Status-bar visibility implied by `fullscreen` and the override
    pub fn status_bar_hidden_for(&self, fullscreen: bool) -> bool {
        self.status_bar_override.unwrap_or(fullscreen)
    }

    /// Enter or leave fullscreen.
    ///
    /// Returns `Ok(false)` without touching the host when already in the
    /// requested state. If the layout request fails, the status bar is put
    /// back and the flag keeps its previous value.
    pub fn set_fullscreen(&mut self, fullscreen: bool, chrome: &mut dyn HostChrome) -> Result<bool> {
        if self.is_fullscreen() == fullscreen {
            return Ok(false);
        }

        let previous_hidden = self.status_bar_hidden;
        let hidden = self.status_bar_hidden_for(fullscreen);

        chrome.set_status_bar_hidden(hidden)?;

        if let Err(e) = chrome.request_layout(PresentationMode::for_fullscreen(fullscreen)) {
            warn!("Layout request failed, reverting status bar: {}", e);
            if let Err(revert) = chrome.set_status_bar_hidden(previous_hidden) {
                warn!("Failed to revert status bar: {}", revert);
            }
            return Err(e);
        }

        self.status_bar_hidden = hidden;
        self.fullscreen.set(fullscreen);
        info!("Fullscreen {}", if fullscreen { "on" } else { "off" });
        Ok(true)
    }

    pub fn toggle(&mut self, chrome: &mut dyn HostChrome) -> Result<bool> {
        let target = !self.is_fullscreen();
        self.set_fullscreen(target, chrome)
    }

    pub fn fullscreen_observable(&mut self) -> &mut Observable<bool> {
        &mut self.fullscreen
    }
}
