//! PlayerView - an embeddable video playback control surface
//!
//! The crate binds three independently triggered event streams into one
//! coherent UI state: media engine callbacks, the overlay idle timer and
//! user input. All state lives on a single UI task; see [`runtime`].

pub mod engine;
pub mod fullscreen;
pub mod overlay;
pub mod runtime;
pub mod scrubber;
pub mod session;
pub mod utils;
pub mod view;

#[cfg(test)]
mod testing;

pub use fullscreen::{FullscreenController, HostChrome, PresentationMode};
pub use overlay::{OverlayController, OverlayTransition, Visibility};
pub use runtime::{EngineSink, ViewHandle, ViewMessage, ViewRuntime};
pub use scrubber::{Scrubber, ValueChanged, ValueOrigin};
pub use session::{
    EngineCallback, EngineEvent, Generation, MediaEngine, MediaSource, PlaybackSession,
    PlaybackState,
};
pub use utils::config::Config;
pub use utils::error::{PlayerViewError, Result};
pub use view::{Key, PlaybackView, Rect, RenderSurface, Touch, TouchPhase, TransportCommand};
