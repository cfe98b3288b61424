//! Integration test utilities for PlayerView
//!
//! This module provides common utilities for integration testing including:
//! - Mock media engine and host chrome
//! - Recording surface
//! - Temporary configuration files

use anyhow::Result;
use mockall::mock;
use playerview::overlay::OverlayTransition;
use playerview::scrubber::ScrubberFrame;
use playerview::{
    Config, Generation, HostChrome, MediaEngine, MediaSource, PlaybackView, PresentationMode,
    Rect, RenderSurface,
};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tempfile::TempDir;

mock! {
    pub Engine {}

    impl MediaEngine for Engine {
        fn load(&mut self, source: &MediaSource, generation: Generation) -> playerview::Result<()>;
        fn cancel_load(&mut self, generation: Generation);
        fn play(&mut self) -> playerview::Result<()>;
        fn pause(&mut self) -> playerview::Result<()>;
        fn seek(&mut self, position: Duration) -> playerview::Result<()>;
    }
}

mock! {
    pub Chrome {}

    impl HostChrome for Chrome {
        fn set_status_bar_hidden(&mut self, hidden: bool) -> playerview::Result<()>;
        fn request_layout(&mut self, mode: PresentationMode) -> playerview::Result<()>;
    }
}

/// What a surface was asked to draw
#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub frames: Vec<ScrubberFrame>,
    pub transitions: Vec<OverlayTransition>,
}

/// Surface recording into a shared log
#[derive(Clone, Default)]
pub struct SharedSurface {
    pub log: Rc<RefCell<SurfaceLog>>,
}

impl SharedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_fill(&self) -> Option<f32> {
        self.log.borrow().frames.last().map(|f| f.fill_fraction)
    }

    pub fn transitions(&self) -> Vec<OverlayTransition> {
        self.log.borrow().transitions.clone()
    }
}

impl RenderSurface for SharedSurface {
    fn draw_scrubber(&mut self, frame: &ScrubberFrame) {
        self.log.borrow_mut().frames.push(*frame);
    }

    fn transition_overlay(&mut self, transition: &OverlayTransition) {
        self.log.borrow_mut().transitions.push(*transition);
    }
}

/// Chrome accepting every request
pub struct AcceptingChrome;

impl HostChrome for AcceptingChrome {
    fn set_status_bar_hidden(&mut self, _hidden: bool) -> playerview::Result<()> {
        Ok(())
    }

    fn request_layout(&mut self, _mode: PresentationMode) -> playerview::Result<()> {
        Ok(())
    }
}

/// Scrubber frame used by the fixtures: 100 points wide, so x equals percent
pub const TRACK: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 100.0,
    height: 10.0,
};

/// Build a view with a 100-point scrubber track
pub fn build_view<E, C>(engine: E, chrome: C, surface: SharedSurface, config: &Config) -> Result<PlaybackView>
where
    E: MediaEngine + 'static,
    C: HostChrome + 'static,
{
    let mut view = PlaybackView::new(Box::new(engine), Box::new(chrome), Box::new(surface), config)?;
    view.set_scrubber_frame(TRACK);
    Ok(view)
}

/// An engine mock that accepts any command
pub fn permissive_engine() -> MockEngine {
    let mut engine = MockEngine::new();
    engine.expect_load().returning(|_, _| Ok(()));
    engine.expect_cancel_load().return_const(());
    engine.expect_play().returning(|| Ok(()));
    engine.expect_pause().returning(|| Ok(()));
    engine.expect_seek().returning(|_| Ok(()));
    engine
}

/// Temporary directory holding configuration files
pub struct ConfigFixture {
    pub temp_dir: TempDir,
}

impl ConfigFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Write `contents` to `name` inside the fixture directory
    pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}
