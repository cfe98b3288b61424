//! Recording fakes for the capability traits, shared by unit tests

use crate::fullscreen::{HostChrome, PresentationMode};
use crate::overlay::OverlayTransition;
use crate::scrubber::ScrubberFrame;
use crate::session::{Generation, MediaEngine, MediaSource};
use crate::utils::error::{PlayerViewError, Result};
use crate::view::RenderSurface;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Load(String, Generation),
    Cancel(Generation),
    Play,
    Pause,
    Seek(Duration),
}

#[derive(Default)]
struct EngineLog {
    calls: Vec<EngineCall>,
    refuse_loads: Option<String>,
}

/// Engine that records every command
#[derive(Clone, Default)]
pub struct RecordingEngine {
    log: Rc<RefCell<EngineLog>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refuse_loads(&self, reason: &str) {
        self.log.borrow_mut().refuse_loads = Some(reason.to_string());
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.log.borrow().calls.clone()
    }

    pub fn seeks(&self) -> Vec<Duration> {
        self.log
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                EngineCall::Seek(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    pub fn cancelled(&self) -> Vec<Generation> {
        self.log
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                EngineCall::Cancel(g) => Some(*g),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().calls.clear();
    }
}

impl MediaEngine for RecordingEngine {
    fn load(&mut self, source: &MediaSource, generation: Generation) -> Result<()> {
        let mut log = self.log.borrow_mut();
        log.calls.push(EngineCall::Load(source.to_string(), generation));
        match &log.refuse_loads {
            Some(reason) => Err(PlayerViewError::engine_error(reason.clone())),
            None => Ok(()),
        }
    }

    fn cancel_load(&mut self, generation: Generation) {
        self.log.borrow_mut().calls.push(EngineCall::Cancel(generation));
    }

    fn play(&mut self) -> Result<()> {
        self.log.borrow_mut().calls.push(EngineCall::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.log.borrow_mut().calls.push(EngineCall::Pause);
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.log.borrow_mut().calls.push(EngineCall::Seek(position));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChromeCall {
    StatusBarHidden(bool),
    Layout(PresentationMode),
}

#[derive(Default)]
struct ChromeLog {
    calls: Vec<ChromeCall>,
    fail_layout: bool,
}

/// Host chrome that records every request
#[derive(Clone, Default)]
pub struct RecordingChrome {
    log: Rc<RefCell<ChromeLog>>,
}

impl RecordingChrome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_layout(&self, fail: bool) {
        self.log.borrow_mut().fail_layout = fail;
    }

    pub fn calls(&self) -> Vec<ChromeCall> {
        self.log.borrow().calls.clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().calls.clear();
    }
}

impl HostChrome for RecordingChrome {
    fn set_status_bar_hidden(&mut self, hidden: bool) -> Result<()> {
        self.log.borrow_mut().calls.push(ChromeCall::StatusBarHidden(hidden));
        Ok(())
    }

    fn request_layout(&mut self, mode: PresentationMode) -> Result<()> {
        let mut log = self.log.borrow_mut();
        if log.fail_layout {
            return Err(PlayerViewError::Chrome("layout rejected".to_string()));
        }
        log.calls.push(ChromeCall::Layout(mode));
        Ok(())
    }
}

#[derive(Default)]
struct SurfaceLog {
    frames: Vec<ScrubberFrame>,
    transitions: Vec<OverlayTransition>,
}

/// Surface that records draw requests
#[derive(Clone, Default)]
pub struct RecordingSurface {
    log: Rc<RefCell<SurfaceLog>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<ScrubberFrame> {
        self.log.borrow().frames.last().copied()
    }

    pub fn transitions(&self) -> Vec<OverlayTransition> {
        self.log.borrow().transitions.clone()
    }
}

impl RenderSurface for RecordingSurface {
    fn draw_scrubber(&mut self, frame: &ScrubberFrame) {
        self.log.borrow_mut().frames.push(*frame);
    }

    fn transition_overlay(&mut self, transition: &OverlayTransition) {
        self.log.borrow_mut().transitions.push(*transition);
    }
}
