//! UI-thread event loop for PlayerView
//!
//! The view is not `Send`; it lives inside a single task that owns it. Other
//! threads reach it through messages: the embedding code through a
//! [`ViewHandle`], the media engine through an [`EngineSink`]. Timer
//! deadlines published by the view are awaited in the same loop, so no two
//! state changes ever run concurrently.

use crate::session::{EngineCallback, EngineEvent, Generation};
use crate::internal_error;
use crate::utils::error::Result;
use crate::view::{Key, PlaybackView, Touch, TransportCommand};
use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

/// Messages delivered to the UI task
#[derive(Debug, Clone, PartialEq)]
pub enum ViewMessage {
    Load(String),
    ClearSource,
    Command(TransportCommand),
    Touch(Touch),
    Key(Key),
    Engine(EngineCallback),
    Shutdown,
}

/// Marshals engine callbacks onto the UI task
#[derive(Debug, Clone)]
pub struct EngineSink {
    sender: mpsc::UnboundedSender<ViewMessage>,
}

impl EngineSink {
    /// Wrap the sending side of a view message channel
    pub fn new(sender: mpsc::UnboundedSender<ViewMessage>) -> Self {
        Self { sender }
    }

    /// Forward a callback. Returns false if the UI task has gone away.
    pub fn deliver(&self, callback: EngineCallback) -> bool {
        match self.sender.send(ViewMessage::Engine(callback)) {
            Ok(()) => true,
            Err(e) => {
                warn!("Dropping engine callback, view runtime has stopped: {:?}", e.0);
                false
            }
        }
    }

    pub fn send(&self, generation: Generation, event: EngineEvent) -> bool {
        self.deliver(EngineCallback::new(generation, event))
    }
}

/// Sends input and commands to the UI task from anywhere
#[derive(Debug, Clone)]
pub struct ViewHandle {
    sender: mpsc::UnboundedSender<ViewMessage>,
}

impl ViewHandle {
    fn post(&self, message: ViewMessage) -> Result<()> {
        self.sender
            .send(message)
            .map_err(|_| internal_error!("View runtime has stopped"))
    }

    pub fn load<S: Into<String>>(&self, url: S) -> Result<()> {
        self.post(ViewMessage::Load(url.into()))
    }

    pub fn clear_source(&self) -> Result<()> {
        self.post(ViewMessage::ClearSource)
    }

    pub fn command(&self, command: TransportCommand) -> Result<()> {
        self.post(ViewMessage::Command(command))
    }

    pub fn touch(&self, touch: Touch) -> Result<()> {
        self.post(ViewMessage::Touch(touch))
    }

    pub fn key(&self, key: Key) -> Result<()> {
        self.post(ViewMessage::Key(key))
    }

    /// Stop the loop; `ViewRuntime::run` then returns the view
    pub fn shutdown(&self) -> Result<()> {
        self.post(ViewMessage::Shutdown)
    }
}

/// Single-task loop owning a [`PlaybackView`]
pub struct ViewRuntime {
    view: PlaybackView,
    receiver: mpsc::UnboundedReceiver<ViewMessage>,
}

impl ViewRuntime {
    /// Create the runtime. `build` receives the engine sink so the engine
    /// can be wired before the view takes ownership of it.
    pub fn new<F>(build: F) -> Result<(Self, ViewHandle)>
    where
        F: FnOnce(EngineSink) -> Result<PlaybackView>,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let view = build(EngineSink::new(sender.clone()))?;

        Ok((Self { view, receiver }, ViewHandle { sender }))
    }

    pub fn view(&self) -> &PlaybackView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut PlaybackView {
        &mut self.view
    }

    /// Process messages and timers until shut down
    pub async fn run(mut self) -> PlaybackView {
        info!("View runtime started");

        loop {
            let deadline = self.view.next_deadline();

            tokio::select! {
                message = self.receiver.recv() => match message {
                    Some(ViewMessage::Shutdown) | None => break,
                    Some(message) => self.dispatch(message),
                },
                _ = sleep_until_deadline(deadline) => {
                    self.view.poll_timers();
                }
            }
        }

        info!("View runtime stopped");
        self.view
    }

    fn dispatch(&mut self, message: ViewMessage) {
        let result = match message {
            ViewMessage::Load(url) => self.view.set_url(url),
            ViewMessage::ClearSource => {
                self.view.clear_source();
                Ok(())
            }
            ViewMessage::Command(command) => self.view.handle_command(command),
            ViewMessage::Touch(touch) => self.view.handle_touch(touch),
            ViewMessage::Key(key) => self.view.handle_key(key),
            ViewMessage::Engine(callback) => {
                self.view.handle_engine(callback);
                Ok(())
            }
            ViewMessage::Shutdown => Ok(()),
        };

        if let Err(e) = result {
            if e.is_usage_error() {
                debug!("Ignored request: {}", e);
            } else {
                warn!("Request failed: {}", e);
            }
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
