//! In-process media engine driven by tokio timers
//!
//! Sources are looked up in a catalog of known durations. Loading completes
//! after a fixed latency; while playing, a ticker task advances the clock
//! and reports positions until the end of the media.

use crate::runtime::EngineSink;
use crate::session::{EngineEvent, Generation, MediaEngine, MediaSource};
use crate::utils::error::{PlayerViewError, Result};
use log::{debug, info};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default time to open a source
pub const DEFAULT_LOAD_LATENCY: Duration = Duration::from_millis(200);

/// Default position reporting period
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Playback clock shared with the ticker task
#[derive(Debug, Default)]
struct MediaClock {
    generation: Generation,
    position: Duration,
    duration: Duration,
    loaded: bool,
}

/// Simulated engine
pub struct SimulatedEngine {
    sink: EngineSink,
    catalog: HashMap<String, Duration>,

    /// Duration for sources missing from the catalog; `None` makes them fail
    fallback_duration: Option<Duration>,

    load_latency: Duration,
    tick_interval: Duration,

    clock: Arc<Mutex<MediaClock>>,
    load_task: Option<JoinHandle<()>>,
    ticker: Option<JoinHandle<()>>,
}

impl SimulatedEngine {
    pub fn new(sink: EngineSink) -> Self {
        Self {
            sink,
            catalog: HashMap::new(),
            fallback_duration: None,
            load_latency: DEFAULT_LOAD_LATENCY,
            tick_interval: DEFAULT_TICK_INTERVAL,
            clock: Arc::new(Mutex::new(MediaClock::default())),
            load_task: None,
            ticker: None,
        }
    }

    /// Register a source and its duration
    pub fn with_media<S: Into<String>>(mut self, url: S, duration: Duration) -> Self {
        self.catalog.insert(url.into(), duration);
        self
    }

    /// Accept any source with the given duration
    pub fn with_fallback_duration(mut self, duration: Duration) -> Self {
        self.fallback_duration = Some(duration);
        self
    }

    pub fn with_load_latency(mut self, latency: Duration) -> Self {
        self.load_latency = latency;
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Current clock position
    pub fn position(&self) -> Duration {
        self.clock.lock().position
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    fn stop_loading(&mut self) {
        if let Some(task) = self.load_task.take() {
            task.abort();
        }
    }
}

impl MediaEngine for SimulatedEngine {
    fn load(&mut self, source: &MediaSource, generation: Generation) -> Result<()> {
        self.stop_loading();
        self.stop_ticker();
        *self.clock.lock() = MediaClock {
            generation,
            ..MediaClock::default()
        };

        let duration = self
            .catalog
            .get(source.as_str())
            .copied()
            .or(self.fallback_duration);
        let url = source.to_string();
        let latency = self.load_latency;
        let clock = Arc::clone(&self.clock);
        let sink = self.sink.clone();

        info!("Simulated engine opening {} ({})", url, generation);
        self.load_task = Some(tokio::spawn(async move {
            tokio::time::sleep(latency).await;

            let event = match duration {
                Some(duration) => {
                    let mut clock = clock.lock();
                    if clock.generation != generation {
                        return;
                    }
                    clock.duration = duration;
                    clock.loaded = true;
                    EngineEvent::Ready { duration }
                }
                None => EngineEvent::Failed {
                    reason: format!("Unsupported source: {}", url),
                },
            };
            sink.send(generation, event);
        }));

        Ok(())
    }

    fn cancel_load(&mut self, generation: Generation) {
        if self.clock.lock().generation == generation {
            debug!("Simulated engine cancelling load {}", generation);
            self.stop_loading();
        }
    }

    fn play(&mut self) -> Result<()> {
        if !self.clock.lock().loaded {
            return Err(PlayerViewError::engine_error("No media loaded"));
        }
        self.stop_ticker();

        let clock = Arc::clone(&self.clock);
        let sink = self.sink.clone();
        let period = self.tick_interval;

        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // First tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;

                let (generation, event) = {
                    let mut clock = clock.lock();
                    clock.position = (clock.position + period).min(clock.duration);
                    let event = if clock.position >= clock.duration {
                        EngineEvent::Ended
                    } else {
                        EngineEvent::PositionTick {
                            position: clock.position,
                        }
                    };
                    (clock.generation, event)
                };

                let ended = event == EngineEvent::Ended;
                if !sink.send(generation, event) || ended {
                    break;
                }
            }
        }));

        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.stop_ticker();
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        let mut clock = self.clock.lock();
        if !clock.loaded {
            return Err(PlayerViewError::engine_error("No media loaded"));
        }
        clock.position = position.min(clock.duration);
        Ok(())
    }
}

impl Drop for SimulatedEngine {
    fn drop(&mut self) {
        self.stop_loading();
        self.stop_ticker();
    }
}
