use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use std::path::PathBuf;
use std::time::Duration;

use playerview::engine::SimulatedEngine;
use playerview::view::LogSurface;
use playerview::{
    Config, HostChrome, Key, PlaybackView, PresentationMode, Rect, Touch, TransportCommand,
    ViewHandle, ViewRuntime,
};

/// Width of the demo scrubber track in points
const TRACK_WIDTH: f32 = 1000.0;

/// PlayerView - headless demo of the playback control surface
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Media URL to open
    #[arg(value_name = "URL", default_value = "sim://demo.mp4")]
    url: String,

    /// Duration of the simulated media in seconds
    #[arg(long, value_name = "SECS", default_value = "12")]
    duration: u64,

    /// Start in fullscreen mode
    #[arg(short, long)]
    fullscreen: bool,

    /// Emit a value change only when a drag ends
    #[arg(long)]
    no_continuous: bool,

    /// Configuration file to use instead of the default locations
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    };
    let config_error = loaded.as_ref().err().map(|e| e.to_string());
    let mut config = loaded.unwrap_or_default();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { config.general.log_level.as_str() };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    info!("Starting PlayerView v{}", env!("CARGO_PKG_VERSION"));
    if let Some(e) = config_error {
        warn!("Using default configuration: {}", e);
    }

    if args.fullscreen {
        config.fullscreen.start_fullscreen = true;
    }
    if args.no_continuous {
        config.scrubber.continuous = false;
    }

    let media_duration = Duration::from_secs(args.duration.max(1));
    let (runtime, handle) = ViewRuntime::new(|sink| {
        let engine = SimulatedEngine::new(sink).with_fallback_duration(media_duration);
        let mut view = PlaybackView::new(
            Box::new(engine),
            Box::new(LogChrome),
            Box::new(LogSurface),
            &config,
        )?;
        view.set_scrubber_frame(Rect::new(0.0, 0.0, TRACK_WIDTH, 20.0));
        subscribe_logging(&mut view);
        Ok(view)
    })?;

    let (view, script) = tokio::join!(runtime.run(), demo(handle, args.url, media_duration));
    script?;

    info!(
        "Finished in state {} at {} ({} remaining)",
        view.state(),
        view.elapsed_label(),
        view.remaining_label()
    );
    Ok(())
}

/// Drive the view the way a user would
async fn demo(handle: ViewHandle, url: String, duration: Duration) -> Result<()> {
    handle.load(url)?;
    tokio::time::sleep(Duration::from_millis(500)).await;

    handle.command(TransportCommand::Play)?;
    tokio::time::sleep(Duration::from_secs(2)).await;

    // Scrub to the middle of the track
    handle.touch(Touch::began(TRACK_WIDTH * 0.1, 10.0))?;
    for step in 2..=5 {
        tokio::time::sleep(Duration::from_millis(40)).await;
        handle.touch(Touch::moved(TRACK_WIDTH * step as f32 / 10.0, 10.0))?;
    }
    handle.touch(Touch::ended(TRACK_WIDTH * 0.5, 10.0))?;

    // Long enough for the overlay to hide
    tokio::time::sleep(Duration::from_secs(4)).await;
    handle.key(Key::Right)?;

    tokio::time::sleep(duration).await;
    handle.shutdown()?;
    Ok(())
}

/// Log every observable property change
fn subscribe_logging(view: &mut PlaybackView) {
    view.state_observable()
        .subscribe(|old, new| info!("Playback state: {} -> {}", old, new));
    view.duration_observable().subscribe(|_, new| {
        if let Some(duration) = new {
            info!("Duration: {}", playerview::utils::format_duration(*duration));
        }
    });
    view.position_observable()
        .subscribe(|_, new| log::debug!("Position: {:?}", new));
    view.controls_visible_observable()
        .subscribe(|_, new| info!("Controls: {:?}", new));
    view.fullscreen_observable()
        .subscribe(|_, new| info!("Fullscreen: {}", new));
    view.scrubber_mut().value_changed().subscribe(|change| {
        if change.is_user() {
            log::debug!("Scrubbed to {:.2}s (final: {})", change.value, change.is_final);
        }
    });
}

/// Host chrome that only logs requests
struct LogChrome;

impl HostChrome for LogChrome {
    fn set_status_bar_hidden(&mut self, hidden: bool) -> playerview::Result<()> {
        info!("Status bar {}", if hidden { "hidden" } else { "shown" });
        Ok(())
    }

    fn request_layout(&mut self, mode: PresentationMode) -> playerview::Result<()> {
        info!("Layout requested: {:?}", mode);
        Ok(())
    }
}
