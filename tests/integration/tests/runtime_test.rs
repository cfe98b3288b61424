//! End-to-end tests of the view runtime with the simulated engine
//!
//! Time is paused, so the simulated engine's load latency, position ticks
//! and the overlay idle timer all run on tokio's virtual clock.

use anyhow::Result;
use playerview::engine::SimulatedEngine;
use playerview::{
    Config, EngineSink, Generation, EngineEvent, PlaybackState, Touch, TransportCommand,
    ViewHandle, ViewRuntime,
};
use playerview_integration_tests::{build_view, AcceptingChrome, SharedSurface};
use std::time::Duration;
use tokio::time::sleep;

const MEDIA: Duration = Duration::from_secs(10);

fn start(config: Config, surface: SharedSurface) -> Result<(ViewRuntime, ViewHandle)> {
    let (runtime, handle) = ViewRuntime::new(|sink| {
        let engine = SimulatedEngine::new(sink)
            .with_media("clip.mp4", MEDIA)
            .with_tick_interval(Duration::from_millis(500));
        build_view(engine, AcceptingChrome, surface, &config)
            .map_err(|e| playerview::PlayerViewError::Internal(e.to_string()))
    })?;
    Ok((runtime, handle))
}

#[tokio::test(start_paused = true)]
async fn test_plays_to_end_and_reveals_controls() -> Result<()> {
    let surface = SharedSurface::new();
    let (runtime, handle) = start(Config::default(), surface.clone())?;

    let script = async {
        handle.load("clip.mp4")?;
        sleep(Duration::from_millis(300)).await;
        handle.command(TransportCommand::Play)?;
        sleep(MEDIA + Duration::from_secs(1)).await;
        handle.shutdown()?;
        anyhow::Ok(())
    };

    let (view, result) = tokio::join!(runtime.run(), script);
    result?;

    assert_eq!(*view.state(), PlaybackState::Ended);
    assert_eq!(view.session().position(), MEDIA);
    assert_eq!(view.scrubber().value(), MEDIA.as_secs_f32());

    // Hidden after the idle window, shown again once playback ended
    let transitions = surface.transitions();
    assert_eq!(transitions.len(), 2);
    assert!(!transitions[0].visible);
    assert!(transitions[1].visible);
    assert!(view.controls_visible());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_drag_seek_moves_engine_clock() -> Result<()> {
    let (runtime, handle) = start(Config::default(), SharedSurface::new())?;

    let script = async {
        handle.load("clip.mp4")?;
        sleep(Duration::from_millis(300)).await;
        handle.command(TransportCommand::Play)?;
        sleep(Duration::from_millis(100)).await;

        handle.touch(Touch::began(10.0, 5.0))?;
        handle.touch(Touch::moved(40.0, 5.0))?;
        handle.touch(Touch::ended(80.0, 5.0))?;
        sleep(Duration::from_millis(600)).await;

        handle.command(TransportCommand::Pause)?;
        handle.shutdown()?;
        anyhow::Ok(())
    };

    let (view, result) = tokio::join!(runtime.run(), script);
    result?;

    // 80% of 10s, plus one 500ms tick before the pause
    assert_eq!(*view.state(), PlaybackState::Paused);
    assert!(view.session().position() >= Duration::from_secs(8));
    assert!(view.session().position() <= Duration::from_millis(8500));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_unknown_source_fails_asynchronously() -> Result<()> {
    let (runtime, handle) = start(Config::default(), SharedSurface::new())?;

    let script = async {
        handle.load("missing.mp4")?;
        sleep(Duration::from_secs(1)).await;
        // Ignored: nothing to play
        handle.command(TransportCommand::Play)?;
        handle.shutdown()?;
        anyhow::Ok(())
    };

    let (view, result) = tokio::join!(runtime.run(), script);
    result?;

    assert!(view.state().is_failed());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_sink_is_usable_from_other_threads() -> Result<()> {
    let mut captured: Option<EngineSink> = None;
    let (runtime, handle) = ViewRuntime::new(|sink| {
        captured = Some(sink.clone());
        build_view(
            SimulatedEngine::new(sink),
            AcceptingChrome,
            SharedSurface::new(),
            &Config::default(),
        )
        .map_err(|e| playerview::PlayerViewError::Internal(e.to_string()))
    })?;
    let sink = captured.expect("sink captured");

    handle.load("anything.mp4")?;
    let sender = std::thread::spawn(move || {
        sink.send(Generation::new(1), EngineEvent::Ready { duration: Duration::from_secs(42) })
    });
    assert!(sender.join().expect("sender thread"));
    handle.shutdown()?;

    let view = runtime.run().await;
    assert_eq!(*view.state(), PlaybackState::ReadyToPlay);
    assert_eq!(view.duration(), Duration::from_secs(42));
    Ok(())
}
