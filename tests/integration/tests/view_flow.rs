//! Integration tests for the playback view
//!
//! These tests drive the public API against mocked collaborators and verify:
//! - The load, play, end and replay lifecycle
//! - Drag and position reconciliation on the scrubber
//! - Fullscreen atomicity
//! - Stale engine callbacks

use anyhow::Result;
use mockall::predicate::{always, eq, function};
use mockall::Sequence;
use playerview::{
    Config, EngineCallback, EngineEvent, Generation, PlaybackState, PlaybackView,
    PlayerViewError, PresentationMode, Touch,
};
use playerview_integration_tests::{
    build_view, permissive_engine, AcceptingChrome, MockChrome, MockEngine, SharedSurface,
};
use std::time::Duration;

fn ready(view: &mut PlaybackView, secs: u64) -> Generation {
    let generation = view.session().generation();
    view.handle_engine(EngineCallback::new(
        generation,
        EngineEvent::Ready { duration: Duration::from_secs(secs) },
    ));
    generation
}

fn near(expected_secs: f64) -> impl Fn(&Duration) -> bool {
    move |d: &Duration| (d.as_secs_f64() - expected_secs).abs() < 1e-3
}

#[test]
fn test_lifecycle_with_replay() -> Result<()> {
    let mut engine = MockEngine::new();
    let mut seq = Sequence::new();
    engine
        .expect_load()
        .with(function(|s: &playerview::MediaSource| s.as_str() == "https://cdn/a.m3u8"), eq(Generation::new(1)))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    engine.expect_play().times(1).in_sequence(&mut seq).returning(|| Ok(()));
    engine
        .expect_seek()
        .with(eq(Duration::ZERO))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    engine.expect_play().times(1).in_sequence(&mut seq).returning(|| Ok(()));

    let mut view = build_view(engine, AcceptingChrome, SharedSurface::new(), &Config::default())?;
    view.set_url("https://cdn/a.m3u8")?;
    assert_eq!(*view.state(), PlaybackState::Loading);

    let generation = ready(&mut view, 100);
    assert_eq!(*view.state(), PlaybackState::ReadyToPlay);
    assert_eq!(view.scrubber().maximum_value(), 100.0);
    assert_eq!(view.duration(), Duration::from_secs(100));

    view.play()?;
    assert!(view.is_playing());

    view.handle_engine(EngineCallback::new(generation, EngineEvent::Ended));
    assert_eq!(*view.state(), PlaybackState::Ended);
    assert_eq!(view.scrubber().value(), 100.0);

    view.play()?;
    assert!(view.is_playing());
    assert_eq!(view.session().position(), Duration::ZERO);
    assert_eq!(view.scrubber().value(), 0.0);
    Ok(())
}

#[test]
fn test_non_continuous_drag_issues_single_seek() -> Result<()> {
    let mut engine = MockEngine::new();
    engine.expect_load().returning(|_, _| Ok(()));
    engine.expect_play().returning(|| Ok(()));
    engine
        .expect_seek()
        .with(function(near(90.0)))
        .times(1)
        .returning(|_| Ok(()));

    let mut config = Config::default();
    config.scrubber.continuous = false;
    let mut view = build_view(engine, AcceptingChrome, SharedSurface::new(), &config)?;
    view.set_url("a.mp4")?;
    let generation = ready(&mut view, 100);
    view.play()?;

    view.handle_touch(Touch::began(10.0, 5.0))?;
    for x in [25.0, 50.0, 75.0, 90.0] {
        view.handle_touch(Touch::moved(x, 5.0))?;
        // Playback keeps reporting while the finger is down
        view.handle_engine(EngineCallback::new(
            generation,
            EngineEvent::PositionTick { position: Duration::from_secs(5) },
        ));
        assert!((view.scrubber().value() - x).abs() < 1e-3);
    }
    view.handle_touch(Touch::ended(90.0, 5.0))?;

    assert!(!view.scrubber().is_dragging());
    Ok(())
}

#[test]
fn test_scrubber_follows_ticks_when_not_dragging() -> Result<()> {
    let surface = SharedSurface::new();
    let mut view = build_view(permissive_engine(), AcceptingChrome, surface.clone(), &Config::default())?;
    view.set_url("a.mp4")?;
    let generation = ready(&mut view, 200);
    view.play()?;

    view.handle_engine(EngineCallback::new(
        generation,
        EngineEvent::PositionTick { position: Duration::from_secs(50) },
    ));
    assert_eq!(view.scrubber().value(), 50.0);
    assert_eq!(surface.last_fill(), Some(0.25));
    Ok(())
}

#[test]
fn test_stale_callbacks_are_ignored() -> Result<()> {
    let mut engine = MockEngine::new();
    engine.expect_load().times(2).returning(|_, _| Ok(()));
    engine
        .expect_cancel_load()
        .with(eq(Generation::new(1)))
        .times(1)
        .return_const(());

    let mut view = build_view(engine, AcceptingChrome, SharedSurface::new(), &Config::default())?;
    view.set_url("a.mp4")?;
    let stale = view.session().generation();
    view.set_url("b.mp4")?;

    for event in [
        EngineEvent::Ready { duration: Duration::from_secs(10) },
        EngineEvent::Failed { reason: "gone".to_string() },
        EngineEvent::PositionTick { position: Duration::from_secs(3) },
    ] {
        assert!(!view.handle_engine(EngineCallback::new(stale, event)));
    }

    assert_eq!(*view.state(), PlaybackState::Loading);
    assert_eq!(view.session().known_duration(), None);
    Ok(())
}

#[test]
fn test_load_refusal_lands_in_failed() -> Result<()> {
    let mut engine = MockEngine::new();
    engine
        .expect_load()
        .returning(|_, _| Err(PlayerViewError::Engine("codec missing".to_string())));

    let mut view = build_view(engine, AcceptingChrome, SharedSurface::new(), &Config::default())?;
    view.set_url("a.mkv")?;

    assert!(view.state().is_failed());
    assert!(matches!(view.session().load_error(), Some(PlayerViewError::LoadFailure(_))));
    assert!(matches!(view.play(), Err(PlayerViewError::NoMedia)));
    Ok(())
}

#[test]
fn test_seek_past_end_is_rejected() -> Result<()> {
    let mut view = build_view(permissive_engine(), AcceptingChrome, SharedSurface::new(), &Config::default())?;
    view.set_url("a.mp4")?;
    ready(&mut view, 30);

    let err = view.seek(Duration::from_secs(31)).unwrap_err();
    assert!(matches!(err, PlayerViewError::OutOfRange { .. }));
    assert!(err.is_usage_error());
    Ok(())
}

#[test]
fn test_fullscreen_requests_are_atomic() -> Result<()> {
    let mut chrome = MockChrome::new();
    let mut seq = Sequence::new();
    chrome
        .expect_set_status_bar_hidden()
        .with(eq(true))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    chrome
        .expect_request_layout()
        .with(eq(PresentationMode::AspectFill))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let mut view = build_view(permissive_engine(), chrome, SharedSurface::new(), &Config::default())?;
    view.set_controls_visible(false, true);

    view.set_fullscreen(true)?;
    // Already fullscreen: the mock fails on any further call
    view.set_fullscreen(true)?;
    assert!(view.is_fullscreen());
    Ok(())
}

#[test]
fn test_fullscreen_rolls_back_on_layout_failure() -> Result<()> {
    let mut chrome = MockChrome::new();
    let mut seq = Sequence::new();
    chrome
        .expect_set_status_bar_hidden()
        .with(eq(true))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    chrome
        .expect_request_layout()
        .with(always())
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(PlayerViewError::Chrome("no window".to_string())));
    chrome
        .expect_set_status_bar_hidden()
        .with(eq(false))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let mut view = build_view(permissive_engine(), chrome, SharedSurface::new(), &Config::default())?;
    assert!(view.set_fullscreen(true).is_err());
    assert!(!view.is_fullscreen());
    Ok(())
}
