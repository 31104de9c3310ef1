//! Retry counting and force play through the gesture policy.

mod common;

use bridge_traits::{MediaError, TrackSource};
use common::{advance, harness, PlayScript};
use core_playback::{FailureKind, GestureOutcome, Lifecycle, PlayGesturePolicy, PlayOutcome};
use core_runtime::events::PlaybackEvent;
use std::time::Duration;

fn network_error() -> MediaError {
    MediaError::Network("connection reset".into())
}

#[tokio::test]
async fn fourth_gesture_is_forced_after_three_failures() {
    let mut h = harness();
    let policy = PlayGesturePolicy::new(h.controller.clone());
    for _ in 0..3 {
        h.media.fail_next(network_error());
    }

    for expected in 1..=3 {
        let outcome = policy.press_play(false).await.unwrap();
        assert_eq!(outcome, PlayOutcome::Failed(FailureKind::Transient));
        let state = h.controller.state();
        assert_eq!(state.retry_count, expected);
        assert!(!state.last_attempt_forced);
    }
    assert!(policy.force_play_available());
    h.drain_events();

    let outcome = policy.press_play(false).await.unwrap();
    assert_eq!(outcome, PlayOutcome::Started);

    let events = h.drain_events();
    assert!(matches!(events[0], PlaybackEvent::Loading { forced: true, .. }));
    assert!(matches!(events[1], PlaybackEvent::Started { forced: true, .. }));

    let state = h.controller.state();
    assert_eq!(state.lifecycle, Lifecycle::Playing);
    assert_eq!(state.retry_count, 0);
    assert!(!state.is_force_play);
    assert!(!policy.force_play_available());
}

#[tokio::test]
async fn failed_forced_attempt_starts_a_new_cycle() {
    let h = harness();
    let policy = PlayGesturePolicy::new(h.controller.clone());
    for _ in 0..4 {
        h.media.fail_next(network_error());
    }

    for _ in 0..3 {
        policy.press_play(false).await.unwrap();
    }
    policy.press_play(false).await.unwrap();
    let state = h.controller.state();
    assert!(state.last_attempt_forced);
    assert_eq!(state.lifecycle, Lifecycle::Error);

    // Next gesture resets the counter and plays unforced.
    assert_eq!(policy.press_play(false).await.unwrap(), PlayOutcome::Started);
    let state = h.controller.state();
    assert!(!state.last_attempt_forced);
    assert_eq!(state.retry_count, 0);
}

#[tokio::test]
async fn explicit_force_play() {
    let h = harness();
    let policy = PlayGesturePolicy::new(h.controller.clone());
    assert!(!policy.force_play_available());

    assert_eq!(policy.force_play().await.unwrap(), PlayOutcome::Started);
    let state = h.controller.state();
    assert!(state.last_attempt_forced);
    assert_eq!(state.lifecycle, Lifecycle::Playing);
}

#[tokio::test]
async fn lower_retry_ceiling_forces_sooner() {
    let h = common::harness_with(core_playback::ControllerConfig::slow_network());
    let policy = PlayGesturePolicy::new(h.controller.clone());
    assert_eq!(policy.max_retries(), 2);

    h.media.fail_next(network_error());
    h.media.fail_next(network_error());
    policy.press_play(false).await.unwrap();
    policy.press_play(false).await.unwrap();
    assert!(policy.force_play_available());

    policy.press_play(false).await.unwrap();
    assert!(h.controller.state().last_attempt_forced);
}

#[tokio::test]
async fn toggle_alternates_play_and_pause() {
    let h = harness();
    let policy = PlayGesturePolicy::new(h.controller.clone());

    assert_eq!(
        policy.toggle().await.unwrap(),
        GestureOutcome::Play(PlayOutcome::Started)
    );
    assert_eq!(policy.toggle().await.unwrap(), GestureOutcome::Paused);
    assert_eq!(h.controller.state().lifecycle, Lifecycle::Paused);
    assert_eq!(h.observer.plays(), 1);
    assert_eq!(h.observer.pauses(), 1);

    assert_eq!(
        policy.toggle().await.unwrap(),
        GestureOutcome::Play(PlayOutcome::Started)
    );
    assert_eq!(h.observer.plays(), 2);
}

#[tokio::test]
async fn gesture_while_playing_is_ignored() {
    let h = harness();
    let policy = PlayGesturePolicy::new(h.controller.clone());
    policy.press_play(false).await.unwrap();

    assert_eq!(
        policy.press_play(false).await.unwrap(),
        PlayOutcome::AlreadyPlaying
    );
    assert_eq!(h.media.play_count(), 1);
    assert_eq!(h.controller.state().retry_count, 0);
}

#[tokio::test]
async fn track_change_resets_retries() {
    let h = harness();
    let policy = PlayGesturePolicy::new(h.controller.clone());
    h.media.fail_next(network_error());
    h.media.fail_next(network_error());
    policy.press_play(false).await.unwrap();
    policy.press_play(false).await.unwrap();
    assert_eq!(h.controller.state().retry_count, 2);

    h.controller
        .bind_track(TrackSource::new("https://radio.example/stream/jazz.ogg"))
        .unwrap();
    assert_eq!(h.controller.state().retry_count, 0);
    assert!(!policy.force_play_available());
}

#[tokio::test(start_paused = true)]
async fn timeout_does_not_count_as_retry() {
    let h = harness();
    let policy = PlayGesturePolicy::new(h.controller.clone());
    h.media.push(PlayScript::Hang);

    let gesture = policy.clone();
    tokio::spawn(async move { gesture.press_play(false).await });
    advance(Duration::from_secs(11)).await;

    let state = h.controller.state();
    assert_eq!(state.failure, Some(FailureKind::LoadTimeout));
    assert_eq!(state.retry_count, 0);
    assert!(!policy.force_play_available());
}

#[tokio::test(start_paused = true)]
async fn gesture_during_forced_attempt_stays_forced() {
    let h = harness();
    let policy = PlayGesturePolicy::new(h.controller.clone());
    h.media.push(PlayScript::Hang);
    h.media.push(PlayScript::Hang);

    let first = policy.clone();
    tokio::spawn(async move { first.force_play().await });
    advance(Duration::from_secs(1)).await;
    assert_eq!(h.controller.state().loading_label(), Some("Force playing..."));

    let second = policy.clone();
    tokio::spawn(async move { second.press_play(false).await });
    advance(Duration::from_secs(1)).await;

    let state = h.controller.state();
    assert!(state.is_force_play);
    assert_eq!(state.retry_count, 0);
    assert_eq!(h.media.play_count(), 2);
}
