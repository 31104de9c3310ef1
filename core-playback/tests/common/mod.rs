//! Shared test doubles for controller tests.
#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{MediaElement, MediaError, TrackSource};
use core_playback::{ControllerConfig, PlaybackController, PlaybackObserver};
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent, Receiver};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Scripted media element
// ============================================================================

/// How the next `play()` call answers.
#[derive(Debug, Clone)]
pub enum PlayScript {
    Succeed,
    Fail(MediaError),
    /// Answer after a delay (virtual time in paused-clock tests).
    After(Duration, Result<(), MediaError>),
    /// Never answer.
    Hang,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaCall {
    SetSource(String),
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
}

/// Media element whose play results follow a script; unscripted calls succeed.
#[derive(Default)]
pub struct ScriptedMedia {
    script: Mutex<VecDeque<PlayScript>>,
    calls: Mutex<Vec<MediaCall>>,
    reject_source: AtomicBool,
}

impl ScriptedMedia {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, step: PlayScript) {
        self.script.lock().unwrap().push_back(step);
    }

    pub fn fail_next(&self, error: MediaError) {
        self.push(PlayScript::Fail(error));
    }

    pub fn reject_sources(&self, reject: bool) {
        self.reject_source.store(reject, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn play_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MediaCall::Play))
            .count()
    }

    fn record(&self, call: MediaCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MediaElement for ScriptedMedia {
    fn set_source(&self, source: &TrackSource) -> BridgeResult<()> {
        self.record(MediaCall::SetSource(source.url.clone()));
        if self.reject_source.load(Ordering::SeqCst) {
            return Err(BridgeError::InvalidSource(source.url.clone()));
        }
        Ok(())
    }

    async fn play(&self) -> Result<(), MediaError> {
        self.record(MediaCall::Play);
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PlayScript::Succeed);

        match step {
            PlayScript::Succeed => Ok(()),
            PlayScript::Fail(err) => Err(err),
            PlayScript::After(delay, result) => {
                tokio::time::sleep(delay).await;
                result
            }
            PlayScript::Hang => std::future::pending().await,
        }
    }

    fn pause(&self) -> BridgeResult<()> {
        self.record(MediaCall::Pause);
        Ok(())
    }

    fn seek(&self, position: f64) -> BridgeResult<()> {
        self.record(MediaCall::Seek(position));
        Ok(())
    }

    fn set_volume(&self, volume: f32) -> BridgeResult<()> {
        self.record(MediaCall::SetVolume(volume));
        Ok(())
    }
}

// ============================================================================
// Recording observer
// ============================================================================

#[derive(Default)]
pub struct RecordingObserver {
    pub plays: AtomicUsize,
    pub pauses: AtomicUsize,
    pub ends: AtomicUsize,
}

impl RecordingObserver {
    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }

    pub fn pauses(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }

    pub fn ends(&self) -> usize {
        self.ends.load(Ordering::SeqCst)
    }
}

impl PlaybackObserver for RecordingObserver {
    fn on_play(&self) {
        self.plays.fetch_add(1, Ordering::SeqCst);
    }

    fn on_pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }

    fn on_ended(&self) {
        self.ends.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Harness
// ============================================================================

pub const TRACK_URL: &str = "https://radio.example/stream/morning.mp3";

pub struct Harness {
    pub media: Arc<ScriptedMedia>,
    pub observer: Arc<RecordingObserver>,
    pub controller: PlaybackController,
    pub events: Receiver<CoreEvent>,
}

impl Harness {
    /// Playback events published so far.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        let mut out = Vec::new();
        while let Ok(CoreEvent::Playback(event)) = self.events.try_recv() {
            out.push(event);
        }
        out
    }

    /// Failure kinds of the error events published so far.
    pub fn drain_error_kinds(&mut self) -> Vec<String> {
        self.drain_events()
            .into_iter()
            .filter_map(|e| match e {
                PlaybackEvent::Error { kind, .. } => Some(kind),
                _ => None,
            })
            .collect()
    }
}

pub fn harness() -> Harness {
    harness_with(ControllerConfig::default())
}

pub fn harness_with(config: ControllerConfig) -> Harness {
    let media = ScriptedMedia::new();
    let observer = Arc::new(RecordingObserver::default());
    let bus = EventBus::new(256);
    let events = bus.subscribe();

    let controller = PlaybackController::builder(media.clone())
        .config(config)
        .observer(observer.clone())
        .event_bus(bus)
        .build()
        .expect("valid config");
    controller
        .bind_track(TrackSource::new(TRACK_URL).with_title("Morning Show"))
        .expect("bind track");

    Harness {
        media,
        observer,
        controller,
        events,
    }
}

/// Sleep in virtual time; only meaningful under `start_paused = true`.
pub async fn advance(duration: Duration) {
    tokio::time::sleep(duration).await;
}
