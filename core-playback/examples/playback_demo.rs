//! # Playback Controller Demo
//!
//! Drives a controller against a simulated media element: an autoplay
//! refusal, a slow start that trips the loading timeout and then recovers,
//! position updates, a seek, and the end of the track.
//!
//! Run with: `cargo run --example playback_demo --package core-playback`

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{MediaElement, MediaError, MediaEvent, TrackSource};
use core_playback::{
    format_duration, format_time, ControllerConfig, PlayGesturePolicy, PlaybackCallbacks,
    PlaybackController,
};
use core_runtime::events::{CoreEvent, EventBus};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

// ============================================================================
// Simulated media element
// ============================================================================

/// Refuses the first play (no user gesture yet), then starts slowly.
struct SimulatedAudio {
    plays: AtomicUsize,
    startup: Duration,
    events: mpsc::UnboundedSender<MediaEvent>,
}

#[async_trait]
impl MediaElement for SimulatedAudio {
    fn set_source(&self, source: &TrackSource) -> BridgeResult<()> {
        println!("  [media] src = {}", source.url);
        let _ = self.events.send(MediaEvent::MetadataReady { duration: 95.0 });
        Ok(())
    }

    async fn play(&self) -> Result<(), MediaError> {
        if self.plays.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(MediaError::from_name(
                "NotAllowedError",
                "play() failed because the user didn't interact with the document first",
            ));
        }
        tokio::time::sleep(self.startup).await;
        let _ = self.events.send(MediaEvent::CanPlayThrough);
        Ok(())
    }

    fn pause(&self) -> BridgeResult<()> {
        println!("  [media] pause");
        Ok(())
    }

    fn seek(&self, position: f64) -> BridgeResult<()> {
        println!("  [media] currentTime = {position:.1}");
        Ok(())
    }

    fn set_volume(&self, volume: f32) -> BridgeResult<()> {
        println!("  [media] volume = {volume:.2}");
        Ok(())
    }
}

fn print_state(label: &str, controller: &PlaybackController) {
    let state = controller.state();
    println!(
        "{label:<24} {:?} {} / {}{}",
        state.lifecycle,
        format_time(state.current_time),
        format_duration(state.duration),
        state
            .error_message
            .as_deref()
            .map(|m| format!("  ({m})"))
            .unwrap_or_default(),
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_filter("core_playback=info"),
    )?;

    let (media_tx, media_rx) = mpsc::unbounded_channel();
    let media = Arc::new(SimulatedAudio {
        plays: AtomicUsize::new(0),
        startup: Duration::from_secs(3),
        events: media_tx.clone(),
    });

    let bus = EventBus::new(64);
    let mut events = bus.subscribe();
    tokio::spawn(async move {
        while let Ok(CoreEvent::Playback(event)) = events.recv().await {
            println!("  [event] {event:?}");
        }
    });

    let callbacks = PlaybackCallbacks::new()
        .on_play(|| println!("  [ui] on_play"))
        .on_ended(|| println!("  [ui] on_ended"));

    let controller = PlaybackController::builder(media)
        .config(ControllerConfig::default().with_loading_timeout(Duration::from_secs(2)))
        .observer(Arc::new(callbacks))
        .event_bus(bus)
        .build()?;
    let pump = controller.spawn_event_pump(media_rx);
    let policy = PlayGesturePolicy::new(controller.clone());

    controller.bind_track(
        TrackSource::new("https://cdn.example/podcasts/ep42.mp3?token=secret")
            .with_title("Episode 42")
            .with_source_label("Weekly Show"),
    )?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    print_state("bound", &controller);

    policy.toggle().await?;
    print_state("autoplay refused", &controller);

    // Slow start: the loading timeout fires before the element answers.
    let gesture = policy.clone();
    let attempt = tokio::spawn(async move { gesture.press_play(false).await });
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    print_state("still starting", &controller);
    println!("force play offered: {}", policy.force_play_available());

    let outcome = attempt.await??;
    print_state(&format!("{outcome:?}"), &controller);

    for position in [10.0, 20.0, 30.0] {
        media_tx.send(MediaEvent::TimeUpdate { position })?;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    print_state("progress", &controller);

    controller.seek(0.9)?;
    controller.set_volume(0.5)?;
    media_tx.send(MediaEvent::Ended)?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    print_state("finished", &controller);

    controller.dispose();
    // The pump exits once the last sender (held by the media element) is gone.
    drop(policy);
    drop(controller);
    drop(media_tx);
    pump.await?;
    Ok(())
}
