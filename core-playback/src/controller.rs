//! # Playback Controller
//!
//! Drives a host [`MediaElement`] through the playback state machine:
//!
//! ```text
//!  Idle ──play──> Loading ──ack──> Playing ──pause──> Paused
//!                  │  ▲              │  │                │
//!        fail/timeout│  └──play──────┼──┼────────────────┘
//!                  ▼                 │  └──ended──> Ended ──play──> Loading
//!                Error <──error──────┘
//! ```
//!
//! ## Timers
//!
//! The controller owns two timer slots. The loading timer is armed by every
//! play attempt and moves a still-`Loading` controller to `Error`
//! ([`FailureKind::LoadTimeout`]). It does not cancel the attempt: if the
//! media element acknowledges later, the controller still enters `Playing`.
//! The second slot is reserved for a delayed force play and is only ever
//! cancelled.
//!
//! ## Locking
//!
//! State lives behind a `parking_lot::Mutex` that is never held across an
//! await point or while calling into the host (media commands, observer
//! callbacks, event subscribers), so hosts may re-enter the controller from
//! any of those.
//!
//! ## Liveness
//!
//! Each play attempt gets a sequence number. Pausing, binding a new track,
//! disposing, or issuing a newer attempt supersedes it, and its eventual
//! result is discarded. Timer tasks hold only a weak reference and check the
//! slot generation before touching state.

use crate::config::ControllerConfig;
use crate::error::{FailureKind, PlaybackError, Result};
use crate::observer::PlaybackObserver;
use crate::state::{ControllerState, Lifecycle, ReadyState};
use crate::timer::TimerSlot;

use bridge_traits::{MediaElement, MediaError, MediaEvent, TrackSource};
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
use core_runtime::logging::redact_url;
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Result of a play request once the media element has answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Playback started.
    Started,
    /// The controller was already playing; nothing was issued.
    AlreadyPlaying,
    /// The play command failed; the controller is in `Error`.
    Failed(FailureKind),
    /// A pause, track change, dispose or newer attempt overtook this one
    /// before the media element answered.
    Superseded,
}

struct Inner {
    state: ControllerState,
    loading_timer: TimerSlot,
    /// Reserved for a delayed force play; cancelled with the loading timer.
    play_timer: TimerSlot,
    attempt: u64,
    /// The current attempt has not been answered yet.
    in_flight: bool,
    disposed: bool,
}

impl Inner {
    fn ensure_live(&self) -> Result<()> {
        if self.disposed {
            Err(PlaybackError::Disposed)
        } else {
            Ok(())
        }
    }

    fn cancel_timers(&mut self) {
        self.loading_timer.cancel();
        self.play_timer.cancel();
    }

    fn supersede_attempt(&mut self) {
        self.attempt = self.attempt.wrapping_add(1);
        self.in_flight = false;
    }

    fn track_url(&self) -> String {
        self.state
            .track
            .as_ref()
            .map(|t| redact_url(&t.url))
            .unwrap_or_default()
    }
}

struct Shared {
    id: Uuid,
    inner: Mutex<Inner>,
    media: Arc<dyn MediaElement>,
    observer: Option<Arc<dyn PlaybackObserver>>,
    events: Option<EventBus>,
    config: ControllerConfig,
}

/// Playback controller for a single streaming track.
///
/// Cheap to clone; clones share the same state, timers and media element.
#[derive(Clone)]
pub struct PlaybackController {
    shared: Arc<Shared>,
}

/// Builder for [`PlaybackController`].
pub struct PlaybackControllerBuilder {
    media: Arc<dyn MediaElement>,
    config: ControllerConfig,
    observer: Option<Arc<dyn PlaybackObserver>>,
    events: Option<EventBus>,
}

impl PlaybackControllerBuilder {
    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Receive `on_play` / `on_pause` / `on_ended` callbacks.
    pub fn observer(mut self, observer: Arc<dyn PlaybackObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Publish transitions on an event bus.
    pub fn event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Validate the configuration and create the controller.
    pub fn build(self) -> Result<PlaybackController> {
        self.config.validate()?;

        let volume = self.config.initial_volume;
        if let Err(err) = self.media.set_volume(volume) {
            warn!(error = %err, volume, "Media element rejected initial volume");
        }

        let shared = Shared {
            id: Uuid::new_v4(),
            inner: Mutex::new(Inner {
                state: ControllerState::new(volume),
                loading_timer: TimerSlot::new("loading"),
                play_timer: TimerSlot::new("force_play"),
                attempt: 0,
                in_flight: false,
                disposed: false,
            }),
            media: self.media,
            observer: self.observer,
            events: self.events,
            config: self.config,
        };
        debug!(controller = %shared.id, "Playback controller created");

        Ok(PlaybackController {
            shared: Arc::new(shared),
        })
    }
}

impl PlaybackController {
    /// Start building a controller around `media`.
    pub fn builder(media: Arc<dyn MediaElement>) -> PlaybackControllerBuilder {
        PlaybackControllerBuilder {
            media,
            config: ControllerConfig::default(),
            observer: None,
            events: None,
        }
    }

    /// Create a controller with `config` and no observers.
    pub fn new(media: Arc<dyn MediaElement>, config: ControllerConfig) -> Result<Self> {
        Self::builder(media).config(config).build()
    }

    /// Instance identifier, recorded on this controller's log spans.
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.shared.config
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ControllerState {
        self.shared.inner.lock().state.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.inner.lock().disposed
    }

    /// Whether the loading timer is currently armed.
    pub fn is_loading_timer_armed(&self) -> bool {
        self.shared.inner.lock().loading_timer.is_armed()
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Bind a track, resetting all playback state.
    ///
    /// Binding the URL that is already bound only refreshes the descriptor.
    /// Volume carries over.
    #[instrument(level = "debug", skip_all, fields(controller = %self.shared.id))]
    pub fn bind_track(&self, source: TrackSource) -> Result<()> {
        let attempt = {
            let mut inner = self.shared.inner.lock();
            inner.ensure_live()?;

            let same_track = inner
                .state
                .track
                .as_ref()
                .is_some_and(|t| t.same_identity(&source));
            if same_track {
                debug!("Track already bound; refreshing descriptor");
                inner.state.track = Some(source);
                return Ok(());
            }

            inner.cancel_timers();
            inner.supersede_attempt();
            let volume = inner.state.volume;
            inner.state = ControllerState::new(volume);
            inner.state.track = Some(source.clone());
            inner.attempt
        };

        let track_url = redact_url(&source.url);
        info!(url = %track_url, title = ?source.title, "Binding track");
        self.publish(PlaybackEvent::TrackBound {
            track_url,
            title: source.title.clone(),
        });

        if let Err(err) = self.shared.media.set_source(&source) {
            warn!(error = %err, "Media element rejected source");
            let mut inner = self.shared.inner.lock();
            if !inner.disposed && inner.attempt == attempt {
                inner.state.enter_error(FailureKind::Transient);
                let track_url = inner.track_url();
                drop(inner);
                self.publish_error(FailureKind::Transient, track_url);
            }
        }

        Ok(())
    }

    /// Ask the media element to play.
    ///
    /// Resolves once the element has answered. While the answer is pending
    /// the controller is `Loading`, and may time out into `Error`; the answer
    /// is still applied when it arrives unless the attempt was superseded.
    ///
    /// Only returns `Err` if the controller was disposed; playback failures
    /// are reported as [`PlayOutcome::Failed`] and through the state.
    #[instrument(level = "debug", skip(self), fields(controller = %self.shared.id))]
    pub async fn request_play(&self, force: bool) -> Result<PlayOutcome> {
        let (attempt, track_url) = {
            let mut inner = self.shared.inner.lock();
            inner.ensure_live()?;
            if inner.state.is_playing() {
                debug!("Already playing; ignoring play request");
                return Ok(PlayOutcome::AlreadyPlaying);
            }

            inner.state.begin_loading(force);
            inner.play_timer.cancel();
            inner.supersede_attempt();
            inner.in_flight = true;
            self.arm_loading_timer(&mut inner);
            (inner.attempt, inner.track_url())
        };

        info!(forced = force, "Requesting playback");
        self.publish(PlaybackEvent::Loading {
            track_url,
            forced: force,
        });

        let result = self.shared.media.play().await;

        let mut inner = self.shared.inner.lock();
        if inner.disposed || inner.attempt != attempt {
            debug!(?result, "Discarding result of superseded play attempt");
            return Ok(PlayOutcome::Superseded);
        }
        inner.in_flight = false;
        inner.loading_timer.cancel();

        match result {
            Ok(()) => {
                let after_timeout = inner.state.failure == Some(FailureKind::LoadTimeout);
                inner.state.enter_playing();
                let track_url = inner.track_url();
                drop(inner);

                if after_timeout {
                    info!("Playback started after loading timeout");
                } else {
                    info!("Playback started");
                }
                self.publish(PlaybackEvent::Started {
                    track_url,
                    forced: force,
                });
                if let Some(observer) = &self.shared.observer {
                    observer.on_play();
                }
                Ok(PlayOutcome::Started)
            }
            Err(err) => {
                let kind = FailureKind::classify(&err);
                inner.state.enter_error(kind);
                let track_url = inner.track_url();
                drop(inner);

                warn!(error = %err, failure = kind.as_str(), "Play command failed");
                self.publish_error(kind, track_url);
                Ok(PlayOutcome::Failed(kind))
            }
        }
    }

    /// Pause playback.
    ///
    /// The pause command always reaches the media element and supersedes any
    /// unanswered play attempt. The controller transitions (and fires
    /// `on_pause`) from `Loading`, `Playing`, or an `Error` left by a loading
    /// timeout whose attempt is still pending; from any other state it stays
    /// put.
    #[instrument(level = "debug", skip(self), fields(controller = %self.shared.id))]
    pub fn request_pause(&self) -> Result<()> {
        let transition = {
            let mut inner = self.shared.inner.lock();
            inner.ensure_live()?;
            inner.cancel_timers();

            let timed_out_attempt = inner.in_flight
                && inner.state.failure == Some(FailureKind::LoadTimeout);
            inner.supersede_attempt();

            match inner.state.lifecycle {
                Lifecycle::Loading | Lifecycle::Playing => {
                    inner.state.enter_paused();
                    Some((inner.track_url(), inner.state.current_time))
                }
                Lifecycle::Error if timed_out_attempt => {
                    debug!("Pausing attempt that outlived its loading timeout");
                    inner.state.enter_paused();
                    Some((inner.track_url(), inner.state.current_time))
                }
                lifecycle => {
                    debug!(?lifecycle, "Nothing to pause");
                    None
                }
            }
        };

        if let Err(err) = self.shared.media.pause() {
            warn!(error = %err, "Media element rejected pause");
        }

        if let Some((track_url, position)) = transition {
            info!(position, "Playback paused");
            self.publish(PlaybackEvent::Paused {
                track_url,
                position,
            });
            if let Some(observer) = &self.shared.observer {
                observer.on_pause();
            }
        }

        Ok(())
    }

    /// Jump to `fraction` (clamped to `0.0..=1.0`) of the track.
    ///
    /// Returns the target position in seconds.
    #[instrument(level = "debug", skip(self), fields(controller = %self.shared.id))]
    pub fn seek(&self, fraction: f64) -> Result<f64> {
        if fraction.is_nan() {
            return Err(PlaybackError::InvalidSeekPosition(fraction));
        }

        let (target, duration) = {
            let mut inner = self.shared.inner.lock();
            inner.ensure_live()?;
            let duration = match inner.state.duration {
                Some(d) if d > 0.0 && d.is_finite() => d,
                _ => return Err(PlaybackError::DurationUnknown),
            };
            let target = fraction.clamp(0.0, 1.0) * duration;
            inner.state.set_current_time(target);
            (target, duration)
        };

        if let Err(err) = self.shared.media.seek(target) {
            warn!(error = %err, target, "Media element rejected seek");
        }

        debug!(target, duration, "Seeked");
        self.publish(PlaybackEvent::PositionChanged {
            position: target,
            duration: Some(duration),
        });
        Ok(target)
    }

    /// Set output volume, clamped to `0.0..=1.0`. Returns the applied volume.
    #[instrument(level = "debug", skip(self), fields(controller = %self.shared.id))]
    pub fn set_volume(&self, volume: f32) -> Result<f32> {
        if volume.is_nan() {
            return Err(PlaybackError::InvalidVolume(volume));
        }
        let volume = volume.clamp(0.0, 1.0);

        {
            let mut inner = self.shared.inner.lock();
            inner.ensure_live()?;
            inner.state.volume = volume;
        }

        if let Err(err) = self.shared.media.set_volume(volume) {
            warn!(error = %err, volume, "Media element rejected volume");
        }

        self.publish(PlaybackEvent::VolumeChanged { volume });
        Ok(volume)
    }

    /// Cancel all timers and stop accepting commands and events.
    ///
    /// Idempotent. In-flight play attempts are discarded when they resolve.
    pub fn dispose(&self) {
        {
            let mut inner = self.shared.inner.lock();
            if inner.disposed {
                return;
            }
            inner.disposed = true;
            inner.cancel_timers();
            inner.supersede_attempt();
        }

        info!(controller = %self.shared.id, "Playback controller disposed");
        self.publish(PlaybackEvent::Disposed);
    }

    // ========================================================================
    // Media element events
    // ========================================================================

    /// Apply a notification from the media element. Ignored once disposed.
    pub fn handle_event(&self, event: MediaEvent) {
        match event {
            MediaEvent::MetadataReady { duration } => self.on_metadata_ready(duration),
            MediaEvent::TimeUpdate { position } => self.on_time_update(position),
            MediaEvent::Ended => self.on_ended(),
            MediaEvent::Error(err) => self.on_primitive_error(&err),
            MediaEvent::CanPlay => self.on_ready(ReadyState::CanPlay),
            MediaEvent::CanPlayThrough => self.on_ready(ReadyState::CanPlayThrough),
        }
    }

    /// Drain `events` into [`handle_event`](Self::handle_event) on a task.
    ///
    /// The pump stops when the channel closes, the controller is disposed, or
    /// every controller handle has been dropped.
    pub fn spawn_event_pump(
        &self,
        mut events: mpsc::UnboundedReceiver<MediaEvent>,
    ) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.shared);
        let id = self.shared.id;
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let Some(shared) = weak.upgrade() else {
                    break;
                };
                let controller = PlaybackController { shared };
                if controller.is_disposed() {
                    break;
                }
                controller.handle_event(event);
            }
            debug!(controller = %id, "Media event pump stopped");
        })
    }

    /// Stream metadata arrived. Clears any reported error.
    pub fn on_metadata_ready(&self, duration: f64) {
        if duration.is_nan() || duration < 0.0 {
            warn!(duration, "Ignoring invalid duration from media element");
            return;
        }

        let mut inner = self.shared.inner.lock();
        if inner.disposed {
            return;
        }
        inner.state.set_duration(duration);
        inner.state.raise_ready_state(ReadyState::Metadata);
        let cleared = inner.state.clear_error();
        drop(inner);

        debug!(duration, cleared_error = cleared, "Metadata ready");
    }

    /// Playback position moved. Accepted in every state.
    pub fn on_time_update(&self, position: f64) {
        let (position, duration) = {
            let mut inner = self.shared.inner.lock();
            if inner.disposed {
                return;
            }
            inner.state.set_current_time(position);
            (inner.state.current_time, inner.state.duration)
        };

        self.publish(PlaybackEvent::PositionChanged { position, duration });
    }

    /// Track reached its end. Only meaningful while `Playing`.
    pub fn on_ended(&self) {
        let track_url = {
            let mut inner = self.shared.inner.lock();
            if inner.disposed {
                return;
            }
            if !inner.state.is_playing() {
                debug!(lifecycle = ?inner.state.lifecycle, "Ignoring ended event");
                return;
            }
            inner.cancel_timers();
            inner.state.enter_ended();
            inner.track_url()
        };

        info!("Track ended");
        self.publish(PlaybackEvent::Completed { track_url });
        if let Some(observer) = &self.shared.observer {
            observer.on_ended();
        }
    }

    /// The media element failed outside of a play command.
    pub fn on_primitive_error(&self, error: &MediaError) {
        let kind = FailureKind::classify(error);
        let track_url = {
            let mut inner = self.shared.inner.lock();
            if inner.disposed {
                return;
            }
            inner.cancel_timers();
            inner.state.enter_error(kind);
            inner.track_url()
        };

        warn!(error = %error, failure = kind.as_str(), "Media element error");
        self.publish_error(kind, track_url);
    }

    fn on_ready(&self, ready: ReadyState) {
        let mut inner = self.shared.inner.lock();
        if inner.disposed {
            return;
        }
        inner.state.raise_ready_state(ready);
        let cleared = inner.state.clear_error();
        drop(inner);

        debug!(?ready, cleared_error = cleared, "Media element ready");
    }

    // ========================================================================
    // Retry bookkeeping (driven by the gesture policy)
    // ========================================================================

    pub(crate) fn reset_retries(&self) -> u32 {
        self.shared.inner.lock().state.retry_count = 0;
        0
    }

    pub(crate) fn record_failed_attempt(&self) -> u32 {
        let mut inner = self.shared.inner.lock();
        inner.state.retry_count = inner.state.retry_count.saturating_add(1);
        inner.state.retry_count
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn arm_loading_timer(&self, inner: &mut Inner) {
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        inner
            .loading_timer
            .arm(self.shared.config.loading_timeout, move |generation| async move {
                if let Some(shared) = weak.upgrade() {
                    let controller = PlaybackController { shared };
                    controller.on_loading_timeout(generation);
                }
            });
    }

    fn on_loading_timeout(&self, generation: u64) {
        let track_url = {
            let mut inner = self.shared.inner.lock();
            if inner.disposed || !inner.loading_timer.is_current(generation) {
                debug!("Ignoring stale loading timer");
                return;
            }
            inner.loading_timer.complete();
            if inner.state.lifecycle != Lifecycle::Loading {
                return;
            }
            inner.state.enter_error(FailureKind::LoadTimeout);
            inner.track_url()
        };

        warn!(
            controller = %self.shared.id,
            timeout = ?self.shared.config.loading_timeout,
            "Loading timed out; force play available"
        );
        self.publish_error(FailureKind::LoadTimeout, track_url);
    }

    fn publish_error(&self, kind: FailureKind, track_url: String) {
        self.publish(PlaybackEvent::Error {
            track_url: (!track_url.is_empty()).then_some(track_url),
            kind: kind.as_str().to_string(),
            message: kind.message().to_string(),
            recoverable: kind.is_recoverable(),
        });
    }

    fn publish(&self, event: PlaybackEvent) {
        if let Some(bus) = &self.shared.events {
            // No subscribers is fine.
            let _ = bus.emit(CoreEvent::Playback(event));
        }
    }
}

impl fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.inner.lock();
        f.debug_struct("PlaybackController")
            .field("id", &self.shared.id)
            .field("lifecycle", &inner.state.lifecycle)
            .field("disposed", &inner.disposed)
            .finish()
    }
}
