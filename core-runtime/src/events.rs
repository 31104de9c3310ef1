//! # Event Bus System
//!
//! Broadcasts playback controller transitions to any number of UI
//! collaborators using `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! - **Event Types**: [`CoreEvent`] wraps domain enums; today only
//!   [`PlaybackEvent`] exists.
//! - **EventBus**: cloneable sender side; controllers publish through it.
//! - **EventStream**: receiver wrapper with predicate filtering.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(32);
//! let mut rx = bus.subscribe();
//!
//! bus.emit(CoreEvent::Playback(PlaybackEvent::Started {
//!     track_url: "https://radio.example/live.mp3".to_string(),
//!     forced: false,
//! }))
//! .ok();
//!
//! let event = rx.recv().await.unwrap();
//! assert_eq!(event.description(), "Playback started");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber fell behind by `n` events.
//!   Non-fatal; a UI can simply re-read the controller snapshot.
//! - **`RecvError::Closed`**: every sender was dropped, i.e. the controller is gone.
//!
//! `emit` fails when nobody is subscribed; publishers ignore that.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Time updates arrive a few times per second, so this covers tens of seconds
/// of a stalled subscriber before it starts lagging.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Playback controller events
    Playback(PlaybackEvent),
}

impl CoreEvent {
    /// Human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Playback(e) => e.description(),
        }
    }

    /// Severity, for hosts that route events to notifications.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Playback(PlaybackEvent::Error {
                recoverable: false, ..
            }) => EventSeverity::Error,
            CoreEvent::Playback(PlaybackEvent::Error { .. }) => EventSeverity::Warning,
            CoreEvent::Playback(PlaybackEvent::PositionChanged { .. }) => EventSeverity::Debug,
            CoreEvent::Playback(_) => EventSeverity::Info,
        }
    }
}

/// Event severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Playback Events
// ============================================================================

/// Transitions of a playback controller. Times are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// A new track was bound; all playback state was reset.
    TrackBound {
        /// Track URL, redacted for logging.
        track_url: String,
        title: Option<String>,
    },
    /// A play attempt was issued to the media primitive.
    Loading {
        track_url: String,
        /// Whether the attempt overrides prior failures.
        forced: bool,
    },
    /// The media primitive acknowledged playback.
    Started {
        track_url: String,
        /// Whether the attempt that succeeded was forced.
        forced: bool,
    },
    /// Playback paused by the user.
    Paused { track_url: String, position: f64 },
    /// Track reached its end.
    Completed { track_url: String },
    /// Playback position changed (time update or seek).
    PositionChanged {
        position: f64,
        duration: Option<f64>,
    },
    /// Output volume changed.
    VolumeChanged { volume: f32 },
    /// The controller entered its error state.
    Error {
        track_url: Option<String>,
        /// Stable failure identifier (e.g. `load_timeout`).
        kind: String,
        /// Message shown to the listener.
        message: String,
        /// Whether another play gesture may succeed.
        recoverable: bool,
    },
    /// The controller was disposed; no further events follow.
    Disposed,
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::TrackBound { .. } => "Track bound",
            PlaybackEvent::Loading { .. } => "Playback loading",
            PlaybackEvent::Started { .. } => "Playback started",
            PlaybackEvent::Paused { .. } => "Playback paused",
            PlaybackEvent::Completed { .. } => "Track completed",
            PlaybackEvent::PositionChanged { .. } => "Playback position changed",
            PlaybackEvent::VolumeChanged { .. } => "Volume changed",
            PlaybackEvent::Error { .. } => "Playback error",
            PlaybackEvent::Disposed => "Controller disposed",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscription. Only events emitted afterwards are received.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream
// ============================================================================

type EventPredicate = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// Receiver wrapper that skips events not matching a predicate.
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventPredicate>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only yield events matching `predicate`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receive the next matching event.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.matches(&event) {
                return Ok(event);
            }
        }
    }

    /// Receive the next matching event without waiting.
    ///
    /// Returns `None` when no matching event is buffered.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        use broadcast::error::TryRecvError;

        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.matches(&event) => return Some(Ok(event)),
                Ok(_) => continue,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
                Err(TryRecvError::Lagged(n)) => return Some(Err(RecvError::Lagged(n))),
            }
        }
    }

    fn matches(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |f| f(event))
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}
