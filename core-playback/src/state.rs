//! Controller state record and its invariant-preserving transitions.

use crate::error::FailureKind;
use bridge_traits::TrackSource;
use serde::{Deserialize, Serialize};

/// Lifecycle of the bound track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Idle,
    Loading,
    Playing,
    Paused,
    Ended,
    Error,
}

/// Highest buffering readiness the media primitive has reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadyState {
    Nothing,
    Metadata,
    CanPlay,
    CanPlayThrough,
}

/// Snapshot of everything a UI needs to render the player.
///
/// The controller owns the live record; callers get clones through
/// [`PlaybackController::state`](crate::PlaybackController::state).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    pub lifecycle: Lifecycle,
    /// The in-flight or playing attempt overrides prior failures.
    pub is_force_play: bool,
    /// Seconds.
    pub current_time: f64,
    /// Seconds; `None` until metadata arrives.
    pub duration: Option<f64>,
    pub volume: f32,
    /// Present exactly when `lifecycle` is `Error`.
    pub error_message: Option<String>,
    /// Present exactly when `lifecycle` is `Error`.
    pub failure: Option<FailureKind>,
    pub retry_count: u32,
    pub ready_state: ReadyState,
    pub track: Option<TrackSource>,
    /// Whether the most recent play attempt was forced.
    pub last_attempt_forced: bool,
}

impl ControllerState {
    pub(crate) fn new(volume: f32) -> Self {
        Self {
            lifecycle: Lifecycle::Idle,
            is_force_play: false,
            current_time: 0.0,
            duration: None,
            volume,
            error_message: None,
            failure: None,
            retry_count: 0,
            ready_state: ReadyState::Nothing,
            track: None,
            last_attempt_forced: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.lifecycle == Lifecycle::Playing
    }

    /// A play attempt is in flight; UIs show a spinner and disable the button.
    pub fn is_busy(&self) -> bool {
        self.lifecycle == Lifecycle::Loading
    }

    /// Label for the loading indicator.
    pub fn loading_label(&self) -> Option<&'static str> {
        match (self.is_busy(), self.is_force_play) {
            (true, true) => Some("Force playing..."),
            (true, false) => Some("Loading audio..."),
            (false, _) => None,
        }
    }

    /// Playback progress in `0.0..=1.0`, or 0 while the duration is unknown.
    pub fn progress_fraction(&self) -> f64 {
        match self.duration {
            Some(d) if d > 0.0 && d.is_finite() => (self.current_time / d).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Whether a seek is possible right now.
    pub fn is_seekable(&self) -> bool {
        matches!(self.duration, Some(d) if d > 0.0 && d.is_finite())
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    pub(crate) fn begin_loading(&mut self, force: bool) {
        self.clear_failure();
        self.lifecycle = Lifecycle::Loading;
        self.is_force_play = force;
        self.last_attempt_forced = force;
    }

    pub(crate) fn enter_playing(&mut self) {
        self.clear_failure();
        self.lifecycle = Lifecycle::Playing;
        self.is_force_play = false;
        self.retry_count = 0;
    }

    pub(crate) fn enter_paused(&mut self) {
        self.clear_failure();
        self.lifecycle = Lifecycle::Paused;
        self.is_force_play = false;
    }

    pub(crate) fn enter_ended(&mut self) {
        self.lifecycle = Lifecycle::Ended;
        self.is_force_play = false;
        self.current_time = 0.0;
    }

    pub(crate) fn enter_error(&mut self, kind: FailureKind) {
        self.lifecycle = Lifecycle::Error;
        self.is_force_play = false;
        self.failure = Some(kind);
        self.error_message = Some(kind.message().to_string());
    }

    /// Drop a reported error, returning to a resting state.
    ///
    /// Returns `true` if an error was cleared.
    pub(crate) fn clear_error(&mut self) -> bool {
        if self.lifecycle != Lifecycle::Error {
            return false;
        }
        self.clear_failure();
        self.lifecycle = if self.current_time > 0.0 {
            Lifecycle::Paused
        } else {
            Lifecycle::Idle
        };
        true
    }

    pub(crate) fn set_duration(&mut self, duration: f64) {
        self.duration = Some(duration);
        if duration.is_finite() && self.current_time > duration {
            self.current_time = duration;
        }
    }

    pub(crate) fn set_current_time(&mut self, time: f64) {
        let time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        self.current_time = match self.duration {
            Some(d) if d.is_finite() => time.min(d),
            _ => time,
        };
    }

    pub(crate) fn raise_ready_state(&mut self, ready: ReadyState) {
        self.ready_state = self.ready_state.max(ready);
    }

    fn clear_failure(&mut self) {
        self.failure = None;
        self.error_message = None;
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new(1.0)
    }
}
