//! # Play Gesture Policy
//!
//! Decides how a listener's play gesture becomes a play request. The
//! controller only knows how to attempt playback; this layer counts failed
//! gestures and forces the next attempt once the retry ceiling
//! ([`ControllerConfig::max_retries`](crate::ControllerConfig::max_retries))
//! is reached.
//!
//! A forced attempt that fails starts a fresh cycle: the next gesture resets
//! the counter and plays unforced again.

use crate::controller::{PlayOutcome, PlaybackController};
use crate::error::Result;
use crate::state::Lifecycle;
use tracing::{debug, info};

/// Result of a toggle gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Paused,
    Play(PlayOutcome),
}

/// Retry/force-play policy layered over a [`PlaybackController`].
#[derive(Debug, Clone)]
pub struct PlayGesturePolicy {
    controller: PlaybackController,
}

impl PlayGesturePolicy {
    pub fn new(controller: PlaybackController) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn max_retries(&self) -> u32 {
        self.controller.config().max_retries
    }

    /// Handle a play gesture.
    ///
    /// The attempt is forced when `force` is set, when the retry ceiling has
    /// been reached, or when a forced attempt is already in flight.
    pub async fn press_play(&self, force: bool) -> Result<PlayOutcome> {
        let state = self.controller.state();
        if state.is_playing() {
            return Ok(PlayOutcome::AlreadyPlaying);
        }

        let forced_cycle_over = state.is_force_play
            || (state.lifecycle == Lifecycle::Error && state.last_attempt_forced);
        let retry_count = if forced_cycle_over {
            self.controller.reset_retries()
        } else {
            state.retry_count
        };

        let should_force = force || retry_count >= self.max_retries() || state.is_force_play;
        debug!(retry_count, requested = force, should_force, "Play gesture");

        let outcome = self.controller.request_play(should_force).await?;
        if let PlayOutcome::Failed(kind) = outcome {
            let retries = self.controller.record_failed_attempt();
            info!(retries, failure = kind.as_str(), "Play gesture failed");
        }
        Ok(outcome)
    }

    /// The play/pause button: pause when playing, otherwise a play gesture.
    pub async fn toggle(&self) -> Result<GestureOutcome> {
        if self.controller.state().is_playing() {
            self.controller.request_pause()?;
            return Ok(GestureOutcome::Paused);
        }
        Ok(GestureOutcome::Play(self.press_play(false).await?))
    }

    /// The explicit force-play button.
    pub async fn force_play(&self) -> Result<PlayOutcome> {
        self.press_play(true).await
    }

    /// Whether the UI should offer the force-play button.
    pub fn force_play_available(&self) -> bool {
        let state = self.controller.state();
        state.lifecycle == Lifecycle::Error && state.retry_count >= self.max_retries()
    }
}
