//! Lifecycle callbacks for the host UI.

use bridge_traits::platform::PlatformSendSync;
use std::fmt;

/// Callbacks fired at controller transitions.
///
/// Callbacks run after the controller has released its state lock, so they
/// may read [`PlaybackController::state`](crate::PlaybackController::state)
/// or issue further commands.
pub trait PlaybackObserver: PlatformSendSync {
    /// The media primitive acknowledged playback.
    fn on_play(&self) {}

    /// Playback was paused by the user.
    fn on_pause(&self) {}

    /// The track played to its end.
    fn on_ended(&self) {}
}

type Callback = Box<dyn Fn() + Send + Sync>;

/// Closure-based observer, for hosts that wire plain functions.
///
/// ```rust
/// use core_playback::PlaybackCallbacks;
///
/// let callbacks = PlaybackCallbacks::new()
///     .on_play(|| println!("playing"))
///     .on_ended(|| println!("done"));
/// ```
#[derive(Default)]
pub struct PlaybackCallbacks {
    on_play: Option<Callback>,
    on_pause: Option<Callback>,
    on_ended: Option<Callback>,
}

impl PlaybackCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_play(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_play = Some(Box::new(f));
        self
    }

    pub fn on_pause(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_pause = Some(Box::new(f));
        self
    }

    pub fn on_ended(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_ended = Some(Box::new(f));
        self
    }
}

impl PlaybackObserver for PlaybackCallbacks {
    fn on_play(&self) {
        if let Some(f) = &self.on_play {
            f();
        }
    }

    fn on_pause(&self) {
        if let Some(f) = &self.on_pause {
            f();
        }
    }

    fn on_ended(&self) {
        if let Some(f) = &self.on_ended {
            f();
        }
    }
}

impl fmt::Debug for PlaybackCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackCallbacks")
            .field("on_play", &self.on_play.is_some())
            .field("on_pause", &self.on_pause.is_some())
            .field("on_ended", &self.on_ended.is_some())
            .finish()
    }
}
