//! Media primitive bridge traits and supporting types.
//!
//! These abstractions let the core playback controller drive a host-provided
//! audio engine (an `<audio>` element, an HLS-capable player, a native media
//! session) without knowing anything about how bytes are fetched or decoded.
//! Host applications implement [`MediaElement`] and forward the engine's
//! notifications as [`MediaEvent`] values.

use crate::{
    error::{MediaError, Result},
    platform::PlatformSendSync,
};
use serde::{Deserialize, Serialize};

/// Descriptor of the single track bound to a media element.
///
/// The URL is the track's identity: binding a different URL is a track change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSource {
    /// Stream URL handed to the host engine.
    pub url: String,
    /// Display title.
    pub title: Option<String>,
    /// Display label for where the stream comes from (station, feed, ...).
    pub source_label: Option<String>,
}

impl TrackSource {
    /// Create a descriptor for the given stream URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            source_label: None,
        }
    }

    /// Attach a display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach a source label.
    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = Some(label.into());
        self
    }

    /// Returns `true` if `other` refers to the same stream.
    pub fn same_identity(&self, other: &TrackSource) -> bool {
        self.url == other.url
    }
}

/// Asynchronous notifications emitted by a media element.
///
/// Times are in seconds.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Stream metadata is available; `duration` may be infinite for live streams.
    MetadataReady { duration: f64 },
    /// Playback position advanced or jumped.
    TimeUpdate { position: f64 },
    /// Playback reached the end of the stream.
    Ended,
    /// The engine failed outside of a play command.
    Error(MediaError),
    /// Enough data is buffered to start playing.
    CanPlay,
    /// Enough data is buffered to play to the end without stalling.
    CanPlayThrough,
}

/// Trait for host-provided playback engines.
///
/// Only `play` is asynchronous: it resolves once the engine has actually
/// started (or refused to start). The remaining commands are fire-and-forget;
/// their effects surface through [`MediaEvent`]s.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait MediaElement: PlatformSendSync {
    /// Point the engine at a new source. Any in-flight play command for the
    /// previous source may still resolve afterwards.
    fn set_source(&self, source: &TrackSource) -> Result<()>;

    /// Begin or resume playback.
    async fn play(&self) -> std::result::Result<(), MediaError>;

    /// Pause playback without releasing the source.
    fn pause(&self) -> Result<()>;

    /// Jump to an absolute position in seconds.
    fn seek(&self, position: f64) -> Result<()>;

    /// Adjust output volume, normalized to `0.0..=1.0`.
    fn set_volume(&self, volume: f32) -> Result<()>;
}
