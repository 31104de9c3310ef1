//! # Playback Error Types
//!
//! Two families of errors live here:
//!
//! - [`FailureKind`]: the closed classification of everything that can go
//!   wrong while playing. These never cross the controller boundary as `Err`;
//!   they become the controller's `Error` state and its listener-facing message.
//! - [`PlaybackError`]: misuse of the controller API (seeking without a
//!   duration, calling into a disposed controller, bad configuration).

use bridge_traits::MediaError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classified playback failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The host refused to start playback (autoplay policy). The listener must
    /// grant permission, usually by interacting with the page.
    PermissionDenied,
    /// The source cannot be played by this host.
    FormatUnsupported,
    /// The play command neither succeeded nor failed within the loading window.
    /// It may still succeed later.
    LoadTimeout,
    /// Network hiccups, decode errors and anything unrecognized.
    Transient,
}

impl FailureKind {
    /// Classify a raw media primitive failure.
    pub fn classify(error: &MediaError) -> Self {
        match error {
            MediaError::NotAllowed(_) => FailureKind::PermissionDenied,
            MediaError::NotSupported(_) => FailureKind::FormatUnsupported,
            MediaError::Aborted(_)
            | MediaError::Network(_)
            | MediaError::Decode(_)
            | MediaError::Other { .. } => FailureKind::Transient,
        }
    }

    /// Message shown to the listener.
    pub fn message(&self) -> &'static str {
        match self {
            FailureKind::PermissionDenied => "Please allow audio playback in your browser.",
            FailureKind::FormatUnsupported => "Audio format not supported.",
            FailureKind::LoadTimeout => "Audio loading timeout. Click play again to force play.",
            FailureKind::Transient => "Failed to play audio. Click play again to retry.",
        }
    }

    /// Stable identifier used in events and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::PermissionDenied => "permission_denied",
            FailureKind::FormatUnsupported => "format_unsupported",
            FailureKind::LoadTimeout => "load_timeout",
            FailureKind::Transient => "transient",
        }
    }

    /// Returns `false` only when retrying the same source cannot help.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FailureKind::FormatUnsupported)
    }
}

/// Errors returned by controller operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// The controller was disposed; it accepts no further operations.
    #[error("Playback controller disposed")]
    Disposed,

    /// Seeking requires a known, positive duration.
    #[error("Track duration unknown")]
    DurationUnknown,

    /// Seek fraction was not a number.
    #[error("Invalid seek position: {0}")]
    InvalidSeekPosition(f64),

    /// Volume was not a number.
    #[error("Invalid volume: {0}")]
    InvalidVolume(f32),

    /// Controller configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
