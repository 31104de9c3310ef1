//! # Playback Controller Module
//!
//! Resilient playback control for a single streaming audio source.
//!
//! ## Overview
//!
//! This crate handles:
//! - The playback state machine ([`PlaybackController`]): play, pause, seek,
//!   volume, track binding and media element events
//! - Loading timeouts with late-success recovery
//! - Classification of media failures into listener-facing messages
//! - The retry/force-play gesture policy ([`PlayGesturePolicy`])
//!
//! Rendering is left to the host; it reads [`ControllerState`] snapshots,
//! subscribes to the event bus, or registers a [`PlaybackObserver`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use core_playback::{ControllerConfig, PlayGesturePolicy, PlaybackController};
//! use bridge_traits::{MediaElement, TrackSource};
//! use std::sync::Arc;
//!
//! async fn mount(media: Arc<dyn MediaElement>) -> core_playback::Result<()> {
//!     let controller = PlaybackController::new(media, ControllerConfig::default())?;
//!     controller.bind_track(TrackSource::new("https://radio.example/live.mp3"))?;
//!
//!     let policy = PlayGesturePolicy::new(controller.clone());
//!     policy.toggle().await?;
//!
//!     println!("{:?}", controller.state().lifecycle);
//!     controller.dispose();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod observer;
pub mod policy;
pub mod state;
mod timer;

pub use config::ControllerConfig;
pub use controller::{PlayOutcome, PlaybackController, PlaybackControllerBuilder};
pub use error::{FailureKind, PlaybackError, Result};
pub use format::{format_duration, format_time};
pub use observer::{PlaybackCallbacks, PlaybackObserver};
pub use policy::{GestureOutcome, PlayGesturePolicy};
pub use state::{ControllerState, Lifecycle, ReadyState};
