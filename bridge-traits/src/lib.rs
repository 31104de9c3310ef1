//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host embedding
//! the playback controller.
//!
//! ## Overview
//!
//! This crate defines the contract between the core playback controller and
//! the host environment. The core never talks to an audio engine directly; it
//! issues intents through [`MediaElement`](playback::MediaElement) and reacts to
//! [`MediaEvent`](playback::MediaEvent)s the host forwards back.
//!
//! ## Traits
//!
//! - [`MediaElement`](playback::MediaElement) - play/pause/seek/volume commands
//!   against the host's playback engine
//! - [`LoggerSink`](logging::LoggerSink) - forward structured logs to host logging
//!
//! ## Error Handling
//!
//! Bridge operations return [`BridgeError`](error::BridgeError). Play failures
//! and engine error events are reported as [`MediaError`](error::MediaError),
//! which hosts build once from their native error objects (see
//! [`MediaError::from_name`](error::MediaError::from_name)).
//!
//! ## Thread Safety
//!
//! On native targets all bridge traits require `Send + Sync`; on `wasm32` the
//! bound is dropped so browser objects can implement them directly.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::{MediaElement, MediaError, TrackSource};
//! use bridge_traits::error::Result;
//!
//! struct HtmlAudio { element: web_sys::HtmlAudioElement }
//!
//! #[async_trait::async_trait(?Send)]
//! impl MediaElement for HtmlAudio {
//!     fn set_source(&self, source: &TrackSource) -> Result<()> {
//!         self.element.set_src(&source.url);
//!         Ok(())
//!     }
//!
//!     async fn play(&self) -> std::result::Result<(), MediaError> {
//!         // await the play() promise and map DOMException names
//!         todo!()
//!     }
//!     // ...
//! }
//! ```

pub mod error;
pub mod logging;
pub mod platform;
pub mod playback;

pub use error::{BridgeError, MediaError};

// Re-export commonly used types
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use playback::{MediaElement, MediaEvent, TrackSource};
