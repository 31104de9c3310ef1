//! # Core Runtime Module
//!
//! Foundational runtime infrastructure shared by the playback crates:
//! - Logging and tracing setup
//! - Event bus for broadcasting controller transitions to UI collaborators
//!
//! ## Overview
//!
//! This crate establishes the logging conventions and the event broadcasting
//! mechanism used by `core-playback`. It knows nothing about the controller's
//! state machine; events carry plain data so any host can consume them.

pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
