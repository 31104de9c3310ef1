//! Workspace placeholder crate.
//!
//! This crate exists to expose a single feature flag that maps to the
//! playback controller crates (`core-playback`, `core-runtime`). Host UIs can
//! depend on `stream-player-workspace` and enable `playback` without wiring each
//! crate individually.

#[cfg(feature = "playback")]
pub use core_playback as playback;

#[cfg(feature = "playback")]
pub use core_runtime as runtime;
