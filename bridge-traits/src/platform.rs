//! Platform-specific helper abstractions used to keep trait bounds aligned with
//! the threading guarantees of each target.
//!
//! Native hosts drive the media primitive from a multi-threaded runtime, so
//! bridge implementations must be shareable across tasks. Browser hosts run on
//! a single thread and hand out objects (e.g. `HTMLAudioElement` wrappers) that
//! are neither `Send` nor `Sync`. The helper trait below makes the bound
//! conditional without duplicating every trait definition.

/// Marker trait that applies `Send + Sync` on native targets while becoming a
/// no-op on `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
pub trait PlatformSendSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<T> PlatformSendSync for T where T: Send + Sync {}

#[cfg(target_arch = "wasm32")]
pub trait PlatformSendSync {}

#[cfg(target_arch = "wasm32")]
impl<T> PlatformSendSync for T {}
