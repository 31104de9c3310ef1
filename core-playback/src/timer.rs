//! Single-shot timer slots owned by a controller instance.
//!
//! Each slot holds at most one live timer. Every arm or cancel bumps the
//! slot's generation; a firing timer must present the generation it was armed
//! with, so a timer that was cancelled after it woke up (but before it could
//! take the controller lock) is ignored.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

pub(crate) struct TimerSlot {
    name: &'static str,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl TimerSlot {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            generation: 0,
            handle: None,
        }
    }

    /// Cancel any pending timer and arm a new one.
    ///
    /// `fire` receives the generation to check with [`TimerSlot::is_current`].
    pub(crate) fn arm<F, Fut>(&mut self, delay: Duration, fire: F)
    where
        F: FnOnce(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let generation = self.generation;
        trace!(timer = self.name, generation, ?delay, "Arming timer");
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire(generation).await;
        }));
    }

    /// Cancel the pending timer, if any.
    pub(crate) fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(handle) = self.handle.take() {
            trace!(timer = self.name, "Cancelling timer");
            handle.abort();
        }
    }

    /// Whether a timer armed with `generation` is still the live one.
    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.handle.is_some() && self.generation == generation
    }

    /// Mark the live timer as fired.
    pub(crate) fn complete(&mut self) {
        self.handle = None;
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
