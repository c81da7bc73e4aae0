//! Trailing-edge debouncing with injected time.
//!
//! Nothing here owns a timer: callers pass `now` to [`Debouncer::schedule`] and
//! [`Debouncer::poll`] from whatever clock drives them, which keeps tests deterministic.

use std::time::{Duration, Instant};

/// Coalescing window for layout passes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
struct Pending<T> {
    due: Instant,
    payload: T,
}

/// Holds at most one pending call. A new call replaces the pending one and restarts the window.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns `true` if a pending call was replaced.
    pub fn schedule(&mut self, now: Instant, payload: T) -> bool {
        let replaced = self.pending.is_some();
        self.pending = Some(Pending {
            due: now + self.window,
            payload,
        });
        tracing::trace!(replaced, "debounced call scheduled");
        replaced
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Takes the pending payload once its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| p.due <= now) {
            return self.pending.take().map(|p| p.payload);
        }
        None
    }

    /// Takes the pending payload immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.payload)
    }

    /// Drops the pending payload. Returns `true` if there was one.
    pub fn cancel(&mut self) -> bool {
        let had = self.pending.take().is_some();
        if had {
            tracing::trace!("debounced call cancelled");
        }
        had
    }
}
