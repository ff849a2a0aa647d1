//! Clock-injected debounce for slider input.
//!
//! The caller supplies timestamps (any monotonic origin), so the same type
//! runs under `setTimeout` in the browser and under plain tests.

use std::time::Duration;

/// Quiescence window the slider waits before compressing.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Duration,
}

/// Holds the latest scheduled value until input has been quiet for `window`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<Pending<T>>,
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

    /// Replace any pending value and restart the window from `now`.
    pub fn schedule(&mut self, value: T, now: Duration) {
        self.pending = Some(Pending {
            value,
            deadline: now.saturating_add(self.window),
        });
    }

    /// Take the pending value if its window has elapsed at `now`.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Drop the pending value, returning it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due, for arming a host timer.
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|p| p.deadline)
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
