//! Debounce timers for the cooperative event loop
//!
//! A [`Debouncer`] only keeps the deadline. The owner passes the current
//! time in and decides what to run when a trigger or poll says so, which
//! keeps the timers free of closures over shared state.

use std::time::{Duration, Instant};

/// Collapses bursts of triggers into one run after a quiet period
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    immediate: bool,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Trailing-edge debouncer: runs once `delay` after the last trigger
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            immediate: false,
            deadline: None,
        }
    }

    /// Leading-edge debouncer: runs on the first trigger of a burst, then
    /// ignores triggers until `delay` has passed without one
    pub fn immediate(delay: Duration) -> Self {
        Self {
            delay,
            immediate: true,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Reset the timer to `now + delay`.
    ///
    /// Returns true when the caller should run right away (leading edge of
    /// an immediate debouncer with nothing pending).
    pub fn trigger(&mut self, now: Instant) -> bool {
        let call_now = self.immediate && self.deadline.is_none();
        self.deadline = Some(now + self.delay);
        call_now
    }

    /// Drop the pending run, if any
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Check the timer. Once the deadline has passed it is cleared, and
    /// true is returned for trailing-edge debouncers.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                !self.immediate
            }
            _ => false,
        }
    }
}
