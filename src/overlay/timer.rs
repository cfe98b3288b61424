//! Single-shot idle timer
//!
//! The timer is a deadline rather than a spawned task: the event loop sleeps
//! until [`IdleTimer::deadline`] and then asks whether it fired. Arming
//! replaces the previous deadline, so at most one timer is ever live.

use log::debug;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct IdleTimer {
    deadline: Option<Instant>,

    /// Bumped on every arm; identifies the live instance in logs
    arm_count: u64,
}

impl IdleTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the timer to fire `after` from `now`, cancelling any pending instance
    pub fn arm(&mut self, now: Instant, after: Duration) {
        self.arm_count += 1;
        self.deadline = Some(now + after);
        debug!("Idle timer #{} armed for {:?}", self.arm_count, after);
    }

    pub fn disarm(&mut self) {
        if self.deadline.take().is_some() {
            debug!("Idle timer #{} disarmed", self.arm_count);
        }
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the timer if its deadline has passed
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
