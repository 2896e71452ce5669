//! Polling cadence for remote jobs.
//!
//! The default strategy checks every four seconds and never gives up. The
//! optional limits only bound how long the caller is willing to wait; they
//! do not change which states a job passes through.

use std::time::{Duration, Instant};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollStrategy {
    /// Pause before every status check
    pub interval: Duration,
    /// Stop after this many status checks
    pub max_attempts: Option<u32>,
    /// Stop once this much wall-clock time has passed since polling began
    pub deadline: Option<Duration>,
    /// Consecutive transport failures tolerated on status checks
    pub transient_retries: u32,
}

impl Default for PollStrategy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
            deadline: None,
            transient_retries: 0,
        }
    }
}

impl PollStrategy {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_transient_retries(mut self, retries: u32) -> Self {
        self.transient_retries = retries;
        self
    }

    /// Whether another status check is allowed after `attempts` checks
    /// have been made since `started`.
    pub fn allows_another(&self, attempts: u32, started: Instant) -> bool {
        if self.max_attempts.is_some_and(|max| attempts >= max) {
            return false;
        }
        !self.deadline_passed(started)
    }

    pub fn deadline_passed(&self, started: Instant) -> bool {
        self.deadline.is_some_and(|limit| started.elapsed() >= limit)
    }

    /// Pause before the next status check: the interval, cut short so it
    /// never runs past the deadline.
    pub fn pause(&self, started: Instant) -> Duration {
        match self.deadline {
            Some(limit) => self.interval.min(limit.saturating_sub(started.elapsed())),
            None => self.interval,
        }
    }
}

/// Blocks the calling thread between status checks.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
