// Expansion permission check
//
// The controller asks the guard before every expansion. The default guard is a
// sliding-window rate limiter that stops runaway rapid-fire expansions.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default sliding window for the rate limiter
pub const DEFAULT_RATE_WINDOW: Duration = Duration::from_secs(2);

/// Default number of expansions allowed per window
pub const DEFAULT_MAX_EXPANSIONS_PER_WINDOW: usize = 20;

/// Decides whether an expansion may proceed right now
pub trait ExpansionGuard: Send + Sync {
    fn should_allow_expansion(&self) -> bool;
}

impl<F> ExpansionGuard for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn should_allow_expansion(&self) -> bool {
        self()
    }
}

/// Guard that never vetoes
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl ExpansionGuard for AllowAll {
    fn should_allow_expansion(&self) -> bool {
        true
    }
}

/// Allows at most `max` expansions within any `window`
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max: usize,
    recent: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max: usize) -> Self {
        Self {
            window,
            max,
            recent: Mutex::new(VecDeque::with_capacity(max)),
        }
    }

    /// Record an attempt at `now`, returning whether it is allowed
    pub fn allow_at(&self, now: Instant) -> bool {
        let mut recent = self.recent.lock();

        while let Some(&oldest) = recent.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                recent.pop_front();
            } else {
                break;
            }
        }

        if recent.len() >= self.max {
            crate::warn!(
                "Expansion rate limit reached ({} in {:?}), skipping",
                self.max,
                self.window
            );
            return false;
        }

        recent.push_back(now);
        true
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_WINDOW, DEFAULT_MAX_EXPANSIONS_PER_WINDOW)
    }
}

impl ExpansionGuard for RateLimiter {
    fn should_allow_expansion(&self) -> bool {
        self.allow_at(Instant::now())
    }
}
