// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-key rate limiting on a virtual clock.
//!
//! A [`RateLimiter`] lets a keyed action run at most once per
//! [`min_interval`](RateLimiter::min_interval) and at most
//! [`max_attempts`](RateLimiter::max_attempts) times per window. A window
//! starts at the first accepted attempt and resets
//! [`reset_after`](RateLimiter::reset_after) ms later.

use alloc::collections::BTreeMap;

#[derive(Clone, Copy, Debug)]
struct Window {
    first: u64,
    last: u64,
    attempts: u32,
}

impl Window {
    fn fresh(now: u64) -> Self {
        Self {
            first: now,
            last: now,
            attempts: 1,
        }
    }
}

/// Per-key rate limiter with a minimum interval and a capped attempt count.
#[derive(Clone, Debug)]
pub struct RateLimiter<K> {
    windows: BTreeMap<K, Window>,
    /// Minimum time between accepted attempts for one key (milliseconds).
    pub min_interval: u64,
    /// Accepted attempts allowed per window.
    pub max_attempts: u32,
    /// Window length after which the attempt count resets (milliseconds).
    pub reset_after: u64,
}

impl<K: Ord> RateLimiter<K> {
    /// Create a limiter.
    pub fn new(min_interval: u64, max_attempts: u32, reset_after: u64) -> Self {
        Self {
            windows: BTreeMap::new(),
            min_interval,
            max_attempts,
            reset_after,
        }
    }

    /// Try to run the action for `key` at `now`. Returns `true` if allowed.
    pub fn try_acquire(&mut self, key: K, now: u64) -> bool {
        let Some(window) = self.windows.get_mut(&key) else {
            self.windows.insert(key, Window::fresh(now));
            return true;
        };
        if now.saturating_sub(window.first) >= self.reset_after {
            *window = Window::fresh(now);
            return true;
        }
        if now.saturating_sub(window.last) < self.min_interval {
            return false;
        }
        if window.attempts >= self.max_attempts {
            return false;
        }
        window.attempts += 1;
        window.last = now;
        true
    }

    /// Accepted attempts in the current window for `key`.
    pub fn attempts(&self, key: &K) -> u32 {
        self.windows.get(key).map_or(0, |w| w.attempts)
    }

    /// Forget the state of one key.
    pub fn reset(&mut self, key: &K) {
        self.windows.remove(key);
    }

    /// Forget every key.
    pub fn clear(&mut self) {
        self.windows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enforces_min_interval() {
        let mut limiter: RateLimiter<u8> = RateLimiter::new(1000, 10, 10_000);
        assert!(limiter.try_acquire(1, 0));
        assert!(!limiter.try_acquire(1, 999));
        assert!(limiter.try_acquire(1, 1000));
        // Other keys are independent.
        assert!(limiter.try_acquire(2, 1001));
    }

    #[test]
    fn caps_attempts_until_window_resets() {
        let mut limiter: RateLimiter<u8> = RateLimiter::new(100, 3, 10_000);
        assert!(limiter.try_acquire(1, 0));
        assert!(limiter.try_acquire(1, 100));
        assert!(limiter.try_acquire(1, 200));
        assert_eq!(limiter.attempts(&1), 3);
        // Interval satisfied, but the cap is reached for this window.
        assert!(!limiter.try_acquire(1, 300));
        assert!(!limiter.try_acquire(1, 9_999));
        // The window started at 0 and resets at 10_000.
        assert!(limiter.try_acquire(1, 10_000));
        assert_eq!(limiter.attempts(&1), 1);
    }

    #[test]
    fn reset_forgets_key() {
        let mut limiter: RateLimiter<u8> = RateLimiter::new(1000, 10, 10_000);
        assert!(limiter.try_acquire(1, 0));
        limiter.reset(&1);
        assert!(limiter.try_acquire(1, 1));
    }
}
