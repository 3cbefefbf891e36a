// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed, last-write-wins timers on a virtual clock.
//!
//! A [`Scheduler`] holds at most one pending task per key. Scheduling a task for
//! a key that already has one replaces it, which is exactly the
//! cancel-and-restart behavior of a debounce. Time never advances on its own:
//! the host passes `now` (milliseconds) to [`Scheduler::schedule`] and
//! [`Scheduler::poll`], so tests can drive the clock explicitly.
//!
//! ```
//! use mindboard_event_state::scheduler::Scheduler;
//!
//! let mut timers: Scheduler<&str, u32> = Scheduler::new();
//! timers.schedule("memo-1", 1, 1000, 100);
//! // A second event for the same key replaces the first.
//! timers.schedule("memo-1", 2, 1050, 100);
//!
//! assert!(timers.poll(1100).is_empty());
//! assert_eq!(timers.poll(1150), vec![("memo-1", 2)]);
//! ```

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

#[derive(Clone, Debug)]
struct Pending<T> {
    due: u64,
    seq: u64,
    task: T,
}

/// At most one pending task per key, fired in due order by [`Scheduler::poll`].
#[derive(Clone, Debug)]
pub struct Scheduler<K, T> {
    pending: BTreeMap<K, Pending<T>>,
    next_seq: u64,
}

impl<K: Ord + Clone, T> Scheduler<K, T> {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `task` to fire `delay` ms after `now`.
    ///
    /// Returns the task it replaced, if `key` already had one pending.
    pub fn schedule(&mut self, key: K, task: T, now: u64, delay: u64) -> Option<T> {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.pending
            .insert(
                key,
                Pending {
                    due: now.saturating_add(delay),
                    seq,
                    task,
                },
            )
            .map(|p| p.task)
    }

    /// Cancel the pending task for `key`.
    pub fn cancel(&mut self, key: &K) -> Option<T> {
        self.pending.remove(key).map(|p| p.task)
    }

    /// Whether `key` has a pending task.
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// When the task for `key` is due.
    pub fn due_at(&self, key: &K) -> Option<u64> {
        self.pending.get(key).map(|p| p.due)
    }

    /// The earliest due time across all keys.
    pub fn next_due(&self) -> Option<u64> {
        self.pending.values().map(|p| p.due).min()
    }

    /// Remove and return every task due at or before `now`.
    ///
    /// Tasks come out ordered by due time; tasks due at the same instant come
    /// out in the order they were scheduled.
    pub fn poll(&mut self, now: u64) -> Vec<(K, T)> {
        let mut due: Vec<(K, Pending<T>)> = Vec::new();
        let keys: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, p)| p.due <= now)
            .map(|(k, _)| k.clone())
            .collect();
        for key in keys {
            if let Some(p) = self.pending.remove(&key) {
                due.push((key, p));
            }
        }
        due.sort_by_key(|(_, p)| (p.due, p.seq));
        due.into_iter().map(|(k, p)| (k, p.task)).collect()
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<K: Ord + Clone, T> Default for Scheduler<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn fires_only_when_due() {
        let mut s: Scheduler<u32, &str> = Scheduler::new();
        s.schedule(1, "a", 1000, 500);
        assert!(s.poll(1499).is_empty());
        assert_eq!(s.poll(1500), vec![(1, "a")]);
        assert!(s.is_empty());
    }

    #[test]
    fn reschedule_replaces_pending_task() {
        let mut s: Scheduler<u32, &str> = Scheduler::new();
        assert_eq!(s.schedule(1, "first", 0, 100), None);
        assert_eq!(s.schedule(1, "second", 50, 100), Some("first"));
        assert_eq!(s.len(), 1);
        assert_eq!(s.due_at(&1), Some(150));
        assert!(s.poll(100).is_empty(), "the replaced timer must not fire");
        assert_eq!(s.poll(150), vec![(1, "second")]);
    }

    #[test]
    fn cancel_prevents_firing() {
        let mut s: Scheduler<u32, &str> = Scheduler::new();
        s.schedule(7, "x", 0, 10);
        assert!(s.is_pending(&7));
        assert_eq!(s.cancel(&7), Some("x"));
        assert!(!s.is_pending(&7));
        assert!(s.poll(1_000).is_empty());
        assert_eq!(s.cancel(&7), None);
    }

    #[test]
    fn independent_keys_fire_in_due_order() {
        let mut s: Scheduler<u32, u32> = Scheduler::new();
        s.schedule(3, 30, 0, 300);
        s.schedule(1, 10, 0, 100);
        s.schedule(2, 20, 0, 100);
        assert_eq!(s.next_due(), Some(100));
        assert_eq!(s.poll(1_000), vec![(1, 10), (2, 20), (3, 30)]);
    }

    #[test]
    fn same_due_time_keeps_schedule_order() {
        let mut s: Scheduler<u32, u32> = Scheduler::new();
        s.schedule(9, 90, 0, 100);
        s.schedule(1, 10, 0, 100);
        assert_eq!(s.poll(100), vec![(9, 90), (1, 10)]);
    }
}
