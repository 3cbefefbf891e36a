// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlap-driven memo membership during ordinary drags.
//!
//! Without a modifier, dragging a memo changes its parent in two ways only:
//!
//! - A memo with no parent joins the deepest category whose block or area it
//!   overlaps within the drop margin.
//! - A memo that is no longer within the drop margin of its parent's block or
//!   area is unparented after a debounce, 100ms normally and 300ms when the
//!   pointer is moving fast. Every further move outside restarts the timer
//!   with that move's delay; coming back cancels it.
//!
//! Joining and leaving use the same test, so a memo that has just been
//! unparented is never close enough to rejoin on the next move.
//!
//! A parented memo that overlaps some *other* category keeps its parent.

use alloc::vec::Vec;

use kurbo::Rect;
use mindboard_event_state::scheduler::Scheduler;
use mindboard_geometry::overlaps_within;
use mindboard_tree::{ItemId, Memo, Page};
use tracing::debug;

use crate::area::AreaSource;
use crate::config::EngineConfig;

/// Whether `rect` is within `margin` of `category`'s block, or of its area
/// when expanded.
fn near(page: &Page, category: &str, rect: Rect, areas: &impl AreaSource, margin: f64) -> bool {
    let Some(c) = page.category(category) else {
        return false;
    };
    overlaps_within(rect, c.rect(), margin)
        || (c.is_expanded
            && areas
                .area(page, category)
                .is_some_and(|a| overlaps_within(rect, a.rect, margin)))
}

/// What [`MembershipTracker::on_memo_move`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MembershipChange {
    /// Nothing.
    Unchanged,
    /// The memo joined `category`.
    Joined {
        /// The new parent.
        category: ItemId,
    },
    /// The memo is outside its parent; it will be unparented at `due` unless
    /// it moves again first.
    UnparentScheduled {
        /// The parent it is leaving.
        parent: ItemId,
        /// When the unparent fires.
        due: u64,
    },
    /// The memo came back before its unparent fired.
    UnparentCancelled {
        /// The parent it stays in.
        parent: ItemId,
    },
}

/// A debounced unparent that fired.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unparented {
    /// The memo now at the top level.
    pub memo: ItemId,
    /// Its former parent.
    pub parent: ItemId,
}

/// Tracks pending unparents, keyed by memo.
#[derive(Clone, Debug, Default)]
pub struct MembershipTracker {
    pending: Scheduler<ItemId, ItemId>,
}

impl MembershipTracker {
    /// Create a tracker with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// React to `memo` having moved to its current position in `page`.
    ///
    /// `speed` is the pointer speed in px/ms and only picks the unparent delay.
    pub fn on_memo_move(
        &mut self,
        page: &mut Page,
        memo: &str,
        areas: &impl AreaSource,
        speed: f64,
        now: u64,
        config: &EngineConfig,
    ) -> MembershipChange {
        let Some(rect) = page.memo(memo).map(Memo::rect) else {
            return MembershipChange::Unchanged;
        };

        let Some(parent) = page.parent_of(memo).cloned() else {
            let mut best: Option<(usize, ItemId)> = None;
            for category in page.categories() {
                if !near(page, category.id.as_str(), rect, areas, config.drop_margin) {
                    continue;
                }
                let depth = page.depth(category.id.as_str());
                if best.as_ref().is_none_or(|(d, _)| depth > *d) {
                    best = Some((depth, category.id.clone()));
                }
            }
            let Some((_, category)) = best else {
                return MembershipChange::Unchanged;
            };
            return match page.reparent(memo, Some(category.as_str())) {
                Ok(_) => {
                    debug!(memo, category = %category, "memo joined category");
                    MembershipChange::Joined { category }
                }
                Err(err) => {
                    debug!(memo, %err, "memo could not join category");
                    MembershipChange::Unchanged
                }
            };
        };

        let key = ItemId::from(memo);
        if near(page, parent.as_str(), rect, areas, config.drop_margin) {
            return match self.pending.cancel(&key) {
                Some(_) => {
                    debug!(memo, parent = %parent, "memo returned; unparent cancelled");
                    MembershipChange::UnparentCancelled { parent }
                }
                None => MembershipChange::Unchanged,
            };
        }
        let delay = config.unparent_delay(speed);
        let restarted = self.pending.schedule(key, parent.clone(), now, delay).is_some();
        debug!(memo, parent = %parent, delay, restarted, "memo outside parent; unparent scheduled");
        MembershipChange::UnparentScheduled {
            parent,
            due: now.saturating_add(delay),
        }
    }

    /// Fire every unparent due at `now`.
    ///
    /// A memo whose parent changed since the timer was set is left alone.
    pub fn poll(&mut self, page: &mut Page, now: u64) -> Vec<Unparented> {
        let mut out = Vec::new();
        for (memo, parent) in self.pending.poll(now) {
            if page.parent_of(memo.as_str()) != Some(&parent) {
                continue;
            }
            if page.reparent(memo.as_str(), None).is_ok() {
                debug!(memo = %memo, parent = %parent, "memo unparented");
                out.push(Unparented { memo, parent });
            }
        }
        out
    }

    /// Whether an unparent is pending for `memo`.
    pub fn is_pending(&self, memo: &str) -> bool {
        self.pending.is_pending(&ItemId::from(memo))
    }

    /// When the next unparent is due.
    pub fn next_due(&self) -> Option<u64> {
        self.pending.next_due()
    }

    /// Drop every pending unparent.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
