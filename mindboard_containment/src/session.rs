// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag sessions: pointer events in, positions and parent changes out.
//!
//! A [`DragSession`] owns everything that lives between pointer down and the
//! end of the release grace period: the gesture recognizer, the drag cache,
//! the membership tracker, the category settle rate limiter, and the keyed
//! timers for cache eviction and history commits. The page itself stays with
//! the caller and is passed in by reference on every call.
//!
//! ## Modes
//!
//! - Ordinary drags push siblings out of the way and let memos join or leave
//!   categories by overlap ([`crate::membership`]).
//! - Reparent drags (modifier held, or armed by a long press on touch) do not
//!   push anything. Each move reports the category that would receive the
//!   item, and the release reparents into it ([`crate::reparent`]).
//!
//! ## Time
//!
//! Timers never fire by themselves. Call [`DragSession::tick`] with the
//! current time; it returns what fired as [`SessionEvent`]s.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::Point;
use mindboard_event_state::gesture::{DragGesture, GestureMove, Release};
use mindboard_event_state::scheduler::Scheduler;
use mindboard_tree::{ItemId, ItemKind, Page};
use tracing::{debug, trace};

use crate::area::{Area, AreaSource, LiveAreas};
use crate::cache::{DragCache, DragCacheEntry, DragFrame};
use crate::collision::{
    CollisionOutcome, CollisionQuery, CollisionResolver, MovingKind, resolve_collisions,
};
use crate::config::EngineConfig;
use crate::membership::{MembershipChange, MembershipTracker};
use crate::reparent::{DropFlags, DropOutcome, apply_drop, detect_drop_target};

/// Shared by the live drop highlight and the release.
const DROP_FLAGS: DropFlags = DropFlags::USE_AREAS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum TimerKind {
    EvictCache,
    CommitHistory,
}

/// Something that happened in [`DragSession::tick`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A long press armed reparent mode for the pressed item.
    ReparentArmed(ItemId),
    /// A debounced unparent fired.
    Unparented {
        /// The memo now at the top level.
        memo: ItemId,
        /// Its former parent.
        parent: ItemId,
    },
    /// The drag cache for this item was dropped.
    CacheEvicted(ItemId),
    /// The item's drag settled and should be committed to history.
    CommitHistory(ItemId),
}

/// Result of [`DragSession::pointer_move`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragUpdate {
    /// Whether this move started the drag.
    pub started: bool,
    /// Positions written for the moving items, or `None` if nothing moved.
    pub frame: Option<DragFrame>,
    /// Siblings pushed out of the way.
    pub collisions: CollisionOutcome,
    /// Membership change of a dragged memo.
    pub membership: Option<MembershipChange>,
    /// In reparent mode, the category that would receive the item.
    pub drop_target: Option<ItemId>,
}

/// Result of [`DragSession::pointer_up`] and [`DragSession::pointer_cancel`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DropUpdate {
    /// The released item, if a press was active.
    pub item: Option<ItemId>,
    /// Whether the press had become a drag.
    pub dragged: bool,
    /// Final positions of the moving items.
    pub frame: Option<DragFrame>,
    /// Siblings pushed out of the way by the final position.
    pub collisions: CollisionOutcome,
    /// Result of a reparent drop.
    pub drop: Option<DropOutcome>,
    /// Siblings pushed away from a new parent whose area grew.
    pub settle: Option<CollisionOutcome>,
}

/// State for pointer-driven dragging on one page.
///
/// ```
/// use kurbo::Point;
/// use mindboard_containment::{DragSession, EngineConfig, SessionEvent};
/// use mindboard_tree::{Memo, Page};
///
/// let mut page = Page::new(
///     vec![
///         Memo::new("a", Point::new(0.0, 0.0)),
///         Memo::new("b", Point::new(250.0, 0.0)),
///     ],
///     vec![],
/// );
/// let mut session = DragSession::new(EngineConfig::default());
///
/// session.pointer_down("a", &[], Point::new(10.0, 10.0), 0);
/// // Drag `a` 100px right; it now overlaps `b`, which gets pushed.
/// let update = session.pointer_move(&mut page, "a", Point::new(110.0, 10.0), false, 16);
/// assert!(update.started);
/// assert_eq!(page.position("a"), Some(Point::new(100.0, 0.0)));
/// assert!(update.collisions.updated_memos.contains_key("b"));
///
/// session.pointer_up(&mut page, "a", Point::new(110.0, 10.0), false, 32);
/// let events = session.tick(&mut page, 1_000);
/// assert!(events.contains(&SessionEvent::CommitHistory("a".into())));
/// assert!(events.contains(&SessionEvent::CacheEvicted("a".into())));
/// ```
#[derive(Clone, Debug)]
pub struct DragSession {
    config: EngineConfig,
    gesture: DragGesture<ItemId>,
    selection: Vec<ItemId>,
    cache: DragCache,
    resolver: CollisionResolver,
    membership: MembershipTracker,
    timers: Scheduler<(TimerKind, ItemId), ()>,
    drop_target: Option<ItemId>,
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl DragSession {
    /// Create a session.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            gesture: DragGesture::with_thresholds(config.drag_threshold, Some(config.long_press)),
            selection: Vec::new(),
            cache: DragCache::new(),
            resolver: CollisionResolver::new(&config),
            membership: MembershipTracker::new(),
            timers: Scheduler::new(),
            drop_target: None,
            config,
        }
    }

    /// The session's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The drag cache.
    pub fn cache(&self) -> &DragCache {
        &self.cache
    }

    /// Press on `item`. `selection` lists the other items that move with it.
    pub fn pointer_down(&mut self, item: &str, selection: &[ItemId], pointer: Point, now: u64) {
        self.gesture.on_down(item.into(), pointer, now);
        self.selection = selection.to_vec();
        self.drop_target = None;
        trace!(item, "pointer down");
    }

    /// Move the pointer. `modifier` selects reparent mode.
    ///
    /// Moves for an item other than the pressed one, moves below the drag
    /// threshold, and moves whose drag cache is gone change nothing.
    pub fn pointer_move(
        &mut self,
        page: &mut Page,
        item: &str,
        pointer: Point,
        modifier: bool,
        now: u64,
    ) -> DragUpdate {
        let mut update = DragUpdate::default();
        if self.gesture.press().is_none_or(|p| p.target != item) {
            return update;
        }
        let cumulative = match self.gesture.on_move(pointer, now) {
            GestureMove::Idle | GestureMove::Pending => return update,
            GestureMove::Started { target, cumulative } => {
                self.timers.cancel(&(TimerKind::EvictCache, target.clone()));
                self.cache
                    .begin(page, target.as_str(), &self.selection, self.config.padding);
                debug!(item, "drag started");
                update.started = true;
                cumulative
            }
            GestureMove::Moved { cumulative, .. } => cumulative,
        };

        let Some(frame) = self.cache.frame(item, cumulative) else {
            debug!(item, "drag cache miss; leaving items in place");
            return update;
        };
        frame.apply(page);

        if modifier || self.gesture.is_armed() {
            self.drop_target = self.cache.entry(item).and_then(|entry| {
                detect_drop_target(
                    page,
                    item,
                    pointer,
                    &entry.areas(),
                    DROP_FLAGS,
                )
            });
            update.drop_target = self.drop_target.clone();
        } else {
            self.drop_target = None;
            let speed = self.gesture.speed();
            let (membership, collisions) = self.react(page, &frame, speed, now);
            update.membership = membership;
            update.collisions = collisions;
        }
        update.frame = Some(frame);
        update
    }

    /// Release the pointer. `modifier` selects reparent mode.
    pub fn pointer_up(
        &mut self,
        page: &mut Page,
        item: &str,
        pointer: Point,
        modifier: bool,
        now: u64,
    ) -> DropUpdate {
        if self.gesture.press().is_none_or(|p| p.target != item) {
            return DropUpdate::default();
        }
        let Some(release) = self.gesture.on_up(pointer, now) else {
            return DropUpdate::default();
        };
        let reparent = modifier || release.armed;
        self.finish(page, release, Some(pointer).filter(|_| reparent), now)
    }

    /// The pointer was lost. Finalizes like a release at the last known
    /// position, without reparenting.
    pub fn pointer_cancel(&mut self, page: &mut Page, item: &str, now: u64) -> DropUpdate {
        if self.gesture.press().is_none_or(|p| p.target != item) {
            return DropUpdate::default();
        }
        let Some(release) = self.gesture.cancel() else {
            return DropUpdate::default();
        };
        debug!(item, "pointer lost; finalizing drag");
        self.finish(page, release, None, now)
    }

    /// Fire due timers.
    pub fn tick(&mut self, page: &mut Page, now: u64) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if let Some(item) = self.gesture.on_hold(now) {
            debug!(item = %item, "long press armed reparent mode");
            events.push(SessionEvent::ReparentArmed(item));
        }
        for fired in self.membership.poll(page, now) {
            self.cache.refreeze_area(page, fired.parent.as_str());
            events.push(SessionEvent::Unparented {
                memo: fired.memo,
                parent: fired.parent,
            });
        }
        for ((kind, item), ()) in self.timers.poll(now) {
            match kind {
                TimerKind::EvictCache => {
                    if self.cache.evict(item.as_str()).is_some() {
                        events.push(SessionEvent::CacheEvicted(item));
                    }
                }
                TimerKind::CommitHistory => events.push(SessionEvent::CommitHistory(item)),
            }
        }
        events
    }

    /// When the next timer is due, if any.
    pub fn next_due(&self) -> Option<u64> {
        match (self.timers.next_due(), self.membership.next_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    /// Whether the current press is armed for reparenting.
    pub fn is_armed(&self) -> bool {
        self.gesture.is_armed()
    }

    /// The drop target reported by the latest reparent-mode move.
    pub fn drop_target(&self) -> Option<&ItemId> {
        self.drop_target.as_ref()
    }

    /// The area category `id` should be drawn with right now.
    ///
    /// Frozen while a drag is in progress, computed live otherwise.
    pub fn area(&self, page: &Page, id: &str) -> Option<Area> {
        match self.active_entry() {
            Some(entry) => entry.areas().area(page, id),
            None => LiveAreas {
                padding: self.config.padding,
            }
            .area(page, id),
        }
    }

    /// [`DragSession::area`] for every category that has one.
    pub fn areas(&self, page: &Page) -> BTreeMap<ItemId, Area> {
        page.categories()
            .iter()
            .filter_map(|c| self.area(page, c.id.as_str()).map(|a| (c.id.clone(), a)))
            .collect()
    }

    fn active_entry(&self) -> Option<&DragCacheEntry> {
        let press = self.gesture.press()?;
        if !self.gesture.is_dragging() {
            return None;
        }
        self.cache.entry(press.target.as_str())
    }

    /// Membership and collisions for an ordinary-mode frame.
    fn react(
        &mut self,
        page: &mut Page,
        frame: &DragFrame,
        speed: f64,
        now: u64,
    ) -> (Option<MembershipChange>, CollisionOutcome) {
        let Some(entry) = self.cache.entry(frame.item.as_str()) else {
            return (None, CollisionOutcome::default());
        };
        let areas = entry.areas();

        let membership = (entry.kind == ItemKind::Memo).then(|| {
            self.membership.on_memo_move(
                page,
                frame.item.as_str(),
                &areas,
                speed,
                now,
                &self.config,
            )
        });

        let kind = match entry.kind {
            ItemKind::Memo => MovingKind::Memo,
            ItemKind::Category => MovingKind::Area,
        };
        let query = CollisionQuery::new(frame.item.clone(), kind)
            .with_moving_ids(entry.movers.iter().cloned())
            .with_max_iterations(self.config.max_iterations)
            .with_direction_hint(frame.direction);
        let collisions = resolve_collisions(page, &query, &areas, &self.config);
        collisions.apply(page);

        if let Some(MembershipChange::Joined { category }) = &membership {
            self.cache.refreeze_area(page, category.as_str());
        }
        (membership, collisions)
    }

    /// Shared tail of release and cancel. `drop_at` is the pointer position
    /// for a reparent drop.
    fn finish(
        &mut self,
        page: &mut Page,
        release: Release<ItemId>,
        drop_at: Option<Point>,
        now: u64,
    ) -> DropUpdate {
        let item = release.target;
        self.drop_target = None;
        let mut update = DropUpdate {
            item: Some(item.clone()),
            dragged: release.dragged,
            ..DropUpdate::default()
        };
        if !release.dragged {
            return update;
        }

        if let Some(frame) = self.cache.frame(item.as_str(), release.cumulative) {
            frame.apply(page);
            match drop_at {
                Some(pointer) => {
                    let live = LiveAreas {
                        padding: self.config.padding,
                    };
                    let target = match self.cache.entry(item.as_str()) {
                        Some(entry) => detect_drop_target(
                            page,
                            item.as_str(),
                            pointer,
                            &entry.areas(),
                            DROP_FLAGS,
                        ),
                        None => {
                            detect_drop_target(page, item.as_str(), pointer, &live, DROP_FLAGS)
                        }
                    };
                    let outcome =
                        apply_drop(page, item.as_str(), target.as_ref().map(ItemId::as_str));
                    for category in outcome.affected_categories(page) {
                        self.cache.refreeze_area(page, category.as_str());
                    }
                    if let DropOutcome::Reparented { to: Some(parent), .. } = &outcome {
                        update.settle = self.resolver.settle_category(
                            page,
                            parent.as_str(),
                            &live,
                            now,
                            &self.config,
                        );
                        if let Some(settle) = &update.settle {
                            settle.apply(page);
                        }
                    }
                    update.drop = Some(outcome);
                }
                None => {
                    let (_, collisions) = self.react(page, &frame, 0.0, now);
                    update.collisions = collisions;
                }
            }
            update.frame = Some(frame);
        }

        self.timers.schedule(
            (TimerKind::EvictCache, item.clone()),
            (),
            now,
            self.config.cache_eviction_delay,
        );
        self.timers.schedule(
            (TimerKind::CommitHistory, item.clone()),
            (),
            now,
            self.config.history_debounce,
        );
        debug!(item = %item, "drag finished");
        update
    }
}
