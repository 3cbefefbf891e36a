// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sibling collision resolution.
//!
//! Items only collide with items in the same sibling scope (same parent, or
//! both top level). Memos collide with their blocks; categories collide with
//! their area, or their block when they have no area.
//!
//! Resolution runs in passes. Every item carries a small integer priority: the
//! moving items are fixed at 0, and an item displaced by a pusher of priority
//! `p` gets `p + 1`. A pusher only displaces siblings that have no priority yet
//! or a strictly larger one, so nothing is ever pushed back into an item of
//! equal or higher priority. A pass that displaces nothing ends the run; so
//! does reaching the iteration cap, in which case overlaps may remain.
//!
//! Displaced categories move rigidly with all of their descendants.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};
use mindboard_event_state::rate_limit::RateLimiter;
use mindboard_geometry::separation;
use mindboard_tree::{ItemId, ItemKind, Page};
use tracing::{debug, trace, warn};

use crate::area::AreaSource;
use crate::config::EngineConfig;

/// How the moving item occupies space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovingKind {
    /// By its block rectangle.
    Memo,
    /// By its containment area, falling back to its block.
    Area,
}

/// Input to [`resolve_collisions`].
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionQuery {
    /// The item that moved.
    pub moving_id: ItemId,
    /// How `moving_id` occupies space.
    pub kind: MovingKind,
    /// Other items moving with it; none of them is ever displaced.
    pub moving_ids: BTreeSet<ItemId>,
    /// Pass limit.
    pub max_iterations: usize,
    /// Direction of travel, used to pick a side when centers coincide.
    pub direction_hint: Option<Vec2>,
}

impl CollisionQuery {
    /// A query for one moving item with a 10-pass limit.
    pub fn new(moving_id: impl Into<ItemId>, kind: MovingKind) -> Self {
        Self {
            moving_id: moving_id.into(),
            kind,
            moving_ids: BTreeSet::new(),
            max_iterations: 10,
            direction_hint: None,
        }
    }

    /// Add items that move together with `moving_id`.
    #[must_use]
    pub fn with_moving_ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ItemId>,
    {
        self.moving_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Set the pass limit.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the direction of travel.
    #[must_use]
    pub fn with_direction_hint(mut self, hint: Vec2) -> Self {
        self.direction_hint = (hint != Vec2::ZERO).then_some(hint);
        self
    }
}

/// Positions changed by [`resolve_collisions`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionOutcome {
    /// New positions of displaced memos.
    pub updated_memos: BTreeMap<ItemId, Point>,
    /// New positions of displaced categories.
    pub updated_categories: BTreeMap<ItemId, Point>,
    /// Passes run.
    pub iterations: usize,
    /// Whether the last pass displaced nothing.
    pub converged: bool,
}

impl CollisionOutcome {
    /// Whether nothing was displaced.
    pub fn is_empty(&self) -> bool {
        self.updated_memos.is_empty() && self.updated_categories.is_empty()
    }

    /// Write the new positions into `page`.
    pub fn apply(&self, page: &mut Page) {
        page.apply_positions(self.updated_memos.iter().chain(&self.updated_categories));
    }
}

fn occupied_rect(page: &Page, areas: &impl AreaSource, id: &str, by_area: bool) -> Option<Rect> {
    match page.kind_of(id)? {
        ItemKind::Memo => page.block_rect(id),
        ItemKind::Category if by_area => areas
            .area(page, id)
            .map(|a| a.rect)
            .or_else(|| page.block_rect(id)),
        ItemKind::Category => page.block_rect(id),
    }
}

/// Push siblings of the moving items apart until nothing overlaps them.
///
/// `page` must already hold the moving items at their new positions. It is
/// not modified; the displacements are returned for the caller to apply.
pub fn resolve_collisions(
    page: &Page,
    query: &CollisionQuery,
    areas: &impl AreaSource,
    config: &EngineConfig,
) -> CollisionOutcome {
    let mut movers: BTreeSet<ItemId> = query
        .moving_ids
        .iter()
        .filter(|id| page.contains(id.as_str()))
        .cloned()
        .collect();
    if page.contains(query.moving_id.as_str()) {
        movers.insert(query.moving_id.clone());
    }
    if movers.is_empty() {
        return CollisionOutcome {
            converged: true,
            ..CollisionOutcome::default()
        };
    }

    let mut work = page.clone();
    let mut priority: BTreeMap<ItemId, u32> = movers.iter().map(|m| (m.clone(), 0)).collect();
    let mut iterations = 0;
    let mut converged = false;

    while iterations < query.max_iterations {
        iterations += 1;
        let mut displaced = false;

        let mut pushers: Vec<(u32, ItemId)> = priority.iter().map(|(id, p)| (*p, id.clone())).collect();
        pushers.sort();
        for (level, pusher) in pushers {
            let by_area = pusher != query.moving_id || query.kind == MovingKind::Area;
            let siblings: Vec<ItemId> = work.siblings(pusher.as_str()).into_iter().cloned().collect();
            for sibling in siblings {
                if movers.contains(&sibling)
                    || priority.get(&sibling).is_some_and(|p| *p <= level)
                    || movers.iter().any(|m| work.is_ancestor(sibling.as_str(), m.as_str()))
                {
                    continue;
                }
                let (Some(pusher_rect), Some(sibling_rect)) = (
                    occupied_rect(&work, areas, pusher.as_str(), by_area),
                    occupied_rect(&work, areas, sibling.as_str(), true),
                ) else {
                    continue;
                };
                let Some(push) =
                    separation(pusher_rect, sibling_rect, config.safety_margin, query.direction_hint)
                else {
                    continue;
                };
                trace!(
                    pusher = %pusher,
                    pushed = %sibling,
                    dx = push.offset.x,
                    dy = push.offset.y,
                    iteration = iterations,
                    "collision push"
                );
                work.translate_subtree(sibling.as_str(), push.offset);
                priority.insert(sibling, level + 1);
                displaced = true;
            }
        }

        if !displaced {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(
            id = %query.moving_id,
            iterations,
            "collision resolution stopped at the iteration cap"
        );
    }

    let mut outcome = CollisionOutcome {
        iterations,
        converged,
        ..CollisionOutcome::default()
    };
    for memo in work.memos() {
        if page.position(memo.id.as_str()) != Some(memo.position) {
            outcome.updated_memos.insert(memo.id.clone(), memo.position);
        }
    }
    for category in work.categories() {
        if page.position(category.id.as_str()) != Some(category.position) {
            outcome
                .updated_categories
                .insert(category.id.clone(), category.position);
        }
    }
    debug!(
        id = %query.moving_id,
        iterations,
        memos = outcome.updated_memos.len(),
        categories = outcome.updated_categories.len(),
        "collisions resolved"
    );
    outcome
}

/// Rate-limited category settling.
///
/// Settling a category can change areas, and changed areas can ask for
/// another settle. The limiter breaks that loop: one category settles at most
/// once per [`EngineConfig::collision_window`], at most
/// [`EngineConfig::collision_attempt_cap`] times before its counter resets
/// [`EngineConfig::collision_reset`] ms after the first attempt.
#[derive(Clone, Debug)]
pub struct CollisionResolver {
    limiter: RateLimiter<ItemId>,
}

impl CollisionResolver {
    /// Create a resolver using the rate limits in `config`.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            limiter: RateLimiter::new(
                config.collision_window,
                config.collision_attempt_cap,
                config.collision_reset,
            ),
        }
    }

    /// Push the siblings of category `id` out of its area.
    ///
    /// Returns `None` if `id` is not a category or the settle was suppressed
    /// by the rate limit.
    pub fn settle_category(
        &mut self,
        page: &Page,
        id: &str,
        areas: &impl AreaSource,
        now: u64,
        config: &EngineConfig,
    ) -> Option<CollisionOutcome> {
        page.category(id)?;
        if !self.limiter.try_acquire(ItemId::from(id), now) {
            trace!(id, "category settle suppressed by rate limit");
            return None;
        }
        let query = CollisionQuery::new(id, MovingKind::Area).with_max_iterations(config.max_iterations);
        Some(resolve_collisions(page, &query, areas, config))
    }

    /// Settle attempts counted for `id` in its current window.
    pub fn attempts(&self, id: &str) -> u32 {
        self.limiter.attempts(&ItemId::from(id))
    }

    /// Forget all rate-limit state.
    pub fn reset(&mut self) {
        self.limiter.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::LiveAreas;
    use alloc::vec;
    use kurbo::Size;
    use mindboard_geometry::overlaps;
    use mindboard_tree::{Category, Memo};

    const LIVE: LiveAreas = LiveAreas { padding: 20.0 };

    fn rect(page: &Page, id: &str) -> Rect {
        page.block_rect(id).unwrap()
    }

    #[test]
    fn pushes_sibling_along_narrow_overlap() {
        let mut page = Page::new(
            vec![
                Memo::new("a", Point::new(0.0, 0.0)).with_size(Size::new(100.0, 100.0)),
                Memo::new("b", Point::new(90.0, 20.0)).with_size(Size::new(100.0, 100.0)),
            ],
            vec![],
        );
        let config = EngineConfig::default();
        let outcome = resolve_collisions(&page, &CollisionQuery::new("a", MovingKind::Memo), &LIVE, &config);
        assert!(outcome.converged);
        assert_eq!(outcome.iterations, 2);
        assert_eq!(outcome.updated_memos.get("b"), Some(&Point::new(105.0, 20.0)));
        assert!(!outcome.updated_memos.contains_key("a"));
        outcome.apply(&mut page);
        assert!(!overlaps(rect(&page, "a"), rect(&page, "b")));
    }

    #[test]
    fn different_scopes_do_not_collide() {
        let page = Page::new(
            vec![
                Memo::new("inside", Point::new(0.0, 100.0)).with_parent("c"),
                Memo::new("outside", Point::new(10.0, 110.0)),
            ],
            vec![Category::new("c", Point::ORIGIN)],
        );
        let config = EngineConfig::default();
        let outcome = resolve_collisions(
            &page,
            &CollisionQuery::new("inside", MovingKind::Memo),
            &LIVE,
            &config,
        );
        assert!(outcome.is_empty());
    }

    #[test]
    fn chain_pushes_propagate_outward() {
        let size = Size::new(100.0, 100.0);
        let page = Page::new(
            vec![
                Memo::new("a", Point::new(0.0, 0.0)).with_size(size),
                Memo::new("b", Point::new(60.0, 0.0)).with_size(size),
                Memo::new("c", Point::new(170.0, 0.0)).with_size(size),
            ],
            vec![],
        );
        let config = EngineConfig::default();
        let outcome = resolve_collisions(&page, &CollisionQuery::new("a", MovingKind::Memo), &LIVE, &config);
        // a pushes b to x=105, which then overlaps c by 35 and pushes it to x=210.
        assert_eq!(outcome.updated_memos.get("b"), Some(&Point::new(105.0, 0.0)));
        assert_eq!(outcome.updated_memos.get("c"), Some(&Point::new(210.0, 0.0)));
        assert!(outcome.converged);
    }

    #[test]
    fn pushed_category_carries_descendants() {
        let page = Page::new(
            vec![
                Memo::new("mover", Point::new(0.0, 0.0)),
                Memo::new("child", Point::new(150.0, 120.0)).with_parent("c"),
            ],
            vec![Category::new("c", Point::new(150.0, 40.0))],
        );
        let config = EngineConfig::default();
        let outcome = resolve_collisions(&page, &CollisionQuery::new("mover", MovingKind::Memo), &LIVE, &config);
        let moved = outcome.updated_categories.get("c").copied().unwrap();
        let offset = moved - Point::new(150.0, 40.0);
        assert_ne!(offset, Vec2::ZERO);
        assert_eq!(
            outcome.updated_memos.get("child"),
            Some(&(Point::new(150.0, 120.0) + offset))
        );
    }

    #[test]
    fn movers_are_never_displaced() {
        let page = Page::new(
            vec![
                Memo::new("a", Point::new(0.0, 0.0)),
                Memo::new("b", Point::new(50.0, 10.0)),
            ],
            vec![],
        );
        let config = EngineConfig::default();
        let query = CollisionQuery::new("a", MovingKind::Memo).with_moving_ids(["b"]);
        let outcome = resolve_collisions(&page, &query, &LIVE, &config);
        assert!(outcome.is_empty());
        assert!(outcome.converged);
    }

    #[test]
    fn iteration_cap_bounds_the_run() {
        let page = Page::new(
            (0..6)
                .map(|i| Memo::new(alloc::format!("m{i}"), Point::new(0.0, 0.0)))
                .collect(),
            vec![],
        );
        let config = EngineConfig::default();
        let query = CollisionQuery::new("m0", MovingKind::Memo)
            .with_max_iterations(2)
            .with_direction_hint(Vec2::new(1.0, 0.0));
        let outcome = resolve_collisions(&page, &query, &LIVE, &config);
        assert!(outcome.iterations <= 2);
        assert!(!outcome.updated_memos.contains_key("m0"));
    }

    #[test]
    fn settle_is_rate_limited_per_category() {
        let page = Page::new(
            vec![Memo::new("m", Point::new(0.0, 100.0)).with_parent("c")],
            vec![Category::new("c", Point::ORIGIN)],
        );
        let config = EngineConfig::default();
        let mut resolver = CollisionResolver::new(&config);
        assert!(resolver.settle_category(&page, "c", &LIVE, 0, &config).is_some());
        assert!(resolver.settle_category(&page, "c", &LIVE, 500, &config).is_none());
        assert!(resolver.settle_category(&page, "c", &LIVE, 1000, &config).is_some());
        assert_eq!(resolver.attempts("c"), 2);
        assert!(resolver.settle_category(&page, "m", &LIVE, 5000, &config).is_none());
    }
}
