// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-drag memory: original positions and frozen areas.
//!
//! When a drag crosses the movement threshold, [`DragCache::begin`] records
//! where every moving item started and freezes the area of every category on
//! the page. Each later pointer move is turned into absolute positions by
//! adding the cumulative pointer offset to those originals
//! ([`DragCache::frame`]), so frames never accumulate error.
//!
//! Frozen areas are what keeps the layout still while something moves through
//! it. A category's area is recorded together with the category's position at
//! freeze time and is served translated by however far the category itself has
//! moved since (by the drag, or by being pushed), but never recomputed from its
//! content. Ancestors of the dragged item are frozen *without* it, so dragging
//! a memo out of its parent does not drag the parent's area along. A category
//! whose membership changes mid-drag is frozen again from the current page,
//! still without the dragged item ([`DragCache::refreeze_area`]).

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use kurbo::{Point, Vec2};
use mindboard_geometry::Axis;
use mindboard_tree::{ItemId, ItemKind, Page};
use tracing::{debug, warn};

use crate::area::{Area, AreaSource, compute_area};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Frozen {
    area: Option<Area>,
    anchor: Point,
}

/// Everything remembered about one drag.
#[derive(Clone, Debug)]
pub struct DragCacheEntry {
    /// The item under the pointer.
    pub item: ItemId,
    /// Kind of the dragged item.
    pub kind: ItemKind,
    /// Position of the dragged item at drag start.
    pub original_position: Point,
    /// Position reported by the latest frame.
    pub last_position: Point,
    /// Items that move with the pointer, minus any whose ancestor also moves.
    ///
    /// A memo selected together with a category that contains it moves once,
    /// with the category.
    pub movers: BTreeSet<ItemId>,
    /// Start positions of every other moving memo (selected or descendant).
    pub original_descendant_positions: BTreeMap<ItemId, Point>,
    /// Start positions of every other moving category (selected or descendant).
    pub original_descendant_category_positions: BTreeMap<ItemId, Point>,
    /// Latest non-zero frame delta; the collision tie-break direction.
    pub direction: Vec2,
    frozen: BTreeMap<ItemId, Frozen>,
    padding: f64,
}

impl DragCacheEntry {
    /// The dragged category's area as frozen at drag start.
    pub fn frozen_area(&self) -> Option<Area> {
        self.frozen.get(self.item.as_str()).and_then(|f| f.area)
    }

    /// Whether `id` is moved by this drag.
    pub fn moves(&self, id: &str) -> bool {
        self.item == id
            || self.original_descendant_positions.contains_key(id)
            || self.original_descendant_category_positions.contains_key(id)
    }

    /// An [`AreaSource`] serving this drag's frozen areas.
    pub fn areas(&self) -> FrozenAreas<'_> {
        FrozenAreas { entry: self }
    }

    /// Area of `category` on `page` as it is now, without the dragged item.
    fn area_without_item(&self, page: &Page, category: &str) -> Option<Area> {
        let exclude = (self.item != category).then_some(self.item.as_str());
        compute_area(page, category, exclude, self.padding)
    }
}

/// Area view over one drag's frozen snapshot.
#[derive(Clone, Copy, Debug)]
pub struct FrozenAreas<'c> {
    entry: &'c DragCacheEntry,
}

impl AreaSource for FrozenAreas<'_> {
    fn area(&self, page: &Page, id: &str) -> Option<Area> {
        let Some(frozen) = self.entry.frozen.get(id) else {
            // Created after the drag began.
            return self.entry.area_without_item(page, id);
        };
        let offset = page
            .position(id)
            .map_or(Vec2::ZERO, |p| p - frozen.anchor);
        frozen.area.map(|a| a.translated(offset))
    }
}

/// Absolute positions for one pointer move.
#[derive(Clone, Debug, PartialEq)]
pub struct DragFrame {
    /// The dragged item.
    pub item: ItemId,
    /// New position of the dragged item.
    pub position: Point,
    /// Movement since the previous frame.
    pub frame_delta: Vec2,
    /// Axis of `frame_delta`, or `None` when the frame did not move.
    pub axis: Option<Axis>,
    /// Latest non-zero frame delta, including this one.
    pub direction: Vec2,
    /// New positions of every moving memo, the dragged one included.
    pub memos: BTreeMap<ItemId, Point>,
    /// New positions of every moving category, the dragged one included.
    pub categories: BTreeMap<ItemId, Point>,
}

impl DragFrame {
    /// Write the frame's positions into `page`.
    pub fn apply(&self, page: &mut Page) {
        page.apply_positions(self.memos.iter().chain(&self.categories));
    }
}

/// Drag state keyed by dragged item id.
#[derive(Clone, Debug, Default)]
pub struct DragCache {
    entries: BTreeMap<ItemId, DragCacheEntry>,
}

impl DragCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the page for a drag of `id` together with `selection`.
    ///
    /// Replaces any entry already held for `id`. Unknown selection ids are
    /// ignored. Returns `false`, recording nothing, if `id` is not on the page.
    pub fn begin(&mut self, page: &Page, id: &str, selection: &[ItemId], padding: f64) -> bool {
        let (Some(kind), Some(original_position)) = (page.kind_of(id), page.position(id)) else {
            warn!(id, "drag started on an unknown item");
            return false;
        };
        let item = ItemId::from(id);

        let mut requested: BTreeSet<ItemId> = selection
            .iter()
            .filter(|s| page.contains(s.as_str()))
            .cloned()
            .collect();
        requested.insert(item.clone());
        let movers: BTreeSet<ItemId> = requested
            .iter()
            .filter(|m| {
                !page
                    .ancestors(m.as_str())
                    .iter()
                    .any(|a| requested.contains(a))
            })
            .cloned()
            .collect();

        let mut memos = BTreeMap::new();
        let mut categories = BTreeMap::new();
        for mover in &movers {
            let descendants = page.descendants(mover.as_str());
            for moving in core::iter::once(mover).chain(descendants.iter()) {
                if *moving == item {
                    continue;
                }
                let Some(position) = page.position(moving.as_str()) else {
                    continue;
                };
                match page.kind_of(moving.as_str()) {
                    Some(ItemKind::Memo) => {
                        memos.insert(moving.clone(), position);
                    }
                    Some(ItemKind::Category) => {
                        categories.insert(moving.clone(), position);
                    }
                    None => {}
                }
            }
        }

        let ancestors = page.ancestors(id);
        let frozen = page
            .categories()
            .iter()
            .map(|c| {
                let exclude = ancestors.contains(&c.id).then_some(id);
                let frozen = Frozen {
                    area: compute_area(page, c.id.as_str(), exclude, padding),
                    anchor: c.position,
                };
                (c.id.clone(), frozen)
            })
            .collect();

        debug!(
            id,
            movers = movers.len(),
            memos = memos.len(),
            categories = categories.len(),
            "drag cache begin"
        );
        self.entries.insert(
            item.clone(),
            DragCacheEntry {
                item,
                kind,
                original_position,
                last_position: original_position,
                movers,
                original_descendant_positions: memos,
                original_descendant_category_positions: categories,
                direction: Vec2::ZERO,
                frozen,
                padding,
            },
        );
        true
    }

    /// Positions for a pointer `cumulative` pixels from where the drag began.
    ///
    /// Returns `None` on a cache miss; the caller must then leave every item
    /// where it is.
    pub fn frame(&mut self, id: &str, cumulative: Vec2) -> Option<DragFrame> {
        let entry = self.entries.get_mut(id)?;
        let position = entry.original_position + cumulative;
        let frame_delta = position - entry.last_position;
        entry.last_position = position;
        if frame_delta != Vec2::ZERO {
            entry.direction = frame_delta;
        }

        let mut memos: BTreeMap<ItemId, Point> = entry
            .original_descendant_positions
            .iter()
            .map(|(k, p)| (k.clone(), *p + cumulative))
            .collect();
        let mut categories: BTreeMap<ItemId, Point> = entry
            .original_descendant_category_positions
            .iter()
            .map(|(k, p)| (k.clone(), *p + cumulative))
            .collect();
        match entry.kind {
            ItemKind::Memo => memos.insert(entry.item.clone(), position),
            ItemKind::Category => categories.insert(entry.item.clone(), position),
        };

        Some(DragFrame {
            item: entry.item.clone(),
            position,
            frame_delta,
            axis: Axis::dominant(frame_delta),
            direction: entry.direction,
            memos,
            categories,
        })
    }

    /// The entry for a drag of `id`.
    pub fn entry(&self, id: &str) -> Option<&DragCacheEntry> {
        self.entries.get(id)
    }

    /// Freeze `category` and its ancestors again from `page` as it is now.
    ///
    /// Used when the category's membership changes during a drag. Each entry
    /// recomputes the areas without its own dragged item and anchors them at
    /// the categories' current positions, so a memo that just joined still
    /// has to leave the area it joined to leave the category.
    pub fn refreeze_area(&mut self, page: &Page, category: &str) {
        let ancestors = page.ancestors(category);
        let chain: Vec<&str> = core::iter::once(category)
            .chain(ancestors.iter().map(ItemId::as_str))
            .collect();
        for entry in self.entries.values_mut() {
            for &id in &chain {
                let Some(anchor) = page.position(id) else {
                    continue;
                };
                let area = entry.area_without_item(page, id);
                entry.frozen.insert(id.into(), Frozen { area, anchor });
            }
            debug!(item = %entry.item, category, "areas refrozen");
        }
    }

    /// Drop the entry for `id`.
    pub fn evict(&mut self, id: &str) -> Option<DragCacheEntry> {
        let evicted = self.entries.remove(id);
        if evicted.is_some() {
            debug!(id, "drag cache evicted");
        }
        evicted
    }

    /// Ids with a live entry.
    pub fn items(&self) -> Vec<&ItemId> {
        self.entries.keys().collect()
    }

    /// Whether an entry exists for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
