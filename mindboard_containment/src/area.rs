// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Category containment areas.
//!
//! The area of an expanded category is the bounding box of its own block, its
//! child memos, and its child categories' areas (or blocks, for subcategories
//! without one), grown by the configured padding on every side. Empty and
//! collapsed categories have no area.

use alloc::collections::BTreeMap;

use hashbrown::HashSet;
use kurbo::{Point, Rect, Vec2};
use mindboard_geometry::{AreaColor, bounding_box, color_for_id, contains_point};
use mindboard_tree::{ItemId, Page};
use tracing::warn;

/// The containment region of a category.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Area {
    /// Region in canvas space, padding included.
    pub rect: Rect,
    /// Tint, stable for a given category id.
    pub color: AreaColor,
}

impl Area {
    /// Whether `point` lies in the area, edges included.
    pub fn contains_point(&self, point: Point) -> bool {
        contains_point(self.rect, point)
    }

    /// The same area moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            rect: self.rect + offset,
            color: self.color,
        }
    }
}

/// Compute the area of category `id`.
///
/// `exclude` removes one child (memo or category) from consideration, which
/// answers "what would this area be without that item". Returns `None` for
/// unknown ids, memos, collapsed categories and categories with no remaining
/// children.
pub fn compute_area(page: &Page, id: &str, exclude: Option<&str>, padding: f64) -> Option<Area> {
    let mut visited = HashSet::new();
    compute_area_in(page, id, &mut visited, exclude, padding)
}

/// [`compute_area`] with a caller-provided visited set.
///
/// Categories already in `visited` yield `None` without recursing, so a
/// corrupted parent chain cannot recurse forever.
pub fn compute_area_in<'a>(
    page: &'a Page,
    id: &'a str,
    visited: &mut HashSet<&'a str>,
    exclude: Option<&str>,
    padding: f64,
) -> Option<Area> {
    if !visited.insert(id) {
        warn!(id, "category revisited while computing areas");
        return None;
    }
    let category = page.category(id)?;
    if !category.is_expanded {
        return None;
    }

    let mut rects = alloc::vec![category.rect()];
    let mut any_child = false;
    for child in &category.children {
        if exclude.is_some_and(|e| child == e) {
            continue;
        }
        if let Some(memo) = page.memo(child.as_str()) {
            rects.push(memo.rect());
            any_child = true;
        } else if let Some(sub) = page.category(child.as_str()) {
            let rect = compute_area_in(page, sub.id.as_str(), visited, exclude, padding)
                .map_or_else(|| sub.rect(), |a| a.rect);
            rects.push(rect);
            any_child = true;
        }
    }
    if !any_child {
        return None;
    }

    let bounds = bounding_box(rects)?;
    Some(Area {
        rect: bounds.inflate(padding, padding),
        color: color_for_id(id),
    })
}

/// The area of `id`, or its own block grown by `padding` when it has none.
///
/// Returns `None` only when `id` is not a category.
pub fn area_or_fallback(page: &Page, id: &str, padding: f64) -> Option<Area> {
    if let Some(area) = compute_area(page, id, None, padding) {
        return Some(area);
    }
    let category = page.category(id)?;
    Some(Area {
        rect: category.rect().inflate(padding, padding),
        color: color_for_id(id),
    })
}

/// Live areas of every category that has one, keyed by id.
pub fn compute_all_areas(page: &Page, padding: f64) -> BTreeMap<ItemId, Area> {
    page.categories()
        .iter()
        .filter_map(|c| {
            compute_area(page, c.id.as_str(), None, padding).map(|a| (c.id.clone(), a))
        })
        .collect()
}

/// Where the collision resolver and drop detectors read category areas from.
///
/// Outside a drag, areas are computed from live positions ([`LiveAreas`]).
/// During a drag they come from a frozen snapshot so that areas whose
/// membership is unaffected stay put.
pub trait AreaSource {
    /// The area category `id` should be treated as having right now.
    fn area(&self, page: &Page, id: &str) -> Option<Area>;
}

/// Areas computed on demand from the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiveAreas {
    /// Padding around category content.
    pub padding: f64,
}

impl AreaSource for LiveAreas {
    fn area(&self, page: &Page, id: &str) -> Option<Area> {
        compute_area(page, id, None, self.padding)
    }
}

impl<S: AreaSource + ?Sized> AreaSource for &S {
    fn area(&self, page: &Page, id: &str) -> Option<Area> {
        (**self).area(page, id)
    }
}
