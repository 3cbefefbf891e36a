// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point-based drop target detection and reparenting.
//!
//! A category is a drop candidate when the pointer lies in its block or, for
//! expanded categories, in its area. The dragged item and everything inside it
//! are never candidates, which is what keeps the tree acyclic: a category can
//! not even be offered one of its own descendants. Among the candidates the
//! deepest one wins, so dropping onto a nested subcategory beats dropping onto
//! the categories around it.

use alloc::vec::Vec;

use kurbo::Point;
use mindboard_geometry::contains_point;
use mindboard_tree::{ItemId, ItemKind, Page, TreeError};
use smallvec::SmallVec;
use tracing::debug;

use crate::area::AreaSource;

bitflags::bitflags! {
    /// Options for drop target detection.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DropFlags: u8 {
        /// Accept the pointer inside an expanded category's area, not just its block.
        const USE_AREAS              = 0b0000_0001;
        /// Never offer the dragged item's current parent.
        const EXCLUDE_CURRENT_PARENT = 0b0000_0010;
    }
}

impl Default for DropFlags {
    fn default() -> Self {
        Self::USE_AREAS
    }
}

/// Every category that could receive `dragged` at `pointer`, in page order.
pub fn drop_candidates(
    page: &Page,
    dragged: &str,
    pointer: Point,
    areas: &impl AreaSource,
    flags: DropFlags,
) -> Vec<ItemId> {
    let current_parent = page.parent_of(dragged);
    page.categories()
        .iter()
        .filter(|c| c.id != dragged && !page.is_ancestor(dragged, c.id.as_str()))
        .filter(|c| {
            !(flags.contains(DropFlags::EXCLUDE_CURRENT_PARENT) && Some(&c.id) == current_parent)
        })
        .filter(|c| {
            contains_point(c.rect(), pointer)
                || (flags.contains(DropFlags::USE_AREAS)
                    && c.is_expanded
                    && areas
                        .area(page, c.id.as_str())
                        .is_some_and(|a| a.contains_point(pointer)))
        })
        .map(|c| c.id.clone())
        .collect()
}

/// The deepest category that could receive `dragged` at `pointer`.
///
/// Ties keep the first candidate in page order.
pub fn detect_drop_target(
    page: &Page,
    dragged: &str,
    pointer: Point,
    areas: &impl AreaSource,
    flags: DropFlags,
) -> Option<ItemId> {
    let mut best: Option<(usize, ItemId)> = None;
    for candidate in drop_candidates(page, dragged, pointer, areas, flags) {
        let depth = page.depth(candidate.as_str());
        if best.as_ref().is_none_or(|(d, _)| depth > *d) {
            best = Some((depth, candidate));
        }
    }
    best.map(|(_, id)| id)
}

/// Result of [`apply_drop`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// The item already had this parent; only its position changed.
    Unchanged,
    /// The item moved to a new parent.
    Reparented {
        /// The moved item.
        item: ItemId,
        /// Previous parent.
        from: Option<ItemId>,
        /// New parent, or `None` for the top level.
        to: Option<ItemId>,
    },
    /// The move was refused and the tree is untouched.
    Rejected(TreeError),
}

impl DropOutcome {
    /// Categories whose area the drop may have changed: old parent, new
    /// parent, and the item itself when it is a category.
    pub fn affected_categories(&self, page: &Page) -> SmallVec<[ItemId; 3]> {
        let mut out = SmallVec::new();
        if let Self::Reparented { item, from, to } = self {
            out.extend(from.iter().cloned());
            out.extend(to.iter().cloned());
            if page.kind_of(item.as_str()) == Some(ItemKind::Category) {
                out.push(item.clone());
            }
        }
        out
    }
}

/// Move `dragged` under `target`, or to the top level for `None`.
///
/// The new parent is expanded. Refusals (unknown ids, memo targets, cycles)
/// leave the tree unchanged.
pub fn apply_drop(page: &mut Page, dragged: &str, target: Option<&str>) -> DropOutcome {
    if page.parent_of(dragged).map(ItemId::as_str) == target && page.contains(dragged) {
        return DropOutcome::Unchanged;
    }
    match page.reparent(dragged, target) {
        Ok(from) => {
            debug!(id = dragged, ?from, to = ?target, "dropped into new parent");
            DropOutcome::Reparented {
                item: dragged.into(),
                from,
                to: target.map(ItemId::from),
            }
        }
        Err(err) => {
            debug!(id = dragged, %err, "drop rejected");
            DropOutcome::Rejected(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::LiveAreas;
    use alloc::vec;
    use kurbo::Size;
    use mindboard_tree::{Category, Memo};

    const LIVE: LiveAreas = LiveAreas { padding: 20.0 };

    fn nested() -> Page {
        Page::new(
            vec![Memo::new("x", Point::new(800.0, 800.0))],
            vec![
                Category::new("a", Point::new(0.0, 0.0)).with_size(Size::new(500.0, 500.0)),
                Category::new("b", Point::new(100.0, 100.0))
                    .with_size(Size::new(300.0, 300.0))
                    .with_parent("a"),
                Category::new("c", Point::new(150.0, 150.0))
                    .with_size(Size::new(150.0, 150.0))
                    .with_parent("b"),
            ],
        )
    }

    #[test]
    fn deepest_candidate_wins() {
        let page = nested();
        let pointer = Point::new(200.0, 200.0);
        assert_eq!(
            drop_candidates(&page, "x", pointer, &LIVE, DropFlags::USE_AREAS),
            ["a", "b", "c"]
        );
        let target = detect_drop_target(&page, "x", pointer, &LIVE, DropFlags::USE_AREAS);
        assert_eq!(target.as_ref().map(ItemId::as_str), Some("c"));
    }

    #[test]
    fn own_subtree_is_never_a_candidate() {
        let page = nested();
        let pointer = Point::new(200.0, 200.0);
        assert_eq!(detect_drop_target(&page, "a", pointer, &LIVE, DropFlags::USE_AREAS), None);
        assert_eq!(
            detect_drop_target(&page, "b", pointer, &LIVE, DropFlags::USE_AREAS)
                .as_ref()
                .map(ItemId::as_str),
            Some("a")
        );
    }

    #[test]
    fn current_parent_can_be_excluded() {
        let page = nested();
        let pointer = Point::new(390.0, 390.0);
        assert_eq!(
            detect_drop_target(&page, "c", pointer, &LIVE, DropFlags::USE_AREAS)
                .as_ref()
                .map(ItemId::as_str),
            Some("b")
        );
        assert_eq!(
            detect_drop_target(
                &page,
                "c",
                pointer,
                &LIVE,
                DropFlags::USE_AREAS | DropFlags::EXCLUDE_CURRENT_PARENT
            )
            .as_ref()
            .map(ItemId::as_str),
            Some("a")
        );
    }

    #[test]
    fn areas_extend_the_hit_region() {
        let page = Page::new(
            vec![Memo::new("m", Point::new(0.0, 100.0)).with_parent("c"), Memo::new("x", Point::new(900.0, 0.0))],
            vec![Category::new("c", Point::ORIGIN)],
        );
        // Inside the area (memo region) but outside the block.
        let pointer = Point::new(10.0, 150.0);
        assert_eq!(detect_drop_target(&page, "x", pointer, &LIVE, DropFlags::empty()), None);
        assert!(detect_drop_target(&page, "x", pointer, &LIVE, DropFlags::USE_AREAS).is_some());
    }

    #[test]
    fn drop_reparents_and_expands() {
        let mut page = nested();
        page.set_expanded("c", false).unwrap();
        let outcome = apply_drop(&mut page, "x", Some("c"));
        assert_eq!(
            outcome,
            DropOutcome::Reparented {
                item: "x".into(),
                from: None,
                to: Some("c".into())
            }
        );
        assert!(page.category("c").unwrap().is_expanded);
        assert_eq!(page.children_of("c"), ["x"]);
        assert_eq!(outcome.affected_categories(&page).as_slice(), ["c"]);

        assert_eq!(apply_drop(&mut page, "x", Some("c")), DropOutcome::Unchanged);
        let outcome = apply_drop(&mut page, "x", None);
        assert!(matches!(outcome, DropOutcome::Reparented { to: None, .. }));
        assert_eq!(page.parent_of("x"), None);
    }

    #[test]
    fn drop_onto_descendant_is_rejected() {
        let mut page = nested();
        let outcome = apply_drop(&mut page, "a", Some("c"));
        assert!(matches!(outcome, DropOutcome::Rejected(TreeError::Cycle { .. })));
        assert_eq!(page.parent_of("a"), None);
        assert_eq!(page.parent_of("c").map(ItemId::as_str), Some("b"));
    }
}
