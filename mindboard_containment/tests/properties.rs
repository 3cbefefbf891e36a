// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests over random pages.

use kurbo::{Point, Size};
use mindboard_containment::{
    CollisionQuery, EngineConfig, LiveAreas, MovingKind, compute_area, resolve_collisions,
};
use mindboard_geometry::overlaps;
use mindboard_tree::{Category, Memo, Page};
use proptest::prelude::*;

const LIVE: LiveAreas = LiveAreas { padding: 20.0 };

fn coord() -> impl Strategy<Value = f64> {
    (-100_i32..1_000).prop_map(f64::from)
}

fn size() -> impl Strategy<Value = Option<Size>> {
    proptest::option::of((20_i32..300, 20_i32..200).prop_map(|(w, h)| Size::new(w.into(), h.into())))
}

/// Categories may only nest under earlier categories, so the input is a forest.
fn forest() -> impl Strategy<Value = Page> {
    let categories = proptest::collection::vec(
        (coord(), coord(), size(), any::<prop::sample::Index>(), any::<bool>()),
        1..8,
    );
    let memos = proptest::collection::vec(
        (coord(), coord(), size(), proptest::option::of(any::<prop::sample::Index>())),
        0..16,
    );
    (categories, memos).prop_map(|(categories, memos)| {
        let count = categories.len();
        let categories: Vec<Category> = categories
            .into_iter()
            .enumerate()
            .map(|(i, (x, y, size, parent, nested))| {
                let mut c = Category::new(format!("c{i}"), Point::new(x, y));
                c.size = size;
                if nested && i > 0 {
                    c.parent_id = Some(format!("c{}", parent.index(i)).into());
                }
                c
            })
            .collect();
        let memos: Vec<Memo> = memos
            .into_iter()
            .enumerate()
            .map(|(i, (x, y, size, parent))| {
                let mut m = Memo::new(format!("m{i}"), Point::new(x, y));
                m.size = size;
                m.parent_id = parent.map(|p| format!("c{}", p.index(count)).into());
                m
            })
            .collect();
        Page::new(memos, categories)
    })
}

proptest! {
    #[test]
    fn areas_contain_all_descendants(page in forest()) {
        for category in page.categories() {
            let id = category.id.as_str();
            let descendants = page.descendants(id);
            let area = compute_area(&page, id, None, 20.0);
            if descendants.is_empty() {
                prop_assert!(area.is_none());
                continue;
            }
            let area = area.expect("expanded category with content has an area");
            for d in descendants.iter() {
                let r = page.block_rect(d.as_str()).unwrap();
                prop_assert!(area.rect.x0 <= r.x0 - 20.0 && area.rect.y0 <= r.y0 - 20.0);
                prop_assert!(area.rect.x1 >= r.x1 + 20.0 && area.rect.y1 >= r.y1 + 20.0);
            }
        }
    }

    #[test]
    fn collisions_terminate_and_clear_the_mover(
        memos in proptest::collection::vec((coord(), coord(), size()), 2..10),
        max_iterations in 1_usize..12,
    ) {
        let page = Page::new(
            memos
                .into_iter()
                .enumerate()
                .map(|(i, (x, y, size))| {
                    let mut m = Memo::new(format!("m{i}"), Point::new(x, y));
                    m.size = size;
                    m
                })
                .collect(),
            vec![],
        );
        let config = EngineConfig::default();
        let query = CollisionQuery::new("m0", MovingKind::Memo).with_max_iterations(max_iterations);
        let outcome = resolve_collisions(&page, &query, &LIVE, &config);
        prop_assert!(outcome.iterations <= max_iterations);
        prop_assert!(!outcome.updated_memos.contains_key("m0"));

        if outcome.converged {
            let mut settled = page.clone();
            outcome.apply(&mut settled);
            let mover = settled.block_rect("m0").unwrap();
            for other in settled.memos().iter().filter(|m| m.id != "m0") {
                prop_assert!(!overlaps(mover, other.rect()), "m0 still overlaps {}", other.id);
            }
            let again = resolve_collisions(&settled, &query, &LIVE, &config);
            prop_assert!(again.is_empty());
        }
    }
}
