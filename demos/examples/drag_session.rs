// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drive a [`DragSession`] through an ordinary drag and a reparent drop.
//!
//! Run with `RUST_LOG=mindboard_containment=debug` to see the engine's logs.

use kurbo::Point;
use mindboard_containment::{DragSession, EngineConfig, SessionEvent};
use mindboard_tree::{Category, Memo, Page};
use tracing_subscriber::EnvFilter;

fn print_page(label: &str, page: &Page, session: &DragSession) {
    println!("\n== {label} ==");
    for memo in page.memos() {
        let parent = page.parent_of(memo.id.as_str()).map_or("-", |p| p.as_str());
        println!(
            "  memo {:<6} at ({:>6.1}, {:>6.1}) parent {parent}",
            memo.id.as_str(),
            memo.position.x,
            memo.position.y
        );
    }
    for (id, area) in session.areas(page) {
        println!(
            "  area {:<6} ({:.1}, {:.1}) .. ({:.1}, {:.1}) #{:02x}{:02x}{:02x}",
            id.as_str(),
            area.rect.x0,
            area.rect.y0,
            area.rect.x1,
            area.rect.y1,
            area.color.r,
            area.color.g,
            area.color.b
        );
    }
}

fn drain(session: &mut DragSession, page: &mut Page, mut now: u64) -> u64 {
    while let Some(due) = session.next_due() {
        now = now.max(due);
        for event in session.tick(page, now) {
            match event {
                SessionEvent::CommitHistory(item) => println!("  t={now}: commit history for {item:?}"),
                SessionEvent::CacheEvicted(item) => println!("  t={now}: cache evicted for {item:?}"),
                other => println!("  t={now}: {other:?}"),
            }
        }
    }
    now
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut page = Page::new(
        vec![
            Memo::new("plan", Point::new(0.0, 100.0)).with_parent("ideas"),
            Memo::new("draft", Point::new(400.0, 400.0)),
            Memo::new("notes", Point::new(640.0, 400.0)),
        ],
        vec![
            Category::new("ideas", Point::ORIGIN),
            Category::new("later", Point::new(0.0, 700.0)),
            Category::new("someday", Point::new(0.0, 800.0)).with_parent("later"),
        ],
    );
    let mut session = DragSession::new(EngineConfig::default());
    print_page("initial", &page, &session);

    // Ordinary drag: "draft" slides right into "notes", which gets pushed.
    let mut now = 0;
    session.pointer_down("draft", &[], Point::new(450.0, 420.0), now);
    for step in 1..=10 {
        now += 16;
        let pointer = Point::new(450.0 + 15.0 * f64::from(step), 420.0);
        let update = session.pointer_move(&mut page, "draft", pointer, false, now);
        for (id, position) in &update.collisions.updated_memos {
            println!("  t={now}: pushed {} to ({:.1}, {:.1})", id.as_str(), position.x, position.y);
        }
    }
    now += 16;
    let release = session.pointer_up(&mut page, "draft", Point::new(600.0, 420.0), false, now);
    println!("  released; dragged = {}", release.dragged);
    now = drain(&mut session, &mut page, now);
    print_page("after push", &page, &session);

    // Reparent drag: hold the modifier and drop "draft" into "someday".
    now += 1000;
    let start = page.position("draft").unwrap_or_default();
    let grab = start + (10.0, 10.0);
    let target = Point::new(40.0, 830.0);
    session.pointer_down("draft", &[], grab, now);
    for step in 1..=8 {
        now += 16;
        let t = f64::from(step) / 8.0;
        let pointer = grab.lerp(target, t);
        let update = session.pointer_move(&mut page, "draft", pointer, true, now);
        if let Some(candidate) = update.drop_target {
            println!("  t={now}: would drop into {}", candidate.as_str());
        }
    }
    now += 16;
    let release = session.pointer_up(&mut page, "draft", target, true, now);
    println!("  drop: {:?}", release.drop);
    drain(&mut session, &mut page, now);
    print_page("after drop", &page, &session);
}
