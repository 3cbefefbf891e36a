// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mindboard Containment: areas, collisions, and drop targets for a canvas of
//! nested memos and categories.
//!
//! The engine sits between pointer input and the page model of
//! [`mindboard_tree`]:
//!
//! - [`compute_area`]: the containment region of a category, derived from its
//!   content. Cycle-safe; empty and collapsed categories have none.
//! - [`DragCache`]: original positions and frozen areas for the length of a
//!   drag. Positions come from cumulative pointer offsets, and areas whose
//!   membership is not changing stay put while things move through them.
//! - [`resolve_collisions`]: pushes siblings of the moving items apart along
//!   the cheaper axis, with a priority scheme that never pushes anything back
//!   into a mover, bounded by an iteration cap.
//! - [`detect_drop_target`] / [`apply_drop`]: the deepest category under the
//!   pointer and the reparent itself, never into the dragged item's subtree.
//! - [`MembershipTracker`]: overlap-based joining and debounced leaving for
//!   memos dragged without a modifier.
//! - [`DragSession`]: all of the above driven by pointer events on a virtual
//!   clock.
//!
//! ## Failure model
//!
//! Nothing here returns an error. Unknown ids, cycles and cache misses turn
//! into safe outcomes: no area, a rejected drop ([`DropOutcome::Rejected`]),
//! or a frame that moves nothing. A collision run that hits its iteration cap
//! reports `converged: false` and may leave overlaps behind.
//!
//! All tunables live in [`EngineConfig`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod area;
pub mod cache;
pub mod collision;
pub mod config;
pub mod membership;
pub mod reparent;
pub mod session;

pub use area::{Area, AreaSource, LiveAreas, area_or_fallback, compute_all_areas, compute_area};
pub use cache::{DragCache, DragCacheEntry, DragFrame, FrozenAreas};
pub use collision::{
    CollisionOutcome, CollisionQuery, CollisionResolver, MovingKind, resolve_collisions,
};
pub use config::EngineConfig;
pub use membership::{MembershipChange, MembershipTracker, Unparented};
pub use reparent::{DropFlags, DropOutcome, apply_drop, detect_drop_target, drop_candidates};
pub use session::{DragSession, DragUpdate, DropUpdate, SessionEvent};
