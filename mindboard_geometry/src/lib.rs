// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mindboard Geometry: rectangle math for a canvas of freely positioned boxes.
//!
//! Everything on a Mindboard canvas is an axis-aligned rectangle in an unbounded,
//! possibly negative, `f64` canvas space. This crate provides the small set of
//! primitives the containment engine is built from:
//!
//! - Default sizes for memos and categories, and sanitizing constructors that
//!   never let a missing or non-finite size or position leak into a [`Rect`].
//! - [`overlaps`] / [`overlap_rect`]: strict (positive-area) overlap and the
//!   intersection rectangle.
//! - [`contains_point`]: inclusive point-in-rect, the test used for drop
//!   targeting.
//! - [`separation`]: the displacement that pushes one rectangle clear of another
//!   along the cheaper axis.
//! - [`bounding_box`]: union of many rectangles.
//! - [`color_for_id`]: the deterministic area color for a category id.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use mindboard_geometry::{Axis, overlap_rect, separation};
//!
//! let mover = Rect::new(0.0, 0.0, 100.0, 100.0);
//! let other = Rect::new(90.0, 20.0, 190.0, 120.0);
//!
//! // 10px wide, 80px tall overlap: the horizontal axis is cheaper.
//! assert_eq!(overlap_rect(mover, other), Some(Rect::new(90.0, 20.0, 100.0, 100.0)));
//! let push = separation(mover, other, 5.0, None).unwrap();
//! assert_eq!(push.axis, Axis::Horizontal);
//! assert_eq!(push.offset.x, 15.0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod overlap;
mod palette;
mod sizes;

pub use overlap::{
    Axis, Push, bounding_box, contains_point, overlap_rect, overlaps, overlaps_within, separation,
};
pub use palette::{AREA_PALETTE, AreaColor, color_for_id, id_hash};
pub use sizes::{
    DEFAULT_CATEGORY_SIZE, DEFAULT_MEMO_SIZE, block_rect, sanitize_point, sanitize_size,
};
