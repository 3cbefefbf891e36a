// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlap, intersection, and separation of axis-aligned rectangles.

use kurbo::{Point, Rect, Vec2};

/// A canvas axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// The x axis.
    Horizontal,
    /// The y axis.
    Vertical,
}

impl Axis {
    /// The axis along which `delta` moves the most, or `None` for a zero vector.
    ///
    /// Ties favor [`Axis::Horizontal`].
    pub fn dominant(delta: Vec2) -> Option<Self> {
        if delta.x == 0.0 && delta.y == 0.0 {
            return None;
        }
        if delta.x * delta.x >= delta.y * delta.y {
            Some(Self::Horizontal)
        } else {
            Some(Self::Vertical)
        }
    }

    /// The component of `v` along this axis.
    #[inline]
    pub fn component(self, v: Vec2) -> f64 {
        match self {
            Self::Horizontal => v.x,
            Self::Vertical => v.y,
        }
    }

    /// The extent of `rect` along this axis.
    #[inline]
    pub fn extent(self, rect: Rect) -> f64 {
        match self {
            Self::Horizontal => rect.width(),
            Self::Vertical => rect.height(),
        }
    }

    /// A vector of length `amount` along this axis.
    #[inline]
    pub fn vector(self, amount: f64) -> Vec2 {
        match self {
            Self::Horizontal => Vec2::new(amount, 0.0),
            Self::Vertical => Vec2::new(0.0, amount),
        }
    }
}

/// Whether two rectangles overlap with strictly positive area.
///
/// Unlike `Aabb2D::overlaps` in an inclusive index, rectangles that only share an
/// edge do **not** overlap here: touching boxes are not a collision.
#[inline]
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

/// The intersection of two rectangles, if they overlap with positive area.
pub fn overlap_rect(a: Rect, b: Rect) -> Option<Rect> {
    overlaps(a, b).then(|| a.intersect(b))
}

/// Whether `a` overlaps `b` grown by `margin` on every side.
///
/// With a positive margin, rectangles within `margin` of each other count as
/// overlapping even though they do not touch.
#[inline]
pub fn overlaps_within(a: Rect, b: Rect, margin: f64) -> bool {
    overlaps(a, b.inflate(margin, margin))
}

/// Whether `rect` contains `point`, edges included.
#[inline]
pub fn contains_point(rect: Rect, point: Point) -> bool {
    rect.x0 <= point.x && rect.y0 <= point.y && point.x <= rect.x1 && point.y <= rect.y1
}

/// The smallest rectangle enclosing every rectangle in `rects`.
pub fn bounding_box(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    let mut it = rects.into_iter();
    let first = it.next()?;
    Some(it.fold(first, |acc, r| acc.union(r)))
}

/// A displacement that separates two rectangles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Push {
    /// Axis the displacement runs along.
    pub axis: Axis,
    /// Offset to apply to the pushed rectangle.
    pub offset: Vec2,
}

/// Compute how far `pushee` must move to clear `pusher`, plus `margin`.
///
/// Returns `None` when the rectangles do not overlap. The push runs along the
/// axis of the smaller overlap extent (horizontal when the overlap is at most as
/// wide as it is tall). The sign follows the pushee's center relative to the
/// pusher's; when the centers coincide on that axis the sign of `tie_break`
/// along the axis is used, defaulting to positive.
pub fn separation(pusher: Rect, pushee: Rect, margin: f64, tie_break: Option<Vec2>) -> Option<Push> {
    let overlap = overlap_rect(pusher, pushee)?;
    let axis = if overlap.width() <= overlap.height() {
        Axis::Horizontal
    } else {
        Axis::Vertical
    };
    let amount = axis.extent(overlap) + margin;
    let diff = axis.component(pushee.center() - pusher.center());
    let sign = if diff > 0.0 {
        1.0
    } else if diff < 0.0 {
        -1.0
    } else {
        match tie_break.map(|t| axis.component(t)) {
            Some(c) if c < 0.0 => -1.0,
            _ => 1.0,
        }
    };
    Some(Push {
        axis,
        offset: axis.vector(sign * amount),
    })
}
