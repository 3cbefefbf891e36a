// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Default item sizes and sanitizing rectangle constructors.

use kurbo::{Point, Rect, Size};

/// Size of a memo that does not carry an explicit size.
pub const DEFAULT_MEMO_SIZE: Size = Size::new(200.0, 95.0);

/// Size of a category block that does not carry an explicit size.
pub const DEFAULT_CATEGORY_SIZE: Size = Size::new(200.0, 80.0);

/// Return `size` if it is finite and strictly positive on both axes, otherwise `default`.
pub fn sanitize_size(size: Option<Size>, default: Size) -> Size {
    match size {
        Some(s)
            if s.width.is_finite() && s.height.is_finite() && s.width > 0.0 && s.height > 0.0 =>
        {
            s
        }
        _ => default,
    }
}

/// Replace non-finite coordinates with zero.
pub fn sanitize_point(point: Point) -> Point {
    let x = if point.x.is_finite() { point.x } else { 0.0 };
    let y = if point.y.is_finite() { point.y } else { 0.0 };
    Point::new(x, y)
}

/// The block rectangle of an item at `position` with an optional explicit size.
///
/// Missing, degenerate, or non-finite sizes fall back to `default`, and
/// non-finite coordinates are treated as zero, so the result is always finite.
pub fn block_rect(position: Point, size: Option<Size>, default: Size) -> Rect {
    Rect::from_origin_size(sanitize_point(position), sanitize_size(size, default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_size_uses_default() {
        let r = block_rect(Point::new(10.0, 20.0), None, DEFAULT_MEMO_SIZE);
        assert_eq!(r, Rect::new(10.0, 20.0, 210.0, 115.0));
    }

    #[test]
    fn degenerate_sizes_are_replaced() {
        for bad in [
            Size::new(0.0, 10.0),
            Size::new(10.0, -1.0),
            Size::new(f64::NAN, 10.0),
            Size::new(10.0, f64::INFINITY),
        ] {
            assert_eq!(
                sanitize_size(Some(bad), DEFAULT_CATEGORY_SIZE),
                DEFAULT_CATEGORY_SIZE,
                "{bad:?} should fall back to the default size"
            );
        }
        let ok = Size::new(50.0, 60.0);
        assert_eq!(sanitize_size(Some(ok), DEFAULT_CATEGORY_SIZE), ok);
    }

    #[test]
    fn non_finite_position_becomes_origin_component() {
        let r = block_rect(Point::new(f64::NAN, -40.0), None, DEFAULT_CATEGORY_SIZE);
        assert_eq!(r, Rect::new(0.0, -40.0, 200.0, 40.0));
    }
}
