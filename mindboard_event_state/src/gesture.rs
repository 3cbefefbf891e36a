// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag gesture recognition for a single pointer.
//!
//! A [`DragGesture`] turns raw pointer down/move/up events into a drag with a
//! well-defined start. A press only becomes a drag once the pointer has
//! travelled [`drag_threshold`](DragGesture::drag_threshold) pixels from the
//! down point; smaller jitter is reported as [`GestureMove::Pending`] so hosts
//! can leave geometry untouched.
//!
//! ## Positions are cumulative
//!
//! Every drag move reports the *cumulative* offset from the down point, never a
//! per-frame delta. Hosts add it to positions captured at drag start, so no
//! error accumulates no matter how many frames arrive or how irregularly.
//!
//! ## Long-press arming
//!
//! Touch input has no modifier keys. Holding the pointer still for
//! [`long_press`](DragGesture::long_press) ms arms the gesture, and hosts treat
//! an armed drag the way they would treat a drag with a modifier held.
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use mindboard_event_state::gesture::{DragGesture, GestureMove};
//!
//! let mut g: DragGesture<u32> = DragGesture::new();
//! g.on_down(7, Point::new(100.0, 100.0), 0);
//!
//! // 3px of jitter does not start a drag.
//! assert_eq!(g.on_move(Point::new(103.0, 100.0), 10), GestureMove::Pending);
//!
//! // Crossing 5px does; the offset is measured from the down point.
//! assert_eq!(
//!     g.on_move(Point::new(106.0, 100.0), 20),
//!     GestureMove::Started { target: 7, cumulative: Vec2::new(6.0, 0.0) }
//! );
//! ```

use kurbo::{Point, Vec2};

/// Where a press is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Down, but not yet past the drag threshold.
    Pressed,
    /// Past the drag threshold.
    Dragging,
}

/// State for the active press.
#[derive(Clone, Debug)]
pub struct Press<K> {
    /// Item the press started on.
    pub target: K,
    /// Pointer position at press time.
    pub down_position: Point,
    /// Timestamp of the press (milliseconds).
    pub down_time: u64,
    /// Pointer position of the latest event.
    pub last_position: Point,
    /// Timestamp of the latest event (milliseconds).
    pub last_time: u64,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Whether a long press armed this gesture.
    pub armed: bool,
    /// Pointer speed over the latest move, in px/ms.
    pub speed: f64,
}

/// Result of feeding a pointer move to a [`DragGesture`].
#[derive(Clone, Debug, PartialEq)]
pub enum GestureMove<K> {
    /// No press is active.
    Idle,
    /// A press is active but has not crossed the drag threshold.
    Pending,
    /// This move crossed the drag threshold.
    Started {
        /// Item being dragged.
        target: K,
        /// Offset from the down point.
        cumulative: Vec2,
    },
    /// A drag already in progress moved.
    Moved {
        /// Item being dragged.
        target: K,
        /// Offset from the down point.
        cumulative: Vec2,
    },
}

/// Summary of a finished press.
#[derive(Clone, Debug, PartialEq)]
pub struct Release<K> {
    /// Item the press started on.
    pub target: K,
    /// Whether the press had become a drag.
    pub dragged: bool,
    /// Whether a long press armed the gesture.
    pub armed: bool,
    /// Offset of the release point from the down point.
    pub cumulative: Vec2,
    /// Pointer speed over the last move, in px/ms.
    pub speed: f64,
}

/// Drag recognizer for one pointer.
#[derive(Clone, Debug)]
pub struct DragGesture<K> {
    press: Option<Press<K>>,
    /// Distance from the down point at which a press becomes a drag (pixels).
    pub drag_threshold: f64,
    /// Hold time that arms the gesture (milliseconds), or `None` to disable.
    pub long_press: Option<u64>,
}

impl<K: Clone> DragGesture<K> {
    /// Create a recognizer with a 5px drag threshold and a 500ms long press.
    pub fn new() -> Self {
        Self::with_thresholds(5.0, Some(500))
    }

    /// Create a recognizer with custom thresholds.
    pub fn with_thresholds(drag_threshold: f64, long_press: Option<u64>) -> Self {
        Self {
            press: None,
            drag_threshold,
            long_press,
        }
    }

    /// Record a pointer down, replacing any press in progress.
    pub fn on_down(&mut self, target: K, position: Point, timestamp: u64) {
        self.press = Some(Press {
            target,
            down_position: position,
            down_time: timestamp,
            last_position: position,
            last_time: timestamp,
            phase: Phase::Pressed,
            armed: false,
            speed: 0.0,
        });
    }

    /// Feed a pointer move.
    ///
    /// The drag starts on the first move whose distance from the down point is
    /// at least [`drag_threshold`](Self::drag_threshold).
    pub fn on_move(&mut self, position: Point, timestamp: u64) -> GestureMove<K> {
        let long_press = self.long_press;
        let Some(press) = self.press.as_mut() else {
            return GestureMove::Idle;
        };

        let dt = timestamp.saturating_sub(press.last_time);
        if dt > 0 {
            press.speed = press.last_position.distance(position) / dt as f64;
        }
        press.last_position = position;
        press.last_time = timestamp;

        let cumulative = position - press.down_position;
        match press.phase {
            Phase::Dragging => GestureMove::Moved {
                target: press.target.clone(),
                cumulative,
            },
            Phase::Pressed => {
                if !press.armed
                    && long_press
                        .is_some_and(|hold| timestamp.saturating_sub(press.down_time) >= hold)
                {
                    press.armed = true;
                }
                if cumulative.hypot() >= self.drag_threshold {
                    press.phase = Phase::Dragging;
                    GestureMove::Started {
                        target: press.target.clone(),
                        cumulative,
                    }
                } else {
                    GestureMove::Pending
                }
            }
        }
    }

    /// Check the long-press timer without a move event.
    ///
    /// Returns the target if this call armed the gesture.
    pub fn on_hold(&mut self, timestamp: u64) -> Option<K> {
        let hold = self.long_press?;
        let press = self.press.as_mut()?;
        if press.armed || press.phase != Phase::Pressed {
            return None;
        }
        if timestamp.saturating_sub(press.down_time) >= hold {
            press.armed = true;
            return Some(press.target.clone());
        }
        None
    }

    /// Finish the press at `position`.
    pub fn on_up(&mut self, position: Point, timestamp: u64) -> Option<Release<K>> {
        let press = self.press.take()?;
        let dt = timestamp.saturating_sub(press.last_time);
        let speed = if dt > 0 {
            press.last_position.distance(position) / dt as f64
        } else {
            press.speed
        };
        Some(Release {
            dragged: press.phase == Phase::Dragging,
            armed: press.armed,
            cumulative: position - press.down_position,
            speed,
            target: press.target,
        })
    }

    /// Finish the press because the pointer was lost.
    ///
    /// Produces the same [`Release`] a pointer up at the last known position
    /// would, so hosts can run one finalization path for both.
    pub fn cancel(&mut self) -> Option<Release<K>> {
        let (position, timestamp) = {
            let press = self.press.as_ref()?;
            (press.last_position, press.last_time)
        };
        self.on_up(position, timestamp)
    }

    /// The active press, if any.
    pub fn press(&self) -> Option<&Press<K>> {
        self.press.as_ref()
    }

    /// Whether a press is active.
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Whether the active press has become a drag.
    pub fn is_dragging(&self) -> bool {
        self.press
            .as_ref()
            .is_some_and(|p| p.phase == Phase::Dragging)
    }

    /// Whether the active press is armed by a long press.
    pub fn is_armed(&self) -> bool {
        self.press.as_ref().is_some_and(|p| p.armed)
    }

    /// Pointer speed over the latest move in px/ms, or zero without a press.
    pub fn speed(&self) -> f64 {
        self.press.as_ref().map_or(0.0, |p| p.speed)
    }
}

impl<K: Clone> Default for DragGesture<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_below_threshold_stays_pending() {
        let mut g: DragGesture<u32> = DragGesture::new();
        g.on_down(1, Point::new(0.0, 0.0), 0);
        assert_eq!(g.on_move(Point::new(3.0, 3.0), 5), GestureMove::Pending);
        assert!(!g.is_dragging());
        let release = g.on_up(Point::new(2.0, 2.0), 10).unwrap();
        assert!(!release.dragged);
        assert!(!g.is_pressed());
    }

    #[test]
    fn exact_threshold_starts_drag() {
        let mut g: DragGesture<u32> = DragGesture::new();
        g.on_down(1, Point::new(0.0, 0.0), 0);
        assert_eq!(
            g.on_move(Point::new(3.0, 4.0), 5),
            GestureMove::Started {
                target: 1,
                cumulative: Vec2::new(3.0, 4.0)
            }
        );
        assert!(g.is_dragging());
    }

    #[test]
    fn moves_report_offset_from_down_point() {
        let mut g: DragGesture<u32> = DragGesture::new();
        g.on_down(1, Point::new(50.0, 50.0), 0);
        let _ = g.on_move(Point::new(60.0, 50.0), 10);
        let _ = g.on_move(Point::new(61.0, 58.0), 20);
        assert_eq!(
            g.on_move(Point::new(45.0, 55.0), 30),
            GestureMove::Moved {
                target: 1,
                cumulative: Vec2::new(-5.0, 5.0)
            }
        );
    }

    #[test]
    fn speed_tracks_latest_move() {
        let mut g: DragGesture<u32> = DragGesture::new();
        g.on_down(1, Point::ORIGIN, 0);
        let _ = g.on_move(Point::new(30.0, 40.0), 100);
        assert_eq!(g.speed(), 0.5);
        let _ = g.on_move(Point::new(30.0, 240.0), 200);
        assert_eq!(g.speed(), 2.0);
        // Zero elapsed time keeps the previous estimate.
        let _ = g.on_move(Point::new(30.0, 250.0), 200);
        assert_eq!(g.speed(), 2.0);
    }

    #[test]
    fn long_press_arms_only_before_drag() {
        let mut g: DragGesture<u32> = DragGesture::new();
        g.on_down(1, Point::ORIGIN, 1000);
        assert_eq!(g.on_hold(1400), None);
        assert_eq!(g.on_hold(1500), Some(1));
        assert!(g.is_armed());
        assert_eq!(g.on_hold(1600), None, "arming is reported once");
        let _ = g.on_move(Point::new(20.0, 0.0), 1700);
        let release = g.on_up(Point::new(20.0, 0.0), 1800).unwrap();
        assert!(release.armed && release.dragged);

        g.on_down(2, Point::ORIGIN, 0);
        let _ = g.on_move(Point::new(10.0, 0.0), 10);
        assert_eq!(g.on_hold(5000), None);
        assert!(!g.is_armed());
    }

    #[test]
    fn cancel_finalizes_like_release() {
        let mut g: DragGesture<u32> = DragGesture::new();
        g.on_down(3, Point::ORIGIN, 0);
        let _ = g.on_move(Point::new(0.0, 12.0), 16);
        let release = g.cancel().unwrap();
        assert_eq!(release.target, 3);
        assert!(release.dragged);
        assert_eq!(release.cumulative, Vec2::new(0.0, 12.0));
        assert!(g.cancel().is_none());
        assert_eq!(g.on_move(Point::ORIGIN, 20), GestureMove::Idle);
    }
}
