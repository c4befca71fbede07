//! Header drag tracking.

use super::window::FloatingWindowId;
use crate::geometry::Point;

/// An open drag gesture on one window's header.
///
/// Movement is applied incrementally from the last pointer position rather
/// than from the anchor, so a pointer that overshoots an edge and comes back
/// moves the window again immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub window: FloatingWindowId,
    /// Pointer position at pointer-down
    pub anchor: Point,
    /// Window position at pointer-down
    pub window_start: Point,
    last_pointer: Point,
}

impl DragSession {
    pub fn new(window: FloatingWindowId, pointer: Point, window_start: Point) -> Self {
        Self {
            window,
            anchor: pointer,
            window_start,
            last_pointer: pointer,
        }
    }

    pub fn last_pointer(&self) -> Point {
        self.last_pointer
    }

    /// Delta since the previous pointer event; records `pointer` as the new
    /// reference.
    pub fn advance(&mut self, pointer: Point) -> Point {
        let delta = pointer.delta_from(self.last_pointer);
        self.last_pointer = pointer;
        delta
    }
}
