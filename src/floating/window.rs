//! A single floating window and the bound computations it relies on.

use crate::geometry::{Point, Size};
use crate::tab::TabId;
use serde::Serialize;

pub type FloatingWindowId = u64;

/// Clamp a window position so the window stays inside the container.
///
/// Each axis is clamped independently to `[0, container - size - gap]`.
/// A window larger than its container is pinned at 0.
pub fn clamp_position(position: Point, size: Size, container: Size, gap: f64) -> Point {
    let max_x = container.width - size.width - gap;
    let max_y = container.height - size.height - gap;
    Point::new(
        position.x.min(max_x).max(0.0),
        position.y.min(max_y).max(0.0),
    )
}

/// Largest size a window at `position` may grow to before crossing the
/// container edge.
pub fn bounded_max_size(position: Point, container: Size, gap: f64) -> Size {
    Size::new(
        (container.width - position.x - gap).max(0.0),
        (container.height - position.y - gap).max(0.0),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloatingWindow {
    pub id: FloatingWindowId,
    /// Tab whose content this window shows
    pub tab: TabId,
    /// Header text; mirrors the tab label
    pub title: String,
    /// Top-left corner, relative to the container
    pub position: Point,
    /// Size the content asks for
    pub requested_size: Size,
    /// Bounds keeping the window inside the container
    pub max_size: Size,
}

impl FloatingWindow {
    /// Size the window actually occupies
    pub fn rendered_size(&self) -> Size {
        self.requested_size.min(self.max_size)
    }

    /// Whether the window's far edges respect the container and gap
    pub fn fits_within(&self, container: Size, gap: f64) -> bool {
        let size = self.rendered_size();
        self.position.x >= 0.0
            && self.position.y >= 0.0
            && self.position.x + size.width <= container.width - gap
            && self.position.y + size.height <= container.height - gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_right_edge() {
        let pos = clamp_position(
            Point::new(1700.0, 200.0),
            Size::new(400.0, 300.0),
            Size::new(2000.0, 1500.0),
            5.0,
        );
        assert_eq!(pos, Point::new(1595.0, 200.0));
    }

    #[test]
    fn test_clamp_negative_to_zero() {
        let pos = clamp_position(
            Point::new(-50.0, -1.0),
            Size::new(100.0, 100.0),
            Size::new(500.0, 500.0),
            5.0,
        );
        assert_eq!(pos, Point::origin());
    }

    #[test]
    fn test_oversized_window_pinned_to_zero() {
        let pos = clamp_position(
            Point::new(30.0, 30.0),
            Size::new(900.0, 900.0),
            Size::new(500.0, 500.0),
            5.0,
        );
        assert_eq!(pos, Point::origin());
    }

    #[test]
    fn test_bounded_max_size_never_negative() {
        let max = bounded_max_size(Point::new(1990.0, 100.0), Size::new(2000.0, 1500.0), 5.0);
        assert_eq!(max, Size::new(5.0, 1395.0));

        let max = bounded_max_size(Point::new(2500.0, 1600.0), Size::new(2000.0, 1500.0), 5.0);
        assert_eq!(max, Size::new(0.0, 0.0));
    }

    #[test]
    fn test_rendered_size_bounded_by_max() {
        let window = FloatingWindow {
            id: 1,
            tab: 1,
            title: "Code-1".to_string(),
            position: Point::new(1800.0, 100.0),
            requested_size: Size::new(400.0, 300.0),
            max_size: Size::new(195.0, 1395.0),
        };
        assert_eq!(window.rendered_size(), Size::new(195.0, 300.0));
        assert!(window.fits_within(Size::new(2000.0, 1500.0), 5.0));
    }
}
