//! Screen-space geometry
//!
//! All coordinates are f64 in a y-down space: the origin is the top-left of
//! the host surface, x grows right, y grows down. Angles are radians measured
//! clockwise from the positive x axis, so `-PI / 2` points straight up.

use serde::{Deserialize, Serialize};

/// A point in surface coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn square(side: f64) -> Self {
        Self {
            width: side,
            height: side,
        }
    }

    /// True when either dimension is zero (or negative)
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rect of `size` centered on `center`
    pub fn centered_at(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Get the right edge (x + width)
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom edge (y + height)
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if this rect contains a point (half-open on the far edges)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Shrink rect by the same inset on every side, saturating at zero size
    pub fn inset(&self, amount: f64) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - 2.0 * amount).max(0.0),
            height: (self.height - 2.0 * amount).max(0.0),
        }
    }

    /// Map a point in the unit square (0..1 on both axes) into this rect
    pub fn map_unit(&self, unit: Point) -> Point {
        Point::new(self.x + unit.x * self.width, self.y + unit.y * self.height)
    }
}
