//! Diagram-space geometry.
//!
//! Coordinates are world units with y increasing upward, matching the
//! layout tables in the scenario module. The canvas flips the y axis when
//! mapping into pixel space.

use serde::{Deserialize, Serialize};

/// A point in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Width and height of a shape in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }
}

/// An axis-aligned rectangle anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Rect {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    /// Midpoint of the left edge.
    pub fn left_mid(&self) -> Point {
        Point::new(self.x, self.y + self.height / 2.0)
    }

    /// Midpoint of the right edge.
    pub fn right_mid(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height / 2.0)
    }

    /// Midpoint of the top edge.
    pub fn top_mid(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height)
    }

    /// Midpoint of the bottom edge.
    pub fn bottom_mid(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y)
    }

    /// Center of the rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Point on the top edge at a horizontal fraction (0.0 = left corner,
    /// 1.0 = right corner).
    pub fn top_at(&self, fraction: f32) -> Point {
        Point::new(self.x + self.width * fraction, self.y + self.height)
    }

    /// Point on the bottom edge at a horizontal fraction.
    pub fn bottom_at(&self, fraction: f32) -> Point {
        Point::new(self.x + self.width * fraction, self.y)
    }

    /// Whether a point lies inside the rectangle, expanded by `margin` on
    /// every side. A point exactly on the boundary counts as contained.
    pub fn contains(&self, p: Point, margin: f32) -> bool {
        p.x >= self.x - margin
            && p.x <= self.x + self.width + margin
            && p.y >= self.y - margin
            && p.y <= self.y + self.height + margin
    }

    /// Whether a point lies on the rectangle's boundary, within `epsilon`.
    pub fn on_boundary(&self, p: Point, epsilon: f32) -> bool {
        if !self.contains(p, epsilon) {
            return false;
        }
        let near_left = (p.x - self.x).abs() <= epsilon;
        let near_right = (p.x - (self.x + self.width)).abs() <= epsilon;
        let near_bottom = (p.y - self.y).abs() <= epsilon;
        let near_top = (p.y - (self.y + self.height)).abs() <= epsilon;
        near_left || near_right || near_bottom || near_top
    }
}
