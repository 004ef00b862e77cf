//! Axis-aligned rectangles and play-field bounds
//!
//! Screen space: origin top-left, Y grows downward. A rectangle covers
//! `[left, right) x [top, bottom)`, so rectangles that only share an edge do
//! not intersect.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle stored as top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle of the given size centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap test (shared edges do not count)
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Result of testing a rectangle against the play-field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsCheck {
    /// Fully inside horizontally
    pub horizontal: bool,
    /// Fully inside vertically
    pub vertical: bool,
}

impl BoundsCheck {
    pub fn inside(&self) -> bool {
        self.horizontal && self.vertical
    }
}

/// The rectangular play-field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Check whether `rect` lies inside the field on each axis
    pub fn check(&self, rect: &Rect) -> BoundsCheck {
        BoundsCheck {
            horizontal: rect.left() >= 0.0 && rect.right() <= self.width,
            vertical: rect.top() >= 0.0 && rect.bottom() <= self.height,
        }
    }

    /// Clamp a point onto the field
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(0.0, self.width), p.y.clamp(0.0, self.height))
    }

    /// Clamp a top-left corner so a box of `size` stays on the field.
    ///
    /// Boxes larger than the field are pinned to the origin.
    pub fn clamp_origin(&self, origin: Vec2, size: Vec2) -> Vec2 {
        let max_x = (self.width - size.x).max(0.0);
        let max_y = (self.height - size.y).max(0.0);
        Vec2::new(origin.x.clamp(0.0, max_x), origin.y.clamp(0.0, max_y))
    }
}
