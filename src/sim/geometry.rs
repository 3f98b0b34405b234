//! Axis-aligned geometry for the playfield
//!
//! Everything is in screen space: origin top-left, y grows downward.
//! Overlap tests use strict comparisons, so shapes that merely touch
//! along an edge do not overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Rectangle of the given size centered on a point
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// A circle (the ball)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Bounding box of the circle
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.center, Vec2::splat(self.radius * 2.0))
    }
}

/// Which velocity component a collision should negate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectAxis {
    /// Side hit: negate horizontal velocity
    Horizontal,
    /// Top/bottom hit: negate vertical velocity
    Vertical,
}

/// True iff two rectangles intersect (touching edges do not count)
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// True iff a circle's radius-expanded extent intersects a rectangle
pub fn circle_rect_overlap(circle: &Circle, rect: &Rect) -> bool {
    rects_overlap(&circle.bounds(), rect)
}

/// Penetration depth of a circle into a rectangle along each axis
///
/// For each axis this is the smaller of the two ways the circle could be
/// pushed back out. Only meaningful when [`circle_rect_overlap`] holds.
pub fn overlap_depth(circle: &Circle, rect: &Rect) -> Vec2 {
    let c = circle.center;
    let r = circle.radius;
    Vec2::new(
        (c.x + r - rect.left()).min(rect.right() - (c.x - r)),
        (c.y + r - rect.top()).min(rect.bottom() - (c.y - r)),
    )
}

/// Choose the reflection axis from a penetration depth pair
///
/// The shallower axis is the one that was crossed; ties go vertical.
pub fn reflect_axis(depth: Vec2) -> ReflectAxis {
    if depth.x < depth.y {
        ReflectAxis::Horizontal
    } else {
        ReflectAxis::Vertical
    }
}
