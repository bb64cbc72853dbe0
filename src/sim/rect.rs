//! Axis-aligned rectangle geometry for hit boxes
//!
//! Screen space: x grows right, y grows down, `(x, y)` is the top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square box with the given side
    pub fn square(x: f32, y: f32, side: f32) -> Self {
        Self::new(x, y, side, side)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap: boxes that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Circle overlap with a forgiveness margin subtracted from the radii sum
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32, margin: f32) -> bool {
    a.distance(b) < ra + rb - margin
}
