//! Axis-aligned bounding boxes
//!
//! Every entity in the room is an AABB; `Rect::overlaps` is the single
//! collision primitive the rest of the simulation builds on.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle: top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Square rect helper (players, clutter, hazard are all square)
    pub fn square(pos: Vec2, side: f32) -> Self {
        Self::new(pos, Vec2::splat(side))
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict-inequality overlap test: touching edges do not collide
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }

    /// True if this rect overlaps any rect produced by `iter`
    pub fn overlaps_any<'a, I>(&self, iter: I) -> bool
    where
        I: IntoIterator<Item = &'a Rect>,
    {
        iter.into_iter().any(|r| self.overlaps(r))
    }
}
