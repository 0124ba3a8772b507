//! Axis-aligned rectangle geometry for hitboxes, sprites and obstacles
//!
//! Stored as min/max corners so that clamping an edge to an obstacle edge is
//! exact: a box whose right edge was set to an obstacle's left edge compares
//! as touching, never overlapping.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (y grows downward, screen convention)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Rect {
    /// Rectangle from top-left corner and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    /// Rectangle of `size` centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Zero-area rectangles never overlap anything (inactive hitboxes)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Strict overlap test: shared edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Copy shifted by `delta`
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Copy with the same size, recentered on `center`
    pub fn recentered(&self, center: Vec2) -> Self {
        Self::from_center(center, self.size())
    }

    /// Set the right edge, keeping the width
    pub fn set_right(&mut self, x: f32) {
        let w = self.width();
        self.max.x = x;
        self.min.x = x - w;
    }

    /// Set the left edge, keeping the width
    pub fn set_left(&mut self, x: f32) {
        let w = self.width();
        self.min.x = x;
        self.max.x = x + w;
    }

    /// Set the bottom edge, keeping the height
    pub fn set_bottom(&mut self, y: f32) {
        let h = self.height();
        self.max.y = y;
        self.min.y = y - h;
    }

    /// Set the top edge, keeping the height
    pub fn set_top(&mut self, y: f32) {
        let h = self.height();
        self.min.y = y;
        self.max.y = y + h;
    }

    /// Copy with the top-left corner snapped to whole pixels
    pub fn snapped(&self) -> Self {
        let min = self.min.round();
        Self {
            min,
            max: min + self.size(),
        }
    }
}
