//! Axis-aligned surfaces the ball collides with
//!
//! All rectangles live in page (document) coordinates: origin at the
//! document's top-left corner, unaffected by scrolling.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What a surface does besides blocking the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    /// Plain obstacle
    #[default]
    Solid,
    /// Content card: blocks the ball and triggers navigation on contact
    Card,
}

impl SurfaceKind {
    /// Parse a tag, treating anything other than exactly "card" as a plain obstacle
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "card" => SurfaceKind::Card,
            _ => SurfaceKind::Solid,
        }
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            width: right - left,
            height: bottom - top,
        }
    }

    pub fn from_origin_size(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    /// Same rectangle moved by `offset`
    #[inline]
    pub fn translate(&self, offset: Vec2) -> Self {
        Self {
            left: self.left + offset.x,
            top: self.top + offset.y,
            right: self.right + offset.x,
            bottom: self.bottom + offset.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Grow outward by `amount` on all four sides
    #[inline]
    pub fn expand(&self, amount: f32) -> Self {
        Self::new(
            self.left - amount,
            self.top - amount,
            self.right + amount,
            self.bottom + amount,
        )
    }

    /// A rect with zero width and zero height is not rendered
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Inclusive point test
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Point of the rectangle closest to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.min(self.right).max(self.left),
            p.y.min(self.bottom).max(self.top),
        )
    }

    /// Circle overlap by closest-point distance (touching counts)
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        center.distance_squared(self.closest_point(center)) <= radius * radius
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

/// One collidable surface as seen by a single frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub id: String,
    pub kind: SurfaceKind,
    pub rect: Rect,
}

impl Surface {
    pub fn new(id: impl Into<String>, kind: SurfaceKind, rect: Rect) -> Self {
        Self {
            id: id.into(),
            kind,
            rect,
        }
    }

    pub fn solid(id: impl Into<String>, rect: Rect) -> Self {
        Self::new(id, SurfaceKind::Solid, rect)
    }

    pub fn card(id: impl Into<String>, rect: Rect) -> Self {
        Self::new(id, SurfaceKind::Card, rect)
    }

    #[inline]
    pub fn is_card(&self) -> bool {
        self.kind == SurfaceKind::Card
    }
}
