//! Collision detection and response for axis-aligned geometry
//!
//! Everything in the playfield is a box: cells, the paddle, the ball's
//! bounding square and the border. Angles are degrees with y growing down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::normalize_degrees;

/// An axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Rectangle of the given size centered on `center`
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Overlap test with touching edges counting as contact
    pub fn touches(&self, other: &Rect) -> bool {
        self.right() >= other.left()
            && self.left() <= other.right()
            && self.bottom() >= other.top()
            && self.top() <= other.bottom()
    }

    /// Clamp a point into the rectangle
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.left(), self.right()), p.y.clamp(self.top(), self.bottom()))
    }

    #[cfg(test)]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }
}

/// Which faces of a cell a ball crossed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitSides {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl HitSides {
    /// Work out which faces of `cell` the ball box `ball` is straddling.
    ///
    /// Edge overlap alone is ambiguous when the ball is deep inside the cell,
    /// so each face also requires the ball center to be on the outer side of it.
    pub fn between(ball: &Rect, cell: &Rect) -> Self {
        let center = ball.center();
        Self {
            left: ball.right() > cell.left() && ball.left() < cell.left() && center.x < cell.left(),
            right: ball.left() < cell.right()
                && ball.right() > cell.right()
                && center.x > cell.right(),
            top: ball.bottom() > cell.top() && ball.top() < cell.top() && center.y < cell.top(),
            bottom: ball.top() < cell.bottom()
                && ball.bottom() > cell.bottom()
                && center.y > cell.bottom(),
        }
    }

    #[inline]
    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    #[inline]
    pub fn vertical(&self) -> bool {
        self.top || self.bottom
    }

    /// Outgoing angle after bouncing off these faces
    pub fn reflect(&self, angle: f32) -> f32 {
        if self.horizontal() && self.vertical() {
            reflect_diagonal(angle)
        } else if self.horizontal() {
            reflect_horizontal(angle)
        } else {
            // Face-on or ambiguous hits bounce vertically
            reflect_vertical(angle)
        }
    }
}

/// Bounce off a vertical surface (left/right wall)
#[inline]
pub fn reflect_horizontal(angle: f32) -> f32 {
    normalize_degrees(180.0 - angle)
}

/// Bounce off a horizontal surface (top/bottom wall, paddle)
#[inline]
pub fn reflect_vertical(angle: f32) -> f32 {
    normalize_degrees(360.0 - angle)
}

/// Bounce straight back off a corner
#[inline]
pub fn reflect_diagonal(angle: f32) -> f32 {
    normalize_degrees(180.0 + angle)
}

/// Displacement for one step along `angle_degrees` at `speed` (screen y down)
#[inline]
pub fn step_vector(angle_degrees: f32, speed: f32) -> Vec2 {
    let radians = angle_degrees.to_radians();
    Vec2::new(radians.cos() * speed, -radians.sin() * speed)
}

/// Result of a border check
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BorderContact {
    /// Touched the left or right edge
    pub horizontal: bool,
    /// Touched the top or bottom edge
    pub vertical: bool,
    /// Touched the bottom edge specifically
    pub floor: bool,
}

impl BorderContact {
    pub fn any(&self) -> bool {
        self.horizontal || self.vertical
    }
}

/// Check a point against the border (inclusive edges)
pub fn border_contact(pos: Vec2, bounds: &Rect) -> BorderContact {
    let horizontal = pos.x <= bounds.left() || pos.x >= bounds.right();
    let vertical = pos.y <= bounds.top() || pos.y >= bounds.bottom();
    BorderContact {
        horizontal,
        vertical,
        floor: pos.y >= bounds.bottom(),
    }
}
