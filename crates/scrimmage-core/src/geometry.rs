//! Small vector and field-bound helpers shared by the ball, players and policies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Decomposes a magnitude along an angle (radians) into x/y components.
#[must_use]
pub fn components(value: f32, angle: f32) -> Vec2 {
    Vec2::new(value * angle.cos(), value * angle.sin())
}

/// Heading of a velocity vector, or `fallback` for the zero vector.
#[must_use]
pub fn heading_of(v: Vec2, fallback: f32) -> f32 {
    if v == Vec2::ZERO {
        fallback
    } else {
        v.y.atan2(v.x)
    }
}

/// Straight-line bearing from `from` to `to`.
///
/// When the two points share an x coordinate the bearing is reported as 0
/// rather than +/-90 degrees. Steering only uses this to seed its search, so
/// the coarse scan still finds the right direction.
#[must_use]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let dx = to.x - from.x;
    if dx == 0.0 {
        return 0.0;
    }
    (to.y - from.y).atan2(dx)
}

/// Rectangular playing area `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Extent along x.
    pub width: f32,
    /// Extent along y.
    pub height: f32,
}

impl Bounds {
    /// Creates bounds for a field of the given size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True if the point lies on or inside the field.
    #[must_use]
    pub fn contains(&self, p: Vec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    /// Clamps a point onto the field.
    #[must_use]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(0.0, self.width), p.y.clamp(0.0, self.height))
    }

    /// Clamps a point into the field shrunk by `margin` on every side.
    ///
    /// A margin wider than half the field collapses that axis onto its centre
    /// line instead of producing an inverted range.
    #[must_use]
    pub fn clamp_inset(&self, p: Vec2, margin: f32) -> Vec2 {
        Vec2::new(
            clamp_axis(p.x, margin, self.width),
            clamp_axis(p.y, margin, self.height),
        )
    }

    /// Centre of the field.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Distance along a ray from `origin` in unit direction `dir` until it
    /// leaves the field. Zero if the origin is already outside.
    #[must_use]
    pub fn exit_distance(&self, origin: Vec2, dir: Vec2) -> f32 {
        if !self.contains(origin) {
            return 0.0;
        }
        let tx = if dir.x > 0.0 {
            (self.width - origin.x) / dir.x
        } else if dir.x < 0.0 {
            -origin.x / dir.x
        } else {
            f32::INFINITY
        };
        let ty = if dir.y > 0.0 {
            (self.height - origin.y) / dir.y
        } else if dir.y < 0.0 {
            -origin.y / dir.y
        } else {
            f32::INFINITY
        };
        tx.min(ty)
    }
}

fn clamp_axis(value: f32, margin: f32, extent: f32) -> f32 {
    let lo = margin.max(0.0);
    let hi = extent - lo;
    if lo > hi {
        extent * 0.5
    } else {
        value.clamp(lo, hi)
    }
}
