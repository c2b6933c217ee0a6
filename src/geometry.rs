//! Vector and rectangle helpers
//!
//! Stateless functions shared by the collision resolver and by layout code
//! outside the physics core.

use glam::Vec2;

#[inline]
pub fn dot(a: Vec2, b: Vec2) -> f32 {
    a.dot(b)
}

/// Euclidean norm
#[inline]
pub fn magnitude(v: Vec2) -> f32 {
    dot(v, v).sqrt()
}

/// Angle between two vectors in radians, in [0, π]
///
/// The cosine is clamped to [-1, 1] before `acos` so rounding error on
/// (anti)parallel vectors cannot produce NaN. A zero-length input yields NaN
/// from the division; callers only pass non-degenerate vectors.
pub fn angle_between(a: Vec2, b: Vec2) -> f32 {
    let cos = dot(a, b) / (magnitude(a) * magnitude(b));
    cos.clamp(-1.0, 1.0).acos()
}

/// Squared distance between two points (no sqrt, for proximity tests)
#[inline]
pub fn squared_distance(p: Vec2, q: Vec2) -> f32 {
    let d = p - q;
    dot(d, d)
}

/// Inclusive point-in-rectangle test; (rect_x, rect_y) is the top-left corner
pub fn point_in_rect(px: f32, py: f32, rect_x: f32, rect_y: f32, width: f32, height: f32) -> bool {
    px >= rect_x && px <= rect_x + width && py >= rect_y && py <= rect_y + height
}

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.x + self.width, self.y),
            Vec2::new(self.x, self.y + self.height),
            Vec2::new(self.x + self.width, self.y + self.height),
        ]
    }

    pub fn contains(&self, p: Vec2) -> bool {
        point_in_rect(p.x, p.y, self.x, self.y, self.width, self.height)
    }
}

/// Rectangle overlap by corner containment: true if any corner of either
/// rectangle lies inside the other.
///
/// Two rectangles crossing like a plus sign share no contained corner and
/// report false.
pub fn rects_intersect(a: &Rect, b: &Rect) -> bool {
    a.corners().iter().any(|&c| b.contains(c)) || b.corners().iter().any(|&c| a.contains(c))
}
