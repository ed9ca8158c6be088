//! Vector helpers
//!
//! `glam::Vec2` already covers the basic algebra (add, scale, dot, length and
//! `perp`, which is the left-hand perpendicular `(-y, x)`). This module adds the
//! segment projection and the zero-length guard every collision handler uses.

use glam::Vec2;

/// Closest point to `p` on the segment `[a, b]`
///
/// The projection parameter is clamped to `[0, 1]`, so points beyond either end
/// map onto that endpoint. A degenerate segment (`a == b`) returns `a`.
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Split a vector into unit direction and length
///
/// Returns `None` for an exactly zero vector, where no direction exists.
#[inline]
pub fn normalize_with_length(v: Vec2) -> Option<(Vec2, f32)> {
    let len = v.length();
    if len == 0.0 {
        None
    } else {
        Some((v / len, len))
    }
}

/// Unit vector at `angle` radians
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
