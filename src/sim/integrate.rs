//! Time integration
//!
//! Free bodies use semi-implicit Euler: velocity first, then position from the
//! new velocity. Beads are advanced position-based in three phases that the
//! stepper runs across all beads before moving to the next phase.

use glam::Vec2;

use super::body::{Ball, Bead, Flipper, Wire};
use crate::math::normalize_with_length;

impl Ball {
    /// Advance under gravity by `dt`
    #[inline]
    pub fn integrate(&mut self, gravity: Vec2, dt: f32) {
        self.vel += gravity * dt;
        self.pos += self.vel * dt;
    }
}

impl Bead {
    /// Phase 1: integrate and remember where the sub-step started
    pub fn start_step(&mut self, gravity: Vec2, dt: f32) {
        self.vel += gravity * dt;
        self.prev_pos = self.pos;
        self.pos += self.vel * dt;
    }

    /// Phase 2: project back onto the wire
    ///
    /// Returns the signed correction distance, or `None` when the bead sits on
    /// the wire center and has no direction to be pushed in.
    pub fn keep_on_wire(&mut self, wire: &Wire) -> Option<f32> {
        let (dir, len) = normalize_with_length(self.pos - wire.center)?;
        let lambda = wire.radius - len;
        self.pos += dir * lambda;
        Some(lambda)
    }

    /// Phase 3: velocity is whatever the position actually did
    ///
    /// A non-positive `dt` keeps the previous velocity.
    pub fn end_step(&mut self, dt: f32) {
        if dt > 0.0 {
            self.vel = (self.pos - self.prev_pos) / dt;
        }
    }
}

/// Pseudo-acceleration the wire applied for a correction of `lambda`
#[inline]
pub fn constraint_force(lambda: f32, dt: f32) -> f32 {
    (lambda / (dt * dt)).abs()
}

impl Flipper {
    /// Rotate toward `max_rotation` while activated, back toward rest otherwise
    ///
    /// `current_angular_velocity` is derived from the rotation actually achieved,
    /// so it drops to zero once the flipper rests against either limit.
    pub fn simulate(&mut self, dt: f32) {
        if dt.is_nan() || dt <= 0.0 {
            self.current_angular_velocity = 0.0;
            return;
        }
        let prev_rotation = self.rotation;
        if self.activated {
            self.rotation = (self.rotation + dt * self.angular_velocity).min(self.max_rotation);
        } else {
            self.rotation = (self.rotation - dt * self.angular_velocity).max(0.0);
        }
        self.current_angular_velocity = self.sign * (self.rotation - prev_rotation) / dt;
    }
}
