//! Body model
//!
//! Every entity is owned by the [`Scene`](super::Scene); nothing here exists on
//! its own. Colors are packed `0xRRGGBB` values for the renderer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SPAWN_COOLDOWN;
use crate::math::direction;

/// Stable identifier of a ball within its scene
pub type BallId = u32;

pub const DEFAULT_BALL_COLOR: u32 = 0x202020;
pub const DEFAULT_BEAD_COLOR: u32 = 0xFF0000;
pub const DEFAULT_FLIPPER_COLOR: u32 = 0xFF0000;
pub const DEFAULT_OBSTACLE_COLOR: u32 = 0xFF8000;
pub const HOLE_COLOR: u32 = 0x000000;

/// Mass of a uniform disc of unit density
#[inline]
pub fn disc_mass(radius: f32) -> f32 {
    std::f32::consts::PI * radius * radius
}

/// A free rigid disc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub radius: f32,
    pub mass: f32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Overrides the scene restitution when set
    #[serde(default)]
    pub restitution: Option<f32>,
    pub color: u32,
}

impl Ball {
    pub fn new(id: BallId, radius: f32, mass: f32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            radius,
            mass,
            pos,
            vel,
            restitution: None,
            color: DEFAULT_BALL_COLOR,
        }
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = Some(restitution);
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Restitution for this ball, falling back to the scene value
    #[inline]
    pub fn restitution_or(&self, fallback: f32) -> f32 {
        self.restitution.unwrap_or(fallback)
    }
}

/// A disc constrained to a circular wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bead {
    pub radius: f32,
    pub mass: f32,
    pub pos: Vec2,
    /// Position at the start of the current sub-step
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
}

impl Bead {
    pub fn new(radius: f32, mass: f32, pos: Vec2) -> Self {
        Self {
            radius,
            mass,
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            color: DEFAULT_BEAD_COLOR,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }
}

/// Circular wire beads are kept on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub center: Vec2,
    pub radius: f32,
}

/// A capsule pivoting about `pos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flipper {
    /// Capsule radius
    pub radius: f32,
    /// Pivot
    pub pos: Vec2,
    pub length: f32,
    pub rest_angle: f32,
    /// Always non-negative; direction lives in `sign`
    pub max_rotation: f32,
    pub sign: f32,
    /// Nominal rotation speed (rad/s)
    pub angular_velocity: f32,
    pub color: u32,

    /// Current rotation away from rest, in `[0, max_rotation]`
    pub rotation: f32,
    /// Realized signed angular velocity over the last update
    pub current_angular_velocity: f32,
    pub activated: bool,
}

impl Flipper {
    /// `max_rotation` is signed: its sign picks the rotation direction.
    pub fn new(
        radius: f32,
        pos: Vec2,
        length: f32,
        rest_angle: f32,
        max_rotation: f32,
        angular_velocity: f32,
    ) -> Self {
        Self {
            radius,
            pos,
            length,
            rest_angle,
            max_rotation: max_rotation.abs(),
            sign: if max_rotation < 0.0 { -1.0 } else { 1.0 },
            angular_velocity,
            color: DEFAULT_FLIPPER_COLOR,
            rotation: 0.0,
            current_angular_velocity: 0.0,
            activated: false,
        }
    }

    /// Current world angle of the capsule spine
    #[inline]
    pub fn angle(&self) -> f32 {
        self.rest_angle + self.sign * self.rotation
    }

    /// Far end of the capsule spine
    pub fn tip(&self) -> Vec2 {
        self.pos + direction(self.angle()) * self.length
    }
}

/// A static bumper, optionally spawning new balls on contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub radius: f32,
    pub pos: Vec2,
    /// Normal speed imparted to a ball on contact
    pub push_vel: f32,
    pub is_spawner: bool,
    /// Seconds until the spawner can fire again
    pub spawn_cooldown: f32,
    pub color: u32,
}

impl Obstacle {
    pub fn new(radius: f32, pos: Vec2, push_vel: f32) -> Self {
        Self {
            radius,
            pos,
            push_vel,
            is_spawner: false,
            spawn_cooldown: SPAWN_COOLDOWN,
            color: DEFAULT_OBSTACLE_COLOR,
        }
    }

    pub fn spawner(radius: f32, pos: Vec2, push_vel: f32) -> Self {
        Self {
            is_spawner: true,
            ..Self::new(radius, pos, push_vel)
        }
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Whether a contact right now would spawn a ball
    #[inline]
    pub fn ready_to_spawn(&self) -> bool {
        self.is_spawner && self.spawn_cooldown <= 0.0
    }

    /// Count the cooldown down by `dt`
    pub fn cool_down(&mut self, dt: f32) {
        if self.spawn_cooldown > 0.0 {
            self.spawn_cooldown -= dt;
        }
    }
}

/// Absorbing circular region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub pos: Vec2,
    pub radius: f32,
}

impl Hole {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self { pos, radius }
    }

    /// True when `point` lies strictly inside the hole
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        (point - self.pos).length() < self.radius
    }
}

/// Closed polygon boundary (last vertex connects back to the first)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Border {
    pub points: Vec<Vec2>,
}

impl Border {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Fewer than three points encloses nothing; collision is skipped
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.points.len() >= 3
    }

    /// Edges as `(a, b)` pairs, including the closing edge
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

/// How horizontal walls limit a ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SideClamp {
    /// The ball's rim stays inside `[0, width]`
    #[default]
    Rim,
    /// Only the ball's center stays inside `[0, width]`
    Center,
}

/// Axis-aligned box boundary anchored at the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Walls {
    pub size: Vec2,
    #[serde(default)]
    pub side_clamp: SideClamp,
    /// Whether there is a wall at `y = size.y`
    pub ceiling: bool,
    /// Used for floor and ceiling
    pub floor_restitution: f32,
    pub side_restitution: f32,
    /// Give the ball a random color whenever it touches a wall
    #[serde(default)]
    pub recolor_on_hit: bool,
}

impl Walls {
    /// Closed box with one restitution everywhere
    pub fn enclosed(size: Vec2, restitution: f32) -> Self {
        Self {
            size,
            side_clamp: SideClamp::Rim,
            ceiling: true,
            floor_restitution: restitution,
            side_restitution: restitution,
            recolor_on_hit: false,
        }
    }
}

/// Static geometry balls collide against
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Boundary {
    #[default]
    Open,
    Walls(Walls),
    Border(Border),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_flipper_sign_from_max_rotation() {
        let left = Flipper::new(0.03, Vec2::ZERO, 0.2, -0.5, 1.0, 15.0);
        assert_eq!(left.sign, 1.0);
        assert_eq!(left.max_rotation, 1.0);

        let right = Flipper::new(0.03, Vec2::ZERO, 0.2, PI + 0.5, -1.0, 15.0);
        assert_eq!(right.sign, -1.0);
        assert_eq!(right.max_rotation, 1.0);
    }

    #[test]
    fn test_flipper_tip_follows_rotation() {
        let mut flipper = Flipper::new(0.03, Vec2::new(1.0, 1.0), 2.0, 0.0, PI / 2.0, 15.0);
        assert!((flipper.tip() - Vec2::new(3.0, 1.0)).length() < 1e-5);

        flipper.rotation = PI / 2.0;
        assert!((flipper.tip() - Vec2::new(1.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_hole_contains_is_strict() {
        let hole = Hole::new(Vec2::new(1.0, 1.0), 0.5);
        assert!(hole.contains(Vec2::new(1.2, 1.0)));
        assert!(!hole.contains(Vec2::new(1.5, 1.0)));
    }

    #[test]
    fn test_border_edges_wrap() {
        let border = Border::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        ]);
        let edges: Vec<_> = border.edges().collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2], (Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.0)));
        assert!(border.is_closed());
        assert!(!Border::new(vec![Vec2::ZERO, Vec2::X]).is_closed());
    }

    #[test]
    fn test_obstacle_cooldown() {
        let mut spawner = Obstacle::spawner(0.06, Vec2::ZERO, 2.0);
        assert!(!spawner.ready_to_spawn());
        spawner.cool_down(0.6);
        assert!(!spawner.ready_to_spawn());
        spawner.cool_down(0.6);
        assert!(spawner.ready_to_spawn());

        let bumper = Obstacle::new(0.1, Vec2::ZERO, 2.0);
        assert!(!bumper.ready_to_spawn());
    }
}
