//! Collision detection and response
//!
//! One handler per pair kind: ball-ball, ball-walls, ball-border, ball-obstacle
//! and ball-flipper. Handlers correct positions in place and rewrite the normal
//! velocity component; tangential velocity is never touched (no friction, no
//! spin). Zero-length separation vectors mean "no correction this step".

use glam::Vec2;

use super::body::{Ball, Border, Flipper, Hole, Obstacle, SideClamp, Walls};
use crate::math::{closest_point_on_segment, normalize_with_length};

/// A resolved contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Separating direction the ball was pushed along (unit length)
    pub normal: Vec2,
    /// Distance the ball was moved to resolve the overlap
    pub penetration: f32,
}

/// Resolve an overlapping pair of balls
///
/// Each ball is pushed out by half the overlap regardless of mass. Normal
/// velocities are replaced by the 1D collision result for restitution `e`:
/// `v1' = (m1 v1 + m2 v2 - m2 (v1 - v2) e) / (m1 + m2)` and symmetrically.
pub fn ball_ball_collision(ball1: &mut Ball, ball2: &mut Ball, restitution: f32) -> Option<Contact> {
    let reach = ball1.radius + ball2.radius;
    let (b, d) = normalize_with_length(ball2.pos - ball1.pos)?;
    if d > reach {
        return None;
    }

    let corr = (reach - d) / 2.0;
    ball1.pos -= b * corr;
    ball2.pos += b * corr;

    let v1 = ball1.vel.dot(b);
    let v2 = ball2.vel.dot(b);
    let m1 = ball1.mass;
    let m2 = ball2.mass;
    let momentum = m1 * v1 + m2 * v2;

    let new_v1 = (momentum - m2 * (v1 - v2) * restitution) / (m1 + m2);
    let new_v2 = (momentum - m1 * (v2 - v1) * restitution) / (m1 + m2);

    ball1.vel += b * (new_v1 - v1);
    ball2.vel += b * (new_v2 - v2);

    Some(Contact {
        normal: b,
        penetration: corr * 2.0,
    })
}

/// Clamp a ball into an axis-aligned box, reflecting the crossing axis
///
/// Returns true if any wall was touched.
pub fn ball_walls_collision(ball: &mut Ball, walls: &Walls) -> bool {
    let mut hit = false;

    let (min_x, max_x) = match walls.side_clamp {
        SideClamp::Rim => (ball.radius, walls.size.x - ball.radius),
        SideClamp::Center => (0.0, walls.size.x),
    };

    if ball.pos.x < min_x {
        ball.pos.x = min_x;
        ball.vel.x = -ball.vel.x * walls.side_restitution;
        hit = true;
    }
    if ball.pos.x > max_x {
        ball.pos.x = max_x;
        ball.vel.x = -ball.vel.x * walls.side_restitution;
        hit = true;
    }
    if ball.pos.y < ball.radius {
        ball.pos.y = ball.radius;
        ball.vel.y = -ball.vel.y * walls.floor_restitution;
        hit = true;
    }
    if walls.ceiling && ball.pos.y > walls.size.y - ball.radius {
        ball.pos.y = walls.size.y - ball.radius;
        ball.vel.y = -ball.vel.y * walls.floor_restitution;
        hit = true;
    }

    hit
}

/// Keep a ball on the normal side of a closed polygon border
///
/// The closest edge decides. A ball on the normal side is pushed out only when
/// it overlaps the edge; a ball that tunneled to the back side is always
/// brought back to one radius in front of it. Either way the outgoing normal
/// speed is `|v| * restitution`, directed away from the border.
pub fn ball_border_collision(ball: &mut Ball, border: &Border, restitution: f32) -> Option<Contact> {
    if !border.is_closed() {
        return None;
    }

    let mut closest = Vec2::ZERO;
    let mut normal = Vec2::ZERO;
    let mut min_dist = f32::INFINITY;
    for (a, b) in border.edges() {
        let c = closest_point_on_segment(ball.pos, a, b);
        let dist = (ball.pos - c).length();
        if dist < min_dist {
            min_dist = dist;
            closest = c;
            normal = (b - a).perp();
        }
    }

    // Center exactly on the edge: separate along the edge normal instead.
    // A zero-length closest edge has no normal either, so nothing is done.
    let (mut dir, dist) = match normalize_with_length(ball.pos - closest) {
        Some(split) => split,
        None => (normalize_with_length(normal)?.0, 0.0),
    };

    let penetration = if dir.dot(normal) >= 0.0 {
        if dist > ball.radius {
            return None;
        }
        ball.radius - dist
    } else {
        dir = -dir;
        dist + ball.radius
    };
    ball.pos += dir * penetration;

    let v = ball.vel.dot(dir);
    let new_v = v.abs() * restitution;
    ball.vel += dir * (new_v - v);

    Some(Contact {
        normal: dir,
        penetration,
    })
}

/// Push a ball off a bumper and set its normal speed to the bumper's push speed
pub fn ball_obstacle_collision(ball: &mut Ball, obstacle: &Obstacle) -> Option<Contact> {
    let reach = ball.radius + obstacle.radius;
    let (dir, d) = normalize_with_length(ball.pos - obstacle.pos)?;
    if d > reach {
        return None;
    }

    let corr = reach - d;
    ball.pos += dir * corr;

    let v = ball.vel.dot(dir);
    ball.vel += dir * (obstacle.push_vel - v);

    Some(Contact {
        normal: dir,
        penetration: corr,
    })
}

/// Push a ball off a flipper capsule and match the surface's normal velocity
///
/// The contact surface moves as a rigid rotation about the pivot, so a
/// swinging flipper launches the ball while a resting one just stops its
/// normal motion.
pub fn ball_flipper_collision(ball: &mut Ball, flipper: &Flipper) -> Option<Contact> {
    let closest = closest_point_on_segment(ball.pos, flipper.pos, flipper.tip());
    let reach = ball.radius + flipper.radius;
    let (dir, d) = normalize_with_length(ball.pos - closest)?;
    if d > reach {
        return None;
    }

    let corr = reach - d;
    ball.pos += dir * corr;

    let radius = closest + dir * flipper.radius - flipper.pos;
    let surface_vel = radius.perp() * flipper.current_angular_velocity;
    let v = ball.vel.dot(dir);
    let new_v = surface_vel.dot(dir);
    ball.vel += dir * (new_v - v);

    Some(Contact {
        normal: dir,
        penetration: corr,
    })
}

/// Index of the first hole that swallows a ball centered at `pos`
pub fn absorbing_hole(pos: Vec2, holes: &[Hole]) -> Option<usize> {
    holes.iter().position(|hole| hole.contains(pos))
}
