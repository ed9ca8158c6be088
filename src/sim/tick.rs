//! Fixed timestep simulation tick
//!
//! One frame is `num_substeps` sub-steps of `dt / num_substeps`. Each sub-step:
//!
//! 1. cull balls absorbed by holes
//! 2. per ball: integrate, then boundary, obstacles and flippers
//! 3. advance flipper rotation
//! 4. count spawner cooldowns down
//! 5. resolve every unique ball pair once
//!
//! Beads run their own strictly phased pass in the same sub-step: integrate all,
//! then constrain all, then derive velocity for all.

use glam::Vec2;

use super::body::Boundary;
use super::collision::{
    absorbing_hole, ball_ball_collision, ball_border_collision, ball_flipper_collision,
    ball_obstacle_collision, ball_walls_collision,
};
use super::input::TickInput;
use super::integrate::constraint_force;
use super::scene::{Scene, SimEvent, StepStats, random_color};
use crate::consts::SPAWN_COOLDOWN;

/// Apply a frame's input, then advance by `dt`
pub fn tick(scene: &mut Scene, input: &TickInput, dt: f32) {
    if !input.is_empty() {
        for event in &input.events {
            scene.apply_input(event);
        }
    }
    advance(scene, dt);
}

/// Advance the scene by one outer frame of length `dt`
///
/// Does nothing while paused, unless a single step was requested. A frame
/// without positive length is skipped too; a pending single step waits for
/// the next real one.
pub fn advance(scene: &mut Scene, dt: f32) {
    if scene.paused && !scene.step_requested {
        return;
    }
    // Bead and flipper velocities are derived by dividing by the sub-step
    if dt.is_nan() || dt <= 0.0 {
        return;
    }
    scene.step_requested = false;

    let substeps = scene.num_substeps.max(1);
    let sdt = dt / substeps as f32;
    let mut stats = StepStats {
        substeps,
        ..Default::default()
    };

    for _ in 0..substeps {
        substep(scene, sdt, &mut stats);
    }

    scene.stats = stats;
    scene.frame += 1;
}

fn substep(scene: &mut Scene, dt: f32, stats: &mut StepStats) {
    if !scene.holes.is_empty() {
        cull_absorbed(scene);
    }

    let spawners = step_balls(scene, dt, stats);

    for flipper in &mut scene.flippers {
        flipper.simulate(dt);
    }
    for obstacle in &mut scene.obstacles {
        obstacle.cool_down(dt);
    }

    for obstacle in spawners {
        let pos = scene.obstacles[obstacle].pos;
        let event = match scene.spawn_ball(pos) {
            Some(ball) => SimEvent::BallSpawned { ball, obstacle },
            None => SimEvent::SpawnRejected { obstacle },
        };
        scene.events.push(event);
    }

    resolve_ball_pairs(scene, stats);

    if !scene.beads.is_empty() {
        step_beads(scene, dt, stats);
    }
}

/// Remove balls whose center fell inside a hole
fn cull_absorbed(scene: &mut Scene) {
    let holes = &scene.holes;
    let events = &mut scene.events;
    scene.balls.retain(|ball| match absorbing_hole(ball.pos, holes) {
        Some(hole) => {
            log::debug!("Ball {} absorbed by hole {}", ball.id, hole);
            events.push(SimEvent::BallAbsorbed { ball: ball.id, hole });
            false
        }
        None => true,
    });
}

/// Integrate balls and collide them with static and moving geometry
///
/// Returns the spawners that fired; their balls are added after the pass.
fn step_balls(scene: &mut Scene, dt: f32, stats: &mut StepStats) -> Vec<usize> {
    let gravity = scene.gravity;
    let wall_restitution = scene.wall_restitution;
    let mut spawners = Vec::new();

    for ball in &mut scene.balls {
        ball.integrate(gravity, dt);

        match &scene.boundary {
            Boundary::Open => {}
            Boundary::Walls(walls) => {
                if ball_walls_collision(ball, walls) {
                    stats.contacts += 1;
                    if walls.recolor_on_hit {
                        ball.color = random_color(&mut scene.rng);
                    }
                }
            }
            Boundary::Border(border) => {
                let restitution = ball.restitution_or(wall_restitution);
                if ball_border_collision(ball, border, restitution).is_some() {
                    stats.contacts += 1;
                }
            }
        }

        for (i, obstacle) in scene.obstacles.iter_mut().enumerate() {
            if ball_obstacle_collision(ball, obstacle).is_none() {
                continue;
            }
            stats.contacts += 1;
            scene.score += 1;
            scene.events.push(SimEvent::ObstacleHit { obstacle: i });
            if obstacle.ready_to_spawn() {
                obstacle.spawn_cooldown = SPAWN_COOLDOWN;
                spawners.push(i);
            }
        }

        for flipper in &scene.flippers {
            if ball_flipper_collision(ball, flipper).is_some() {
                stats.contacts += 1;
            }
        }
    }

    spawners
}

/// Resolve each unordered ball pair exactly once
fn resolve_ball_pairs(scene: &mut Scene, stats: &mut StepStats) {
    let fallback = scene.ball_restitution;
    let n = scene.balls.len();
    for i in 0..n {
        let (head, tail) = scene.balls.split_at_mut(i + 1);
        let ball1 = &mut head[i];
        for ball2 in tail.iter_mut() {
            let restitution = ball1.restitution_or(fallback).min(ball2.restitution_or(fallback));
            if ball_ball_collision(ball1, ball2, restitution).is_some() {
                stats.contacts += 1;
            }
        }
    }
}

/// Position-based bead step, one phase at a time across all beads
fn step_beads(scene: &mut Scene, dt: f32, stats: &mut StepStats) {
    let gravity: Vec2 = scene.gravity;

    for bead in &mut scene.beads {
        bead.start_step(gravity, dt);
    }

    if let Some(wire) = scene.wire {
        for bead in &mut scene.beads {
            if let Some(lambda) = bead.keep_on_wire(&wire) {
                stats.max_constraint_force = stats.max_constraint_force.max(constraint_force(lambda, dt));
            }
        }
    }

    for bead in &mut scene.beads {
        bead.end_step(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BallConfig, SceneConfig};
    use crate::presets;
    use crate::consts::{MAX_BALLS, SPAWN_COOLDOWN};
    use crate::sim::body::{Hole, Obstacle};
    use crate::sim::input::InputEvent;

    fn open_scene(gravity: Vec2) -> SceneConfig {
        SceneConfig {
            gravity,
            ..Default::default()
        }
    }

    #[test]
    fn test_paused_scene_does_not_move() {
        let mut config = open_scene(Vec2::new(0.0, -10.0));
        config.start_paused = true;
        config.balls.push(BallConfig::new(0.1, Vec2::new(1.0, 1.0), Vec2::ZERO));
        let mut scene = Scene::new(config);

        advance(&mut scene, 1.0 / 60.0);
        assert_eq!(scene.balls[0].pos, Vec2::new(1.0, 1.0));
        assert_eq!(scene.frame, 0);
    }

    #[test]
    fn test_single_step_while_paused() {
        let mut config = open_scene(Vec2::new(0.0, -10.0));
        config.start_paused = true;
        config.balls.push(BallConfig::new(0.1, Vec2::new(1.0, 1.0), Vec2::ZERO));
        let mut scene = Scene::new(config);

        let input = TickInput::new(vec![InputEvent::Step]);
        tick(&mut scene, &input, 1.0 / 60.0);
        assert!(scene.balls[0].pos.y < 1.0);
        assert_eq!(scene.frame, 1);
        assert!(scene.paused);

        let y = scene.balls[0].pos.y;
        tick(&mut scene, &TickInput::default(), 1.0 / 60.0);
        assert_eq!(scene.balls[0].pos.y, y);
    }

    #[test]
    fn test_substeps_split_frame() {
        let mut config = open_scene(Vec2::ZERO);
        config.num_substeps = 4;
        config.balls.push(BallConfig::new(0.1, Vec2::ZERO, Vec2::new(6.0, 0.0)));
        let mut scene = Scene::new(config);

        advance(&mut scene, 0.5);
        assert!((scene.balls[0].pos.x - 3.0).abs() < 1e-5);
        assert_eq!(scene.stats.substeps, 4);
    }

    #[test]
    fn test_hole_removes_exactly_absorbed_ball() {
        let mut config = open_scene(Vec2::ZERO);
        config.holes.push(Hole::new(Vec2::new(1.0, 1.0), 0.2));
        config.balls.push(BallConfig::new(0.05, Vec2::new(1.05, 1.0), Vec2::ZERO));
        config.balls.push(BallConfig::new(0.05, Vec2::new(3.0, 3.0), Vec2::ZERO));
        let mut scene = Scene::new(config);
        let survivor = scene.balls[1].id;

        advance(&mut scene, 1.0 / 60.0);
        assert_eq!(scene.balls.len(), 1);
        assert_eq!(scene.balls[0].id, survivor);
        assert!(matches!(
            scene.events()[0],
            SimEvent::BallAbsorbed { hole: 0, .. }
        ));
    }

    #[test]
    fn test_obstacle_contact_scores() {
        let mut config = open_scene(Vec2::ZERO);
        config.obstacles.push(Obstacle::new(0.1, Vec2::ZERO, 2.0));
        config.balls.push(BallConfig::new(0.05, Vec2::new(0.14, 0.0), Vec2::new(-1.0, 0.0)));
        let mut scene = Scene::new(config);

        advance(&mut scene, 1.0 / 60.0);
        assert_eq!(scene.score, 1);
        assert!(scene.balls[0].vel.x > 0.0);
    }

    #[test]
    fn test_spawner_fires_once_per_cooldown() {
        let mut config = open_scene(Vec2::ZERO);
        let mut spawner = Obstacle::spawner(0.06, Vec2::new(0.5, 0.5), 0.0);
        spawner.spawn_cooldown = 0.0;
        config.obstacles.push(spawner);
        config.balls.push(BallConfig::new(0.03, Vec2::new(0.55, 0.5), Vec2::ZERO));
        let mut scene = Scene::new(config);

        // Pin the ball against the spawner for half a second
        let dt = 1.0 / 60.0;
        for _ in 0..30 {
            let id = scene.balls[0].id;
            if let Some(ball) = scene.ball_mut(id) {
                ball.pos = Vec2::new(0.55, 0.5);
                ball.vel = Vec2::ZERO;
            }
            scene.balls.truncate(1);
            advance(&mut scene, dt);
        }

        let spawned = scene
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SimEvent::BallSpawned { .. }))
            .count();
        assert_eq!(spawned, 1);
    }

    #[test]
    fn test_flippers_and_cooldowns_advance_per_substep() {
        let mut scene = Scene::new(presets::pinball());
        scene.flippers[0].activated = true;
        let before = scene.obstacles[0].spawn_cooldown;
        advance(&mut scene, 1.0 / 60.0);
        assert!(scene.flippers[0].rotation > 0.0);
        assert!(scene.flippers[0].current_angular_velocity > 0.0);
        assert!((before - scene.obstacles[0].spawn_cooldown - 1.0 / 60.0).abs() < 1e-5);
    }

    #[test]
    fn test_bead_constraint_force_reported() {
        let mut scene = Scene::new(presets::bead_on_wire());
        advance(&mut scene, 1.0 / 60.0);
        assert!(scene.stats.max_constraint_force > 0.0);
        let wire = scene.wire.unwrap();
        for bead in &scene.beads {
            assert!(((bead.pos - wire.center).length() - wire.radius).abs() < 1e-4);
        }
    }

    #[test]
    fn test_ball_pairs_use_lowest_restitution() {
        let mut config = open_scene(Vec2::ZERO);
        config.ball_restitution = 1.0;
        let mut left = BallConfig::new(0.5, Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        left.restitution = Some(0.5);
        config.balls.push(left);
        config.balls.push(BallConfig::new(0.5, Vec2::new(0.95, 0.0), Vec2::new(-1.0, 0.0)));
        let mut scene = Scene::new(config);

        advance(&mut scene, 1e-6);
        let relative = scene.balls[1].vel.x - scene.balls[0].vel.x;
        assert!((relative - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_length_frame_is_skipped() {
        for config in [presets::bead_on_wire(), presets::pinball()] {
            let mut scene = Scene::new(config);
            scene.flippers.iter_mut().for_each(|f| f.activated = true);
            let beads = scene.beads.clone();

            advance(&mut scene, 0.0);
            assert!(scene.is_finite());
            assert_eq!(scene.frame, 0);
            assert_eq!(scene.beads, beads);

            for _ in 0..10 {
                advance(&mut scene, 1.0 / 60.0);
            }
            assert!(scene.is_finite());
            assert_eq!(scene.frame, 10);
        }
    }

    #[test]
    fn test_nan_frame_is_skipped() {
        let mut scene = Scene::new(presets::bead_on_wire());
        advance(&mut scene, f32::NAN);
        advance(&mut scene, -1.0);
        assert!(scene.is_finite());
        assert_eq!(scene.frame, 0);
    }

    #[test]
    fn test_pending_step_waits_for_positive_frame() {
        let mut config = presets::bead_on_wire();
        config.start_paused = true;
        let mut scene = Scene::new(config);

        tick(&mut scene, &TickInput::new(vec![InputEvent::Step]), 0.0);
        assert_eq!(scene.frame, 0);
        advance(&mut scene, 1.0 / 60.0);
        assert_eq!(scene.frame, 1);
        assert!(scene.is_finite());
    }

    #[test]
    fn test_full_scene_rejects_spawn_but_resets_cooldown() {
        let mut config = open_scene(Vec2::ZERO);
        let mut spawner = Obstacle::spawner(0.06, Vec2::new(0.5, 0.5), 0.0);
        spawner.spawn_cooldown = 0.0;
        config.obstacles.push(spawner);
        // One ball touching the spawner, the rest parked far apart
        config.balls.push(BallConfig::new(0.03, Vec2::new(0.55, 0.5), Vec2::ZERO));
        for i in 1..MAX_BALLS {
            config.balls.push(BallConfig::new(0.03, Vec2::new(5.0 + i as f32, 5.0), Vec2::ZERO));
        }
        let mut scene = Scene::new(config);

        let dt = 1.0 / 60.0;
        advance(&mut scene, dt);

        assert_eq!(scene.balls.len(), MAX_BALLS);
        let events = scene.drain_events();
        let rejected = events
            .iter()
            .filter(|e| matches!(e, SimEvent::SpawnRejected { obstacle: 0 }))
            .count();
        assert_eq!(rejected, 1);
        assert!(!events.iter().any(|e| matches!(e, SimEvent::BallSpawned { .. })));
        // Reset during the ball pass, then counted down once this sub-step
        assert!((scene.obstacles[0].spawn_cooldown - (SPAWN_COOLDOWN - dt)).abs() < 1e-5);
    }
}
