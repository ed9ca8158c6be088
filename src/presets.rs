//! Reference scenes
//!
//! Each preset is plain configuration; the same engine runs all of them.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::{BallConfig, BeadConfig, FlipperConfig, SceneConfig};
use crate::consts::{CONSTRAINED_SUBSTEPS, DEFAULT_SUBSTEPS, FRAME_DT};
use crate::sim::body::{Border, Boundary, Hole, Obstacle, SideClamp, Walls, Wire};

/// Names accepted by [`by_name`]
pub const PRESET_NAMES: [&str; 4] = ["bouncing-ball", "billiard", "bead-on-wire", "pinball"];

/// Look a preset up by name
pub fn by_name(name: &str, seed: u64) -> Option<SceneConfig> {
    match name {
        "bouncing-ball" => Some(bouncing_ball()),
        "billiard" => Some(billiard(seed)),
        "bead-on-wire" => Some(bead_on_wire()),
        "pinball" => Some(pinball()),
        _ => None,
    }
}

/// One ball dropped onto a damped floor between two lossless side walls
pub fn bouncing_ball() -> SceneConfig {
    let walls = Walls {
        size: Vec2::new(20.0, 20.0),
        side_clamp: SideClamp::Center,
        ceiling: false,
        floor_restitution: 0.9,
        side_restitution: 1.0,
        recolor_on_hit: false,
    };
    SceneConfig {
        name: "bouncing-ball".to_string(),
        gravity: Vec2::new(0.0, -10.0),
        dt: FRAME_DT,
        num_substeps: CONSTRAINED_SUBSTEPS,
        boundary: Boundary::Walls(walls),
        balls: vec![BallConfig::new(0.3, Vec2::new(10.0, 18.0), Vec2::ZERO)],
        ..Default::default()
    }
}

/// Twenty random balls on a flat table with five pockets; starts paused
pub fn billiard(seed: u64) -> SceneConfig {
    let size = Vec2::new(5.0, 5.0);
    let mut rng = Pcg32::seed_from_u64(seed);

    let balls = (0..20)
        .map(|_| {
            let radius = 0.05 + rng.random::<f32>() * 0.1;
            let pos = Vec2::new(rng.random::<f32>() * size.x, rng.random::<f32>() * size.y);
            let vel = Vec2::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            );
            let mut ball = BallConfig::new(radius, pos, vel);
            ball.color = Some(rng.random::<u32>() & 0xFF_FFFF);
            ball
        })
        .collect();

    let holes = vec![
        Hole::new(Vec2::new(1.0, 1.0), 0.15),
        Hole::new(Vec2::new(1.5, 1.8), 0.2),
        Hole::new(Vec2::new(3.5, 3.8), 0.2),
        Hole::new(Vec2::new(2.5, 2.8), 0.2),
        Hole::new(Vec2::new(1.5, 2.8), 0.15),
    ];

    let mut walls = Walls::enclosed(size, 0.8);
    walls.recolor_on_hit = true;

    SceneConfig {
        name: "billiard".to_string(),
        gravity: Vec2::ZERO,
        dt: FRAME_DT,
        num_substeps: DEFAULT_SUBSTEPS,
        ball_restitution: 1.0,
        wall_restitution: 0.8,
        boundary: Boundary::Walls(walls),
        balls,
        holes,
        seed,
        start_paused: true,
        ..Default::default()
    }
}

/// Five beads spread evenly around a circular wire
pub fn bead_on_wire() -> SceneConfig {
    let center = Vec2::new(1.0, 1.0);
    let radius = 0.8;

    let beads = (0..5)
        .map(|i| {
            let angle = TAU / 5.0 * i as f32;
            BeadConfig {
                radius: 0.05,
                mass: 1.0,
                pos: center + Vec2::new(angle.cos(), angle.sin()) * radius,
                vel: Vec2::new(1.0 - i as f32 * 0.2, 0.0),
            }
        })
        .collect();

    SceneConfig {
        name: "bead-on-wire".to_string(),
        gravity: Vec2::new(0.0, -10.0),
        dt: FRAME_DT,
        num_substeps: CONSTRAINED_SUBSTEPS,
        wire: Some(Wire { center, radius }),
        beads,
        ..Default::default()
    }
}

/// Pinball table: polygon border, four bumpers, one spawner, two flippers
pub fn pinball() -> SceneConfig {
    let height = 1.7;
    let offset = 0.02;
    let border = Border::new(vec![
        Vec2::new(0.74, 0.25),
        Vec2::new(1.0 - offset, 0.4),
        Vec2::new(1.0 - offset, height - offset),
        Vec2::new(offset, height - offset),
        Vec2::new(offset, 0.4),
        Vec2::new(0.26, 0.25),
        Vec2::new(0.26, 0.0),
        Vec2::new(0.74, 0.0),
    ]);

    let ball = |pos: Vec2, vel: Vec2| {
        let mut ball = BallConfig::new(0.03, pos, vel);
        ball.restitution = Some(0.4);
        ball
    };

    let obstacles = vec![
        Obstacle::new(0.1, Vec2::new(0.25, 0.6), 2.0).with_color(0xFF0000),
        Obstacle::new(0.13, Vec2::new(0.75, 0.8), 2.0).with_color(0x00FF00),
        Obstacle::new(0.12, Vec2::new(0.7, 1.3), 2.0).with_color(0x0000FF),
        Obstacle::new(0.08, Vec2::new(0.2, 1.2), 2.0).with_color(0xFFFF00),
        Obstacle::spawner(0.06, Vec2::new(0.5, 1.0), 2.0).with_color(0xFF00FF),
    ];

    let flipper = |pos: Vec2, rest_angle: f32, max_rotation: f32| FlipperConfig {
        radius: 0.03,
        pos,
        length: 0.2,
        rest_angle,
        max_rotation,
        angular_velocity: 15.0,
        color: None,
    };
    let rest_angle = 0.5;

    SceneConfig {
        name: "pinball".to_string(),
        gravity: Vec2::new(0.0, -3.0),
        dt: FRAME_DT,
        num_substeps: CONSTRAINED_SUBSTEPS,
        boundary: Boundary::Border(border),
        balls: vec![
            ball(Vec2::new(0.92, 0.5), Vec2::new(-0.2, 3.5)),
            ball(Vec2::new(0.08, 0.5), Vec2::new(0.2, 3.5)),
        ],
        obstacles,
        flippers: vec![
            flipper(Vec2::new(0.26, 0.22), -rest_angle, 1.0),
            flipper(Vec2::new(0.74, 0.22), PI + rest_angle, -1.0),
        ],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for name in PRESET_NAMES {
            let config = by_name(name, 3).unwrap();
            assert!(config.validate().is_ok(), "{name}");
            assert_eq!(config.name, name);
        }
        assert!(by_name("snooker", 3).is_none());
    }

    #[test]
    fn test_billiard_is_seeded() {
        assert_eq!(billiard(11), billiard(11));
        assert_ne!(billiard(11), billiard(12));
    }

    #[test]
    fn test_pinball_border_winds_counter_clockwise() {
        // Edge normals point into the table only for this winding
        let Boundary::Border(border) = pinball().boundary else {
            panic!("pinball uses a polygon border");
        };
        let area: f32 = border.edges().map(|(a, b)| a.perp_dot(b)).sum::<f32>() / 2.0;
        assert!(area > 0.0);
    }
}
