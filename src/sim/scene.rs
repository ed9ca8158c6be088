//! Scene state
//!
//! The scene is the single unit of mutable state for one simulation. It owns
//! every body; hosts read it for rendering and mutate it only between ticks
//! (through [`InputEvent`](super::InputEvent)s or the pub fields).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Ball, BallId, Bead, Boundary, Flipper, Hole, Obstacle, Wire, disc_mass};
use super::input::Drag;
use crate::config::SceneConfig;
use crate::consts::{MAX_BALLS, SPAWN_RADIUS, SPAWN_RESTITUTION, SPAWN_SPEED};
use crate::math::direction;

/// Something that happened during a tick, for hosts (sound, UI)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A ball fell into a hole and was removed
    BallAbsorbed { ball: BallId, hole: usize },
    /// A spawner obstacle created a ball
    BallSpawned { ball: BallId, obstacle: usize },
    /// A spawner fired while the scene was full
    SpawnRejected { obstacle: usize },
    /// A ball touched an obstacle (scores a point)
    ObstacleHit { obstacle: usize },
}

/// Diagnostics for the most recent frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepStats {
    pub substeps: u32,
    /// Resolved contacts across all sub-steps
    pub contacts: u32,
    /// Largest `|lambda / dt²|` any bead needed this frame
    pub max_constraint_force: f32,
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub gravity: Vec2,
    /// Outer frame timestep
    pub dt: f32,
    pub num_substeps: u32,
    /// Ball-ball restitution for balls without their own
    pub ball_restitution: f32,
    /// Ball-border restitution for balls without their own
    pub wall_restitution: f32,
    pub paused: bool,
    pub score: u64,
    /// Frames advanced since setup
    pub frame: u64,

    pub boundary: Boundary,
    pub wire: Option<Wire>,
    pub balls: Vec<Ball>,
    pub beads: Vec<Bead>,
    pub obstacles: Vec<Obstacle>,
    pub holes: Vec<Hole>,
    pub flippers: Vec<Flipper>,

    /// Active pointer drag, by ball id (may outlive the ball)
    pub drag: Option<Drag>,
    pub stats: StepStats,

    /// Run one frame even though paused
    pub(crate) step_requested: bool,
    #[serde(skip)]
    pub(crate) events: Vec<SimEvent>,
    pub(crate) rng: Pcg32,
    config: SceneConfig,
    next_id: BallId,
}

impl Scene {
    /// Build a scene from its configuration
    pub fn new(config: SceneConfig) -> Self {
        let mut scene = Self {
            gravity: config.gravity,
            dt: config.dt,
            num_substeps: config.num_substeps,
            ball_restitution: config.ball_restitution,
            wall_restitution: config.wall_restitution,
            paused: config.start_paused,
            score: 0,
            frame: 0,
            boundary: config.boundary.clone(),
            wire: config.wire,
            balls: Vec::with_capacity(config.balls.len()),
            beads: config.beads.iter().map(|b| b.build()).collect(),
            obstacles: config.obstacles.clone(),
            holes: config.holes.clone(),
            flippers: config.flippers.iter().map(|f| f.build()).collect(),
            drag: None,
            stats: StepStats::default(),
            step_requested: false,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            next_id: 1,
        };

        for i in 0..scene.config.balls.len() {
            let id = scene.next_entity_id();
            let ball = scene.config.balls[i].build(id);
            scene.balls.push(ball);
        }

        log::info!(
            "Scene '{}' built: {} balls, {} beads, {} obstacles, {} holes, {} flippers",
            scene.config.name,
            scene.balls.len(),
            scene.beads.len(),
            scene.obstacles.len(),
            scene.holes.len(),
            scene.flippers.len()
        );
        scene
    }

    /// Configuration this scene was built from
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Rebuild from the stored configuration (score, RNG and ids included)
    pub fn reset(&mut self) {
        log::info!("Scene '{}' reset", self.config.name);
        *self = Self::new(self.config.clone());
    }

    /// Allocate a new ball ID
    pub fn next_entity_id(&mut self) -> BallId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a ball and return its id
    pub fn add_ball(&mut self, radius: f32, mass: f32, pos: Vec2, vel: Vec2) -> BallId {
        let id = self.next_entity_id();
        self.balls.push(Ball::new(id, radius, mass, pos, vel));
        id
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn ball_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    /// Ball under the active drag, if it still exists
    pub fn selected_ball(&self) -> Option<&Ball> {
        self.drag.and_then(|drag| self.ball(drag.ball))
    }

    /// Spawn a ball at `pos` with a random launch direction
    ///
    /// Returns `None` once the scene holds [`MAX_BALLS`].
    pub fn spawn_ball(&mut self, pos: Vec2) -> Option<BallId> {
        if self.balls.len() >= MAX_BALLS {
            log::debug!("Spawn at {:?} rejected: {} balls", pos, self.balls.len());
            return None;
        }

        let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
        let vel = direction(angle) * SPAWN_SPEED;
        let id = self.next_entity_id();
        let ball = Ball::new(id, SPAWN_RADIUS, disc_mass(SPAWN_RADIUS), pos, vel)
            .with_restitution(SPAWN_RESTITUTION);
        self.balls.push(ball);
        log::debug!("Spawned ball {} at {:?}", id, pos);
        Some(id)
    }

    /// Random opaque `0xRRGGBB` color from the scene RNG
    pub fn random_color(&mut self) -> u32 {
        random_color(&mut self.rng)
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!("Scene {}", if self.paused { "paused" } else { "running" });
    }

    /// Advance exactly one frame on the next tick, then stay paused
    pub fn request_step(&mut self) {
        if self.paused {
            self.step_requested = true;
        }
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Whether every moving body still has finite state
    ///
    /// The engine never acts on this; hosts may pause when it turns false.
    pub fn is_finite(&self) -> bool {
        self.balls.iter().all(|b| b.pos.is_finite() && b.vel.is_finite())
            && self.beads.iter().all(|b| b.pos.is_finite() && b.vel.is_finite())
            && self
                .flippers
                .iter()
                .all(|f| f.rotation.is_finite() && f.current_angular_velocity.is_finite())
    }

    /// Total kinetic energy of balls and beads
    pub fn kinetic_energy(&self) -> f32 {
        let balls: f32 = self.balls.iter().map(|b| 0.5 * b.mass * b.vel.length_squared()).sum();
        let beads: f32 = self.beads.iter().map(|b| 0.5 * b.mass * b.vel.length_squared()).sum();
        balls + beads
    }
}

pub(crate) fn random_color(rng: &mut Pcg32) -> u32 {
    rng.random::<u32>() & 0xFF_FFFF
}
