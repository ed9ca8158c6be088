//! Disc Sim - fixed-timestep 2D rigid disc physics
//!
//! Core modules:
//! - `math`: Vector helpers on top of `glam::Vec2`
//! - `sim`: Deterministic simulation (bodies, integration, collisions, stepping)
//! - `config`: Serializable scene description
//! - `presets`: Reference scenes (bouncing ball, billiard, bead on wire, pinball)
//! - `driver`: Host-side fixed-timestep frame clock

pub mod config;
pub mod driver;
pub mod math;
pub mod presets;
pub mod sim;

pub use config::{ConfigError, SceneConfig};
pub use driver::FrameClock;
pub use math::{closest_point_on_segment, normalize_with_length};
pub use sim::{Scene, TickInput, advance, tick};

/// Simulation configuration constants
pub mod consts {
    /// Default outer frame timestep (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Sub-steps for unconstrained scenes
    pub const DEFAULT_SUBSTEPS: u32 = 1;
    /// Sub-steps for constrained and flipper scenes
    pub const CONSTRAINED_SUBSTEPS: u32 = 10;
    /// Longest real frame the clock will account for (prevents spiral of death)
    pub const MAX_FRAME_TIME: f32 = 0.1;
    /// Maximum fixed frames run per host update
    pub const MAX_FRAMES_PER_UPDATE: u32 = 8;

    /// Spawners refuse to add balls past this count
    pub const MAX_BALLS: usize = 10;
    /// Seconds a spawner waits before it can spawn again
    pub const SPAWN_COOLDOWN: f32 = 1.0;
    /// Radius of a spawned ball
    pub const SPAWN_RADIUS: f32 = 0.03;
    /// Launch speed of a spawned ball
    pub const SPAWN_SPEED: f32 = 3.5;
    /// Restitution of a spawned ball
    pub const SPAWN_RESTITUTION: f32 = 0.8;

    /// Default ball-ball restitution
    pub const BALL_RESTITUTION: f32 = 1.0;
    /// Default ball-wall restitution
    pub const WALL_RESTITUTION: f32 = 0.8;
}
