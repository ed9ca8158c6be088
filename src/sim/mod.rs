//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only, supplied by the caller
//! - Seeded RNG only
//! - Stable iteration order (collection order, ball pairs upper-triangular)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod input;
pub mod integrate;
pub mod render;
pub mod scene;
pub mod tick;

pub use body::{
    Ball, BallId, Bead, Border, Boundary, Flipper, Hole, Obstacle, SideClamp, Walls, Wire,
    disc_mass,
};
pub use collision::{
    Contact, absorbing_hole, ball_ball_collision, ball_border_collision, ball_flipper_collision,
    ball_obstacle_collision, ball_walls_collision,
};
pub use input::{Drag, InputEvent, TickInput};
pub use render::{DrawItem, Renderable};
pub use scene::{Scene, SimEvent, StepStats};
pub use tick::{advance, tick};
