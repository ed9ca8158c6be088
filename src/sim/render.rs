//! Read-only view of a scene for renderers
//!
//! Renderers never touch physics state; they take a draw list after each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Ball, Bead, Boundary, Flipper, HOLE_COLOR, Hole, Obstacle};
use super::scene::Scene;

/// Common draw data of every disc-like body
pub trait Renderable {
    fn pos(&self) -> Vec2;
    fn radius(&self) -> f32;
    fn color(&self) -> u32;
}

impl Renderable for Ball {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn color(&self) -> u32 {
        self.color
    }
}

impl Renderable for Bead {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn color(&self) -> u32 {
        self.color
    }
}

impl Renderable for Obstacle {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn color(&self) -> u32 {
        self.color
    }
}

impl Renderable for Hole {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn color(&self) -> u32 {
        HOLE_COLOR
    }
}

/// Pivot, capsule radius and color; the spine comes from [`Flipper::tip`]
impl Renderable for Flipper {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn color(&self) -> u32 {
        self.color
    }
}

/// One primitive to draw, in simulation coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawItem {
    /// Closed border polygon
    Polygon { points: Vec<Vec2> },
    /// Rectangular walls
    Rect { min: Vec2, max: Vec2 },
    /// Bead wire outline
    Ring { center: Vec2, radius: f32 },
    Disc { pos: Vec2, radius: f32, color: u32 },
    Capsule { start: Vec2, end: Vec2, radius: f32, color: u32 },
    /// Pointer drag from press point to the pointer
    DragLine { from: Vec2, to: Vec2 },
}

impl DrawItem {
    pub fn disc(body: &impl Renderable) -> Self {
        DrawItem::Disc {
            pos: body.pos(),
            radius: body.radius(),
            color: body.color(),
        }
    }
}

impl Scene {
    /// Everything to draw this frame, back to front
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let mut items = Vec::with_capacity(
            2 + self.holes.len()
                + self.balls.len()
                + self.beads.len()
                + self.obstacles.len()
                + self.flippers.len(),
        );

        match &self.boundary {
            Boundary::Open => {}
            Boundary::Walls(walls) => items.push(DrawItem::Rect {
                min: Vec2::ZERO,
                max: walls.size,
            }),
            Boundary::Border(border) => items.push(DrawItem::Polygon {
                points: border.points.clone(),
            }),
        }
        if let Some(wire) = self.wire {
            items.push(DrawItem::Ring {
                center: wire.center,
                radius: wire.radius,
            });
        }

        items.extend(self.holes.iter().map(DrawItem::disc));
        items.extend(self.obstacles.iter().map(DrawItem::disc));
        items.extend(self.flippers.iter().map(|flipper| DrawItem::Capsule {
            start: flipper.pos(),
            end: flipper.tip(),
            radius: flipper.radius(),
            color: flipper.color(),
        }));
        items.extend(self.balls.iter().map(DrawItem::disc));
        items.extend(self.beads.iter().map(DrawItem::disc));

        if let Some(drag) = self.drag.filter(|drag| self.ball(drag.ball).is_some()) {
            items.push(DrawItem::DragLine {
                from: drag.start,
                to: drag.current,
            });
        }

        items
    }
}
