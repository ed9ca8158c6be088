//! Host input translated into scene mutations
//!
//! Events are applied strictly between ticks: [`tick`](super::tick) applies a
//! frame's events first, then advances.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::BallId;
use super::scene::Scene;

/// A single input command in simulation coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Pointer pressed; selects the ball under it, if any
    PointerDown(Vec2),
    /// Pointer moved; drags the selected ball
    PointerMove(Vec2),
    /// Pointer released; launches the selected ball by the drag vector
    PointerUp(Vec2),
    FlipperPressed(usize),
    FlipperReleased(usize),
    TogglePause,
    /// Advance one frame while paused
    Step,
    Reset,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn new(events: Vec<InputEvent>) -> Self {
        Self { events }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Pointer drag in progress
///
/// Refers to the ball by id: the ball may be absorbed mid-drag, in which case
/// the drag simply stops having an effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drag {
    pub ball: BallId,
    /// Where the pointer was pressed
    pub start: Vec2,
    /// Latest pointer position
    pub current: Vec2,
}

impl Scene {
    /// Apply one input event
    pub fn apply_input(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown(p) => {
                self.drag = self
                    .balls
                    .iter()
                    .find(|ball| (ball.pos - p).length() <= ball.radius)
                    .map(|ball| Drag {
                        ball: ball.id,
                        start: p,
                        current: p,
                    });
            }
            InputEvent::PointerMove(p) => {
                let Some(drag) = self.drag.as_mut() else {
                    return;
                };
                drag.current = p;
                let id = drag.ball;
                match self.ball_mut(id) {
                    Some(ball) => {
                        ball.pos = p;
                        ball.vel = Vec2::ZERO;
                    }
                    None => self.drag = None,
                }
            }
            InputEvent::PointerUp(p) => {
                if let Some(drag) = self.drag.take() {
                    if let Some(ball) = self.ball_mut(drag.ball) {
                        ball.vel = p - drag.start;
                    }
                }
            }
            InputEvent::FlipperPressed(i) => {
                if let Some(flipper) = self.flippers.get_mut(i) {
                    flipper.activated = true;
                }
            }
            InputEvent::FlipperReleased(i) => {
                if let Some(flipper) = self.flippers.get_mut(i) {
                    flipper.activated = false;
                }
            }
            InputEvent::TogglePause => self.toggle_pause(),
            InputEvent::Step => self.request_step(),
            InputEvent::Reset => self.reset(),
        }
    }
}
