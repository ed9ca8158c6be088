//! Host-side fixed-timestep driver
//!
//! The core never schedules itself. A host measures real elapsed time and asks
//! the clock how many fixed frames to run; input collected in between is handed
//! to the first of those frames.

use crate::consts::{MAX_FRAME_TIME, MAX_FRAMES_PER_UPDATE};
use crate::sim::{InputEvent, Scene, TickInput, tick};

#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Fixed frame length handed to the simulation
    pub frame_dt: f32,
    accumulator: f32,
    pending: TickInput,
}

impl FrameClock {
    pub fn new(frame_dt: f32) -> Self {
        Self {
            frame_dt,
            accumulator: 0.0,
            pending: TickInput::default(),
        }
    }

    /// Queue an input event for the next frame
    pub fn push_input(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Account for `elapsed` seconds and return how many frames are due
    ///
    /// Long stalls are clamped so a slow frame can't snowball into ever more
    /// catch-up work.
    pub fn frames_due(&mut self, elapsed: f32) -> u32 {
        // A bogus timestamp must not poison the accumulator
        if elapsed.is_finite() {
            self.accumulator += elapsed.clamp(0.0, MAX_FRAME_TIME);
        }

        let mut frames = 0;
        while self.accumulator >= self.frame_dt && frames < MAX_FRAMES_PER_UPDATE {
            self.accumulator -= self.frame_dt;
            frames += 1;
        }
        if frames == MAX_FRAMES_PER_UPDATE {
            // Drop the backlog rather than carry it into the next update
            self.accumulator = self.accumulator.min(self.frame_dt);
        }
        frames
    }

    /// Fraction of a frame left in the accumulator (for render interpolation)
    pub fn alpha(&self) -> f32 {
        if self.frame_dt <= 0.0 {
            return 0.0;
        }
        (self.accumulator / self.frame_dt).clamp(0.0, 1.0)
    }

    /// Run the frames due after `elapsed` seconds; returns how many ran
    pub fn update(&mut self, scene: &mut Scene, elapsed: f32) -> u32 {
        let frames = self.frames_due(elapsed);
        for _ in 0..frames {
            // One-shot input goes to the first frame only
            let input = std::mem::take(&mut self.pending);
            tick(scene, &input, self.frame_dt);
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BallConfig, SceneConfig};
    use glam::Vec2;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FrameClock::new(1.0 / 60.0);
        assert_eq!(clock.frames_due(0.01), 0);
        assert_eq!(clock.frames_due(0.01), 1);
        assert!(clock.alpha() > 0.0 && clock.alpha() < 1.0);
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut clock = FrameClock::new(0.01);
        assert_eq!(clock.frames_due(1.0), MAX_FRAMES_PER_UPDATE);
        assert!(clock.alpha() <= 1.0);
    }

    #[test]
    fn test_input_reaches_first_frame_only() {
        let mut config = SceneConfig::default();
        config.start_paused = true;
        config.balls.push(BallConfig::new(0.1, Vec2::ZERO, Vec2::new(1.0, 0.0)));
        let mut scene = Scene::new(config);

        let mut clock = FrameClock::new(0.01);
        clock.push_input(InputEvent::TogglePause);
        assert_eq!(clock.update(&mut scene, 0.035), 3);
        // A repeated toggle would have paused again after the first frame
        assert!(!scene.paused);
        assert_eq!(scene.frame, 3);
    }

    #[test]
    fn test_input_waits_for_a_due_frame() {
        let mut scene = Scene::new(SceneConfig::default());
        let mut clock = FrameClock::new(0.01);
        clock.push_input(InputEvent::TogglePause);
        assert_eq!(clock.update(&mut scene, 0.001), 0);
        assert!(!scene.paused);
        assert_eq!(clock.update(&mut scene, 0.01), 1);
        assert!(scene.paused);
    }

    #[test]
    fn test_non_finite_elapsed_is_ignored() {
        let mut clock = FrameClock::new(0.01);
        assert_eq!(clock.frames_due(f32::NAN), 0);
        assert_eq!(clock.frames_due(f32::INFINITY), 0);
        assert_eq!(clock.frames_due(0.015), 1);
        assert!(clock.alpha().is_finite());
    }

    #[test]
    fn test_alpha_with_zero_frame_length() {
        let clock = FrameClock::new(0.0);
        assert_eq!(clock.alpha(), 0.0);
    }
}
