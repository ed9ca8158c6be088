//! Scene configuration
//!
//! Everything a scene starts from: physics parameters, boundary and the initial
//! bodies. Stored as JSON. Body values (radius, mass) are taken as given; only
//! parameters the stepper cannot run with are rejected.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BALL_RESTITUTION, DEFAULT_SUBSTEPS, FRAME_DT, WALL_RESTITUTION};
use crate::sim::body::{
    Ball, BallId, Bead, Boundary, DEFAULT_BALL_COLOR, DEFAULT_FLIPPER_COLOR, Flipper, Hole,
    Obstacle, Wire, disc_mass,
};

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read scene config: {e}"),
            ConfigError::Parse(e) => write!(f, "Malformed scene config: {e}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid scene config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Initial state of a ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallConfig {
    pub radius: f32,
    /// Defaults to a unit-density disc
    #[serde(default)]
    pub mass: Option<f32>,
    pub pos: Vec2,
    #[serde(default)]
    pub vel: Vec2,
    #[serde(default)]
    pub restitution: Option<f32>,
    #[serde(default)]
    pub color: Option<u32>,
}

impl BallConfig {
    pub fn new(radius: f32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            radius,
            mass: None,
            pos,
            vel,
            restitution: None,
            color: None,
        }
    }

    pub fn build(&self, id: BallId) -> Ball {
        let mass = self.mass.unwrap_or_else(|| disc_mass(self.radius));
        let mut ball = Ball::new(id, self.radius, mass, self.pos, self.vel)
            .with_color(self.color.unwrap_or(DEFAULT_BALL_COLOR));
        ball.restitution = self.restitution;
        ball
    }
}

/// Initial state of a bead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeadConfig {
    pub radius: f32,
    pub mass: f32,
    pub pos: Vec2,
    #[serde(default)]
    pub vel: Vec2,
}

impl BeadConfig {
    pub fn build(&self) -> Bead {
        Bead::new(self.radius, self.mass, self.pos).with_velocity(self.vel)
    }
}

/// Fixed shape of a flipper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipperConfig {
    pub radius: f32,
    pub pos: Vec2,
    pub length: f32,
    pub rest_angle: f32,
    /// Signed: negative rotates clockwise
    pub max_rotation: f32,
    pub angular_velocity: f32,
    #[serde(default)]
    pub color: Option<u32>,
}

impl FlipperConfig {
    pub fn build(&self) -> Flipper {
        let mut flipper = Flipper::new(
            self.radius,
            self.pos,
            self.length,
            self.rest_angle,
            self.max_rotation,
            self.angular_velocity,
        );
        flipper.color = self.color.unwrap_or(DEFAULT_FLIPPER_COLOR);
        flipper
    }
}

/// Complete scene description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub name: String,
    pub gravity: Vec2,
    pub dt: f32,
    pub num_substeps: u32,
    pub ball_restitution: f32,
    pub wall_restitution: f32,
    pub boundary: Boundary,
    pub wire: Option<Wire>,
    pub balls: Vec<BallConfig>,
    pub beads: Vec<BeadConfig>,
    pub obstacles: Vec<Obstacle>,
    pub holes: Vec<Hole>,
    pub flippers: Vec<FlipperConfig>,
    /// Seed for spawn directions and wall recoloring
    pub seed: u64,
    pub start_paused: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: "untitled".to_string(),
            gravity: Vec2::ZERO,
            dt: FRAME_DT,
            num_substeps: DEFAULT_SUBSTEPS,
            ball_restitution: BALL_RESTITUTION,
            wall_restitution: WALL_RESTITUTION,
            boundary: Boundary::Open,
            wire: None,
            balls: Vec::new(),
            beads: Vec::new(),
            obstacles: Vec::new(),
            holes: Vec::new(),
            flippers: Vec::new(),
            seed: 0,
            start_paused: false,
        }
    }
}

impl SceneConfig {
    /// Reject parameters the stepper cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_substeps == 0 {
            return Err(ConfigError::Invalid("num_substeps must be at least 1".into()));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::Invalid(format!("dt must be positive, got {}", self.dt)));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::Invalid("gravity must be finite".into()));
        }
        if let Boundary::Border(border) = &self.boundary {
            if !border.is_closed() {
                log::warn!(
                    "Scene '{}': border has {} points, border collision disabled",
                    self.name,
                    border.points.len()
                );
            }
        }
        if !self.beads.is_empty() && self.wire.is_none() {
            log::warn!("Scene '{}': beads without a wire move freely", self.name);
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a config file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded scene '{}' from {}", config.name, path.display());
        Ok(config)
    }

    /// Save a config file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Scene '{}' saved", self.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use crate::sim::body::{SideClamp, Walls};

    #[test]
    fn test_presets_survive_json() {
        for config in [
            presets::bouncing_ball(),
            presets::billiard(7),
            presets::bead_on_wire(),
            presets::pinball(),
        ] {
            let json = config.to_json().unwrap();
            let back = SceneConfig::from_json(&json).unwrap();
            assert_eq!(back, config);
        }
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let json = r#"{
            "name": "drop",
            "gravity": [0.0, -10.0],
            "balls": [{ "radius": 0.3, "pos": [10.0, 18.0] }]
        }"#;
        let config = SceneConfig::from_json(json).unwrap();
        assert_eq!(config.num_substeps, DEFAULT_SUBSTEPS);
        assert_eq!(config.boundary, Boundary::Open);
        assert_eq!(config.balls[0].vel, Vec2::ZERO);
        assert_eq!(config.balls[0].mass, None);
    }

    #[test]
    fn test_walls_json() {
        let json = r#"{
            "boundary": { "Walls": {
                "size": [20.0, 20.0],
                "side_clamp": "Center",
                "ceiling": false,
                "floor_restitution": 0.9,
                "side_restitution": 1.0
            } }
        }"#;
        let config = SceneConfig::from_json(json).unwrap();
        match config.boundary {
            Boundary::Walls(Walls {
                side_clamp,
                recolor_on_hit,
                ..
            }) => {
                assert_eq!(side_clamp, SideClamp::Center);
                assert!(!recolor_on_hit);
            }
            other => panic!("unexpected boundary {other:?}"),
        }
    }

    #[test]
    fn test_rejects_zero_substeps() {
        let err = SceneConfig::from_json(r#"{ "num_substeps": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_dt() {
        let err = SceneConfig::from_json(r#"{ "dt": -0.1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = SceneConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Malformed scene config"));
    }
}
