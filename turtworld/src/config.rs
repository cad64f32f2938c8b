use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tuning values for the physics backends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in pixels per second squared.
    pub gravity: f32,
    /// Pixels per character design unit. Character speed and jump force are
    /// authored in design units and scaled by this when a body is created.
    pub velocity_scale: f32,
    /// Largest frame delta the outer loop should feed into a tick.
    pub max_delta: f32,
}

impl PhysicsConfig {
    /// Clamp a raw frame delta to `[0, max_delta]`.
    ///
    /// The simulation itself never clamps upward; this is offered to the
    /// driver so a stalled frame does not become one huge integration step.
    pub fn clamp_delta(&self, dt: f32) -> f32 {
        if dt.is_nan() {
            return 0.0;
        }
        dt.max(0.0).min(self.max_delta)
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 30.0,
            velocity_scale: 50.0,
            max_delta: 0.1,
        }
    }
}

/// Size of the visible viewport in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 600.0,
        }
    }
}

/// Top-level configuration for a play session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub view: ViewConfig,
    /// A player whose center drops below this y dies.
    pub fall_death_y: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            view: ViewConfig::default(),
            fall_death_y: 700.0,
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.physics.gravity = gravity;
        self
    }

    #[must_use]
    pub fn with_velocity_scale(mut self, scale: f32) -> Self {
        self.physics.velocity_scale = scale;
        self
    }

    #[must_use]
    pub fn with_view_size(mut self, width: f32, height: f32) -> Self {
        self.view.width = width;
        self.view.height = height;
        self
    }

    #[must_use]
    pub fn with_fall_death_y(mut self, y: f32) -> Self {
        self.fall_death_y = y;
        self
    }
}
