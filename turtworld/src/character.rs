//! Playable characters and their movement profiles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Movement profile in world units (pixels, seconds).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterPhysics {
    /// Target horizontal speed.
    pub speed: f32,
    /// Upward velocity applied when a jump starts.
    pub jump_force: f32,
    /// Carried for completeness; the simplified model ignores it.
    pub mass: f32,
    /// Fraction of ground control available while airborne (0..1).
    pub air_control: f32,
    /// Seconds of reduced fall rate after leaving the ground. 0 disables floating.
    pub float_time: f32,
}

impl CharacterPhysics {
    pub fn can_float(&self) -> bool {
        self.float_time > 0.0
    }
}

/// Character record as stored by the character data store.
///
/// `speed` and `jump_force` are design units; see [`CharacterData::physics`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterData {
    pub name: String,
    pub speed: f32,
    pub jump_force: f32,
    pub mass: f32,
    pub air_control: f32,
    pub float_time: f32,
    #[serde(default)]
    pub description: String,
}

impl CharacterData {
    pub fn from_json(json: &str) -> Result<Self> {
        let data: Self = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("speed", self.speed),
            ("jump_force", self.jump_force),
            ("mass", self.mass),
            ("air_control", self.air_control),
            ("float_time", self.float_time),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(CoreError::character(field, "must be finite"));
            }
            if value < 0.0 {
                return Err(CoreError::character(field, "must not be negative"));
            }
        }
        if self.air_control > 1.0 {
            return Err(CoreError::character("air_control", "must be within 0..=1"));
        }
        Ok(())
    }

    /// Convert to world units, scaling velocities by `velocity_scale` pixels per unit.
    pub fn physics(&self, velocity_scale: f32) -> CharacterPhysics {
        CharacterPhysics {
            speed: self.speed * velocity_scale,
            jump_force: self.jump_force * velocity_scale,
            mass: self.mass,
            air_control: self.air_control,
            float_time: self.float_time,
        }
    }
}

/// The shipped roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterKind {
    Turtle,
    Pig,
    Lemur,
    Axolotl,
}

impl CharacterKind {
    pub const ALL: [CharacterKind; 4] = [
        CharacterKind::Turtle,
        CharacterKind::Pig,
        CharacterKind::Lemur,
        CharacterKind::Axolotl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CharacterKind::Turtle => "Turtle",
            CharacterKind::Pig => "Pig",
            CharacterKind::Lemur => "Lemur",
            CharacterKind::Axolotl => "Axolotl",
        }
    }

    /// Preset stats for this character.
    pub fn data(self) -> CharacterData {
        let (speed, jump_force, mass, air_control, float_time, description) = match self {
            CharacterKind::Turtle => (4.0, 9.0, 1.5, 0.5, 0.0, "Slow and steady."),
            CharacterKind::Pig => (5.0, 10.0, 1.2, 0.6, 0.0, "Balanced all-rounder."),
            CharacterKind::Lemur => (6.0, 12.0, 0.8, 0.9, 0.0, "Quick with great air control."),
            CharacterKind::Axolotl => (5.0, 9.0, 1.0, 0.7, 0.6, "Floats gently after leaving the ground."),
        };
        CharacterData {
            name: self.name().to_string(),
            speed,
            jump_force,
            mass,
            air_control,
            float_time,
            description: description.to_string(),
        }
    }
}

impl fmt::Display for CharacterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharacterKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        CharacterKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownCharacter(s.to_string()))
    }
}
