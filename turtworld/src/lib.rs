//! Turt World - runtime core of a 2D side-scrolling platformer.
//!
//! Physics bodies and platforms, the per-frame level loop (movement,
//! coins and combos, hazards, goal) and a clamped follow camera. Drawing,
//! keyboard handling and persistence belong to the host.

pub mod animation;
pub mod camera;
pub mod character;
pub mod clock;
pub mod config;
pub mod entities;
pub mod error;
pub mod input;
pub mod level;
pub mod math;
pub mod physics;
pub mod render;
pub mod scoring;

pub use crate::animation::{AnimationFrame, AnimationState, CharacterAnimation};
pub use crate::camera::Camera;
pub use crate::character::{CharacterData, CharacterKind, CharacterPhysics};
pub use crate::clock::{Clock, ManualClock, MonotonicClock};
pub use crate::config::{GameConfig, PhysicsConfig, ViewConfig};
pub use crate::entities::{Collectible, Goal, Hazard, LevelPlatform, Player};
pub use crate::error::{CoreError, Result};
pub use crate::input::{InputSource, InputState};
pub use crate::level::{
    DeathCause, GameLevel, LevelData, LevelEvent, LevelManager, LevelState, RectData,
};
pub use crate::math::{Aabb, Vec2};
pub use crate::physics::{
    BodyDesc, BodyHandle, ManualPhysicsWorld, PhysicsBackend, PhysicsBody, Platform,
    RapierPhysicsWorld,
};
pub use crate::render::{Drawable, NullSurface, RenderSurface};
