//! Physics backends.
//!
//! Game code talks to a [`PhysicsBackend`]: it registers static platforms,
//! creates character bodies and gets back a [`BodyHandle`], and steps the
//! world once per tick. Two backends implement it:
//!
//! - [`ManualPhysicsWorld`] integrates bodies by hand and resolves
//!   box-vs-box contacts directly. Ground contact is a per-step flag.
//! - [`RapierPhysicsWorld`] hands integration and contact solving to
//!   rapier2d and derives ground contact from a velocity window.
//!
//! Both keep the jump/float/air-control rules in [`PhysicsBody`], so
//! characters feel the same whichever solver moves them.
//!
//! Everything here is single-threaded and mutated only from the frame loop.

mod arena;
mod body;
mod manual;
mod rapier;

use serde::{Deserialize, Serialize};

use crate::character::CharacterPhysics;
use crate::config::PhysicsConfig;
use crate::math::{Aabb, Vec2};

pub use arena::{BodyArena, BodyHandle};
pub use body::{
    Contact, JumpPhase, PhysicsBody, DAMPING_REFERENCE_HZ, FLOAT_DRAG, GROUNDED_STABLE_STEPS,
    GROUNDED_VY_MAX, GROUNDED_VY_MIN, HORIZONTAL_DAMPING, HORIZONTAL_RESPONSE, JUMP_BUFFER_TIME,
    JUMP_CUT_FACTOR,
};
pub use manual::ManualPhysicsWorld;
pub use rapier::RapierPhysicsWorld;

/// Index of a platform in registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformId(pub u32);

/// Static, immutable box that bodies collide with.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    bounds: Aabb,
}

impl Platform {
    /// Platform centered on `(x, y)`.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            bounds: Aabb::from_center(Vec2::new(x, y), width, height),
        }
    }

    pub fn from_top_left(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            bounds: Aabb::from_top_left(x, y, width, height),
        }
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// Everything needed to create a character body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyDesc {
    /// Center of the body.
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub physics: CharacterPhysics,
}

impl BodyDesc {
    pub fn new(position: Vec2, width: f32, height: f32, physics: CharacterPhysics) -> Self {
        Self {
            position,
            width,
            height,
            physics,
        }
    }
}

/// A world of character bodies and static platforms.
pub trait PhysicsBackend {
    /// Create an empty world.
    fn new(config: &PhysicsConfig) -> Self
    where
        Self: Sized;

    fn gravity(&self) -> f32;

    fn set_gravity(&mut self, gravity: f32);

    fn add_platform(&mut self, platform: Platform) -> PlatformId;

    /// Registered platforms, oldest first.
    fn platforms(&self) -> &[Platform];

    /// Register a new body. It is stepped after every body registered before it.
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle;

    /// Unregister a body. Returns whether the handle was live.
    fn remove_body(&mut self, handle: BodyHandle) -> bool;

    fn body(&self, handle: BodyHandle) -> Option<&PhysicsBody>;

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut PhysicsBody>;

    fn body_count(&self) -> usize;

    fn has_body(&self, handle: BodyHandle) -> bool {
        self.body(handle).is_some()
    }

    /// Advance every body by `dt` seconds.
    ///
    /// The caller is expected to clamp `dt`; a zero, negative or NaN value
    /// leaves the world untouched.
    fn step(&mut self, dt: f32);
}

/// Returns `None` for deltas that should not advance the simulation.
pub(crate) fn effective_dt(dt: f32) -> Option<f32> {
    if dt.is_nan() || dt <= 0.0 {
        None
    } else {
        Some(dt)
    }
}
