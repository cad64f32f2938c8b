//! Gameplay objects placed in a level.
//!
//! The player wraps a physics body owned by the world and refers to it by
//! handle. Everything else is a static rectangle that only takes part in
//! overlap tests.

use serde::{Deserialize, Serialize};

use crate::animation::{AnimationFrame, CharacterAnimation};
use crate::character::{CharacterData, CharacterKind};
use crate::input::InputSource;
use crate::math::{Aabb, Vec2};
use crate::physics::{BodyDesc, BodyHandle, JumpPhase, PhysicsBackend, PlatformId};

pub const PLAYER_WIDTH: f32 = 32.0;
pub const PLAYER_HEIGHT: f32 = 48.0;
/// Side of the square used for collectible overlap tests.
pub const COLLECTIBLE_SIZE: f32 = 20.0;

/// The controllable character.
#[derive(Clone, Debug)]
pub struct Player {
    body: BodyHandle,
    name: String,
    kind: Option<CharacterKind>,
    facing_right: bool,
    animation: CharacterAnimation,
}

impl Player {
    /// Create the player's body in `world`, centered on `start`.
    pub fn spawn<W: PhysicsBackend + ?Sized>(
        world: &mut W,
        character: &CharacterData,
        start: Vec2,
        velocity_scale: f32,
    ) -> Self {
        let desc = BodyDesc::new(
            start,
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
            character.physics(velocity_scale),
        );
        let body = world.create_body(desc);
        Self {
            body,
            name: character.name.clone(),
            kind: character.name.parse().ok(),
            facing_right: true,
            animation: CharacterAnimation::new(),
        }
    }

    /// Apply one tick of input to the body. Returns `None` if the body is gone.
    ///
    /// Horizontal control runs every tick, including with no key held, so
    /// the character slows down when input stops.
    pub fn update<W: PhysicsBackend + ?Sized>(
        &mut self,
        world: &mut W,
        input: &dyn InputSource,
        dt: f32,
    ) -> Option<JumpPhase> {
        let body = world.body_mut(self.body)?;

        let direction = input.horizontal_axis();
        if direction != 0.0 {
            self.facing_right = direction > 0.0;
        }
        body.move_horizontal(direction, dt);
        let phase = body.jump(input.jump(), dt);

        let velocity = body.velocity();
        self.animation
            .update(dt, velocity.x, velocity.y, body.is_grounded());
        Some(phase)
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Roster entry, if the character is one of the shipped ones.
    pub fn kind(&self) -> Option<CharacterKind> {
        self.kind
    }

    pub fn facing_right(&self) -> bool {
        self.facing_right
    }

    pub fn animation_frame(&self) -> AnimationFrame {
        self.animation.current_frame()
    }

    pub fn position<W: PhysicsBackend + ?Sized>(&self, world: &W) -> Option<Vec2> {
        world.body(self.body).map(|b| b.position())
    }

    pub fn velocity<W: PhysicsBackend + ?Sized>(&self, world: &W) -> Option<Vec2> {
        world.body(self.body).map(|b| b.velocity())
    }

    pub fn bounds<W: PhysicsBackend + ?Sized>(&self, world: &W) -> Option<Aabb> {
        world.body(self.body).map(|b| b.bounds())
    }

    pub fn is_grounded<W: PhysicsBackend + ?Sized>(&self, world: &W) -> bool {
        world.body(self.body).is_some_and(|b| b.is_grounded())
    }

    /// Unregister the body. Consumes the player so the handle cannot be reused.
    pub fn destroy<W: PhysicsBackend + ?Sized>(self, world: &mut W) {
        world.remove_body(self.body);
    }
}

/// Something that kills the player on touch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub bounds: Aabb,
    /// Visual tag, e.g. `"cactus"`.
    pub kind: String,
}

impl Hazard {
    pub fn new(bounds: Aabb, kind: impl Into<String>) -> Self {
        Self {
            bounds,
            kind: kind.into(),
        }
    }

    pub fn check_collision(&self, other: &Aabb) -> bool {
        self.bounds.overlaps(other)
    }
}

/// Level exit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub bounds: Aabb,
}

impl Goal {
    pub fn new(bounds: Aabb) -> Self {
        Self { bounds }
    }

    pub fn check_collision(&self, other: &Aabb) -> bool {
        self.bounds.overlaps(other)
    }
}

/// A platform as the level sees it: the physics platform plus its look.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelPlatform {
    pub id: PlatformId,
    pub bounds: Aabb,
    /// Visual tag, e.g. `"ground"` or `"sand"`.
    pub kind: String,
}

impl LevelPlatform {
    pub fn check_collision(&self, other: &Aabb) -> bool {
        self.bounds.overlaps(other)
    }
}

/// A coin. Its round footprint is tested as a square.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub center: Vec2,
    collected: bool,
}

impl Collectible {
    pub fn new(center: Vec2) -> Self {
        Self {
            center,
            collected: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.center, COLLECTIBLE_SIZE, COLLECTIBLE_SIZE)
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Uncollected and overlapping `other`.
    pub fn check_collision(&self, other: &Aabb) -> bool {
        !self.collected && self.bounds().overlaps(other)
    }

    /// Mark as collected. Returns `false` if it already was.
    pub fn collect(&mut self) -> bool {
        !std::mem::replace(&mut self.collected, true)
    }

    pub(crate) fn reset(&mut self) {
        self.collected = false;
    }
}
