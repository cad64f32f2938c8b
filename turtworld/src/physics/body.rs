//! Character body: velocity integration, platform contact resolution and
//! the jump/float state machine.

use serde::{Deserialize, Serialize};

use super::{BodyDesc, Platform};
use crate::character::CharacterPhysics;
use crate::math::{Aabb, Vec2};

/// Length of the early-release window after a jump starts, in seconds.
pub const JUMP_BUFFER_TIME: f32 = 0.2;
/// Vertical velocity multiplier applied once when jump is released early.
pub const JUMP_CUT_FACTOR: f32 = 0.5;
/// Per-tick fall velocity multiplier while floating.
pub const FLOAT_DRAG: f32 = 0.8;
/// How quickly horizontal velocity approaches its target (per second).
pub const HORIZONTAL_RESPONSE: f32 = 10.0;
/// Horizontal velocity multiplier per reference tick.
pub const HORIZONTAL_DAMPING: f32 = 0.9;
/// Tick rate the damping factor was tuned at.
pub const DAMPING_REFERENCE_HZ: f32 = 60.0;

/// Exclusive vertical velocity window for the velocity-based grounded test.
pub const GROUNDED_VY_MIN: f32 = -0.5;
pub const GROUNDED_VY_MAX: f32 = 1.0;
/// Consecutive in-window steps before a body counts as grounded.
pub const GROUNDED_STABLE_STEPS: u32 = 2;

/// Which side of a platform a body was pushed out of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contact {
    /// Landed on the platform's top face.
    Landed,
    /// Hit the platform's underside while rising.
    HeadBump,
    /// Ran into the platform's left face while moving right.
    LeftWall,
    /// Ran into the platform's right face while moving left.
    RightWall,
}

/// Where a body is in the jump cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpPhase {
    Grounded,
    /// Rising inside the early-release window.
    Jumping,
    Airborne,
    /// Falling with float drag applied this tick.
    Floating,
}

fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_nan() {
        0.0
    } else {
        dt.max(0.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsBody {
    position: Vec2,
    velocity: Vec2,
    width: f32,
    height: f32,
    physics: CharacterPhysics,
    jump_time_remaining: f32,
    float_time_remaining: f32,
    grounded: bool,
    last_grounded: bool,
    grounded_steps: u32,
}

impl PhysicsBody {
    pub fn new(desc: &BodyDesc) -> Self {
        Self {
            position: desc.position,
            velocity: Vec2::ZERO,
            width: desc.width,
            height: desc.height,
            physics: desc.physics,
            jump_time_remaining: 0.0,
            float_time_remaining: desc.physics.float_time,
            grounded: false,
            last_grounded: false,
            grounded_steps: 0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Move the body without touching velocity or timers.
    pub fn teleport(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position, self.width, self.height)
    }

    pub fn physics(&self) -> &CharacterPhysics {
        &self.physics
    }

    pub fn jump_time_remaining(&self) -> f32 {
        self.jump_time_remaining
    }

    pub fn float_time_remaining(&self) -> f32 {
        self.float_time_remaining
    }

    /// Whether the last physics step left this body standing on something.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub(crate) fn apply_gravity(&mut self, gravity: f32, dt: f32) {
        self.velocity.y += gravity * dt;
    }

    pub(crate) fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    /// Contact strategy: forget last step's ground contact before resolving
    /// this step's collisions.
    pub(crate) fn begin_contact_pass(&mut self) {
        self.grounded = false;
    }

    /// Sync state computed by an external solver.
    pub(crate) fn set_kinematics(&mut self, position: Vec2, velocity: Vec2) {
        self.position = position;
        self.velocity = velocity;
    }

    /// Push the body out of `platform` if they overlap.
    ///
    /// Cases are tried in order (landing, head bump, left face, right face)
    /// and only the first match is applied. This is a discrete test: fast
    /// bodies can pass through thin platforms.
    pub fn check_platform_collision(&mut self, platform: &Platform) -> Option<Contact> {
        let p = platform.bounds();
        let b = self.bounds();

        let horizontal_overlap = b.right() > p.left() && b.left() < p.right();
        let vertical_overlap = b.bottom() > p.top() && b.top() < p.bottom();

        if horizontal_overlap {
            if b.bottom() > p.top() && b.bottom() < p.bottom() && self.velocity.y > 0.0 {
                self.position.y = p.top() - self.height / 2.0;
                self.velocity.y = 0.0;
                self.grounded = true;
                return Some(Contact::Landed);
            }
            if b.top() < p.bottom() && b.top() > p.top() && self.velocity.y < 0.0 {
                self.position.y = p.bottom() + self.height / 2.0;
                self.velocity.y = 0.0;
                return Some(Contact::HeadBump);
            }
        }

        if vertical_overlap {
            if b.right() > p.left() && b.right() < p.right() && self.velocity.x > 0.0 {
                self.position.x = p.left() - self.width / 2.0;
                self.velocity.x = 0.0;
                return Some(Contact::LeftWall);
            }
            if b.left() < p.right() && b.left() > p.left() && self.velocity.x < 0.0 {
                self.position.x = p.right() + self.width / 2.0;
                self.velocity.x = 0.0;
                return Some(Contact::RightWall);
            }
        }

        None
    }

    /// Velocity strategy: grounded once vertical speed has stayed inside
    /// the rest window for [`GROUNDED_STABLE_STEPS`] steps in a row.
    pub fn observe_vertical_velocity(&mut self) {
        let vy = self.velocity.y;
        if vy > GROUNDED_VY_MIN && vy < GROUNDED_VY_MAX {
            self.grounded_steps = self.grounded_steps.saturating_add(1);
        } else {
            self.grounded_steps = 0;
        }
        self.grounded = self.grounded_steps >= GROUNDED_STABLE_STEPS;
    }

    /// Steer horizontal velocity towards `direction * speed`.
    ///
    /// `direction` is -1 (left), 0 (no input) or 1 (right). Velocity
    /// approaches the target instead of snapping to it, then damping bleeds
    /// a little off every tick, so releasing input slows the body over a
    /// handful of ticks.
    pub fn move_horizontal(&mut self, direction: f32, dt: f32) {
        let dt = sanitize_dt(dt);
        let direction = if direction.is_finite() {
            direction.clamp(-1.0, 1.0)
        } else {
            0.0
        };

        let target = direction * self.physics.speed;
        let control = if self.grounded {
            1.0
        } else {
            self.physics.air_control
        };

        // Never overshoot the target on long frames.
        let blend = (control * HORIZONTAL_RESPONSE * dt).min(1.0);
        self.velocity.x += (target - self.velocity.x) * blend;
        self.velocity.x *= HORIZONTAL_DAMPING.powf(dt * DAMPING_REFERENCE_HZ);
    }

    /// Advance the jump/float state machine for one tick.
    pub fn jump(&mut self, held: bool, dt: f32) -> JumpPhase {
        let dt = sanitize_dt(dt);
        let was_grounded = self.grounded;

        if was_grounded && held && self.jump_time_remaining <= 0.0 {
            self.jump_time_remaining = JUMP_BUFFER_TIME;
            self.velocity.y = -self.physics.jump_force;
            self.grounded = false;
            self.grounded_steps = 0;
        }

        if self.jump_time_remaining > 0.0 {
            self.jump_time_remaining -= dt;
            if !held {
                if self.velocity.y < 0.0 {
                    self.velocity.y *= JUMP_CUT_FACTOR;
                }
                self.jump_time_remaining = 0.0;
            }
        }

        let mut floating = false;
        if self.physics.can_float() {
            if was_grounded {
                self.float_time_remaining = self.physics.float_time;
            } else {
                if self.last_grounded {
                    self.float_time_remaining = self.physics.float_time;
                }
                if self.float_time_remaining > 0.0 && self.velocity.y > 0.0 && dt > 0.0 {
                    self.float_time_remaining -= dt;
                    self.velocity.y *= FLOAT_DRAG;
                    floating = true;
                }
            }
        }
        self.last_grounded = was_grounded;

        if self.grounded {
            JumpPhase::Grounded
        } else if floating {
            JumpPhase::Floating
        } else if self.jump_time_remaining > 0.0 {
            JumpPhase::Jumping
        } else {
            JumpPhase::Airborne
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn physics(float_time: f32) -> CharacterPhysics {
        CharacterPhysics {
            speed: 250.0,
            jump_force: 500.0,
            mass: 1.0,
            air_control: 0.5,
            float_time,
        }
    }

    fn body_at(x: f32, y: f32, float_time: f32) -> PhysicsBody {
        PhysicsBody::new(&BodyDesc::new(Vec2::new(x, y), 32.0, 48.0, physics(float_time)))
    }

    fn ground() -> Platform {
        Platform::from_top_left(0.0, 580.0, 1300.0, 20.0)
    }

    /// Body resting on `ground()` with the contact flag set.
    fn grounded_body(float_time: f32) -> PhysicsBody {
        let mut body = body_at(100.0, 556.5, float_time);
        body.set_velocity(Vec2::new(0.0, 10.0));
        assert_eq!(body.check_platform_collision(&ground()), Some(Contact::Landed));
        body
    }

    #[test]
    fn landing_snaps_to_platform_top() {
        let mut body = body_at(100.0, 560.0, 0.0);
        body.set_velocity(Vec2::new(0.0, 400.0));
        assert_eq!(body.check_platform_collision(&ground()), Some(Contact::Landed));
        assert_eq!(body.velocity().y, 0.0);
        assert!((body.bounds().bottom() - 580.0).abs() < 1e-4);
        assert!(body.is_grounded());
    }

    #[test]
    fn head_bump_stops_upward_motion() {
        let ceiling = Platform::from_top_left(0.0, 100.0, 200.0, 20.0);
        let mut body = body_at(100.0, 140.0, 0.0);
        body.set_velocity(Vec2::new(0.0, -300.0));
        assert_eq!(body.check_platform_collision(&ceiling), Some(Contact::HeadBump));
        assert_eq!(body.velocity().y, 0.0);
        assert!((body.bounds().top() - 120.0).abs() < 1e-4);
        assert!(!body.is_grounded());
    }

    #[test]
    fn side_walls_push_out_and_stop_horizontal_motion() {
        let wall = Platform::from_top_left(200.0, 0.0, 40.0, 600.0);

        let mut from_left = body_at(190.0, 300.0, 0.0);
        from_left.set_velocity(Vec2::new(100.0, 0.0));
        assert_eq!(from_left.check_platform_collision(&wall), Some(Contact::LeftWall));
        assert_eq!(from_left.position().x, 184.0);
        assert_eq!(from_left.velocity().x, 0.0);

        let mut from_right = body_at(250.0, 300.0, 0.0);
        from_right.set_velocity(Vec2::new(-100.0, 0.0));
        assert_eq!(from_right.check_platform_collision(&wall), Some(Contact::RightWall));
        assert_eq!(from_right.position().x, 256.0);
        assert_eq!(from_right.velocity().x, 0.0);
    }

    #[test]
    fn landing_wins_over_wall_contact() {
        let block = Platform::from_top_left(100.0, 100.0, 100.0, 100.0);
        let mut body = body_at(90.0, 80.0, 0.0);
        body.set_velocity(Vec2::new(50.0, 50.0));
        assert_eq!(body.check_platform_collision(&block), Some(Contact::Landed));
        assert_eq!(body.velocity().x, 50.0);
    }

    #[test]
    fn separated_body_is_untouched() {
        let mut body = body_at(100.0, 100.0, 0.0);
        body.set_velocity(Vec2::new(10.0, 10.0));
        let before = body.clone();
        assert_eq!(body.check_platform_collision(&ground()), None);
        assert_eq!(body, before);
    }

    #[test]
    fn jump_sets_velocity_and_leaves_ground_immediately() {
        let mut body = grounded_body(0.0);
        let phase = body.jump(true, DT);
        assert_eq!(body.velocity().y, -500.0);
        assert!(!body.is_grounded());
        assert_eq!(phase, JumpPhase::Jumping);
        assert!((body.jump_time_remaining() - (JUMP_BUFFER_TIME - DT)).abs() < 1e-6);
    }

    #[test]
    fn early_release_halves_velocity_once() {
        let mut body = grounded_body(0.0);
        body.jump(true, DT);
        body.jump(false, DT);
        assert_eq!(body.velocity().y, -250.0);
        assert_eq!(body.jump_time_remaining(), 0.0);

        body.jump(false, DT);
        assert_eq!(body.velocity().y, -250.0);
    }

    #[test]
    fn releasing_after_the_window_does_not_cut() {
        let mut body = grounded_body(0.0);
        body.jump(true, DT);
        for _ in 0..15 {
            body.jump(true, DT);
        }
        assert!(body.jump_time_remaining() <= 0.0);
        body.jump(false, DT);
        assert_eq!(body.velocity().y, -500.0);
    }

    #[test]
    fn no_jump_while_airborne() {
        let mut body = body_at(100.0, 100.0, 0.0);
        body.set_velocity(Vec2::new(0.0, 20.0));
        assert_eq!(body.jump(true, DT), JumpPhase::Airborne);
        assert_eq!(body.velocity().y, 20.0);
    }

    #[test]
    fn float_slows_falls_for_floating_characters_only() {
        for (float_time, expect_float) in [(0.6, true), (0.0, false)] {
            let mut body = grounded_body(float_time);
            body.jump(false, DT);
            body.begin_contact_pass();
            body.set_velocity(Vec2::new(0.0, 100.0));

            let phase = body.jump(false, DT);
            if expect_float {
                assert_eq!(phase, JumpPhase::Floating);
                assert!((body.velocity().y - 80.0).abs() < 1e-4);
                assert!((body.float_time_remaining() - (0.6 - DT)).abs() < 1e-5);
            } else {
                assert_eq!(phase, JumpPhase::Airborne);
                assert_eq!(body.velocity().y, 100.0);
            }
        }
    }

    #[test]
    fn float_runs_out() {
        let mut body = grounded_body(0.11);
        body.jump(false, DT);
        body.begin_contact_pass();
        let mut floated = 0;
        for _ in 0..30 {
            body.set_velocity(Vec2::new(0.0, 100.0));
            if body.jump(false, DT) == JumpPhase::Floating {
                floated += 1;
            }
        }
        assert_eq!(floated, 7);
        assert!(body.float_time_remaining() <= 0.0);
    }

    #[test]
    fn float_does_not_apply_while_rising() {
        let mut body = grounded_body(0.6);
        body.jump(true, DT);
        assert_eq!(body.jump(true, DT), JumpPhase::Jumping);
        assert_eq!(body.velocity().y, -500.0);
    }

    #[test]
    fn horizontal_control_approaches_target() {
        let mut body = grounded_body(0.0);
        let mut last = 0.0;
        for _ in 0..30 {
            body.move_horizontal(1.0, DT);
            let vx = body.velocity().x;
            assert!(vx > last);
            assert!(vx < 250.0);
            last = vx;
        }
    }

    #[test]
    fn first_grounded_tick_uses_full_control() {
        let mut grounded = grounded_body(0.0);
        grounded.move_horizontal(1.0, DT);
        let expected = 250.0 * (1.0 / 6.0) * 0.9;
        assert!((grounded.velocity().x - expected).abs() < 1e-3);

        let mut airborne = body_at(100.0, 100.0, 0.0);
        airborne.move_horizontal(1.0, DT);
        assert!((airborne.velocity().x - expected * 0.5).abs() < 1e-3);
    }

    #[test]
    fn speed_bleeds_off_without_input() {
        let mut body = grounded_body(0.0);
        body.set_velocity(Vec2::new(200.0, 0.0));
        for _ in 0..10 {
            body.move_horizontal(0.0, DT);
        }
        assert!(body.velocity().x.abs() < 20.0);
        assert!(body.velocity().x > 0.0);
    }

    #[test]
    fn zero_and_negative_dt_change_nothing() {
        let mut body = grounded_body(0.0);
        body.set_velocity(Vec2::new(100.0, 0.0));
        body.move_horizontal(1.0, 0.0);
        assert_eq!(body.velocity().x, 100.0);
        body.move_horizontal(-1.0, -0.5);
        assert_eq!(body.velocity().x, 100.0);
    }

    #[test]
    fn velocity_window_needs_two_stable_steps() {
        let mut body = body_at(0.0, 0.0, 0.0);
        body.set_velocity(Vec2::new(0.0, 0.2));
        body.observe_vertical_velocity();
        assert!(!body.is_grounded());
        body.observe_vertical_velocity();
        assert!(body.is_grounded());

        body.set_velocity(Vec2::new(0.0, 5.0));
        body.observe_vertical_velocity();
        assert!(!body.is_grounded());

        body.set_velocity(Vec2::new(0.0, 0.0));
        body.observe_vertical_velocity();
        assert!(!body.is_grounded());
    }

    #[test]
    fn jump_clears_the_velocity_window() {
        let mut body = body_at(0.0, 0.0, 0.0);
        body.observe_vertical_velocity();
        body.observe_vertical_velocity();
        assert!(body.is_grounded());
        body.jump(true, DT);
        assert!(!body.is_grounded());
        body.set_velocity(Vec2::ZERO);
        body.observe_vertical_velocity();
        assert!(!body.is_grounded());
    }
}
