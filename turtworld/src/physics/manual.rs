use log::warn;

use super::{
    effective_dt, BodyArena, BodyDesc, BodyHandle, PhysicsBackend, PhysicsBody, Platform,
    PlatformId,
};
use crate::config::PhysicsConfig;

/// Hand-integrated world: explicit Euler steps and box-vs-box resolution.
///
/// Each step visits bodies in registration order. A body gets gravity,
/// moves by its velocity, then is tested against every platform in
/// registration order. Ground contact is cleared before the platform pass
/// and set again only by a landing, so it is never stale by more than one
/// step. Bodies never collide with each other.
pub struct ManualPhysicsWorld {
    gravity: f32,
    bodies: BodyArena<PhysicsBody>,
    platforms: Vec<Platform>,
}

impl ManualPhysicsWorld {
    pub fn with_gravity(gravity: f32) -> Self {
        Self {
            gravity,
            bodies: BodyArena::new(),
            platforms: Vec::new(),
        }
    }

    /// Live body handles in step order.
    pub fn body_handles(&self) -> &[BodyHandle] {
        self.bodies.handles()
    }
}

impl Default for ManualPhysicsWorld {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default())
    }
}

impl PhysicsBackend for ManualPhysicsWorld {
    fn new(config: &PhysicsConfig) -> Self {
        Self::with_gravity(config.gravity)
    }

    fn gravity(&self) -> f32 {
        self.gravity
    }

    fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity;
    }

    fn add_platform(&mut self, platform: Platform) -> PlatformId {
        let id = PlatformId(self.platforms.len() as u32);
        self.platforms.push(platform);
        id
    }

    fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle {
        self.bodies.insert(PhysicsBody::new(&desc))
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let removed = self.bodies.remove(handle).is_some();
        if !removed {
            warn!("remove_body: handle {:?} is not live", handle);
        }
        removed
    }

    fn body(&self, handle: BodyHandle) -> Option<&PhysicsBody> {
        self.bodies.get(handle)
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut PhysicsBody> {
        self.bodies.get_mut(handle)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn step(&mut self, dt: f32) {
        let Some(dt) = effective_dt(dt) else {
            return;
        };

        let gravity = self.gravity;
        let handles = self.bodies.handles().to_vec();
        for handle in handles {
            let Some(body) = self.bodies.get_mut(handle) else {
                continue;
            };
            body.apply_gravity(gravity, dt);
            body.integrate(dt);

            body.begin_contact_pass();
            for platform in &self.platforms {
                body.check_platform_collision(platform);
            }
        }
    }
}
