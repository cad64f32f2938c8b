// Rapier is a private implementation detail: do NOT re-export it.
use log::warn;
use rapier2d::prelude::*;

use super::{
    effective_dt, BodyArena, BodyDesc, BodyHandle, PhysicsBackend, PhysicsBody, Platform,
    PlatformId,
};
use crate::config::PhysicsConfig;
use crate::math::Vec2;

struct RapierBody {
    controller: PhysicsBody,
    rigid_body: RigidBodyHandle,
}

/// Backend that lets rapier2d integrate bodies and solve contacts.
///
/// Character bodies are rotation-locked dynamic cuboids with zero friction
/// and restitution, so horizontal motion comes only from the controller.
/// Platforms are fixed cuboids. Before each step the controller's position
/// and velocity are written into rapier; afterwards they are read back and
/// ground contact is derived from the vertical velocity window (see
/// [`PhysicsBody::observe_vertical_velocity`]).
pub struct RapierPhysicsWorld {
    // --- rapier internals ---
    pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    rigid_bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,

    // --- mappings (game <-> rapier) ---
    bodies: BodyArena<RapierBody>,
    platforms: Vec<Platform>,

    gravity: f32,
}

impl RapierPhysicsWorld {
    pub fn with_gravity(gravity: f32) -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),

            bodies: BodyArena::new(),
            platforms: Vec::new(),

            gravity,
        }
    }

    /// Live body handles in step order.
    pub fn body_handles(&self) -> &[BodyHandle] {
        self.bodies.handles()
    }

    fn push_controllers(&mut self) {
        for &handle in self.bodies.handles() {
            let Some(body) = self.bodies.get(handle) else {
                continue;
            };
            if let Some(rb) = self.rigid_bodies.get_mut(body.rigid_body) {
                let p = body.controller.position();
                let v = body.controller.velocity();
                rb.set_translation(vector![p.x, p.y], true);
                rb.set_linvel(vector![v.x, v.y], true);
            }
        }
    }

    fn pull_controllers(&mut self) {
        let handles = self.bodies.handles().to_vec();
        for handle in handles {
            let Some(body) = self.bodies.get_mut(handle) else {
                continue;
            };
            if let Some(rb) = self.rigid_bodies.get(body.rigid_body) {
                let t = rb.translation();
                let v = rb.linvel();
                body.controller
                    .set_kinematics(Vec2::new(t.x, t.y), Vec2::new(v.x, v.y));
                body.controller.observe_vertical_velocity();
            }
        }
    }
}

impl Default for RapierPhysicsWorld {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default())
    }
}

impl PhysicsBackend for RapierPhysicsWorld {
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
        let bounds = platform.bounds();
        let body = RigidBodyBuilder::new(RigidBodyType::Fixed)
            .translation(vector![bounds.center.x, bounds.center.y])
            .build();
        let handle = self.rigid_bodies.insert(body);

        let collider = ColliderBuilder::cuboid(bounds.half_width(), bounds.half_height())
            .friction(0.0)
            .restitution(0.0)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.rigid_bodies);

        let id = PlatformId(self.platforms.len() as u32);
        self.platforms.push(platform);
        id
    }

    fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle {
        // CCD keeps fast falls from tunnelling through thin platforms.
        let body = RigidBodyBuilder::new(RigidBodyType::Dynamic)
            .translation(vector![desc.position.x, desc.position.y])
            .lock_rotations()
            .ccd_enabled(true)
            .build();
        let rigid_body = self.rigid_bodies.insert(body);

        let collider = ColliderBuilder::cuboid(desc.width / 2.0, desc.height / 2.0)
            .friction(0.0)
            .restitution(0.0)
            .build();
        self.colliders
            .insert_with_parent(collider, rigid_body, &mut self.rigid_bodies);

        self.bodies.insert(RapierBody {
            controller: PhysicsBody::new(&desc),
            rigid_body,
        })
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let Some(body) = self.bodies.remove(handle) else {
            warn!("remove_body: handle {:?} is not live", handle);
            return false;
        };
        self.rigid_bodies.remove(
            body.rigid_body,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        true
    }

    fn body(&self, handle: BodyHandle) -> Option<&PhysicsBody> {
        self.bodies.get(handle).map(|b| &b.controller)
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut PhysicsBody> {
        self.bodies.get_mut(handle).map(|b| &mut b.controller)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn step(&mut self, dt: f32) {
        let Some(dt) = effective_dt(dt) else {
            return;
        };
        self.integration_parameters.dt = dt;

        self.push_controllers();

        let gravity = vector![0.0, self.gravity];
        let hooks = &();
        let events = &();

        self.pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            hooks,
            events,
        );

        self.pull_controllers();
    }
}
