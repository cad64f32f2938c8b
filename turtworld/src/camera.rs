//! Side-scrolling camera that hard-follows a target inside world bounds.

use glam::{Mat4, Vec3};

use crate::math::Vec2;
use crate::render::RenderSurface;

/// View offset into the world, in pixels.
///
/// `position` is the world coordinate shown at the top-left of the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    position: Vec2,
    view_size: Vec2,
    world_size: Vec2,
}

impl Camera {
    pub fn new(view_width: f32, view_height: f32, world_width: f32, world_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            view_size: Vec2::new(view_width, view_height),
            world_size: Vec2::new(world_width, world_height),
        }
    }

    /// Center the view on the target, clamped so it never shows outside the world.
    ///
    /// There is no smoothing: the result depends only on the target and the
    /// bounds. A world smaller than the view pins the camera at 0.
    pub fn follow(&mut self, target_x: f32, target_y: f32) {
        self.position.x = clamp_axis(
            target_x - self.view_size.x / 2.0,
            self.world_size.x - self.view_size.x,
        );
        self.position.y = clamp_axis(
            target_y - self.view_size.y / 2.0,
            self.world_size.y - self.view_size.y,
        );
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn view_size(&self) -> Vec2 {
        self.view_size
    }

    pub fn world_size(&self) -> Vec2 {
        self.world_size
    }

    /// Translate the surface into camera space. Pair with [`Camera::reset`]
    /// before drawing screen-space layers.
    pub fn apply(&self, surface: &mut dyn RenderSurface) {
        surface.translate(-self.position.x, -self.position.y);
    }

    pub fn reset(&self, surface: &mut dyn RenderSurface) {
        surface.reset_transform();
    }

    /// Update view and world dimensions, e.g. after a window resize.
    pub fn resize(&mut self, view_width: f32, view_height: f32, world_width: f32, world_height: f32) {
        self.view_size = Vec2::new(view_width, view_height);
        self.world_size = Vec2::new(world_width, world_height);
    }

    /// World-to-view translation for GPU renderers.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(-self.position.x, -self.position.y, 0.0))
    }

    pub fn world_to_screen(&self, world_pos: Vec2) -> Vec2 {
        world_pos - self.position
    }

    pub fn screen_to_world(&self, screen_pos: Vec2) -> Vec2 {
        screen_pos + self.position
    }
}

fn clamp_axis(value: f32, max: f32) -> f32 {
    value.min(max).max(0.0)
}
