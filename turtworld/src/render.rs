//! Drawing seam between the simulation and whatever paints pixels.
//!
//! The core decides *what* is visible and in which order; a
//! [`RenderSurface`] implementation decides how it looks.

use crate::animation::AnimationFrame;
use crate::math::Aabb;

/// Something the level asks the surface to draw.
#[derive(Clone, Debug, PartialEq)]
pub enum Drawable<'a> {
    /// Screen-space fill behind everything else.
    Background {
        theme: &'a str,
        color: &'a str,
        width: f32,
        height: f32,
    },
    /// Screen-space decoration drawn over the background, e.g. a sky band.
    BackgroundLayer {
        kind: &'a str,
        color: &'a str,
        parallax: f32,
    },
    Platform { bounds: Aabb, kind: &'a str },
    Hazard { bounds: Aabb, kind: &'a str },
    Goal { bounds: Aabb },
    Collectible { bounds: Aabb },
    Player {
        bounds: Aabb,
        /// Character display name.
        character: &'a str,
        frame: AnimationFrame,
        facing_right: bool,
    },
}

/// Target for a level's draw pass.
pub trait RenderSurface {
    /// Shift the origin for subsequent draws.
    fn translate(&mut self, dx: f32, dy: f32);

    /// Return to the untransformed screen origin.
    fn reset_transform(&mut self);

    fn draw(&mut self, item: Drawable<'_>);
}

/// Surface that drops everything, for headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn translate(&mut self, _dx: f32, _dy: f32) {}

    fn reset_transform(&mut self) {}

    fn draw(&mut self, _item: Drawable<'_>) {}
}
