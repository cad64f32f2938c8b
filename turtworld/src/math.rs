use serde::{Deserialize, Serialize};

/// 2D vector type used throughout the simulation.
///
/// World space is y-down: positive `y` points towards the bottom of the screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns true if both components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned bounding box stored as center + full size.
///
/// Every collision test in the game (platform resolution, hazards, goal,
/// collectibles) goes through this type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            center,
            size: Vec2::new(width, height),
        }
    }

    /// Build a box from its top-left corner, the layout used by level files.
    pub fn from_top_left(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            center: Vec2::new(x + width / 2.0, y + height / 2.0),
            size: Vec2::new(width, height),
        }
    }

    pub fn half_width(&self) -> f32 {
        self.size.x / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.size.y / 2.0
    }

    pub fn left(&self) -> f32 {
        self.center.x - self.half_width()
    }

    pub fn right(&self) -> f32 {
        self.center.x + self.half_width()
    }

    pub fn top(&self) -> f32 {
        self.center.y - self.half_height()
    }

    pub fn bottom(&self) -> f32 {
        self.center.y + self.half_height()
    }

    /// Strict overlap test; touching edges do not count.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}
