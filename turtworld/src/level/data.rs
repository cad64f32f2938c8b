//! Level layout as stored by the level editor.

use serde::{Deserialize, Serialize};

use crate::entities::COLLECTIBLE_SIZE;
use crate::error::{CoreError, Result};
use crate::math::{Aabb, Vec2};

/// Rectangle given by its top-left corner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectData {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Visual tag such as `"ground"` or `"cactus"`.
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl RectData {
    pub fn new(x: f32, y: f32, width: f32, height: f32, kind: impl Into<String>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            kind: kind.into(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_top_left(self.x, self.y, self.width, self.height)
    }

    fn validate(&self, field: &str) -> Result<()> {
        for (name, value) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !value.is_finite() {
                return Err(CoreError::level(format!("{field}.{name}"), "must be finite"));
            }
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(CoreError::level(field, "must have a positive size"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackgroundLayer {
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
    #[serde(default)]
    pub parallax: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub color: String,
    #[serde(default)]
    pub layers: Vec<BackgroundLayer>,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            color: "#87CEEB".to_string(),
            layers: Vec::new(),
        }
    }
}

/// Everything needed to build a [`GameLevel`](super::GameLevel).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    #[serde(default)]
    pub name: String,
    pub theme: String,
    #[serde(default)]
    pub background: Background,
    pub platforms: Vec<RectData>,
    #[serde(default)]
    pub hazards: Vec<RectData>,
    /// Player spawn point (body center).
    pub start: Vec2,
    pub goal: RectData,
    /// Coin centers.
    #[serde(default)]
    pub collectibles: Vec<Vec2>,
    #[serde(default)]
    pub world_width: Option<f32>,
    #[serde(default)]
    pub world_height: Option<f32>,
}

impl LevelData {
    /// Empty level with only a start point and a goal.
    pub fn new(theme: impl Into<String>, start: Vec2, goal: RectData) -> Self {
        Self {
            name: String::new(),
            theme: theme.into(),
            background: Background::default(),
            platforms: Vec::new(),
            hazards: Vec::new(),
            start,
            goal,
            collectibles: Vec::new(),
            world_width: None,
            world_height: None,
        }
    }

    #[must_use]
    pub fn with_platform(mut self, platform: RectData) -> Self {
        self.platforms.push(platform);
        self
    }

    #[must_use]
    pub fn with_hazard(mut self, hazard: RectData) -> Self {
        self.hazards.push(hazard);
        self
    }

    #[must_use]
    pub fn with_collectible(mut self, center: Vec2) -> Self {
        self.collectibles.push(center);
        self
    }

    #[must_use]
    pub fn with_world_size(mut self, width: f32, height: f32) -> Self {
        self.world_width = Some(width);
        self.world_height = Some(height);
        self
    }

    /// Parse and validate a level file.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: Self = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        for (i, p) in self.platforms.iter().enumerate() {
            p.validate(&format!("platforms[{i}]"))?;
        }
        for (i, h) in self.hazards.iter().enumerate() {
            h.validate(&format!("hazards[{i}]"))?;
        }
        self.goal.validate("goal")?;
        if !self.start.is_finite() {
            return Err(CoreError::level("start", "must be finite"));
        }
        for (i, c) in self.collectibles.iter().enumerate() {
            if !c.is_finite() {
                return Err(CoreError::level(format!("collectibles[{i}]"), "must be finite"));
            }
        }
        for (field, value) in [("world_width", self.world_width), ("world_height", self.world_height)] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(CoreError::level(field, "must be positive and finite"));
                }
            }
        }
        Ok(())
    }

    /// World dimensions, derived from the layout when not given.
    ///
    /// The derived width reaches the rightmost object; the derived height
    /// reaches the lowest object but is never less than the view.
    pub fn world_size(&self, view_height: f32) -> Vec2 {
        let mut right = 0.0_f32;
        let mut bottom = 0.0_f32;
        let rects = self
            .platforms
            .iter()
            .chain(&self.hazards)
            .chain(std::iter::once(&self.goal))
            .map(RectData::bounds);
        let coins = self
            .collectibles
            .iter()
            .map(|&c| Aabb::from_center(c, COLLECTIBLE_SIZE, COLLECTIBLE_SIZE));
        for b in rects.chain(coins) {
            right = right.max(b.right());
            bottom = bottom.max(b.bottom());
        }

        Vec2::new(
            self.world_width.unwrap_or(right),
            self.world_height.unwrap_or(bottom.max(view_height)),
        )
    }
}
