//! Levels: layout data, the per-frame game loop and the loader.

mod data;
mod game;
mod manager;

use serde::{Deserialize, Serialize};

pub use data::{Background, BackgroundLayer, LevelData, RectData};
pub use game::GameLevel;
pub use manager::LevelManager;

/// Where a level is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelState {
    /// Playing, or waiting for a player to spawn.
    #[default]
    Active,
    /// Goal reached. Terminal until the level is restarted.
    Complete,
    /// Player died. Cleared by a respawn.
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Hazard,
    /// Fell below the level's death line.
    Fell,
}

/// Something noteworthy that happened during an update.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum LevelEvent {
    CoinCollected { points: u32, combo: u32 },
    /// Touched ground after being airborne.
    Landed,
    Died { cause: DeathCause },
    Completed { perfect: bool },
}
