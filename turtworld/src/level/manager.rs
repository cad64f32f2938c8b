use std::rc::Rc;

use log::info;

use super::{GameLevel, LevelData};
use crate::clock::{Clock, MonotonicClock};
use crate::config::GameConfig;
use crate::error::Result;
use crate::physics::{ManualPhysicsWorld, PhysicsBackend};

/// Owns the level being played and swaps it out on load.
pub struct LevelManager<W: PhysicsBackend = ManualPhysicsWorld> {
    config: GameConfig,
    clock: Rc<dyn Clock>,
    current: Option<GameLevel<W>>,
}

impl<W: PhysicsBackend> LevelManager<W> {
    pub fn new(config: GameConfig, clock: Rc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            current: None,
        }
    }

    /// Build `data` into the current level, tearing down the previous one.
    ///
    /// If `data` is invalid the previous level stays loaded.
    pub fn load_level(&mut self, data: LevelData) -> Result<&mut GameLevel<W>> {
        let level = GameLevel::new(data, self.config, Rc::clone(&self.clock))?;
        self.unload_level();
        Ok(self.current.insert(level))
    }

    pub fn load_level_json(&mut self, json: &str) -> Result<&mut GameLevel<W>> {
        self.load_level(LevelData::from_json(json)?)
    }

    pub fn current_level(&self) -> Option<&GameLevel<W>> {
        self.current.as_ref()
    }

    pub fn current_level_mut(&mut self) -> Option<&mut GameLevel<W>> {
        self.current.as_mut()
    }

    /// Destroy the current level, if any.
    pub fn unload_level(&mut self) {
        if let Some(mut level) = self.current.take() {
            level.destroy();
            info!("unloaded level '{}'", level.level_data().name);
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

impl<W: PhysicsBackend> Default for LevelManager<W> {
    fn default() -> Self {
        Self::new(GameConfig::default(), Rc::new(MonotonicClock::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterKind;
    use crate::level::RectData;
    use crate::math::Vec2;
    use crate::physics::RapierPhysicsWorld;

    fn data(name: &str) -> LevelData {
        let mut data = LevelData::new(
            "meadow",
            Vec2::new(100.0, 500.0),
            RectData::new(1200.0, 500.0, 50.0, 50.0, ""),
        )
        .with_platform(RectData::new(0.0, 580.0, 1300.0, 20.0, "ground"));
        data.name = name.to_string();
        data
    }

    #[test]
    fn loading_replaces_the_current_level() {
        let mut manager: LevelManager = LevelManager::default();
        assert!(manager.current_level().is_none());

        let level = manager.load_level(data("one")).unwrap();
        level.spawn_player(&CharacterKind::Pig.data());
        manager.load_level(data("two")).unwrap();

        let current = manager.current_level().unwrap();
        assert_eq!(current.level_data().name, "two");
        assert!(current.player().is_none());

        manager.unload_level();
        manager.unload_level();
        assert!(manager.current_level().is_none());
    }

    #[test]
    fn invalid_level_keeps_the_previous_one() {
        let mut manager: LevelManager = LevelManager::default();
        manager.load_level(data("keep")).unwrap();
        let bad = data("bad").with_hazard(RectData::new(0.0, 0.0, -5.0, 5.0, "spikes"));
        assert!(manager.load_level(bad).is_err());
        assert!(manager.load_level_json("[]").is_err());
        assert_eq!(manager.current_level().unwrap().level_data().name, "keep");
    }

    #[test]
    fn works_with_the_rapier_backend() {
        let mut manager: LevelManager<RapierPhysicsWorld> = LevelManager::default();
        let level = manager.load_level(data("rapier")).unwrap();
        level.spawn_player(&CharacterKind::Axolotl.data());
        assert_eq!(level.world().body_count(), 1);
        assert_eq!(level.world().platforms().len(), 1);
    }
}
