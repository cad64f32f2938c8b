use std::rc::Rc;

use log::{debug, info, warn};

use super::{DeathCause, LevelData, LevelEvent, LevelState};
use crate::camera::Camera;
use crate::character::CharacterData;
use crate::clock::Clock;
use crate::config::GameConfig;
use crate::entities::{Collectible, Goal, Hazard, LevelPlatform, Player};
use crate::error::Result;
use crate::input::InputSource;
use crate::math::Aabb;
use crate::physics::{ManualPhysicsWorld, PhysicsBackend, Platform};
use crate::render::{Drawable, RenderSurface};
use crate::scoring::{coin_points, is_perfect, PERFECT_BONUS};

/// One playable level: its entities, its physics world and the running score.
///
/// The driver calls [`GameLevel::update`] then [`GameLevel::step_physics`]
/// once per frame (or [`GameLevel::tick`], which does both), then
/// [`GameLevel::render`]. Before a player is spawned every update is a no-op.
pub struct GameLevel<W: PhysicsBackend = ManualPhysicsWorld> {
    data: LevelData,
    config: GameConfig,
    world: W,
    clock: Rc<dyn Clock>,

    platforms: Vec<LevelPlatform>,
    hazards: Vec<Hazard>,
    goal: Goal,
    collectibles: Vec<Collectible>,
    player: Option<Player>,
    camera: Camera,

    state: LevelState,
    start_time: Option<f64>,
    completed_at: Option<f64>,
    deaths: u32,
    score: u32,
    coins_collected: usize,
    current_combo: u32,
    max_combo: u32,
    was_grounded: bool,
}

impl<W: PhysicsBackend> GameLevel<W> {
    /// Build a level and a fresh physics world for it.
    pub fn new(data: LevelData, config: GameConfig, clock: Rc<dyn Clock>) -> Result<Self> {
        data.validate()?;

        let mut world = W::new(&config.physics);
        let platforms = data
            .platforms
            .iter()
            .map(|p| {
                let bounds = p.bounds();
                let id = world.add_platform(Platform::new(
                    bounds.center.x,
                    bounds.center.y,
                    bounds.size.x,
                    bounds.size.y,
                ));
                LevelPlatform {
                    id,
                    bounds,
                    kind: p.kind.clone(),
                }
            })
            .collect();
        let hazards = data
            .hazards
            .iter()
            .map(|h| Hazard::new(h.bounds(), h.kind.clone()))
            .collect();
        let goal = Goal::new(data.goal.bounds());
        let collectibles = data.collectibles.iter().copied().map(Collectible::new).collect();

        let world_size = data.world_size(config.view.height);
        let camera = Camera::new(config.view.width, config.view.height, world_size.x, world_size.y);

        info!(
            "loaded level '{}' ({}): {} platforms, {} hazards, {} coins",
            data.name,
            data.theme,
            data.platforms.len(),
            data.hazards.len(),
            data.collectibles.len()
        );

        Ok(Self {
            data,
            config,
            world,
            clock,
            platforms,
            hazards,
            goal,
            collectibles,
            player: None,
            camera,
            state: LevelState::Active,
            start_time: None,
            completed_at: None,
            deaths: 0,
            score: 0,
            coins_collected: 0,
            current_combo: 0,
            max_combo: 0,
            was_grounded: false,
        })
    }

    /// Place a new player at the start point, replacing any existing one.
    pub fn spawn_player(&mut self, character: &CharacterData) {
        self.destroy();

        let start = self.data.start;
        let player = Player::spawn(
            &mut self.world,
            character,
            start,
            self.config.physics.velocity_scale,
        );
        self.player = Some(player);
        self.start_time = Some(self.clock.now());
        self.was_grounded = false;
        self.camera.follow(start.x, start.y);

        info!("spawned {} at ({}, {})", character.name, start.x, start.y);
    }

    /// Bring a dead player back at the start point.
    ///
    /// Deaths, score and combo carry over. Ignored once the level is complete.
    pub fn respawn(&mut self, character: &CharacterData) {
        if self.state == LevelState::Complete {
            warn!("respawn ignored: level '{}' is already complete", self.data.name);
            return;
        }
        self.state = LevelState::Active;
        self.spawn_player(character);
        info!("respawned (deaths: {})", self.deaths);
    }

    /// Reset score, combo, deaths and coins, then spawn.
    pub fn restart(&mut self, character: &CharacterData) {
        self.state = LevelState::Active;
        self.completed_at = None;
        self.deaths = 0;
        self.score = 0;
        self.coins_collected = 0;
        self.current_combo = 0;
        self.max_combo = 0;
        for coin in &mut self.collectibles {
            coin.reset();
        }
        self.spawn_player(character);
    }

    /// Remove the player's body from the world. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if let Some(player) = self.player.take() {
            player.destroy(&mut self.world);
        }
    }

    /// Run gameplay for one frame: input, camera, coins, hazards, goal, fall line.
    ///
    /// Does nothing without a player or once the level has finished.
    pub fn update(&mut self, dt: f32, input: &dyn InputSource) -> Vec<LevelEvent> {
        let mut events = Vec::new();
        if self.state != LevelState::Active {
            return events;
        }
        let Some(player) = self.player.as_mut() else {
            return events;
        };
        // Contact state from the last physics step; a jump started below clears it.
        let grounded = player.is_grounded(&self.world);
        if player.update(&mut self.world, input, dt).is_none() {
            return events;
        }
        let Some(bounds) = player.bounds(&self.world) else {
            return events;
        };

        self.camera.follow(bounds.center.x, bounds.center.y);

        if grounded && !self.was_grounded {
            if self.current_combo > 0 {
                debug!("landed, combo of {} ended", self.current_combo);
            }
            self.current_combo = 0;
            events.push(LevelEvent::Landed);
        }
        self.was_grounded = grounded;

        self.collect_coins(&bounds, grounded, &mut events);

        if self.hazards.iter().any(|h| h.check_collision(&bounds)) {
            self.kill_player(DeathCause::Hazard, &mut events);
            return events;
        }

        if self.goal.check_collision(&bounds) {
            self.complete(&mut events);
            return events;
        }

        if bounds.center.y > self.config.fall_death_y {
            self.kill_player(DeathCause::Fell, &mut events);
        }

        events
    }

    /// Advance the physics world by `dt`.
    pub fn step_physics(&mut self, dt: f32) {
        self.world.step(dt);
    }

    /// One full frame: gameplay update followed by the physics step.
    pub fn tick(&mut self, dt: f32, input: &dyn InputSource) -> Vec<LevelEvent> {
        let events = self.update(dt, input);
        self.step_physics(dt);
        events
    }

    fn collect_coins(&mut self, bounds: &Aabb, grounded: bool, events: &mut Vec<LevelEvent>) {
        for coin in &mut self.collectibles {
            if !coin.check_collision(bounds) || !coin.collect() {
                continue;
            }
            self.coins_collected += 1;
            if !grounded {
                self.current_combo += 1;
                self.max_combo = self.max_combo.max(self.current_combo);
            }
            let points = coin_points(self.current_combo);
            self.score += points;
            debug!(
                "coin collected: +{} (combo {}, score {})",
                points, self.current_combo, self.score
            );
            events.push(LevelEvent::CoinCollected {
                points,
                combo: self.current_combo,
            });
        }
    }

    fn kill_player(&mut self, cause: DeathCause, events: &mut Vec<LevelEvent>) {
        self.deaths += 1;
        self.state = LevelState::Failed;
        debug!("player died ({:?}), deaths: {}", cause, self.deaths);
        events.push(LevelEvent::Died { cause });
    }

    fn complete(&mut self, events: &mut Vec<LevelEvent>) {
        self.state = LevelState::Complete;
        self.completed_at = Some(self.clock.now());

        let perfect = is_perfect(self.coins_collected, self.collectibles.len());
        if perfect {
            self.score += PERFECT_BONUS;
        }
        info!(
            "level '{}' complete in {:.2}s: score {}, deaths {}{}",
            self.data.name,
            self.completion_time(),
            self.score,
            self.deaths,
            if perfect { ", perfect" } else { "" }
        );
        events.push(LevelEvent::Completed { perfect });
    }

    /// Emit draw calls for the current frame.
    ///
    /// Background layers are drawn in screen space, then the world layers
    /// (platforms, hazards, goal, coins, player) under the camera transform.
    pub fn render(&self, surface: &mut dyn RenderSurface, width: f32, height: f32) {
        let background = &self.data.background;
        surface.draw(Drawable::Background {
            theme: &self.data.theme,
            color: &background.color,
            width,
            height,
        });
        for layer in &background.layers {
            surface.draw(Drawable::BackgroundLayer {
                kind: &layer.kind,
                color: &layer.color,
                parallax: layer.parallax.unwrap_or(0.0),
            });
        }

        self.camera.apply(surface);
        for platform in &self.platforms {
            surface.draw(Drawable::Platform {
                bounds: platform.bounds,
                kind: &platform.kind,
            });
        }
        for hazard in &self.hazards {
            surface.draw(Drawable::Hazard {
                bounds: hazard.bounds,
                kind: &hazard.kind,
            });
        }
        surface.draw(Drawable::Goal {
            bounds: self.goal.bounds,
        });
        for coin in self.collectibles.iter().filter(|c| !c.is_collected()) {
            surface.draw(Drawable::Collectible {
                bounds: coin.bounds(),
            });
        }
        if let Some(player) = &self.player {
            if let Some(bounds) = player.bounds(&self.world) {
                surface.draw(Drawable::Player {
                    bounds,
                    character: player.name(),
                    frame: player.animation_frame(),
                    facing_right: player.facing_right(),
                });
            }
        }
        self.camera.reset(surface);
    }

    pub fn is_level_complete(&self) -> bool {
        self.state == LevelState::Complete
    }

    pub fn is_level_failed(&self) -> bool {
        self.state == LevelState::Failed
    }

    pub fn state(&self) -> LevelState {
        self.state
    }

    /// Seconds since the player last spawned, frozen once the goal is reached.
    pub fn completion_time(&self) -> f64 {
        let Some(start) = self.start_time else {
            return 0.0;
        };
        let end = self.completed_at.unwrap_or_else(|| self.clock.now());
        (end - start).max(0.0)
    }

    pub fn deaths(&self) -> u32 {
        self.deaths
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn coins_collected(&self) -> usize {
        self.coins_collected
    }

    pub fn total_coins(&self) -> usize {
        self.collectibles.len()
    }

    pub fn current_combo(&self) -> u32 {
        self.current_combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn level_data(&self) -> &LevelData {
        &self.data
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn platforms(&self) -> &[LevelPlatform] {
        &self.platforms
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterKind;
    use crate::clock::ManualClock;
    use crate::input::InputState;
    use crate::level::RectData;
    use crate::math::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn flat_level() -> LevelData {
        LevelData::new(
            "test",
            Vec2::new(100.0, 556.0),
            RectData::new(1200.0, 500.0, 50.0, 50.0, ""),
        )
        .with_platform(RectData::new(0.0, 580.0, 1300.0, 20.0, "ground"))
    }

    fn level(data: LevelData) -> (GameLevel, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new());
        let level = GameLevel::new(data, GameConfig::default(), clock.clone()).unwrap();
        (level, clock)
    }

    #[test]
    fn update_without_player_is_a_no_op() {
        let (mut level, _) = level(flat_level());
        let events = level.tick(DT, &InputState::new().with_right(true));
        assert!(events.is_empty());
        assert_eq!(level.state(), LevelState::Active);
        assert_eq!(level.completion_time(), 0.0);
        level.destroy();
        level.destroy();
    }

    #[test]
    fn platforms_are_registered_center_based() {
        let (level, _) = level(flat_level());
        let platform = level.world().platforms()[0].bounds();
        assert_eq!(platform.center, Vec2::new(650.0, 590.0));
        assert_eq!(level.platforms()[0].bounds, platform);
    }

    #[test]
    fn spawning_twice_keeps_one_body() {
        let (mut level, _) = level(flat_level());
        let pig = CharacterKind::Pig.data();
        level.spawn_player(&pig);
        level.spawn_player(&pig);
        assert_eq!(level.world().body_count(), 1);
        level.destroy();
        assert_eq!(level.world().body_count(), 0);
        assert!(level.player().is_none());
    }

    #[test]
    fn falling_past_the_death_line_fails_once() {
        let mut data = flat_level();
        data.platforms.clear();
        let (mut level, _) = level(data);
        level.spawn_player(&CharacterKind::Turtle.data());

        let idle = InputState::new();
        let mut died = 0;
        for _ in 0..2000 {
            let events = level.tick(DT, &idle);
            died += events
                .iter()
                .filter(|e| matches!(e, LevelEvent::Died { cause: DeathCause::Fell }))
                .count();
        }
        assert!(level.is_level_failed());
        assert_eq!(level.deaths(), 1);
        assert_eq!(died, 1);
    }

    #[test]
    fn completion_time_freezes_at_the_goal() {
        let data = LevelData::new(
            "test",
            Vec2::new(100.0, 556.0),
            RectData::new(80.0, 500.0, 50.0, 50.0, ""),
        )
        .with_platform(RectData::new(0.0, 580.0, 1300.0, 20.0, "ground"));
        let (mut level, clock) = level(data);
        clock.set(10.0);
        level.spawn_player(&CharacterKind::Pig.data());
        clock.advance(2.5);

        let events = level.tick(DT, &InputState::new());
        assert_eq!(events, vec![LevelEvent::Completed { perfect: false }]);
        clock.advance(100.0);
        assert_eq!(level.completion_time(), 2.5);
        assert_eq!(level.score(), 0);

        level.respawn(&CharacterKind::Pig.data());
        assert!(level.is_level_complete());
    }

    #[test]
    fn restart_clears_progress() {
        let data = flat_level().with_hazard(RectData::new(90.0, 540.0, 20.0, 40.0, "cactus"));
        let (mut level, _) = level(data);
        let turtle = CharacterKind::Turtle.data();
        level.spawn_player(&turtle);
        level.tick(DT, &InputState::new());
        assert_eq!(level.deaths(), 1);

        level.restart(&turtle);
        assert_eq!(level.deaths(), 0);
        assert_eq!(level.state(), LevelState::Active);
    }

    #[derive(Default)]
    struct Recorder {
        offset: (f32, f32),
        items: Vec<String>,
    }

    impl RenderSurface for Recorder {
        fn translate(&mut self, dx: f32, dy: f32) {
            self.offset = (dx, dy);
        }

        fn reset_transform(&mut self) {
            self.offset = (0.0, 0.0);
        }

        fn draw(&mut self, item: Drawable<'_>) {
            let name = match item {
                Drawable::Background { .. } => "background",
                Drawable::BackgroundLayer { .. } => "layer",
                Drawable::Platform { .. } => "platform",
                Drawable::Hazard { .. } => "hazard",
                Drawable::Goal { .. } => "goal",
                Drawable::Collectible { .. } => "coin",
                Drawable::Player { .. } => "player",
            };
            self.items.push(name.to_string());
        }
    }

    #[test]
    fn render_draws_back_to_front_and_restores_transform() {
        let data = flat_level().with_collectible(Vec2::new(600.0, 400.0));
        let (mut level, _) = level(data);
        level.spawn_player(&CharacterKind::Lemur.data());

        let mut surface = Recorder::default();
        level.render(&mut surface, 1400.0, 600.0);
        assert_eq!(
            surface.items,
            vec!["background", "platform", "goal", "coin", "player"]
        );
        assert_eq!(surface.offset, (0.0, 0.0));
    }
}
