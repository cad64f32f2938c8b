// Headless run: holds right through a level and reports the result.
//
// Usage: headless_run [character] [level.json]
// Set RUST_LOG=debug to see coin pickups, landings and deaths.

use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{Context, Result};
use log::info;
use turtworld::{
    CharacterKind, Drawable, GameConfig, InputState, LevelEvent, LevelManager, ManualClock,
    RenderSurface,
};

const DESERT_DASH: &str = r##"{
    "name": "Desert Dash",
    "theme": "desert",
    "background": {
        "color": "#F4A460",
        "layers": [{ "type": "sky", "color": "#87CEEB", "parallax": 0.2 }]
    },
    "platforms": [
        { "x": 0, "y": 580, "width": 2080, "height": 20, "type": "ground" },
        { "x": 500, "y": 460, "width": 160, "height": 20, "type": "sand" }
    ],
    "hazards": [
        { "x": 560, "y": 430, "width": 30, "height": 30, "type": "cactus" }
    ],
    "start": { "x": 100, "y": 500 },
    "goal": { "x": 1900, "y": 500, "width": 50, "height": 80 },
    "collectibles": [
        { "x": 300, "y": 550 },
        { "x": 620, "y": 440 },
        { "x": 1200, "y": 550 },
        { "x": 1500, "y": 550 }
    ]
}"##;

const DT: f32 = 1.0 / 60.0;
const MAX_TICKS: u32 = 60 * 60;
const MAX_RESPAWNS: u32 = 3;

/// Counts draw calls per kind instead of painting.
#[derive(Default)]
struct TallySurface {
    counts: BTreeMap<&'static str, usize>,
}

impl RenderSurface for TallySurface {
    fn translate(&mut self, _dx: f32, _dy: f32) {}

    fn reset_transform(&mut self) {}

    fn draw(&mut self, item: Drawable<'_>) {
        let kind = match item {
            Drawable::Background { .. } => "background",
            Drawable::BackgroundLayer { .. } => "layer",
            Drawable::Platform { .. } => "platform",
            Drawable::Hazard { .. } => "hazard",
            Drawable::Goal { .. } => "goal",
            Drawable::Collectible { .. } => "coin",
            Drawable::Player { .. } => "player",
        };
        *self.counts.entry(kind).or_default() += 1;
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let kind: CharacterKind = args
        .next()
        .as_deref()
        .unwrap_or("Turtle")
        .parse()
        .context("choose one of Turtle, Pig, Lemur, Axolotl")?;
    let json = match args.next() {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read level file {path}"))?,
        None => DESERT_DASH.to_string(),
    };

    let config = GameConfig::default();
    let clock = Rc::new(ManualClock::new());
    let mut manager: LevelManager = LevelManager::new(config, clock.clone());
    let level = manager.load_level_json(&json).context("failed to load level")?;

    let character = kind.data();
    level.spawn_player(&character);

    let input = InputState::new().with_right(true);
    let mut surface = TallySurface::default();
    let mut tick = 0;
    while tick < MAX_TICKS && !level.is_level_complete() {
        let dt = config.physics.clamp_delta(DT);
        clock.advance(f64::from(dt));

        for event in level.tick(dt, &input) {
            if let LevelEvent::CoinCollected { points, combo } = event {
                info!("tick {tick}: coin +{points} (combo {combo})");
            }
        }
        level.render(&mut surface, config.view.width, config.view.height);

        if level.is_level_failed() {
            if level.deaths() > MAX_RESPAWNS {
                break;
            }
            level.respawn(&character);
        }
        tick += 1;
    }

    info!(
        "{}: complete={} time={:.2}s score={} coins={}/{} max_combo={} deaths={}",
        kind,
        level.is_level_complete(),
        level.completion_time(),
        level.score(),
        level.coins_collected(),
        level.total_coins(),
        level.max_combo(),
        level.deaths()
    );
    info!("draw calls over {} frames: {:?}", tick, surface.counts);

    manager.unload_level();
    Ok(())
}
