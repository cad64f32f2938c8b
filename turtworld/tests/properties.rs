use std::rc::Rc;

use proptest::prelude::*;

use turtworld::{
    BodyDesc, Camera, CharacterKind, GameConfig, GameLevel, InputState, LevelData,
    ManualClock, ManualPhysicsWorld, PhysicsBackend, Platform, RectData, Vec2,
};

fn body_desc(x: f32, y: f32) -> BodyDesc {
    BodyDesc::new(
        Vec2::new(x, y),
        32.0,
        48.0,
        CharacterKind::Pig.data().physics(50.0),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn free_fall_velocity_matches_total_time(
        gravity in 10.0f32..600.0,
        steps in prop::collection::vec(0.001f32..0.05, 1..60),
    ) {
        let mut world = ManualPhysicsWorld::with_gravity(gravity);
        let body = world.create_body(body_desc(0.0, 0.0));

        let mut last_y = 0.0;
        for &dt in &steps {
            world.step(dt);
            let y = world.body(body).unwrap().position().y;
            prop_assert!(y > last_y);
            last_y = y;
        }

        let total: f32 = steps.iter().sum();
        let vy = world.body(body).unwrap().velocity().y;
        let expected = gravity * total;
        prop_assert!((vy - expected).abs() <= expected * 1e-4 + 1e-3, "vy {} expected {}", vy, expected);
    }

    #[test]
    fn landing_snaps_to_the_platform_top(
        gravity in 30.0f32..600.0,
        drop in 1.0f32..400.0,
        x in 50.0f32..1250.0,
    ) {
        let mut world = ManualPhysicsWorld::with_gravity(gravity);
        world.add_platform(Platform::from_top_left(0.0, 580.0, 1300.0, 20.0));
        let body = world.create_body(body_desc(x, 556.0 - drop));

        for _ in 0..2000 {
            world.step(1.0 / 60.0);
            if world.body(body).unwrap().is_grounded() {
                break;
            }
        }

        let b = world.body(body).unwrap();
        prop_assert!(b.is_grounded());
        prop_assert_eq!(b.velocity().y, 0.0);
        prop_assert!((b.bounds().bottom() - 580.0).abs() < 1e-3);
    }

    #[test]
    fn camera_stays_inside_the_world(
        target_x in -5000.0f32..10000.0,
        target_y in -5000.0f32..10000.0,
        world_w in 100.0f32..6000.0,
        world_h in 100.0f32..3000.0,
    ) {
        let mut camera = Camera::new(1400.0, 600.0, world_w, world_h);
        camera.follow(target_x, target_y);

        prop_assert!(camera.x() >= 0.0);
        prop_assert!(camera.y() >= 0.0);
        prop_assert!(camera.x() <= (world_w - 1400.0).max(0.0));
        prop_assert!(camera.y() <= (world_h - 600.0).max(0.0));
    }

    #[test]
    fn max_combo_never_drops_below_current(
        coins in prop::collection::vec((0.0f32..800.0, 100.0f32..570.0), 0..25),
        inputs in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 300),
    ) {
        let mut data = LevelData::new(
            "meadow",
            Vec2::new(200.0, 300.0),
            RectData::new(1250.0, 500.0, 40.0, 50.0, ""),
        )
        .with_platform(RectData::new(0.0, 580.0, 1300.0, 20.0, "ground"))
        .with_platform(RectData::new(300.0, 450.0, 120.0, 20.0, "ledge"));
        for (x, y) in coins {
            data = data.with_collectible(Vec2::new(x, y));
        }

        let mut level: GameLevel = GameLevel::new(data, GameConfig::default(), Rc::new(ManualClock::new())).unwrap();
        level.spawn_player(&CharacterKind::Lemur.data());

        let mut last_max = 0;
        for (left, right, jump) in inputs {
            let input = InputState::new().with_left(left).with_right(right).with_jump(jump);
            level.tick(1.0 / 60.0, &input);
            prop_assert!(level.max_combo() >= last_max);
            prop_assert!(level.current_combo() <= level.max_combo());
            prop_assert!(level.coins_collected() <= level.total_coins());
            last_max = level.max_combo();
        }
    }
}
