use bevy::prelude::*;
use crate::shared::*;

/// Populate SceneLayouts with the three scenes of the game.
///
/// The farm owns every collaborator and the soil; the house only shows money
/// and the clock; the main menu owns nothing.
pub fn populate_scenes(layouts: &mut SceneLayouts) {
    layouts.layouts.insert(SceneId::MainMenu, SceneLayout::default());

    layouts.layouts.insert(
        SceneId::Farm,
        SceneLayout {
            owns_wallet: true,
            owns_inventory: true,
            owns_clock: true,
            soil_ground: Some(IRect::new(-12, -8, 12, 8)),
            blocked_cells: vec![
                IVec2::new(-3, 2),
                IVec2::new(-2, 2),
                IVec2::new(5, -4),
                IVec2::new(6, -4),
            ],
            spawn_points: vec![
                ("MainSpawn".into(), Vec2::new(0.0, 0.0)),
                ("HouseExit".into(), Vec2::new(-6.5, 5.0)),
            ],
            default_spawn: Vec2::new(0.0, 0.0),
            seed_pickups: vec![
                PlacedSeed {
                    seed_name: "Tomato Seed".into(),
                    position: Vec2::new(3.5, 1.5),
                },
                PlacedSeed {
                    seed_name: "Radish Seed".into(),
                    position: Vec2::new(-4.5, -2.5),
                },
                PlacedSeed {
                    seed_name: "Pumpkin Seed".into(),
                    position: Vec2::new(8.5, 4.5),
                },
            ],
            plants: vec![
                PlacedPlant {
                    name: "Talking Grape Plant".into(),
                    prefab: "Talking Grape Plant".into(),
                    position: Vec2::new(2.5, -3.5),
                },
                PlacedPlant {
                    name: "Talking Melon Plant".into(),
                    prefab: "Talking Melon Plant".into(),
                    position: Vec2::new(-7.5, -5.5),
                },
            ],
        },
    );

    layouts.layouts.insert(
        SceneId::House,
        SceneLayout {
            owns_wallet: true,
            owns_clock: true,
            spawn_points: vec![("HouseEntrySpawn".into(), Vec2::new(0.0, -2.0))],
            default_spawn: Vec2::new(0.0, -2.0),
            // No inventory indoors, so nothing to pick up either.
            ..default()
        },
    );
}
