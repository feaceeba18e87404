use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use greenhollow::shared::*;
use greenhollow::{calendar, data, economy, farming, save, world};

const SCREEN_WIDTH: f32 = 960.0;
const SCREEN_HEIGHT: f32 = 540.0;
const PIXELS_PER_TILE: f32 = 32.0;

fn main() {
    let config = data::config::load_config();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Greenhollow".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .insert_resource(config)
        .init_resource::<PlantPrefabRegistry>()
        .init_resource::<SceneLayouts>()
        .init_resource::<ShopCatalog>()
        .init_resource::<ActiveScene>()
        // Events
        .add_event::<SceneChangeRequest>()
        .add_event::<LoadSceneEvent>()
        .add_event::<SceneLoadedEvent>()
        .add_event::<SoilTilemapReadyEvent>()
        .add_event::<SceneTransitionFinished>()
        .add_event::<SaveRequestEvent>()
        .add_event::<SeedPickedUpEvent>()
        .add_event::<SeedCollectedEvent>()
        .add_event::<HarvestPlantEvent>()
        .add_event::<PlantHarvestedEvent>()
        .add_event::<WaterPlantEvent>()
        .add_event::<TillSoilEvent>()
        .add_event::<PlantSeedEvent>()
        .add_event::<BuyRequestEvent>()
        .add_event::<SellRequestEvent>()
        .add_event::<SleepMenuEvent>()
        // Domain plugins
        .add_plugins(calendar::CalendarPlugin)
        .add_plugins(farming::FarmingPlugin)
        .add_plugins(economy::EconomyPlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(save::SavePlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_scale(Vec3::splat(1.0 / PIXELS_PER_TILE)),
    ));
}
