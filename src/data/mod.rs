//! Data layer: populates the content registries at game startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), fills the
//! PlantPrefabRegistry, SceneLayouts and ShopCatalog from the hard-coded game-design data
//! defined in submodules, then transitions the game into GameState::Playing.
//!
//! `config` reads the optional persistence override file; the binary calls
//! it before building the app so the save store sees the final config.

pub mod config;
mod plants;
mod scenes;
mod shop;

use bevy::prelude::*;
use crate::shared::*;

pub use plants::populate_plants;
pub use scenes::populate_scenes;
pub use shop::populate_shop;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Single system that populates every registry and then starts play.
fn load_all_data(
    mut plant_registry: ResMut<PlantPrefabRegistry>,
    mut scene_layouts: ResMut<SceneLayouts>,
    mut shop_catalog: ResMut<ShopCatalog>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("DataPlugin: populating registries…");

    plants::populate_plants(&mut plant_registry);
    info!(
        "  Plant templates loaded: {}, seeds: {}",
        plant_registry.prefabs.len(),
        plant_registry.seed_to_plant.len()
    );

    scenes::populate_scenes(&mut scene_layouts);
    info!("  Scene layouts loaded: {}", scene_layouts.layouts.len());

    shop::populate_shop(&mut shop_catalog);
    info!("  Shop items loaded: {}", shop_catalog.items.len());

    info!("DataPlugin: all registries populated. Transitioning to Playing.");
    next_state.set(GameState::Playing);
}
