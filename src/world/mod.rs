//! World domain plugin for Greenhollow.
//!
//! Responsible for:
//! - Loading scene layouts and unloading the previous scene
//! - Installing the collaborators each scene owns (wallet, inventory, clock)
//! - Spawning the soil tilemap once the rest of the scene is up
//! - Placing the player at the pending spawn point
//! - Sequencing scene transitions (see `transition`)
//! - The sleep menu, which ends the day through a transition

use bevy::prelude::*;

use crate::save::{SaveStore, SPAWN_POINT_KEY};
use crate::shared::*;

mod sleep;
pub mod transition;

pub use sleep::handle_sleep_menu;
pub use transition::transition_idle;

use transition::{
    accept_scene_change_requests, begin_boot, on_scene_loaded, restore_incoming_scene,
    save_outgoing_scene, tick_settle_delay, SceneTransition,
};

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneTransition>()
            .add_systems(OnEnter(GameState::Playing), begin_boot)
            // Scene loading runs before gameplay so restore sees a complete scene.
            .add_systems(
                PreUpdate,
                (load_scene, spawn_pending_tilemap)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                (
                    place_player_at_spawn,
                    (
                        accept_scene_change_requests,
                        handle_sleep_menu,
                        save_outgoing_scene,
                        on_scene_loaded,
                        tick_settle_delay,
                        restore_incoming_scene,
                    )
                        .chain(),
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// The soil tilemap of the scene just loaded, spawned after `frames` more
/// frames.
#[derive(Resource, Debug, Clone)]
pub struct PendingTilemapSpawn {
    pub ground: IRect,
    pub blocked: Vec<IVec2>,
    pub frames: u8,
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Unload the current scene and spawn the requested one from its layout.
pub fn load_scene(
    mut commands: Commands,
    mut requests: EventReader<LoadSceneEvent>,
    members: Query<Entity, With<SceneMember>>,
    layouts: Res<SceneLayouts>,
    registry: Res<PlantPrefabRegistry>,
    mut loaded: EventWriter<SceneLoadedEvent>,
) {
    let Some(scene) = requests.read().last().map(|ev| ev.scene) else {
        return;
    };
    let Some(layout) = layouts.layouts.get(&scene) else {
        error!("No layout for scene {}, load ignored", scene.name());
        return;
    };

    let mut unloaded = 0;
    for entity in &members {
        commands.entity(entity).despawn_recursive();
        unloaded += 1;
    }

    install_scene_resources(&mut commands, layout);
    commands.insert_resource(ActiveScene(scene));

    for (name, position) in &layout.spawn_points {
        commands.spawn((
            Name::new(name.clone()),
            SpawnPoint { name: name.clone() },
            Transform::from_translation(position.extend(0.0)),
            SceneMember,
        ));
    }

    for seed in &layout.seed_pickups {
        commands.spawn((
            Name::new(seed.seed_name.clone()),
            SeedPickup {
                seed_name: seed.seed_name.clone(),
            },
            Transform::from_translation(seed.position.extend(0.0)),
            SceneMember,
        ));
    }

    for placed in &layout.plants {
        match registry.get(&placed.prefab) {
            Some(prefab) => {
                commands.spawn(prefab.instance(&placed.name, placed.position.extend(0.0)));
            }
            None => warn!(
                "Scene {} places unknown plant template {}",
                scene.name(),
                placed.prefab
            ),
        }
    }

    match layout.soil_ground {
        Some(ground) => commands.insert_resource(PendingTilemapSpawn {
            ground,
            blocked: layout.blocked_cells.clone(),
            frames: 1,
        }),
        None => commands.remove_resource::<PendingTilemapSpawn>(),
    }

    info!(
        "Loaded {} ({} entities unloaded, {} pickups, {} plants)",
        scene.name(),
        unloaded,
        layout.seed_pickups.len(),
        layout.plants.len()
    );
    loaded.send(SceneLoadedEvent { scene });
}

/// Each scene brings fresh instances of the collaborators it owns and drops
/// the ones it doesn't.
fn install_scene_resources(commands: &mut Commands, layout: &SceneLayout) {
    if layout.owns_wallet {
        commands.insert_resource(Wallet::default());
    } else {
        commands.remove_resource::<Wallet>();
    }
    if layout.owns_inventory {
        commands.insert_resource(Inventory::with_starting_tools());
    } else {
        commands.remove_resource::<Inventory>();
    }
    if layout.owns_clock {
        commands.insert_resource(DayClock::default());
    } else {
        commands.remove_resource::<DayClock>();
    }
}

pub fn spawn_pending_tilemap(
    mut commands: Commands,
    pending: Option<ResMut<PendingTilemapSpawn>>,
    mut ready: EventWriter<SoilTilemapReadyEvent>,
) {
    let Some(mut pending) = pending else {
        return;
    };
    if pending.frames > 0 {
        pending.frames -= 1;
        return;
    }

    let mut tilemap = SoilTilemap::new(pending.ground);
    tilemap.blocked.extend(pending.blocked.iter().copied());
    commands.spawn((Name::new("Soil Tilemap"), tilemap, SceneMember));
    commands.remove_resource::<PendingTilemapSpawn>();
    ready.send(SoilTilemapReadyEvent);
    debug!("Soil tilemap spawned");
}

/// Move the player to the spawn point stored by the last transition, which
/// is consumed here.
pub fn place_player_at_spawn(
    mut commands: Commands,
    mut loaded: EventReader<SceneLoadedEvent>,
    store: Option<ResMut<SaveStore>>,
    layouts: Res<SceneLayouts>,
    config: Res<PersistenceConfig>,
    mut players: Query<&mut Transform, With<Player>>,
) {
    let Some(scene) = loaded.read().last().map(|ev| ev.scene) else {
        return;
    };
    // Scenes without spawn points (the main menu) leave the pending one for
    // the next scene that has them.
    let Some(layout) = layouts
        .layouts
        .get(&scene)
        .filter(|layout| !layout.spawn_points.is_empty())
    else {
        return;
    };

    let mut spawn_name = config.default_spawn_point.clone();
    if let Some(mut store) = store {
        match store.get(SPAWN_POINT_KEY) {
            Ok(Some(stored)) => spawn_name = stored,
            Ok(None) => {}
            Err(e) => warn!("Could not read pending spawn point: {}", e),
        }
        if let Err(e) = store.delete(SPAWN_POINT_KEY) {
            warn!("Could not clear pending spawn point: {}", e);
        }
    }

    let position = match layout.spawn_points.iter().find(|(n, _)| *n == spawn_name) {
        Some((_, position)) => *position,
        None => {
            debug!(
                "Spawn point {} not in {}, using scene default",
                spawn_name,
                scene.name()
            );
            layout.default_spawn
        }
    };

    let translation = position.extend(10.0);
    match players.get_single_mut() {
        Ok(mut transform) => transform.translation = translation,
        Err(_) => {
            commands.spawn((
                Name::new("Player"),
                Player,
                Transform::from_translation(translation),
            ));
        }
    }
    info!("Player placed at {} in {}", spawn_name, scene.name());
}
