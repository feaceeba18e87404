//! Soil tilling and planting seeds into tilled cells.

use bevy::prelude::*;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tilling
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_till_soil(
    mut events: EventReader<TillSoilEvent>,
    mut tilemaps: Query<&mut SoilTilemap>,
    active_scene: Option<Res<ActiveScene>>,
    config: Res<PersistenceConfig>,
) {
    let in_farm = active_scene.is_some_and(|s| s.0 == config.farm_scene);
    for ev in events.read() {
        if !in_farm {
            debug!("Tilling only works on the farm");
            continue;
        }
        let Ok(mut tilemap) = tilemaps.get_single_mut() else {
            warn!("No soil tilemap to till");
            continue;
        };
        if !tilemap.can_till(ev.cell) {
            debug!("Cell {:?} is not tillable ground", ev.cell);
            continue;
        }
        if !tilemap.is_tilled(ev.cell) {
            tilemap.set_tilled(ev.cell);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Planting
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_plant_seed(
    mut commands: Commands,
    mut events: EventReader<PlantSeedEvent>,
    tilemaps: Query<&SoilTilemap>,
    plants: Query<&Transform, With<GrowingPlant>>,
    registry: Res<PlantPrefabRegistry>,
    mut inventory: Option<ResMut<Inventory>>,
) {
    for ev in events.read() {
        let Ok(tilemap) = tilemaps.get_single() else {
            continue;
        };
        if !tilemap.is_tilled(ev.cell) {
            debug!("Cell {:?} is not tilled", ev.cell);
            continue;
        }
        let Some(inventory) = inventory.as_deref_mut() else {
            continue;
        };
        if inventory.count(&ev.seed_name) <= 0 {
            continue;
        }

        let center = tilemap.cell_to_world(ev.cell);
        let occupied = plants
            .iter()
            .any(|t| t.translation.truncate().distance(center) < 0.2 * tilemap.cell_size);
        if occupied {
            debug!("A plant already grows at {:?}", ev.cell);
            continue;
        }
        let Some(prefab) = registry.prefab_for_seed(&ev.seed_name) else {
            warn!("No plant grows from {}", ev.seed_name);
            continue;
        };

        commands.spawn(prefab.instance(&prefab.name, center.extend(0.0)));
        let last_seed = inventory.count(&ev.seed_name) <= 1;
        inventory.remove_one_item(&ev.seed_name);
        if last_seed {
            inventory.deselect_seed();
        }
        info!("Planted {} at {:?}", prefab.name, ev.cell);
    }
}
