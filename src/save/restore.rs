//! Snapshot → live world.
//!
//! The freshly loaded scene holds default values; restore reconciles it
//! against the persisted snapshot one collaborator at a time.

use bevy::prelude::*;
use std::collections::{BTreeSet, HashMap};

use super::error::SaveError;
use super::plants::{canonical_plant_type, live_talking_templates, resolve_prefab};
use super::position_id::PositionId;
use super::snapshot::{PlantRecord, Snapshot};
use super::store::{SaveStore, SNAPSHOT_KEY};
use super::{ConsumedObjects, WorldSnapshot};
use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoilRestore {
    #[default]
    NotAttempted,
    /// Nothing to restore and the farm was never captured.
    Skipped,
    Applied,
    /// The tilemap does not exist yet; `PendingSoilRestore` will apply it.
    Deferred,
}

/// What a restore pass did, for logs and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreReport {
    /// False when nothing was ever saved and the pass did nothing.
    pub loaded: bool,
    pub skipped: Vec<&'static str>,
    pub soil: SoilRestore,
    pub plants_updated: usize,
    pub plants_spawned: usize,
    pub plants_destroyed: usize,
    pub pickups_removed: usize,
}

/// Tilled cells waiting for the soil tilemap to be spawned.
#[derive(Resource, Debug, Clone)]
pub struct PendingSoilRestore {
    pub cells: Vec<IVec3>,
    pub timer: Timer,
}

/// Replace the in-memory snapshot with the stored one.
///
/// `Ok(false)` means nothing was ever saved. A stored value that fails to
/// decode is an error and leaves the in-memory snapshot untouched.
pub fn load_persisted_snapshot(world: &mut World) -> Result<bool, SaveError> {
    let Some(store) = world.get_resource::<SaveStore>() else {
        return Err(SaveError::MissingCollaborator("SaveStore"));
    };
    let Some(json) = store.get(SNAPSHOT_KEY)? else {
        return Ok(false);
    };
    let snapshot = Snapshot::decode(&json)?;
    world.insert_resource(WorldSnapshot(snapshot));
    Ok(true)
}

pub fn restore_world_state(world: &mut World) -> RestoreReport {
    let mut report = RestoreReport::default();
    match load_persisted_snapshot(world) {
        Ok(true) => {}
        Ok(false) => {
            info!("No saved game state found, keeping scene defaults");
            return report;
        }
        Err(e) => {
            error!("Could not load saved game state, continuing with defaults: {}", e);
        }
    }
    report.loaded = true;

    let snapshot = world
        .get_resource::<WorldSnapshot>()
        .map(|s| s.0.clone())
        .unwrap_or_default();
    let in_farm = in_farm_scene(world);

    restore_money(world, &snapshot, &mut report);
    if in_farm {
        restore_inventory(world, &snapshot, &mut report);
    }
    restore_time(world, &snapshot, &mut report);
    if in_farm {
        report.soil = restore_tilled_soil(world, &snapshot);
        restore_plants(world, &snapshot, &mut report);
        report.pickups_removed = restore_seed_pickups(world, &snapshot);
    }
    restore_harvested_talking_plants(world, &snapshot);

    info!(
        "Restored game state: {} plants updated, {} spawned, {} destroyed, {} pickups removed",
        report.plants_updated,
        report.plants_spawned,
        report.plants_destroyed,
        report.pickups_removed
    );
    report
}

fn restore_money(world: &mut World, snapshot: &Snapshot, report: &mut RestoreReport) {
    match world.get_resource_mut::<Wallet>() {
        Some(mut wallet) => wallet.set_balance(snapshot.money),
        None => {
            warn!("No wallet in this scene, money not restored");
            report.skipped.push("money");
        }
    }
}

fn restore_time(world: &mut World, snapshot: &Snapshot, report: &mut RestoreReport) {
    match world.get_resource_mut::<DayClock>() {
        Some(mut clock) => {
            clock.set_elapsed_seconds(snapshot.time_of_day);
            clock.set_day(snapshot.day.max(1) as u32);
        }
        None => {
            warn!("No day clock in this scene, time not restored");
            report.skipped.push("time");
        }
    }
}

fn restore_inventory(world: &mut World, snapshot: &Snapshot, report: &mut RestoreReport) {
    let Some(mut inventory) = world.get_resource_mut::<Inventory>() else {
        warn!("Farm scene has no inventory, inventory not restored");
        report.skipped.push("inventory");
        return;
    };

    inventory.clear();
    inventory.restore_tools();
    for item in &snapshot.inventory_items {
        if is_tool_name(&item.item_name) {
            continue;
        }
        for _ in 0..item.count.max(0) {
            inventory.add_item(&item.item_name);
        }
    }
    for harvest in &snapshot.harvested_items {
        inventory.set_harvest_count(&harvest.item_name, harvest.count);
    }
    if !snapshot.selected_seed.is_empty() {
        inventory.select_seed(&snapshot.selected_seed);
    }
    if !snapshot.selected_tool.is_empty() {
        inventory.select_tool(&snapshot.selected_tool);
    }
}

fn restore_tilled_soil(world: &mut World, snapshot: &Snapshot) -> SoilRestore {
    if snapshot.tilled_soil_positions.is_empty() && !snapshot.farm_state_captured {
        debug!("No tilled soil was ever saved, leaving soil as loaded");
        return SoilRestore::Skipped;
    }
    let cells: Vec<IVec3> = snapshot
        .tilled_soil_positions
        .iter()
        .map(|c| IVec3::from(*c))
        .collect();

    let mut query = world.query::<&mut SoilTilemap>();
    if let Some(mut tilemap) = query.iter_mut(world).next() {
        apply_tilled_cells(&mut tilemap, &cells);
        return SoilRestore::Applied;
    }

    let timeout = world
        .get_resource::<PersistenceConfig>()
        .map(|c| c.tilemap_ready_timeout_secs)
        .unwrap_or(0.5);
    debug!(
        "Soil tilemap not ready, deferring {} tilled cells for up to {}s",
        cells.len(),
        timeout
    );
    world.insert_resource(PendingSoilRestore {
        cells,
        timer: Timer::from_seconds(timeout, TimerMode::Once),
    });
    SoilRestore::Deferred
}

pub fn apply_tilled_cells(tilemap: &mut SoilTilemap, cells: &[IVec3]) {
    tilemap.clear_all();
    for cell in cells {
        tilemap.set_tilled(*cell);
    }
}

/// Applies a deferred soil restore once the tilemap exists, or gives up when
/// the timer runs out.
pub fn apply_pending_soil_restore(
    mut commands: Commands,
    time: Res<Time>,
    pending: Option<ResMut<PendingSoilRestore>>,
    mut tilemaps: Query<&mut SoilTilemap>,
    mut ready_events: EventReader<SoilTilemapReadyEvent>,
) {
    let Some(mut pending) = pending else {
        ready_events.clear();
        return;
    };
    let signalled = ready_events.read().count() > 0;

    if let Some(mut tilemap) = tilemaps.iter_mut().next() {
        apply_tilled_cells(&mut tilemap, &pending.cells);
        info!(
            "Applied {} deferred tilled soil cells{}",
            pending.cells.len(),
            if signalled { " on tilemap ready" } else { "" }
        );
        commands.remove_resource::<PendingSoilRestore>();
        return;
    }

    pending.timer.tick(time.delta());
    if pending.timer.finished() {
        error!(
            "Soil tilemap never appeared, dropping {} tilled soil cells",
            pending.cells.len()
        );
        commands.remove_resource::<PendingSoilRestore>();
    }
}

struct LivePlant {
    entity: Entity,
    id: PositionId,
    plant_type: String,
    talking: bool,
}

fn live_plants(world: &mut World) -> Vec<LivePlant> {
    let mut query = world.query_filtered::<(Entity, &Name, &Transform), With<GrowingPlant>>();
    query
        .iter(world)
        .map(|(entity, name, transform)| LivePlant {
            entity,
            id: PositionId::from_translation(transform.translation),
            plant_type: canonical_plant_type(name.as_str()),
            talking: is_talking_plant(name.as_str()),
        })
        .collect()
}

fn same_plant_type(a: &str, b: &str) -> bool {
    canonical_plant_type(a) == canonical_plant_type(b)
}

fn restore_plants(world: &mut World, snapshot: &Snapshot, report: &mut RestoreReport) {
    let mut harvested: BTreeSet<PositionId> = world
        .get_resource::<ConsumedObjects>()
        .map(|c| c.harvested_talking_plants.clone())
        .unwrap_or_default();
    harvested.extend(
        snapshot
            .harvested_talking_plant_position_ids
            .iter()
            .map(PositionId::from_raw),
    );

    let mut talking = Vec::new();
    for plant in live_plants(world) {
        if plant.talking && harvested.contains(&plant.id) {
            debug!("Destroying harvested talking plant {} at {}", plant.plant_type, plant.id);
            world.despawn(plant.entity);
            report.plants_destroyed += 1;
        } else if plant.talking {
            talking.push(plant);
        }
    }

    if snapshot.plants.is_empty() && !snapshot.farm_state_captured {
        debug!("No plants were ever saved, keeping the scene's plants");
        return;
    }

    for plant in live_plants(world) {
        if !plant.talking {
            world.despawn(plant.entity);
            report.plants_destroyed += 1;
        }
    }

    // Position id → record, last record for an id wins, first-seen order kept.
    let mut order: Vec<PositionId> = Vec::new();
    let mut pending: HashMap<PositionId, &PlantRecord> = HashMap::new();
    for record in snapshot.plants.iter().filter(|r| !r.is_harvested) {
        let id = record.position_id();
        if pending.insert(id.clone(), record).is_none() {
            order.push(id);
        }
    }

    let mut unmatched = Vec::new();
    for plant in talking {
        let Some(record) = pending.get(&plant.id).copied() else {
            continue;
        };
        if !same_plant_type(&record.plant_type, &plant.plant_type) {
            unmatched.push(plant);
            continue;
        }
        if let Some(mut growing) = world.get_mut::<GrowingPlant>(plant.entity) {
            growing.current_stage = growing.clamp_stage(record.growth_stage);
            growing.is_watered = record.is_watered;
            growing.refresh_visuals();
        }
        if let Some(mut harvestable) = world.get_mut::<HarvestablePlant>(plant.entity) {
            harvestable.is_fully_grown = record.is_fully_grown;
        }
        pending.remove(&plant.id);
        report.plants_updated += 1;
    }

    for plant in unmatched {
        if pending.contains_key(&plant.id) {
            debug!("Replacing talking plant {} at {}", plant.plant_type, plant.id);
            world.despawn(plant.entity);
            report.plants_destroyed += 1;
        }
    }

    let Some(registry) = world.get_resource::<PlantPrefabRegistry>().cloned() else {
        error!("No plant registry loaded, {} plants not restored", pending.len());
        report.skipped.push("plants");
        return;
    };
    let live_templates = live_talking_templates(world);

    for id in order {
        let Some(record) = pending.remove(&id) else {
            continue;
        };
        match spawn_plant(world, &registry, &live_templates, record) {
            Ok(()) => report.plants_spawned += 1,
            Err(e) => warn!("Skipping plant at {}: {}", id, e),
        }
    }
}

fn spawn_plant(
    world: &mut World,
    registry: &PlantPrefabRegistry,
    live_templates: &[(String, PlantPrefab)],
    record: &PlantRecord,
) -> Result<(), SaveError> {
    let found = resolve_prefab(registry, &record.plant_type, live_templates)
        .ok_or_else(|| SaveError::UnresolvedPrefab(record.plant_type.clone()))?;
    debug!(
        "Restoring {} from template {} ({:?})",
        record.plant_type, found.prefab.name, found.tier
    );

    let mut growing = found.prefab.growing();
    growing.current_stage = growing.clamp_stage(record.growth_stage);
    growing.is_watered = record.is_watered;
    growing.refresh_visuals();
    let mut harvestable = found.prefab.harvestable();
    harvestable.is_fully_grown = record.is_fully_grown;

    world.spawn((
        Name::new(record.plant_type.clone()),
        growing,
        harvestable,
        Transform::from_translation(record.position.into()),
        SceneMember,
    ));
    Ok(())
}

/// Fold picked-up records into the all-time set, then remove every live
/// pickup in it. Running this twice removes nothing the second time.
fn restore_seed_pickups(world: &mut World, snapshot: &Snapshot) -> usize {
    let picked_up = {
        let mut consumed = world.get_resource_or_insert_with(ConsumedObjects::default);
        consumed.picked_up_seeds.extend(
            snapshot
                .seed_pickups
                .iter()
                .filter(|r| r.is_picked_up)
                .map(|r| r.position_id()),
        );
        consumed.picked_up_seeds.clone()
    };

    let mut query = world.query_filtered::<(Entity, &Transform), With<SeedPickup>>();
    let doomed: Vec<Entity> = query
        .iter(world)
        .filter(|(_, transform)| {
            picked_up.contains(&PositionId::from_translation(transform.translation))
        })
        .map(|(entity, _)| entity)
        .collect();
    for entity in &doomed {
        world.despawn(*entity);
    }
    doomed.len()
}

fn restore_harvested_talking_plants(world: &mut World, snapshot: &Snapshot) {
    let ids: BTreeSet<PositionId> = snapshot
        .harvested_talking_plant_position_ids
        .iter()
        .map(PositionId::from_raw)
        .collect();
    world
        .get_resource_or_insert_with(ConsumedObjects::default)
        .harvested_talking_plants = ids;
}
