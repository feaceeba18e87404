//! Live world → snapshot.
//!
//! Every step reads one collaborator and writes one part of the snapshot.
//! A missing collaborator skips its step and leaves that part of the snapshot
//! as it was.

use bevy::prelude::*;
use std::collections::HashSet;

use super::error::SaveError;
use super::plants::canonical_plant_type;
use super::position_id::PositionId;
use super::restore::PendingSoilRestore;
use super::snapshot::{
    CellCoord, ItemCount, PlantRecord, RecordCounts, SeedPickupRecord, Snapshot,
};
use super::store::{SaveStore, SNAPSHOT_KEY};
use super::{ConsumedObjects, WorldSnapshot};
use crate::shared::*;

/// What a capture pass did, for logs and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureReport {
    pub skipped: Vec<&'static str>,
    pub farm_captured: bool,
    pub counts: RecordCounts,
}

pub fn capture_world_state(world: &mut World) -> CaptureReport {
    let mut snapshot = world
        .get_resource::<WorldSnapshot>()
        .map(|s| s.0.clone())
        .unwrap_or_default();
    let mut report = CaptureReport::default();
    let in_farm = in_farm_scene(world);

    capture_money(world, &mut snapshot, &mut report);
    if in_farm {
        capture_inventory(world, &mut snapshot, &mut report);
    }
    capture_time(world, &mut snapshot, &mut report);
    if in_farm {
        capture_plants(world, &mut snapshot);
    }
    capture_seed_pickups(world, &mut snapshot);
    capture_harvested_talking_plants(world, &mut snapshot);
    if in_farm && capture_tilled_soil(world, &mut snapshot, &mut report) {
        snapshot.farm_state_captured = true;
        report.farm_captured = true;
    }

    report.counts = snapshot.record_counts();
    debug!("Captured world state: {}", report.counts);
    world.insert_resource(WorldSnapshot(snapshot));
    report
}

fn capture_money(world: &World, snapshot: &mut Snapshot, report: &mut CaptureReport) {
    match world.get_resource::<Wallet>() {
        Some(wallet) => snapshot.money = wallet.balance(),
        None => {
            debug!("No wallet in this scene, money not captured");
            report.skipped.push("money");
        }
    }
}

fn capture_inventory(world: &World, snapshot: &mut Snapshot, report: &mut CaptureReport) {
    let Some(inventory) = world.get_resource::<Inventory>() else {
        warn!("Farm scene has no inventory, inventory not captured");
        report.skipped.push("inventory");
        return;
    };

    snapshot.has_watering_can = true;
    snapshot.has_hoe_tool = true;
    snapshot.inventory_items = inventory
        .item_counts()
        .map(|(name, count)| ItemCount::new(name, count))
        .collect();
    snapshot.harvested_items = inventory
        .harvest_counts()
        .map(|(name, count)| ItemCount::new(name, count))
        .collect();
    snapshot.selected_seed = inventory.selected_seed().to_string();
    snapshot.selected_tool = inventory.selected_tool().to_string();
}

fn capture_time(world: &World, snapshot: &mut Snapshot, report: &mut CaptureReport) {
    match world.get_resource::<DayClock>() {
        Some(clock) => {
            snapshot.time_of_day = clock.elapsed_seconds();
            snapshot.day = clock.day() as i32;
        }
        None => {
            debug!("No day clock in this scene, time not captured");
            report.skipped.push("time");
        }
    }
}

fn capture_plants(world: &mut World, snapshot: &mut Snapshot) {
    let mut query =
        world.query::<(&Name, &Transform, &GrowingPlant, Option<&HarvestablePlant>)>();
    snapshot.plants = query
        .iter(world)
        .map(|(name, transform, growing, harvestable)| PlantRecord {
            plant_type: canonical_plant_type(name.as_str()),
            position: transform.translation.into(),
            growth_stage: growing.current_stage as i32,
            is_watered: growing.is_watered,
            is_fully_grown: harvestable.is_some_and(|h| h.is_fully_grown),
            is_harvested: harvestable.is_some_and(|h| h.is_harvested),
        })
        .collect();
}

/// Live unconsumed pickups first, then every pickup consumed in any scene,
/// one record per position id.
fn capture_seed_pickups(world: &mut World, snapshot: &mut Snapshot) {
    let picked_up = world
        .get_resource::<ConsumedObjects>()
        .map(|c| c.picked_up_seeds.clone())
        .unwrap_or_default();

    let mut seen: HashSet<PositionId> = HashSet::new();
    let mut records = Vec::new();

    let mut query = world.query::<(&SeedPickup, &Transform)>();
    for (pickup, transform) in query.iter(world) {
        let id = PositionId::from_translation(transform.translation);
        if picked_up.contains(&id) || !seen.insert(id) {
            continue;
        }
        records.push(SeedPickupRecord {
            seed_name: pickup.seed_name.clone(),
            position: transform.translation.into(),
            is_picked_up: false,
        });
    }

    for prior in snapshot.seed_pickups.drain(..) {
        let id = prior.position_id();
        if !(prior.is_picked_up || picked_up.contains(&id)) || !seen.insert(id) {
            continue;
        }
        records.push(SeedPickupRecord {
            is_picked_up: true,
            ..prior
        });
    }

    snapshot.seed_pickups = records;
}

fn capture_harvested_talking_plants(world: &World, snapshot: &mut Snapshot) {
    snapshot.harvested_talking_plant_position_ids = world
        .get_resource::<ConsumedObjects>()
        .map(|c| {
            c.harvested_talking_plants
                .iter()
                .map(|id| id.as_str().to_string())
                .collect()
        })
        .unwrap_or_default();
}

/// Returns false when the scene has no tilemap to read. Cells still waiting
/// in `PendingSoilRestore` are the farm's soil until they are applied.
fn capture_tilled_soil(
    world: &mut World,
    snapshot: &mut Snapshot,
    report: &mut CaptureReport,
) -> bool {
    if let Some(pending) = world.get_resource::<PendingSoilRestore>() {
        debug!(
            "Capturing {} tilled cells still waiting for the tilemap",
            pending.cells.len()
        );
        snapshot.tilled_soil_positions =
            pending.cells.iter().map(|cell| CellCoord::from(*cell)).collect();
        return true;
    }

    let mut query = world.query::<&SoilTilemap>();
    let Some(tilemap) = query.iter(world).next() else {
        error!("No soil tilemap in the farm scene, tilled soil not captured");
        report.skipped.push("tilled_soil");
        return false;
    };

    let mut cells = Vec::new();
    if let Some((min, max)) = tilemap.cell_bounds() {
        for x in min.x..max.x {
            for y in min.y..max.y {
                for z in min.z..max.z {
                    let cell = IVec3::new(x, y, z);
                    if tilemap.is_tilled(cell) {
                        cells.push(CellCoord::from(cell));
                    }
                }
            }
        }
    }
    if cells.is_empty() {
        warn!("Captured zero tilled soil cells");
    }
    snapshot.tilled_soil_positions = cells;
    true
}

/// Encode the in-memory snapshot, write it, then read it back and check that
/// every list survived.
pub fn persist_snapshot(world: &mut World) -> Result<RecordCounts, SaveError> {
    let snapshot = world
        .get_resource::<WorldSnapshot>()
        .map(|s| s.0.clone())
        .unwrap_or_default();
    let expected = snapshot.record_counts();
    let json = snapshot.encode()?;

    let Some(mut store) = world.get_resource_mut::<SaveStore>() else {
        return Err(SaveError::MissingCollaborator("SaveStore"));
    };
    store.set(SNAPSHOT_KEY, &json)?;
    store.flush()?;

    let Some(written) = store.get(SNAPSHOT_KEY)? else {
        return Err(SaveError::Validation {
            expected: expected.to_string(),
            found: String::from("nothing"),
        });
    };
    let found = Snapshot::decode(&written)?.record_counts();
    if found != expected {
        return Err(SaveError::Validation {
            expected: expected.to_string(),
            found: found.to_string(),
        });
    }
    Ok(found)
}

/// Capture then persist. Failures are logged; the caller keeps going.
pub fn save_world_state(world: &mut World) -> Result<RecordCounts, SaveError> {
    let report = capture_world_state(world);
    if !report.skipped.is_empty() {
        debug!("Capture skipped: {:?}", report.skipped);
    }
    match persist_snapshot(world) {
        Ok(counts) => {
            info!("Saved game state ({})", counts);
            Ok(counts)
        }
        Err(e) => {
            error!("Saving game state failed: {}", e);
            Err(e)
        }
    }
}
