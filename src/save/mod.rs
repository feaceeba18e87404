//! Persistence core: snapshot model, key-value store, capture and restore.
//!
//! One `Snapshot` lives in the `WorldSnapshot` resource for the whole session.
//! Scene transitions capture into it and persist it before unloading, then
//! restore from it once the next scene has settled (see `world::transition`).
//! Seed pickups and talking-plant harvests are recorded as they happen and
//! saved straight away.

mod capture;
mod error;
mod plants;
mod position_id;
mod restore;
mod snapshot;
mod store;

pub use capture::{capture_world_state, persist_snapshot, save_world_state, CaptureReport};
pub use error::SaveError;
pub use plants::{canonical_plant_type, resolve_prefab, PrefabMatch, PrefabTier};
pub use position_id::PositionId;
pub use restore::{
    apply_pending_soil_restore, apply_tilled_cells, load_persisted_snapshot, restore_world_state,
    PendingSoilRestore, RestoreReport, SoilRestore,
};
pub use snapshot::{
    CellCoord, ItemCount, PlantRecord, RecordCounts, SeedPickupRecord, Snapshot, WorldPosition,
};
#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageStore;
pub use store::{KeyValueStore, MemoryStore, SaveStore, SNAPSHOT_KEY, SPAWN_POINT_KEY};

use bevy::prelude::*;
use std::collections::BTreeSet;

use crate::shared::*;
use crate::world::transition::{save_outgoing_scene, transition_idle, SceneTransition};

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// The session's snapshot. Replaced wholesale on load, updated field by field
/// on capture.
#[derive(Resource, Debug, Clone, Default)]
pub struct WorldSnapshot(pub Snapshot);

/// A save was requested and has not been written yet. Requests made while a
/// scene transition runs stay queued until it is idle, so a half-loaded
/// scene never overwrites the stored state.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueuedSave(pub bool);

/// Objects consumed for good, across every scene visited.
#[derive(Resource, Debug, Clone, Default)]
pub struct ConsumedObjects {
    pub picked_up_seeds: BTreeSet<PositionId>,
    pub harvested_talking_plants: BTreeSet<PositionId>,
}

impl WorldSnapshot {
    /// Note a seed pickup present in the scene. Known positions only get
    /// their seed name refreshed.
    pub fn register_seed_pickup(&mut self, seed_name: &str, translation: Vec3) {
        let id = PositionId::from_translation(translation);
        match self.0.seed_pickups.iter_mut().find(|r| r.position_id() == id) {
            Some(record) => {
                if record.seed_name != seed_name {
                    record.seed_name = seed_name.to_string();
                }
            }
            None => self.0.seed_pickups.push(SeedPickupRecord {
                seed_name: seed_name.to_string(),
                position: translation.into(),
                is_picked_up: false,
            }),
        }
    }

    /// Mark the pickup at `translation` consumed, adding a record if the
    /// position was never registered.
    pub fn record_seed_pickup(
        &mut self,
        consumed: &mut ConsumedObjects,
        seed_name: &str,
        translation: Vec3,
    ) {
        let id = PositionId::from_translation(translation);
        consumed.picked_up_seeds.insert(id.clone());
        match self.0.seed_pickups.iter_mut().find(|r| r.position_id() == id) {
            Some(record) => record.is_picked_up = true,
            None => self.0.seed_pickups.push(SeedPickupRecord {
                seed_name: seed_name.to_string(),
                position: translation.into(),
                is_picked_up: true,
            }),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<SaveStore>() {
            let dir_name = app
                .world()
                .get_resource::<PersistenceConfig>()
                .map(|c| c.saves_dir_name.clone())
                .unwrap_or_else(|| PersistenceConfig::default().saves_dir_name);
            app.insert_resource(SaveStore::platform_default(&dir_name));
        }

        app.init_resource::<WorldSnapshot>()
            .init_resource::<ConsumedObjects>()
            .init_resource::<QueuedSave>()
            .add_systems(
                Update,
                (
                    register_spawned_seed_pickups,
                    record_collected_seeds,
                    record_harvested_talking_plants,
                    // Soil must be in the tilemap before an outgoing scene is captured.
                    apply_pending_soil_restore.before(save_outgoing_scene),
                )
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                PostUpdate,
                (
                    queue_save_requests,
                    save_on_request
                        .run_if(resource_equals(QueuedSave(true)))
                        .run_if(transition_idle),
                )
                    .chain(),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Pickups already consumed in an earlier visit are removed as soon as they
/// spawn; the rest are registered in the snapshot.
pub fn register_spawned_seed_pickups(
    mut commands: Commands,
    spawned: Query<(Entity, &SeedPickup, &Transform), Added<SeedPickup>>,
    consumed: Res<ConsumedObjects>,
    mut snapshot: ResMut<WorldSnapshot>,
    active_scene: Option<Res<ActiveScene>>,
) {
    for (entity, pickup, transform) in &spawned {
        let id = PositionId::from_translation(transform.translation);
        if consumed.picked_up_seeds.contains(&id) {
            if let Some(scene) = active_scene.as_deref() {
                debug!(
                    "Removing consumed seed {} ({})",
                    pickup.seed_name,
                    PositionId::scoped(scene.0, transform.translation)
                );
            }
            commands.entity(entity).despawn_recursive();
            continue;
        }
        snapshot.register_seed_pickup(&pickup.seed_name, transform.translation);
    }
}

pub fn record_collected_seeds(
    mut events: EventReader<SeedCollectedEvent>,
    mut snapshot: ResMut<WorldSnapshot>,
    mut consumed: ResMut<ConsumedObjects>,
    mut save_requests: EventWriter<SaveRequestEvent>,
) {
    for ev in events.read() {
        snapshot.record_seed_pickup(&mut consumed, &ev.seed_name, ev.translation);
        info!(
            "Recorded seed pickup {} at {} ({} consumed in total)",
            ev.seed_name,
            PositionId::from_translation(ev.translation),
            consumed.picked_up_seeds.len()
        );
        save_requests.send(SaveRequestEvent);
    }
}

pub fn record_harvested_talking_plants(
    mut events: EventReader<PlantHarvestedEvent>,
    mut consumed: ResMut<ConsumedObjects>,
    mut save_requests: EventWriter<SaveRequestEvent>,
) {
    for ev in events.read().filter(|ev| ev.talking) {
        let id = PositionId::from_translation(ev.translation);
        info!("Recorded harvested talking plant {} at {}", ev.plant_type, id);
        consumed.harvested_talking_plants.insert(id);
        save_requests.send(SaveRequestEvent);
    }
}

pub fn queue_save_requests(
    mut requests: EventReader<SaveRequestEvent>,
    mut queued: ResMut<QueuedSave>,
    transition: Option<Res<SceneTransition>>,
) {
    if requests.read().count() == 0 {
        return;
    }
    if transition.is_some_and(|t| !t.is_idle()) {
        debug!("Save requested during a scene transition, holding it");
    }
    queued.0 = true;
}

/// Runs after `Update` so despawns from this frame's gameplay are visible.
pub fn save_on_request(world: &mut World) {
    world.insert_resource(QueuedSave(false));
    if let Err(e) = save_world_state(world) {
        warn!("Save request did not complete cleanly: {}", e);
    }
}
