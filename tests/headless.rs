//! Headless integration tests for Greenhollow.
//!
//! These tests exercise capture, restore and scene transitions without a
//! window or GPU. Pure reconciliation properties run against a bare `World`
//! holding fake collaborators; the transition flow runs a full app on
//! `MinimalPlugins` with a fixed frame time.
//!
//! Run with: `cargo test --test headless`

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use greenhollow::calendar::CalendarPlugin;
use greenhollow::data::DataPlugin;
use greenhollow::economy::EconomyPlugin;
use greenhollow::farming::FarmingPlugin;
use greenhollow::save::{
    capture_world_state, persist_snapshot, restore_world_state, save_world_state, CellCoord,
    ConsumedObjects, ItemCount, KeyValueStore, MemoryStore, PendingSoilRestore, PlantRecord,
    PositionId, QueuedSave, SaveError, SavePlugin, SaveStore, SeedPickupRecord, Snapshot,
    WorldPosition, WorldSnapshot, SNAPSHOT_KEY, SPAWN_POINT_KEY,
};
use greenhollow::shared::*;
use greenhollow::world::transition::{SceneTransition, TransitionPhase};
use greenhollow::world::WorldPlugin;

const FRAME: Duration = Duration::from_millis(50);

// ─────────────────────────────────────────────────────────────────────────────
// Bare-world helpers
// ─────────────────────────────────────────────────────────────────────────────

/// A world holding only the save core's resources, in `scene`.
fn bare_world(scene: SceneId, store: SaveStore) -> World {
    let mut world = World::new();
    world.insert_resource(PersistenceConfig::default());
    world.insert_resource(ActiveScene(scene));
    world.init_resource::<WorldSnapshot>();
    world.init_resource::<ConsumedObjects>();
    world.insert_resource(store);
    world
}

fn store_snapshot(world: &mut World, snapshot: &Snapshot) {
    let json = snapshot.encode().expect("snapshot encodes");
    world
        .resource_mut::<SaveStore>()
        .set(SNAPSHOT_KEY, &json)
        .expect("memory store accepts writes");
}

fn take_store(world: &mut World) -> SaveStore {
    world
        .remove_resource::<SaveStore>()
        .expect("world has a save store")
}

fn tilled_cells(world: &mut World) -> Vec<IVec3> {
    let mut query = world.query::<&SoilTilemap>();
    let tilemap = query.single(world);
    let mut cells: Vec<IVec3> = tilemap.tilled_cells().collect();
    cells.sort_by_key(|c| (c.x, c.y, c.z));
    cells
}

fn talking_grape(stage_count: u32, at: Vec3) -> impl Bundle {
    (
        Name::new("Talking Grape Plant"),
        GrowingPlant::new(stage_count, 5.0),
        HarvestablePlant {
            harvest_item: "Grape".into(),
            ..default()
        },
        Transform::from_translation(at),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Scenes reported finished by the orchestrator, in order.
#[derive(Resource, Default)]
struct FinishedTransitions(Vec<SceneId>);

fn record_finished(
    mut events: EventReader<SceneTransitionFinished>,
    mut finished: ResMut<FinishedTransitions>,
) {
    for ev in events.read() {
        finished.0.push(ev.scene);
    }
}

/// Builds a minimal Bevy app with all shared resources and events registered
/// but NO rendering, windowing, or asset loading, and every game plugin.
fn build_test_app(store: SaveStore) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));

    // ── Game State ───────────────────────────────────────────────────────
    app.init_state::<GameState>();

    // ── Shared Resources (mirrors main.rs) ───────────────────────────────
    app.insert_resource(PersistenceConfig::default())
        .init_resource::<PlantPrefabRegistry>()
        .init_resource::<SceneLayouts>()
        .init_resource::<ShopCatalog>()
        .init_resource::<ActiveScene>()
        .insert_resource(store);

    // ── Shared Events (mirrors main.rs) ──────────────────────────────────
    app.add_event::<SceneChangeRequest>()
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
        .add_event::<SleepMenuEvent>();

    // ── Domain plugins ───────────────────────────────────────────────────
    app.add_plugins(CalendarPlugin)
        .add_plugins(FarmingPlugin)
        .add_plugins(EconomyPlugin)
        .add_plugins(WorldPlugin)
        .add_plugins(SavePlugin)
        .add_plugins(DataPlugin);

    app.init_resource::<FinishedTransitions>()
        .add_systems(Last, record_finished);
    app
}

fn finished_count(app: &App) -> usize {
    app.world().resource::<FinishedTransitions>().0.len()
}

/// Ticks until `count` transitions (the boot load included) have finished.
fn run_until_finished(app: &mut App, count: usize) {
    for _ in 0..200 {
        if finished_count(app) >= count {
            return;
        }
        app.update();
    }
    panic!(
        "expected {} finished transitions, saw {}",
        count,
        finished_count(app)
    );
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn boot(app: &mut App) {
    run_until_finished(app, 1);
    // Let the late tilemap and any deferred soil restore land.
    run_frames(app, 3);
}

fn request_scene(app: &mut App, scene: SceneId, spawn_point: &str) {
    app.world_mut().send_event(SceneChangeRequest {
        scene,
        spawn_point: spawn_point.to_string(),
    });
}

fn active_scene(app: &App) -> SceneId {
    app.world().resource::<ActiveScene>().0
}

fn find_named(app: &mut App, name: &str) -> Option<Entity> {
    let world = app.world_mut();
    let mut query = world.query::<(Entity, &Name)>();
    query
        .iter(world)
        .find(|(_, n)| n.as_str() == name)
        .map(|(e, _)| e)
}

fn pickup_at(app: &mut App, id: &PositionId) -> Option<Entity> {
    let world = app.world_mut();
    let mut query = world.query_filtered::<(Entity, &Transform), With<SeedPickup>>();
    query
        .iter(world)
        .find(|(_, t)| PositionId::from_translation(t.translation) == *id)
        .map(|(e, _)| e)
}

fn stored_snapshot(app: &App) -> Snapshot {
    let json = app
        .world()
        .resource::<SaveStore>()
        .get(SNAPSHOT_KEY)
        .expect("store is readable")
        .expect("a snapshot has been saved");
    Snapshot::decode(&json).expect("stored snapshot decodes")
}

fn in_settling(app: &App) -> bool {
    matches!(
        app.world().resource::<SceneTransition>().phase,
        TransitionPhase::Settling { .. }
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Snapshot laws
// ─────────────────────────────────────────────────────────────────────────────

fn random_text(rng: &mut StdRng) -> String {
    const AWKWARD: [char; 5] = ['"', '\\', 'é', ' ', '\n'];
    let len = rng.gen_range(0..12);
    (0..len)
        .map(|_| {
            if rng.gen_bool(0.2) {
                AWKWARD[rng.gen_range(0..AWKWARD.len())]
            } else {
                rng.sample(Alphanumeric) as char
            }
        })
        .collect()
}

fn random_position(rng: &mut StdRng) -> WorldPosition {
    WorldPosition {
        x: rng.gen_range(-500.0..500.0),
        y: rng.gen_range(-500.0..500.0),
        z: rng.gen_range(-5.0..5.0),
    }
}

fn random_snapshot(rng: &mut StdRng) -> Snapshot {
    Snapshot {
        money: rng.gen(),
        time_of_day: rng.gen_range(0.0..10_000.0),
        day: rng.gen_range(1..400),
        inventory_items: (0..rng.gen_range(0..6))
            .map(|_| ItemCount::new(random_text(rng), rng.gen_range(-3..100)))
            .collect(),
        harvested_items: (0..rng.gen_range(0..6))
            .map(|_| ItemCount::new(random_text(rng), rng.gen_range(0..100)))
            .collect(),
        tilled_soil_positions: (0..rng.gen_range(0..20))
            .map(|_| CellCoord {
                x: rng.gen_range(-50..50),
                y: rng.gen_range(-50..50),
                z: rng.gen_range(-2..2),
            })
            .collect(),
        plants: (0..rng.gen_range(0..8))
            .map(|_| PlantRecord {
                plant_type: random_text(rng),
                position: random_position(rng),
                growth_stage: rng.gen_range(-2..10),
                is_watered: rng.gen(),
                is_fully_grown: rng.gen(),
                is_harvested: rng.gen(),
            })
            .collect(),
        seed_pickups: (0..rng.gen_range(0..8))
            .map(|_| SeedPickupRecord {
                seed_name: random_text(rng),
                position: random_position(rng),
                is_picked_up: rng.gen(),
            })
            .collect(),
        selected_seed: random_text(rng),
        selected_tool: random_text(rng),
        has_watering_can: rng.gen(),
        has_hoe_tool: rng.gen(),
        harvested_talking_plant_position_ids: (0..rng.gen_range(0..5))
            .map(|_| random_text(rng))
            .collect(),
        farm_state_captured: rng.gen(),
    }
}

#[test]
fn test_round_trip_law_for_arbitrary_snapshots() {
    let mut rng = StdRng::seed_from_u64(0x5EED_F00D);
    for i in 0..200 {
        let snapshot = random_snapshot(&mut rng);
        let json = snapshot.encode().expect("arbitrary snapshot encodes");
        let decoded = Snapshot::decode(&json).expect("own output decodes");
        assert_eq!(decoded, snapshot, "round trip #{} changed the snapshot", i);
    }
}

#[test]
fn test_position_id_determinism_and_aliasing() {
    let base = PositionId::from_xy(1.0, 2.0);
    assert_eq!(base, PositionId::from_xy(1.0, 2.0));
    assert_eq!(
        PositionId::from_xy(1.02, 2.04),
        base,
        "positions within the quantum must share an id"
    );
    assert_ne!(
        PositionId::from_xy(1.2, 2.0),
        base,
        "positions a tenth apart must not alias"
    );
    assert_eq!(base.as_str(), "10-20");
}

// ─────────────────────────────────────────────────────────────────────────────
// End-to-end scenarios on bare worlds
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_scenario_a_money_and_inventory_survive_a_fresh_scene() {
    let mut world = bare_world(SceneId::Farm, SaveStore::in_memory());
    world.insert_resource(Wallet::new(50));
    let mut inventory = Inventory::with_starting_tools();
    for _ in 0..3 {
        inventory.add_item("Tomato Seed");
    }
    inventory.select_seed("Tomato Seed");
    world.insert_resource(inventory);
    world.spawn(SoilTilemap::new(IRect::new(0, 0, 8, 8)));

    save_world_state(&mut world).expect("save succeeds");

    let mut fresh = bare_world(SceneId::Farm, take_store(&mut world));
    fresh.insert_resource(Wallet::default());
    fresh.insert_resource(Inventory::with_starting_tools());
    let report = restore_world_state(&mut fresh);

    assert!(report.loaded);
    assert_eq!(fresh.resource::<Wallet>().balance(), 50);
    let inventory = fresh.resource::<Inventory>();
    assert_eq!(inventory.count("Tomato Seed"), 3);
    assert_eq!(
        inventory
            .slots()
            .iter()
            .filter(|s| s.name == "Tomato Seed")
            .count(),
        1,
        "three seeds must share one slot"
    );
    assert_eq!(inventory.selected_seed(), "Tomato Seed");
}

#[test]
fn test_scenario_b_tilled_cells_restored_exactly() {
    let mut world = bare_world(SceneId::Farm, SaveStore::in_memory());
    let mut soil = SoilTilemap::new(IRect::new(-10, -10, 10, 10));
    soil.set_tilled(IVec3::new(2, 3, 0));
    soil.set_tilled(IVec3::new(2, 4, 0));
    world.spawn(soil);
    save_world_state(&mut world).expect("save succeeds");

    let mut fresh = bare_world(SceneId::Farm, take_store(&mut world));
    let mut stale = SoilTilemap::new(IRect::new(-10, -10, 10, 10));
    stale.set_tilled(IVec3::new(7, 7, 0));
    fresh.spawn(stale);
    restore_world_state(&mut fresh);

    assert_eq!(
        tilled_cells(&mut fresh),
        vec![IVec3::new(2, 3, 0), IVec3::new(2, 4, 0)],
        "tilemap must hold exactly the captured cells"
    );
}

#[test]
fn test_scenario_c_picked_up_seed_stays_gone() {
    let mut world = bare_world(SceneId::Farm, SaveStore::in_memory());
    store_snapshot(
        &mut world,
        &Snapshot {
            seed_pickups: vec![SeedPickupRecord {
                seed_name: "Tomato Seed".into(),
                position: WorldPosition { x: 1.0, y: 1.0, z: 0.0 },
                is_picked_up: true,
            }],
            ..default()
        },
    );
    world.spawn((
        SeedPickup {
            seed_name: "Tomato Seed".into(),
        },
        Transform::from_xyz(1.0, 1.0, 0.0),
    ));
    world.spawn((
        SeedPickup {
            seed_name: "Radish Seed".into(),
        },
        Transform::from_xyz(3.0, 3.0, 0.0),
    ));

    let report = restore_world_state(&mut world);
    assert_eq!(report.pickups_removed, 1);

    let mut query = world.query_filtered::<&Transform, With<SeedPickup>>();
    let remaining: Vec<PositionId> = query
        .iter(&world)
        .map(|t| PositionId::from_translation(t.translation))
        .collect();
    assert_eq!(remaining, vec![PositionId::from_xy(3.0, 3.0)]);

    let again = restore_world_state(&mut world);
    assert_eq!(again.pickups_removed, 0, "second restore must be a no-op");
}

#[test]
fn test_farm_only_state_untouched_outside_the_farm() {
    let mut world = bare_world(SceneId::House, SaveStore::in_memory());
    let mut inventory = Inventory::with_starting_tools();
    inventory.add_item("Corn Seed");
    world.insert_resource(inventory);
    let mut soil = SoilTilemap::new(IRect::new(0, 0, 10, 10));
    soil.set_tilled(IVec3::new(5, 5, 0));
    world.spawn(soil);
    world.spawn(talking_grape(4, Vec3::new(1.0, 2.0, 0.0)));

    let before = Snapshot {
        inventory_items: vec![ItemCount::new("Tomato Seed", 2)],
        tilled_soil_positions: vec![CellCoord { x: 9, y: 9, z: 0 }],
        plants: vec![PlantRecord {
            plant_type: "Radish".into(),
            position: WorldPosition { x: 4.0, y: 4.0, z: 0.0 },
            growth_stage: 1,
            is_watered: false,
            is_fully_grown: false,
            is_harvested: false,
        }],
        farm_state_captured: true,
        ..default()
    };
    world.insert_resource(WorldSnapshot(before.clone()));

    let report = capture_world_state(&mut world);
    assert!(!report.farm_captured);
    let after = &world.resource::<WorldSnapshot>().0;
    assert_eq!(after.inventory_items, before.inventory_items);
    assert_eq!(after.tilled_soil_positions, before.tilled_soil_positions);
    assert_eq!(after.plants, before.plants);

    store_snapshot(&mut world, &before);
    restore_world_state(&mut world);
    assert_eq!(world.resource::<Inventory>().count("Corn Seed"), 1);
    assert_eq!(world.resource::<Inventory>().count("Tomato Seed"), 0);
    assert_eq!(tilled_cells(&mut world), vec![IVec3::new(5, 5, 0)]);
    let mut plants = world.query::<&GrowingPlant>();
    assert_eq!(plants.iter(&world).count(), 1);
}

#[test]
fn test_talking_plant_updated_in_place() {
    let mut world = bare_world(SceneId::Farm, SaveStore::in_memory());
    let plant = world.spawn(talking_grape(4, Vec3::new(1.0, 2.0, 0.0))).id();
    store_snapshot(
        &mut world,
        &Snapshot {
            plants: vec![PlantRecord {
                plant_type: "Talking Grape Plant".into(),
                position: WorldPosition { x: 1.0, y: 2.0, z: 0.0 },
                growth_stage: 2,
                is_watered: true,
                is_fully_grown: false,
                is_harvested: false,
            }],
            farm_state_captured: true,
            ..default()
        },
    );

    let report = restore_world_state(&mut world);
    assert_eq!(report.plants_updated, 1);
    assert_eq!(report.plants_spawned, 0);
    let growing = world
        .get::<GrowingPlant>(plant)
        .expect("the same entity must survive the restore");
    assert_eq!(growing.current_stage, 2);
    assert!(growing.is_watered);
    assert_eq!(growing.displayed_stage, Some(2));
}

#[test]
fn test_harvested_talking_plant_destroyed() {
    let mut world = bare_world(SceneId::Farm, SaveStore::in_memory());
    let plant = world.spawn(talking_grape(4, Vec3::new(1.0, 2.0, 0.0))).id();
    store_snapshot(
        &mut world,
        &Snapshot {
            harvested_talking_plant_position_ids: vec!["10-20".into()],
            ..default()
        },
    );

    restore_world_state(&mut world);
    assert!(
        !world.entities().contains(plant),
        "harvested talking plant must be destroyed"
    );
    assert!(world
        .resource::<ConsumedObjects>()
        .harvested_talking_plants
        .contains(&PositionId::from_xy(1.0, 2.0)));
}

#[test]
fn test_missing_plants_instantiated_from_registry() {
    let mut world = bare_world(SceneId::Farm, SaveStore::in_memory());
    let mut registry = PlantPrefabRegistry::default();
    greenhollow::data::populate_plants(&mut registry);
    world.insert_resource(registry);
    store_snapshot(
        &mut world,
        &Snapshot {
            plants: vec![
                PlantRecord {
                    plant_type: "Radish".into(),
                    position: WorldPosition { x: 4.5, y: 4.5, z: 0.0 },
                    growth_stage: 9,
                    is_watered: false,
                    is_fully_grown: true,
                    is_harvested: false,
                },
                PlantRecord {
                    plant_type: "Cactus".into(),
                    position: WorldPosition { x: 6.5, y: 4.5, z: 0.0 },
                    growth_stage: 0,
                    is_watered: false,
                    is_fully_grown: false,
                    is_harvested: false,
                },
            ],
            farm_state_captured: true,
            ..default()
        },
    );

    let report = restore_world_state(&mut world);
    assert_eq!(report.plants_spawned, 1, "unknown plant types are dropped");
    let mut query = world.query::<(&Name, &GrowingPlant, &HarvestablePlant)>();
    let (name, growing, harvestable) = query.single(&world);
    assert_eq!(name.as_str(), "Radish");
    assert_eq!(growing.current_stage, 3, "stage clamps to the last one");
    assert!(harvestable.is_fully_grown);
}

#[test]
fn test_empty_plant_list_after_farm_capture_clears_ordinary_plants() {
    let mut world = bare_world(SceneId::Farm, SaveStore::in_memory());
    world.spawn((
        Name::new("Radish"),
        GrowingPlant::new(4, 5.0),
        Transform::from_xyz(3.0, 3.0, 0.0),
    ));
    store_snapshot(
        &mut world,
        &Snapshot {
            farm_state_captured: true,
            ..default()
        },
    );
    restore_world_state(&mut world);
    let mut query = world.query::<&GrowingPlant>();
    assert_eq!(query.iter(&world).count(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Store failures
// ─────────────────────────────────────────────────────────────────────────────

/// Drops every plant record on its way to storage.
#[derive(Default)]
struct LossyStore {
    inner: MemoryStore,
}

impl KeyValueStore for LossyStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        let mut snapshot = Snapshot::decode(value)?;
        snapshot.plants.clear();
        self.inner.set(key, &snapshot.encode()?)
    }

    fn delete(&mut self, key: &str) -> Result<(), SaveError> {
        self.inner.delete(key)
    }
}

#[test]
fn test_post_save_validation_catches_lost_records() {
    let mut world = bare_world(SceneId::Farm, SaveStore::new(LossyStore::default()));
    world.resource_mut::<WorldSnapshot>().0.plants.push(PlantRecord {
        plant_type: "Radish".into(),
        position: WorldPosition::default(),
        growth_stage: 0,
        is_watered: false,
        is_fully_grown: false,
        is_harvested: false,
    });

    match persist_snapshot(&mut world) {
        Err(SaveError::Validation { .. }) => {}
        other => panic!("expected a validation error, got {:?}", other),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Full app: boot and transitions
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_headless_boot_loads_the_farm() {
    let mut app = build_test_app(SaveStore::in_memory());
    boot(&mut app);

    assert_eq!(
        app.world().resource::<State<GameState>>().get(),
        &GameState::Playing
    );
    assert_eq!(active_scene(&app), SceneId::Farm);
    assert!(app.world().resource::<SceneTransition>().is_idle());
    assert!(app.world().contains_resource::<Wallet>());
    assert!(app.world().contains_resource::<Inventory>());
    assert!(find_named(&mut app, "Soil Tilemap").is_some());
    assert!(find_named(&mut app, "Talking Grape Plant").is_some());
    assert!(find_named(&mut app, "Player").is_some());

    let world = app.world_mut();
    let mut pickups = world.query::<&SeedPickup>();
    assert_eq!(pickups.iter(world).count(), 3);
}

#[test]
fn test_corrupt_save_does_not_stop_boot() {
    let mut store = SaveStore::in_memory();
    store
        .set(SNAPSHOT_KEY, "this is not a snapshot")
        .expect("memory store accepts writes");
    let mut app = build_test_app(store);
    boot(&mut app);

    assert_eq!(active_scene(&app), SceneId::Farm);
    assert_eq!(app.world().resource::<Wallet>().balance(), 0);
    assert!(app.world().resource::<SceneTransition>().is_idle());
}

#[test]
fn test_boot_defers_soil_until_tilemap_exists() {
    let mut store = SaveStore::in_memory();
    let snapshot = Snapshot {
        tilled_soil_positions: vec![
            CellCoord { x: 1, y: 1, z: 0 },
            CellCoord { x: 2, y: 1, z: 0 },
        ],
        farm_state_captured: true,
        ..default()
    };
    store
        .set(SNAPSHOT_KEY, &snapshot.encode().expect("encodes"))
        .expect("memory store accepts writes");
    let mut app = build_test_app(store);

    let mut saw_pending = false;
    for _ in 0..200 {
        app.update();
        saw_pending |= app.world().contains_resource::<PendingSoilRestore>();
        if finished_count(&app) >= 1 {
            break;
        }
    }
    run_frames(&mut app, 3);

    assert!(saw_pending, "boot restore should wait for the late tilemap");
    assert!(!app.world().contains_resource::<PendingSoilRestore>());
    assert_eq!(
        tilled_cells(app.world_mut()),
        vec![IVec3::new(1, 1, 0), IVec3::new(2, 1, 0)]
    );
}

#[test]
fn test_restore_waits_for_settle_delay() {
    let mut app = build_test_app(SaveStore::in_memory());
    boot(&mut app);
    app.world_mut().resource_mut::<Wallet>().set_balance(77);

    request_scene(&mut app, SceneId::House, "HouseEntrySpawn");
    let mut saw_settling = false;
    for _ in 0..20 {
        app.update();
        let settling = matches!(
            app.world().resource::<SceneTransition>().phase,
            TransitionPhase::Settling { .. }
        );
        if settling {
            saw_settling = true;
            assert_eq!(active_scene(&app), SceneId::House);
            assert_eq!(
                app.world().resource::<Wallet>().balance(),
                0,
                "money must not be restored before the scene settles"
            );
        }
        if finished_count(&app) >= 2 {
            break;
        }
    }

    assert!(saw_settling);
    assert_eq!(finished_count(&app), 2);
    assert_eq!(app.world().resource::<Wallet>().balance(), 77);
    assert!(
        !app.world().contains_resource::<Inventory>(),
        "the house owns no inventory"
    );
}

#[test]
fn test_transition_guard_rejects_overlap_and_cooldown() {
    let mut app = build_test_app(SaveStore::in_memory());
    boot(&mut app);

    request_scene(&mut app, SceneId::House, "HouseEntrySpawn");
    request_scene(&mut app, SceneId::MainMenu, "MainSpawn");
    run_until_finished(&mut app, 2);
    assert_eq!(
        app.world().resource::<FinishedTransitions>().0,
        vec![SceneId::Farm, SceneId::House],
        "the overlapping request must be dropped"
    );

    // Less than the cooldown has passed since the House transition began.
    request_scene(&mut app, SceneId::Farm, "HouseExit");
    run_frames(&mut app, 20);
    assert_eq!(active_scene(&app), SceneId::House);
    assert_eq!(finished_count(&app), 2, "cooldown request must be dropped");

    request_scene(&mut app, SceneId::Farm, "HouseExit");
    run_until_finished(&mut app, 3);
    assert_eq!(active_scene(&app), SceneId::Farm);
}

#[test]
fn test_spawn_point_consumed_on_load() {
    let mut app = build_test_app(SaveStore::in_memory());
    boot(&mut app);

    request_scene(&mut app, SceneId::House, "HouseEntrySpawn");
    run_until_finished(&mut app, 2);
    run_frames(&mut app, 12);
    request_scene(&mut app, SceneId::Farm, "HouseExit");
    run_until_finished(&mut app, 3);

    let player = find_named(&mut app, "Player").expect("player exists");
    let translation = app.world().get::<Transform>(player).unwrap().translation;
    assert_eq!(translation.truncate(), Vec2::new(-6.5, 5.0));
    assert_eq!(
        app.world().resource::<SaveStore>().get(SPAWN_POINT_KEY).unwrap(),
        None,
        "the pending spawn point is consumed by the load"
    );
}

#[test]
fn test_farm_progress_survives_house_visit_and_restart() {
    let mut app = build_test_app(SaveStore::in_memory());
    boot(&mut app);

    // Pick up the tomato seed, harvest the grape, till a cell, earn money.
    let tomato_id = PositionId::from_xy(3.5, 1.5);
    let tomato = pickup_at(&mut app, &tomato_id).expect("layout places a tomato seed");
    app.world_mut().send_event(SeedPickedUpEvent { pickup: tomato });

    let grape = find_named(&mut app, "Talking Grape Plant").expect("layout places a grape");
    app.world_mut()
        .get_mut::<HarvestablePlant>(grape)
        .unwrap()
        .is_fully_grown = true;
    app.world_mut().send_event(HarvestPlantEvent { plant: grape });
    app.world_mut().send_event(TillSoilEvent {
        cell: IVec3::new(1, 1, 0),
    });
    app.world_mut().resource_mut::<Wallet>().add(120);
    run_frames(&mut app, 3);

    {
        let inventory = app.world().resource::<Inventory>();
        assert_eq!(inventory.count("Tomato Seed"), 1);
        assert_eq!(inventory.harvest_count("Grape"), 1);
    }

    // Visit the house and come back.
    request_scene(&mut app, SceneId::House, "HouseEntrySpawn");
    run_until_finished(&mut app, 2);
    run_frames(&mut app, 12);
    request_scene(&mut app, SceneId::Farm, "HouseExit");
    run_until_finished(&mut app, 3);
    run_frames(&mut app, 3);

    assert_farm_progress(&mut app, &tomato_id);

    // Restart the game on the same store.
    let store = app
        .world_mut()
        .remove_resource::<SaveStore>()
        .expect("app has a store");
    let mut restarted = build_test_app(store);
    boot(&mut restarted);

    assert_farm_progress(&mut restarted, &tomato_id);
}

fn assert_farm_progress(app: &mut App, tomato_id: &PositionId) {
    assert_eq!(active_scene(app), SceneId::Farm);
    assert_eq!(app.world().resource::<Wallet>().balance(), 120);
    {
        let inventory = app.world().resource::<Inventory>();
        assert_eq!(inventory.count("Tomato Seed"), 1);
        assert_eq!(inventory.harvest_count("Grape"), 1);
    }
    assert!(
        pickup_at(app, tomato_id).is_none(),
        "picked-up seed must not come back"
    );
    assert!(
        find_named(app, "Talking Grape Plant").is_none(),
        "harvested talking plant must not come back"
    );
    assert!(
        find_named(app, "Talking Melon Plant").is_some(),
        "unharvested talking plant stays"
    );
    assert_eq!(tilled_cells(app.world_mut()), vec![IVec3::new(1, 1, 0)]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Saves during transitions
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_save_requests_wait_for_the_transition_to_finish() {
    let mut app = build_test_app(SaveStore::in_memory());
    boot(&mut app);
    app.world_mut().resource_mut::<Wallet>().set_balance(120);
    request_scene(&mut app, SceneId::House, "HouseEntrySpawn");
    run_until_finished(&mut app, 2);
    run_frames(&mut app, 12);

    // The farm comes back with a fresh wallet until it has settled.
    request_scene(&mut app, SceneId::Farm, HOUSE_EXIT_SPAWN);
    let mut interrupted = false;
    for _ in 0..40 {
        app.update();
        if in_settling(&app) && !interrupted {
            let radish = pickup_at(&mut app, &PositionId::from_xy(-4.5, -2.5))
                .expect("layout places a radish seed");
            app.world_mut().send_event(SeedPickedUpEvent { pickup: radish });
            app.world_mut().send_event(SaveRequestEvent);
            interrupted = true;
        } else if interrupted {
            assert_eq!(
                stored_snapshot(&app).money,
                120,
                "a save must never capture the unsettled farm"
            );
        }
        if finished_count(&app) >= 3 {
            break;
        }
    }
    run_frames(&mut app, 3);

    assert!(interrupted, "the farm never reached the settle delay");
    assert_eq!(active_scene(&app), SceneId::Farm);
    assert_eq!(app.world().resource::<Wallet>().balance(), 120);
    assert_eq!(stored_snapshot(&app).money, 120);
    assert!(!app.world().resource::<QueuedSave>().0, "held save is written once idle");
}

#[test]
fn test_leaving_right_after_boot_keeps_deferred_soil() {
    let mut store = SaveStore::in_memory();
    let snapshot = Snapshot {
        tilled_soil_positions: vec![
            CellCoord { x: 1, y: 1, z: 0 },
            CellCoord { x: 2, y: 1, z: 0 },
        ],
        farm_state_captured: true,
        ..default()
    };
    store
        .set(SNAPSHOT_KEY, &snapshot.encode().expect("encodes"))
        .expect("memory store accepts writes");
    let mut app = build_test_app(store);

    run_until_finished(&mut app, 1);
    assert!(
        app.world().contains_resource::<PendingSoilRestore>(),
        "soil restore should still be waiting for the tilemap"
    );
    request_scene(&mut app, SceneId::House, "HouseEntrySpawn");
    run_until_finished(&mut app, 2);

    assert_eq!(active_scene(&app), SceneId::House);
    assert_eq!(
        stored_snapshot(&app).tilled_soil_positions,
        snapshot.tilled_soil_positions,
        "leaving the farm early must not save an empty tilemap"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Sleep menu
// ─────────────────────────────────────────────────────────────────────────────

fn day(app: &App) -> u32 {
    app.world().resource::<DayClock>().day()
}

#[test]
fn test_sleeping_starts_the_next_day_on_the_farm() {
    let mut app = build_test_app(SaveStore::in_memory());
    boot(&mut app);
    app.world_mut().resource_mut::<Wallet>().set_balance(60);
    request_scene(&mut app, SceneId::House, "HouseEntrySpawn");
    run_until_finished(&mut app, 2);
    run_frames(&mut app, 12);
    assert_eq!(day(&app), 1);

    app.world_mut().send_event(SleepMenuEvent {
        choice: SleepChoice::SleepAndSave,
    });
    run_until_finished(&mut app, 3);

    assert_eq!(active_scene(&app), SceneId::Farm);
    assert_eq!(day(&app), 2);
    assert_eq!(app.world().resource::<Wallet>().balance(), 60);
    assert_eq!(stored_snapshot(&app).day, 2);
    let player = find_named(&mut app, "Player").expect("player exists");
    let translation = app.world().get::<Transform>(player).unwrap().translation;
    assert_eq!(translation.truncate(), Vec2::new(-6.5, 5.0), "wakes at the house exit");

    // The new day survives a restart.
    let store = app
        .world_mut()
        .remove_resource::<SaveStore>()
        .expect("app has a store");
    let mut restarted = build_test_app(store);
    boot(&mut restarted);
    assert_eq!(day(&restarted), 2);
}

#[test]
fn test_sleep_during_cooldown_keeps_the_day() {
    let mut app = build_test_app(SaveStore::in_memory());
    boot(&mut app);
    request_scene(&mut app, SceneId::House, "HouseEntrySpawn");
    run_until_finished(&mut app, 2);

    app.world_mut().send_event(SleepMenuEvent {
        choice: SleepChoice::SleepAndSave,
    });
    run_frames(&mut app, 20);

    assert_eq!(active_scene(&app), SceneId::House);
    assert_eq!(day(&app), 1, "a rejected sleep must not advance the day");
}

#[test]
fn test_save_and_quit_returns_to_main_menu() {
    let mut app = build_test_app(SaveStore::in_memory());
    boot(&mut app);
    app.world_mut().resource_mut::<Wallet>().set_balance(33);

    app.world_mut().send_event(SleepMenuEvent {
        choice: SleepChoice::SaveAndQuit,
    });
    run_until_finished(&mut app, 2);

    assert_eq!(active_scene(&app), SceneId::MainMenu);
    assert!(!app.world().contains_resource::<Wallet>());
    assert_eq!(stored_snapshot(&app).money, 33);
    assert_eq!(stored_snapshot(&app).day, 1);
    assert_eq!(
        app.world().resource::<SaveStore>().get(SPAWN_POINT_KEY).unwrap(),
        Some(HOUSE_EXIT_SPAWN.to_string()),
        "the menu has no spawn points, so the house exit waits for the next load"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Shop
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_shop_trades_survive_a_house_visit() {
    let mut app = build_test_app(SaveStore::in_memory());
    boot(&mut app);
    app.world_mut().resource_mut::<Wallet>().set_balance(30);

    for _ in 0..2 {
        app.world_mut().send_event(BuyRequestEvent {
            item_name: "Tomato Seed".into(),
        });
    }
    let grape = find_named(&mut app, "Talking Grape Plant").expect("layout places a grape");
    app.world_mut()
        .get_mut::<HarvestablePlant>(grape)
        .unwrap()
        .is_fully_grown = true;
    app.world_mut().send_event(HarvestPlantEvent { plant: grape });
    run_frames(&mut app, 2);

    app.world_mut().send_event(SellRequestEvent {
        item_name: "Grape".into(),
    });
    run_frames(&mut app, 2);

    assert_eq!(app.world().resource::<Wallet>().balance(), 40);
    assert_eq!(app.world().resource::<Inventory>().count("Tomato Seed"), 2);
    assert_eq!(app.world().resource::<Inventory>().harvest_count("Grape"), 0);

    request_scene(&mut app, SceneId::House, "HouseEntrySpawn");
    run_until_finished(&mut app, 2);
    run_frames(&mut app, 12);
    request_scene(&mut app, SceneId::Farm, HOUSE_EXIT_SPAWN);
    run_until_finished(&mut app, 3);

    assert_eq!(app.world().resource::<Wallet>().balance(), 40);
    let inventory = app.world().resource::<Inventory>();
    assert_eq!(inventory.count("Tomato Seed"), 2);
    assert_eq!(inventory.harvest_count("Grape"), 0);
}
