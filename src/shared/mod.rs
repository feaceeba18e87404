//! Shared components, resources, events, and states for Greenhollow.
//!
//! This is the type contract. The save core, the host scene loader and every
//! gameplay domain import from here. No domain imports from any other domain
//! directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
}

// ═══════════════════════════════════════════════════════════════════════
// SCENES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneId {
    MainMenu,
    Farm,
    House,
}

impl SceneId {
    pub fn name(self) -> &'static str {
        match self {
            SceneId::MainMenu => "MainMenu",
            SceneId::Farm => "FarmScene",
            SceneId::House => "HouseScene",
        }
    }

    /// Three-letter prefix used to scope ids that would otherwise collide
    /// between scenes.
    pub fn abbreviation(self) -> &'static str {
        let name = self.name();
        &name[..name.len().min(3)]
    }
}

/// The scene the host currently has loaded.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveScene(pub SceneId);

impl Default for ActiveScene {
    fn default() -> Self {
        Self(SceneId::MainMenu)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════

/// Tunables for persistence and scene transitions.
///
/// Defaults are the shipped values; native builds may override them from
/// `persistence.ron` (see `data::config`).
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// The one scene where soil, plants and inventory are meaningful.
    pub farm_scene: SceneId,
    /// Scene loaded when entering `GameState::Playing`.
    pub start_scene: SceneId,
    /// Minimum seconds between two accepted scene transitions.
    pub transition_cooldown_secs: f32,
    /// Seconds to wait after a scene reports loaded before restoring.
    pub settle_delay_secs: f32,
    /// How long a deferred soil restore waits for the tilemap to appear.
    pub tilemap_ready_timeout_secs: f32,
    /// Spawn point used when none is pending in the store.
    pub default_spawn_point: String,
    /// Directory (next to the executable) holding the file-backed store.
    pub saves_dir_name: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            farm_scene: SceneId::Farm,
            start_scene: SceneId::Farm,
            transition_cooldown_secs: 0.5,
            settle_delay_secs: 0.2,
            tilemap_ready_timeout_secs: 0.5,
            default_spawn_point: String::from("HouseExit"),
            saves_dir_name: String::from("saves"),
        }
    }
}

/// Returns true when the active scene is the configured farm scene.
/// A world without an `ActiveScene` is never the farm.
pub fn in_farm_scene(world: &World) -> bool {
    let farm = world
        .get_resource::<PersistenceConfig>()
        .map(|c| c.farm_scene)
        .unwrap_or(SceneId::Farm);
    world
        .get_resource::<ActiveScene>()
        .is_some_and(|active| active.0 == farm)
}

// ═══════════════════════════════════════════════════════════════════════
// SCENE OBJECTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug, Clone, Default)]
pub struct Player;

/// Every entity spawned as part of a scene layout. Despawned on scene unload.
#[derive(Component, Debug, Clone, Default)]
pub struct SceneMember;

#[derive(Component, Debug, Clone)]
pub struct SpawnPoint {
    pub name: String,
}

// ═══════════════════════════════════════════════════════════════════════
// ECONOMY
// ═══════════════════════════════════════════════════════════════════════

/// Player money. Owned by the scenes that show a money counter.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct Wallet {
    balance: i32,
}

impl Wallet {
    pub fn new(balance: i32) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> i32 {
        self.balance
    }

    pub fn set_balance(&mut self, balance: i32) {
        self.balance = balance;
    }

    pub fn add(&mut self, amount: i32) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Spend `amount` if affordable. Returns whether the money was taken.
    pub fn try_spend(&mut self, amount: i32) -> bool {
        if self.balance >= amount {
            self.balance -= amount;
            true
        } else {
            false
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CLOCK
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

/// Seconds elapsed in the current play session's day cycle, and the day
/// number, which only moves forward when the player sleeps.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct DayClock {
    elapsed: f32,
    day: u32,
    pub seconds_per_day: f32,
}

impl Default for DayClock {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            day: 1,
            seconds_per_day: 180.0,
        }
    }
}

impl DayClock {
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Days start at 1.
    pub fn set_day(&mut self, day: u32) {
        self.day = day.max(1);
    }

    pub fn advance_day(&mut self) {
        self.day = self.day.saturating_add(1);
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed
    }

    pub fn set_elapsed_seconds(&mut self, seconds: f32) {
        self.elapsed = seconds;
    }

    pub fn tick(&mut self, delta_secs: f32) {
        self.elapsed += delta_secs;
    }

    /// Fraction of the current day in `[0, 1)`.
    pub fn day_progress(&self) -> f32 {
        if self.seconds_per_day <= 0.0 {
            return 0.0;
        }
        self.elapsed.rem_euclid(self.seconds_per_day) / self.seconds_per_day
    }

    pub fn phase(&self) -> TimeOfDay {
        let progress = self.day_progress();
        if progress < 0.25 {
            TimeOfDay::Morning
        } else if progress < 0.5 {
            TimeOfDay::Afternoon
        } else if progress < 0.75 {
            TimeOfDay::Evening
        } else {
            TimeOfDay::Night
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INVENTORY
// ═══════════════════════════════════════════════════════════════════════

pub const WATERING_CAN: &str = "Watering Can";
pub const HOE_TOOL: &str = "Hoe Tool";
pub const PICKAXE_TOOL: &str = "Pickaxe Tool";

/// Tools the player always owns once the inventory is initialised.
pub const STARTING_TOOLS: [&str; 3] = [WATERING_CAN, HOE_TOOL, PICKAXE_TOOL];

pub fn is_tool_name(name: &str) -> bool {
    STARTING_TOOLS.contains(&name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Item,
    Harvest,
    Tool,
}

/// One visible inventory entry. Created the first time a name is added and
/// removed when its count drops to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySlot {
    pub name: String,
    pub kind: SlotKind,
}

/// The player's seeds, harvests and tools. Only the farm scene owns one.
///
/// Counts keep insertion order so saves list items in the order the player
/// acquired them.
#[derive(Resource, Debug, Clone, Default)]
pub struct Inventory {
    item_counts: Vec<(String, i32)>,
    harvest_counts: Vec<(String, i32)>,
    slots: Vec<InventorySlot>,
    tools: Vec<String>,
    selected_seed: String,
    selected_tool: String,
}

impl Inventory {
    /// A fresh inventory holding the starting tools.
    pub fn with_starting_tools() -> Self {
        let mut inventory = Self::default();
        inventory.restore_tools();
        inventory
    }

    pub fn item_counts(&self) -> impl Iterator<Item = (&str, i32)> {
        self.item_counts.iter().map(|(n, c)| (n.as_str(), *c))
    }

    pub fn harvest_counts(&self) -> impl Iterator<Item = (&str, i32)> {
        self.harvest_counts.iter().map(|(n, c)| (n.as_str(), *c))
    }

    pub fn count(&self, name: &str) -> i32 {
        lookup(&self.item_counts, name)
    }

    pub fn harvest_count(&self, name: &str) -> i32 {
        lookup(&self.harvest_counts, name)
    }

    pub fn slots(&self) -> &[InventorySlot] {
        &self.slots
    }

    pub fn tools(&self) -> &[String] {
        &self.tools
    }

    pub fn selected_seed(&self) -> &str {
        &self.selected_seed
    }

    pub fn selected_tool(&self) -> &str {
        &self.selected_tool
    }

    /// Add one of `name`. The first add creates the slot; later adds only
    /// increment the count.
    pub fn add_item(&mut self, name: &str) {
        if let Some(entry) = self.item_counts.iter_mut().find(|(n, _)| n == name) {
            entry.1 += 1;
            return;
        }
        self.item_counts.push((name.to_string(), 1));
        self.create_slot(name, SlotKind::Item);
    }

    /// Remove one of `name`. Returns false if none were held.
    pub fn remove_one_item(&mut self, name: &str) -> bool {
        let Some(index) = self.item_counts.iter().position(|(n, _)| n == name) else {
            return false;
        };
        self.item_counts[index].1 -= 1;
        if self.item_counts[index].1 <= 0 {
            self.item_counts.remove(index);
            self.remove_slot(name);
        }
        true
    }

    pub fn add_harvest(&mut self, name: &str) {
        if let Some(entry) = self.harvest_counts.iter_mut().find(|(n, _)| n == name) {
            entry.1 += 1;
            return;
        }
        self.harvest_counts.push((name.to_string(), 1));
        self.create_slot(name, SlotKind::Harvest);
    }

    /// Remove one harvested `name`, e.g. when selling it.
    pub fn try_remove_harvest(&mut self, name: &str) -> bool {
        let Some(index) = self.harvest_counts.iter().position(|(n, _)| n == name) else {
            warn!("Tried to remove harvest {} but none were in inventory.", name);
            return false;
        };
        self.harvest_counts[index].1 -= 1;
        if self.harvest_counts[index].1 <= 0 {
            self.harvest_counts.remove(index);
            self.remove_slot(name);
        }
        true
    }

    /// Bulk setter for harvest counts. A non-positive count removes the entry.
    pub fn set_harvest_count(&mut self, name: &str, count: i32) {
        let index = self.harvest_counts.iter().position(|(n, _)| n == name);
        match (index, count > 0) {
            (Some(i), true) => self.harvest_counts[i].1 = count,
            (Some(i), false) => {
                self.harvest_counts.remove(i);
                self.remove_slot(name);
            }
            (None, true) => {
                self.harvest_counts.push((name.to_string(), count));
                self.create_slot(name, SlotKind::Harvest);
            }
            (None, false) => {}
        }
    }

    /// Drop every count, slot and selection. Owned tools stay owned but
    /// their slots go until `restore_tools` runs.
    pub fn clear(&mut self) {
        self.item_counts.clear();
        self.harvest_counts.clear();
        self.slots.clear();
        self.selected_seed.clear();
        self.selected_tool.clear();
    }

    /// Re-register the starting tools and their slots.
    pub fn restore_tools(&mut self) {
        self.tools.clear();
        self.slots.retain(|s| s.kind != SlotKind::Tool);
        for tool in STARTING_TOOLS {
            self.tools.push(tool.to_string());
            self.create_slot(tool, SlotKind::Tool);
        }
    }

    /// Select a seed. Selecting the already selected seed deselects it.
    pub fn select_seed(&mut self, name: &str) {
        if self.selected_seed == name {
            self.selected_seed.clear();
            return;
        }
        self.selected_seed = name.to_string();
        self.selected_tool.clear();
    }

    pub fn deselect_seed(&mut self) {
        self.selected_seed.clear();
    }

    /// Select a tool. Selecting the already selected tool deselects it.
    pub fn select_tool(&mut self, name: &str) {
        if self.selected_tool == name {
            self.selected_tool.clear();
            return;
        }
        self.selected_tool = name.to_string();
        self.selected_seed.clear();
    }

    fn create_slot(&mut self, name: &str, kind: SlotKind) {
        if self.slots.iter().any(|s| s.name == name) {
            return;
        }
        self.slots.push(InventorySlot {
            name: name.to_string(),
            kind,
        });
    }

    fn remove_slot(&mut self, name: &str) {
        self.slots.retain(|s| s.name != name);
    }
}

fn lookup(counts: &[(String, i32)], name: &str) -> i32 {
    counts
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, c)| *c)
        .unwrap_or(0)
}

// ═══════════════════════════════════════════════════════════════════════
// PLANTS
// ═══════════════════════════════════════════════════════════════════════

/// Substring marking the special talking-plant variants.
pub const TALKING_MARKER: &str = "Talking";

pub fn is_talking_plant(name: &str) -> bool {
    name.contains(TALKING_MARKER)
}

/// A plant that grows through sprite stages once watered.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct GrowingPlant {
    pub stage_count: u32,
    pub current_stage: u32,
    pub is_watered: bool,
    pub time_between_stages: f32,
    pub timer: f32,
    /// Stage the sprite currently shows; `None` until the first refresh.
    pub displayed_stage: Option<u32>,
}

impl GrowingPlant {
    pub fn new(stage_count: u32, time_between_stages: f32) -> Self {
        Self {
            stage_count,
            current_stage: 0,
            is_watered: false,
            time_between_stages,
            timer: 0.0,
            displayed_stage: None,
        }
    }

    /// Clamp a persisted stage into this plant's valid range.
    pub fn clamp_stage(&self, stage: i32) -> u32 {
        let max = self.stage_count.saturating_sub(1) as i32;
        stage.clamp(0, max.max(0)) as u32
    }

    pub fn is_final_stage(&self) -> bool {
        self.stage_count == 0 || self.current_stage + 1 >= self.stage_count
    }

    /// Point the sprite at the current stage.
    pub fn refresh_visuals(&mut self) {
        if self.stage_count == 0 {
            warn!("Plant has no growth stages defined, skipping visual refresh");
            return;
        }
        self.current_stage = self.current_stage.min(self.stage_count - 1);
        self.displayed_stage = Some(self.current_stage);
    }
}

#[derive(Component, Debug, Clone, PartialEq, Eq, Default)]
pub struct HarvestablePlant {
    pub harvest_item: String,
    pub is_fully_grown: bool,
    pub is_harvested: bool,
}

/// Template a plant is instantiated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantPrefab {
    pub name: String,
    pub stage_count: u32,
    pub time_between_stages: f32,
    pub harvest_item: String,
    /// First atlas index; stage `n` uses `sprite_base + n`.
    pub sprite_base: u32,
}

impl PlantPrefab {
    pub fn growing(&self) -> GrowingPlant {
        GrowingPlant::new(self.stage_count, self.time_between_stages)
    }

    pub fn harvestable(&self) -> HarvestablePlant {
        HarvestablePlant {
            harvest_item: self.harvest_item.clone(),
            is_fully_grown: false,
            is_harvested: false,
        }
    }

    /// Components of a fresh plant instance named `name` at `translation`.
    pub fn instance(&self, name: &str, translation: Vec3) -> impl Bundle {
        (
            Name::new(name.to_string()),
            self.growing(),
            self.harvestable(),
            Transform::from_translation(translation),
            SceneMember,
        )
    }
}

/// Plant templates keyed by canonical plant type, populated once at content
/// load.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlantPrefabRegistry {
    pub prefabs: HashMap<String, PlantPrefab>,
    /// Seed item name → plant type it grows into.
    pub seed_to_plant: HashMap<String, String>,
}

impl PlantPrefabRegistry {
    pub fn insert(&mut self, prefab: PlantPrefab) {
        self.prefabs.insert(prefab.name.clone(), prefab);
    }

    pub fn get(&self, plant_type: &str) -> Option<&PlantPrefab> {
        self.prefabs.get(plant_type)
    }

    pub fn prefab_for_seed(&self, seed_name: &str) -> Option<&PlantPrefab> {
        self.seed_to_plant
            .get(seed_name)
            .and_then(|plant| self.prefabs.get(plant))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SEED PICKUPS
// ═══════════════════════════════════════════════════════════════════════

/// A seed lying in the world, waiting to be picked up.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct SeedPickup {
    pub seed_name: String,
}

// ═══════════════════════════════════════════════════════════════════════
// SOIL
// ═══════════════════════════════════════════════════════════════════════

pub const TILE_SIZE: f32 = 1.0;

/// The farm's soil layer: which grid cells carry a tilled marker.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct SoilTilemap {
    tilled: HashSet<IVec3>,
    /// Cells the hoe may till (the ground layer), inclusive.
    pub ground: IRect,
    /// Cells covered by stone or other blocking tiles.
    pub blocked: HashSet<IVec2>,
    pub cell_size: f32,
}

impl SoilTilemap {
    pub fn new(ground: IRect) -> Self {
        Self {
            tilled: HashSet::new(),
            ground,
            blocked: HashSet::new(),
            cell_size: TILE_SIZE,
        }
    }

    pub fn is_tilled(&self, cell: IVec3) -> bool {
        self.tilled.contains(&cell)
    }

    pub fn set_tilled(&mut self, cell: IVec3) {
        self.tilled.insert(cell);
    }

    pub fn clear_tilled(&mut self, cell: IVec3) {
        self.tilled.remove(&cell);
    }

    pub fn clear_all(&mut self) {
        self.tilled.clear();
    }

    pub fn tilled_count(&self) -> usize {
        self.tilled.len()
    }

    pub fn tilled_cells(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.tilled.iter().copied()
    }

    /// Whether the hoe may till `cell`: on the ground layer and not blocked.
    pub fn can_till(&self, cell: IVec3) -> bool {
        self.ground.contains(cell.truncate()) && !self.blocked.contains(&cell.truncate())
    }

    /// Half-open bounds `(min, max)` enclosing every tilled cell, or `None`
    /// when nothing is tilled.
    pub fn cell_bounds(&self) -> Option<(IVec3, IVec3)> {
        let mut cells = self.tilled.iter();
        let first = *cells.next()?;
        let (min, max) = cells.fold((first, first), |(lo, hi), c| (lo.min(*c), hi.max(*c)));
        Some((min, max + IVec3::ONE))
    }

    pub fn world_to_cell(&self, position: Vec2) -> IVec3 {
        let cell = (position / self.cell_size).floor();
        IVec3::new(cell.x as i32, cell.y as i32, 0)
    }

    /// Centre of `cell` in world units.
    pub fn cell_to_world(&self, cell: IVec3) -> Vec2 {
        (cell.truncate().as_vec2() + Vec2::splat(0.5)) * self.cell_size
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SCENE LAYOUTS: loaded from data
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPlant {
    /// Editor name of the instance, e.g. "Talking Grape Plant" or "Radish (2)".
    pub name: String,
    /// Prefab it is built from.
    pub prefab: String,
    pub position: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedSeed {
    pub seed_name: String,
    pub position: Vec2,
}

/// Everything the host spawns when a scene loads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneLayout {
    pub owns_wallet: bool,
    pub owns_inventory: bool,
    pub owns_clock: bool,
    /// Ground layer for the soil tilemap; `None` means the scene has no soil.
    pub soil_ground: Option<IRect>,
    /// Stone and other cells the hoe cannot till.
    pub blocked_cells: Vec<IVec2>,
    pub spawn_points: Vec<(String, Vec2)>,
    pub default_spawn: Vec2,
    pub seed_pickups: Vec<PlacedSeed>,
    pub plants: Vec<PlacedPlant>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct SceneLayouts {
    pub layouts: HashMap<SceneId, SceneLayout>,
}

// ═══════════════════════════════════════════════════════════════════════
// SHOP
// ═══════════════════════════════════════════════════════════════════════

/// Seeds are bought, everything else is sold.
pub fn is_seed_name(name: &str) -> bool {
    name.trim().to_lowercase().ends_with("seed")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopItem {
    pub item_name: String,
    pub buy_price: i32,
    pub sell_price: i32,
}

/// Everything the shop knows a price for.
#[derive(Resource, Debug, Clone, Default)]
pub struct ShopCatalog {
    pub items: Vec<ShopItem>,
}

impl ShopCatalog {
    pub fn get(&self, name: &str) -> Option<&ShopItem> {
        let name = name.trim();
        self.items.iter().find(|item| item.item_name.trim() == name)
    }

    /// Seeds on offer, in catalog order.
    pub fn buy_listings(&self) -> impl Iterator<Item = &ShopItem> {
        self.items.iter().filter(|item| is_seed_name(&item.item_name))
    }

    /// Harvests the player holds at least one of.
    pub fn sell_listings<'a>(
        &'a self,
        inventory: &'a Inventory,
    ) -> impl Iterator<Item = &'a ShopItem> + 'a {
        self.items.iter().filter(move |item| {
            !is_seed_name(&item.item_name) && inventory.harvest_count(item.item_name.trim()) > 0
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SLEEP MENU
// ═══════════════════════════════════════════════════════════════════════

/// Where the sleep menu sends the player in the next scene.
pub const HOUSE_EXIT_SPAWN: &str = "HouseExit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepChoice {
    /// Start the next day and wake up on the farm.
    SleepAndSave,
    /// Save and return to the main menu.
    SaveAndQuit,
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS: cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// Gameplay asks to move to another scene (door, bed, menu button).
#[derive(Event, Debug, Clone)]
pub struct SceneChangeRequest {
    pub scene: SceneId,
    pub spawn_point: String,
}

/// Orchestrator asks the host to load a scene.
#[derive(Event, Debug, Clone)]
pub struct LoadSceneEvent {
    pub scene: SceneId,
}

/// Host reports a scene's layout has been spawned.
#[derive(Event, Debug, Clone)]
pub struct SceneLoadedEvent {
    pub scene: SceneId,
}

/// Host reports the soil tilemap of the active scene now exists.
#[derive(Event, Debug, Clone)]
pub struct SoilTilemapReadyEvent;

/// A transition (or the boot load) finished restoring state.
#[derive(Event, Debug, Clone)]
pub struct SceneTransitionFinished {
    pub scene: SceneId,
}

/// Persist the current world state now (pickups, harvests). Requests made
/// during a scene transition are held until it finishes.
#[derive(Event, Debug, Clone, Default)]
pub struct SaveRequestEvent;

#[derive(Event, Debug, Clone)]
pub struct SeedPickedUpEvent {
    pub pickup: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct HarvestPlantEvent {
    pub plant: Entity,
}

/// Farming reports a seed was collected and its pickup despawned.
#[derive(Event, Debug, Clone)]
pub struct SeedCollectedEvent {
    pub seed_name: String,
    pub translation: Vec3,
}

/// Farming reports a plant was harvested and despawned.
#[derive(Event, Debug, Clone)]
pub struct PlantHarvestedEvent {
    pub plant_type: String,
    pub translation: Vec3,
    pub talking: bool,
}

#[derive(Event, Debug, Clone)]
pub struct WaterPlantEvent {
    pub plant: Entity,
}

#[derive(Event, Debug, Clone)]
pub struct TillSoilEvent {
    pub cell: IVec3,
}

/// Plant `seed_name` from the inventory into a tilled cell.
#[derive(Event, Debug, Clone)]
pub struct PlantSeedEvent {
    pub cell: IVec3,
    pub seed_name: String,
}

/// The player bought one `item_name` from the shop.
#[derive(Event, Debug, Clone)]
pub struct BuyRequestEvent {
    pub item_name: String,
}

/// The player sold one harvested `item_name` to the shop.
#[derive(Event, Debug, Clone)]
pub struct SellRequestEvent {
    pub item_name: String,
}

#[derive(Event, Debug, Clone)]
pub struct SleepMenuEvent {
    pub choice: SleepChoice,
}
