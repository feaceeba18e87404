//! The persisted world snapshot and its JSON codec.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::SaveError;
use super::position_id::PositionId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCount {
    pub item_name: String,
    pub count: i32,
}

impl ItemCount {
    pub fn new(item_name: impl Into<String>, count: i32) -> Self {
        Self {
            item_name: item_name.into(),
            count,
        }
    }
}

/// Integer grid cell of the soil tilemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl From<IVec3> for CellCoord {
    fn from(v: IVec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl From<CellCoord> for IVec3 {
    fn from(c: CellCoord) -> Self {
        IVec3::new(c.x, c.y, c.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for WorldPosition {
    fn from(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl From<WorldPosition> for Vec3 {
    fn from(p: WorldPosition) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantRecord {
    pub plant_type: String,
    pub position: WorldPosition,
    pub growth_stage: i32,
    pub is_watered: bool,
    pub is_fully_grown: bool,
    pub is_harvested: bool,
}

impl PlantRecord {
    pub fn position_id(&self) -> PositionId {
        PositionId::from_xy(self.position.x, self.position.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedPickupRecord {
    pub seed_name: String,
    pub position: WorldPosition,
    pub is_picked_up: bool,
}

impl SeedPickupRecord {
    pub fn position_id(&self) -> PositionId {
        PositionId::from_xy(self.position.x, self.position.y)
    }
}

/// Everything the game persists between sessions and across scene loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub money: i32,
    pub time_of_day: f32,
    /// Day counter, advanced by sleeping. Starts at 1.
    pub day: i32,
    pub inventory_items: Vec<ItemCount>,
    pub harvested_items: Vec<ItemCount>,
    pub tilled_soil_positions: Vec<CellCoord>,
    pub plants: Vec<PlantRecord>,
    pub seed_pickups: Vec<SeedPickupRecord>,
    pub selected_seed: String,
    pub selected_tool: String,
    pub has_watering_can: bool,
    pub has_hoe_tool: bool,
    pub harvested_talking_plant_position_ids: Vec<String>,
    /// Set once soil and plants have been captured in the farm scene. An
    /// empty list then means "nothing there" rather than "never captured".
    pub farm_state_captured: bool,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            money: 0,
            time_of_day: 0.0,
            day: 1,
            inventory_items: Vec::new(),
            harvested_items: Vec::new(),
            tilled_soil_positions: Vec::new(),
            plants: Vec::new(),
            seed_pickups: Vec::new(),
            selected_seed: String::new(),
            selected_tool: String::new(),
            has_watering_can: true,
            has_hoe_tool: true,
            harvested_talking_plant_position_ids: Vec::new(),
            farm_state_captured: false,
        }
    }
}

impl Snapshot {
    pub fn encode(&self) -> Result<String, SaveError> {
        serde_json::to_string_pretty(self).map_err(|e| SaveError::Encode(e.to_string()))
    }

    pub fn decode(json: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn record_counts(&self) -> RecordCounts {
        RecordCounts {
            inventory_items: self.inventory_items.len(),
            harvested_items: self.harvested_items.len(),
            tilled_soil: self.tilled_soil_positions.len(),
            plants: self.plants.len(),
            seed_pickups: self.seed_pickups.len(),
            harvested_talking_plants: self.harvested_talking_plant_position_ids.len(),
        }
    }
}

/// Per-list entry counts, compared after a save to catch truncated writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordCounts {
    pub inventory_items: usize,
    pub harvested_items: usize,
    pub tilled_soil: usize,
    pub plants: usize,
    pub seed_pickups: usize,
    pub harvested_talking_plants: usize,
}

impl fmt::Display for RecordCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} items, {} harvests, {} soil, {} plants, {} pickups, {} talking harvested",
            self.inventory_items,
            self.harvested_items,
            self.tilled_soil,
            self.plants,
            self.seed_pickups,
            self.harvested_talking_plants
        )
    }
}
