//! Plant growth: watered plants advance one stage per interval.

use bevy::prelude::*;
use crate::shared::*;

/// Advance `plant` by `delta` seconds. Returns true if it reached a new stage.
///
/// A plant only grows while watered and loses its water at every stage.
pub fn advance_growth(plant: &mut GrowingPlant, delta: f32) -> bool {
    if plant.stage_count == 0 || plant.is_final_stage() || !plant.is_watered {
        return false;
    }
    plant.timer += delta;
    if plant.timer < plant.time_between_stages {
        return false;
    }
    plant.current_stage += 1;
    plant.timer = 0.0;
    plant.is_watered = false;
    plant.refresh_visuals();
    true
}

pub fn grow_plants(
    time: Res<Time>,
    mut plants: Query<(&Name, &mut GrowingPlant, Option<&mut HarvestablePlant>)>,
) {
    let delta = time.delta_secs();
    for (name, mut growing, harvestable) in &mut plants {
        if !advance_growth(&mut growing, delta) {
            continue;
        }
        debug!("{} grew to stage {}", name, growing.current_stage);
        if growing.is_final_stage() {
            if let Some(mut harvestable) = harvestable {
                harvestable.is_fully_grown = true;
            }
        }
    }
}

pub fn handle_water_plant(
    mut events: EventReader<WaterPlantEvent>,
    mut plants: Query<&mut GrowingPlant>,
) {
    for ev in events.read() {
        if let Ok(mut plant) = plants.get_mut(ev.plant) {
            plant.is_watered = true;
        }
    }
}
