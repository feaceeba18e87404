//! Farming domain: tilling, planting, watering, growth, harvest, seed pickups.
//!
//! Produces the state the save core persists. Communicates with other domains
//! through crate::shared events/resources, and pauses while a scene
//! transition is in flight.

use bevy::prelude::*;

use crate::world::transition_idle;

mod growth;
mod harvest;
mod pickups;
mod soil;

pub use growth::advance_growth;

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                soil::handle_till_soil,
                soil::handle_plant_seed,
                growth::handle_water_plant,
                growth::grow_plants,
                harvest::handle_harvest,
                pickups::handle_seed_pickup,
            )
                .run_if(in_state(crate::shared::GameState::Playing))
                .run_if(transition_idle),
        );
    }
}
