//! Harvest system: the player collects fully grown plants.

use bevy::prelude::*;
use crate::shared::*;

pub fn handle_harvest(
    mut commands: Commands,
    mut events: EventReader<HarvestPlantEvent>,
    mut plants: Query<(&Name, &Transform, &mut HarvestablePlant)>,
    mut inventory: Option<ResMut<Inventory>>,
    mut harvested: EventWriter<PlantHarvestedEvent>,
) {
    for ev in events.read() {
        let Ok((name, transform, mut plant)) = plants.get_mut(ev.plant) else {
            continue;
        };
        if !plant.is_fully_grown || plant.is_harvested {
            debug!("{} is not ready to harvest", name);
            continue;
        }

        match inventory.as_deref_mut() {
            Some(inventory) => inventory.add_harvest(&plant.harvest_item),
            None => warn!("No inventory to receive harvested {}", plant.harvest_item),
        }
        plant.is_harvested = true;

        harvested.send(PlantHarvestedEvent {
            plant_type: name.as_str().to_string(),
            translation: transform.translation,
            talking: is_talking_plant(name.as_str()),
        });
        commands.entity(ev.plant).despawn_recursive();
        info!("Harvested {}", plant.harvest_item);
    }
}
