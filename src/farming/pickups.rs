use bevy::prelude::*;
use crate::shared::*;

/// Move a picked-up seed into the inventory and remove it from the scene.
pub fn handle_seed_pickup(
    mut commands: Commands,
    mut events: EventReader<SeedPickedUpEvent>,
    pickups: Query<(&SeedPickup, &Transform)>,
    mut inventory: Option<ResMut<Inventory>>,
    mut collected: EventWriter<SeedCollectedEvent>,
) {
    for ev in events.read() {
        let Ok((pickup, transform)) = pickups.get(ev.pickup) else {
            continue;
        };
        let Some(inventory) = inventory.as_deref_mut() else {
            warn!("No inventory here, {} left on the ground", pickup.seed_name);
            continue;
        };

        inventory.add_item(&pickup.seed_name);
        collected.send(SeedCollectedEvent {
            seed_name: pickup.seed_name.clone(),
            translation: transform.translation,
        });
        commands.entity(ev.pickup).despawn_recursive();
    }
}
