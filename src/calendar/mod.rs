//! Calendar domain: advances the day clock of scenes that own one.

use bevy::prelude::*;

use crate::shared::*;

pub struct CalendarPlugin;

impl Plugin for CalendarPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            tick_day_clock.run_if(in_state(GameState::Playing)),
        );
    }
}

/// Scenes without a clock (the main menu) simply have no `DayClock`.
pub fn tick_day_clock(time: Res<Time>, clock: Option<ResMut<DayClock>>) {
    let Some(mut clock) = clock else {
        return;
    };
    let before = clock.phase();
    clock.tick(time.delta_secs());
    let after = clock.phase();
    if before != after {
        debug!("Time of day is now {:?}", after);
    }
}
