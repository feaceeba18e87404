//! Sleep menu: end the day or quit, always through the transition guard.

use bevy::prelude::*;

use super::transition::SceneTransition;
use crate::shared::*;

/// Sleeping starts the next day and wakes up on the farm; quitting returns
/// to the main menu. Either way the player leaves through the house exit and
/// the outgoing scene is saved by the transition. The day only advances when
/// the transition is accepted.
pub fn handle_sleep_menu(
    mut events: EventReader<SleepMenuEvent>,
    mut transition: ResMut<SceneTransition>,
    mut clock: Option<ResMut<DayClock>>,
    config: Res<PersistenceConfig>,
    time: Res<Time>,
) {
    for ev in events.read() {
        let target = match ev.choice {
            SleepChoice::SleepAndSave => config.farm_scene,
            SleepChoice::SaveAndQuit => SceneId::MainMenu,
        };
        if let Err(reason) = transition.try_begin(
            time.elapsed_secs(),
            config.transition_cooldown_secs,
            target,
            HOUSE_EXIT_SPAWN,
        ) {
            info!("Ignoring {:?}: {}", ev.choice, reason);
            continue;
        }

        match (ev.choice, clock.as_deref_mut()) {
            (SleepChoice::SleepAndSave, Some(clock)) => {
                clock.advance_day();
                info!("Slept until day {}", clock.day());
            }
            (SleepChoice::SleepAndSave, None) => {
                warn!("No day clock in this scene, day not advanced");
            }
            (SleepChoice::SaveAndQuit, _) => info!("Saving and quitting to the main menu"),
        }
    }
}
