//! Economy domain: the seed shop.
//!
//! Buying spends wallet money on seeds; selling turns harvests back into
//! money. Both change state the save core persists on the next transition.

use bevy::prelude::*;

use crate::shared::GameState;
use crate::world::transition_idle;

mod shop;

pub use shop::{handle_buy, handle_sell};

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (handle_buy, handle_sell)
                .run_if(in_state(GameState::Playing))
                .run_if(transition_idle),
        );
    }
}
