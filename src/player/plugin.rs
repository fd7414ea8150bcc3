//! Player plugin - attacks and defeat flow.

use bevy::prelude::*;

use super::combat;

/// Player plugin - handles player attacks and the defeat countdown.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        combat::setup_player_systems(app);
    }
}
