//! Platformer AI - enemy behavior for a 2D action platformer, built on Bevy.
//!
//! Enemies patrol, chase, attack in combos, stagger, die, and bosses change
//! phase and summon minions. Physics, rendering, and animation playback stay
//! outside: the crate consumes positions and animation signals and produces
//! movement intents, animation cues, and attack intents.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, data paths
//! - **Combat**: Health, damage resolution, invulnerability, combat timers
//! - **Enemies**: Detection, behavior machines, bosses, archetype data
//! - **Player**: Attack chain, defeat flow
//! - **Progression**: Coins, upgrades, save file
//! - **World**: Stages, encounters, arena triggers

pub mod combat;
pub mod core;
pub mod enemies;
pub mod player;
pub mod progression;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
///
/// Needs the `StatesPlugin` and a `Time` source (e.g. `MinimalPlugins`).
pub struct PlatformerAiPlugin;

impl Plugin for PlatformerAiPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Combat systems
            .add_plugins(combat::CombatPlugin)

            // Enemy systems
            .add_plugins(enemies::EnemyPlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Progression and saves
            .add_plugins(progression::ProgressionPlugin)

            // World systems
            .add_plugins(world::WorldPlugin);
    }
}
