//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai;
use super::animation;
use super::components::TargetRegistry;
use super::data::{load_enemy_definitions, EnemyRegistry};
use super::spawning::spawn_summons;
use crate::combat::CombatSet;
use crate::core::GameState;

/// Ordering of enemy systems inside a frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnemySet {
    /// Bookkeeping for newly spawned enemies and incoming events.
    Prepare,
    /// Detection and behavior ticks.
    Think,
    /// Boss phases and summons.
    Boss,
}

/// Enemy plugin - handles archetype loading, AI, bosses, and the animation bridge.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<EnemyRegistry>()
            .init_resource::<TargetRegistry>()
            // Definitions are needed before the first stage is built
            .add_systems(Startup, load_enemy_definitions)
            .configure_sets(
                Update,
                (EnemySet::Prepare, EnemySet::Think, EnemySet::Boss)
                    .chain()
                    .before(CombatSet::Resolve)
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(
                Update,
                (
                    ai::validate_new_enemies,
                    ai::enlist_encounter_members,
                    ai::engage_boss_on_arena_entry,
                    ai::react_to_hits,
                    animation::route_animation_signals,
                )
                    .chain()
                    .in_set(EnemySet::Prepare),
            )
            .add_systems(
                Update,
                (ai::refresh_detection, ai::run_behavior)
                    .chain()
                    .in_set(EnemySet::Think),
            )
            .add_systems(
                Update,
                (ai::boss_phases, spawn_summons)
                    .chain()
                    .in_set(EnemySet::Boss),
            );
    }
}
