//! Stage building - spawns the player, encounters, and the boss arena.

use bevy::prelude::*;

use super::data::StageDefinition;
use super::error::DataLoadError;
use crate::enemies::{spawn_enemy, Encounter, EnemyRegistry, TargetRegistry};
use crate::player::{spawn_player, PlayerConfig};
use crate::progression::StatModifiers;

/// Marker for everything that belongs to the current stage.
#[derive(Component, Debug, Clone, Copy)]
pub struct StageEntity;

/// Trigger volume that wakes a boss when the player enters it.
#[derive(Component, Debug, Clone)]
pub struct BossArena {
    pub boss: Entity,
    pub min_x: f32,
    pub max_x: f32,
    pub triggered: bool,
}

impl BossArena {
    pub fn contains(&self, x: f32) -> bool {
        (self.min_x..=self.max_x).contains(&x)
    }
}

/// Everything `build_stage` needs besides `Commands`.
pub struct StageContext<'a> {
    pub enemies: &'a EnemyRegistry,
    pub player_config: &'a PlayerConfig,
    pub modifiers: &'a StatModifiers,
    pub targets: &'a mut TargetRegistry,
}

/// Build a stage from data. Returns the player entity.
///
/// Placements naming an unknown archetype are skipped and reported.
pub fn build_stage(
    commands: &mut Commands,
    stage: &StageDefinition,
    ctx: StageContext,
) -> (Entity, Vec<DataLoadError>) {
    let mut problems = Vec::new();

    let player = spawn_player(
        commands,
        stage.player_start(),
        ctx.player_config,
        ctx.modifiers,
        ctx.targets,
    );

    for encounter_def in &stage.encounters {
        let encounter = commands
            .spawn((Encounter::new(encounter_def.name.clone()), StageEntity))
            .id();

        for spawn in &encounter_def.spawns {
            let Some(definition) = ctx.enemies.get(&spawn.archetype) else {
                problems.push(unknown(stage, &spawn.archetype));
                continue;
            };
            let position = Vec2::new(spawn.position.0, spawn.position.1);
            spawn_enemy(commands, definition, &spawn.archetype, position, Some(encounter));
        }
    }

    if let Some(arena) = &stage.boss {
        match ctx.enemies.get(&arena.archetype) {
            Some(definition) => {
                let encounter = commands
                    .spawn((Encounter::new(format!("{} boss", stage.name)), StageEntity))
                    .id();
                let position = Vec2::new(arena.position.0, arena.position.1);
                let boss = spawn_enemy(
                    commands,
                    definition,
                    &arena.archetype,
                    position,
                    Some(encounter),
                );
                commands.spawn((
                    BossArena {
                        boss,
                        min_x: arena.trigger.0,
                        max_x: arena.trigger.1,
                        triggered: false,
                    },
                    StageEntity,
                ));
            }
            None => problems.push(unknown(stage, &arena.archetype)),
        }
    }

    (player, problems)
}

fn unknown(stage: &StageDefinition, archetype: &str) -> DataLoadError {
    DataLoadError::UnknownArchetype {
        stage: stage.name.clone(),
        archetype: archetype.to_string(),
    }
}
