//! World plugin - stage loading, arena triggers, and movement.

use bevy::prelude::*;

use crate::combat::{Dead, Knockback};
use crate::core::{ArenaEntered, GameState};
use crate::enemies::{EnemyRegistry, EnemySet, MoveIntent, TargetRegistry};
use crate::player::{Player, PlayerConfig};
use crate::progression::StatModifiers;

use super::builder::{build_stage, BossArena, StageContext, StageEntity};
use super::data::{load_stage_definitions, CurrentStage, StageRegistry};

/// World plugin - handles stage loading and world setup.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StageRegistry>()
            .init_resource::<CurrentStage>()
            .add_systems(Startup, load_stage_definitions)
            .add_systems(OnEnter(GameState::InGame), setup_stage)
            .add_systems(OnExit(GameState::InGame), cleanup_stage)
            .add_systems(
                Update,
                (
                    trigger_boss_arenas.before(EnemySet::Prepare),
                    apply_move_intents.after(EnemySet::Think),
                )
                    .run_if(in_state(GameState::InGame)),
            );
    }
}

/// Set up the current stage from data.
pub fn setup_stage(
    mut commands: Commands,
    stages: Res<StageRegistry>,
    current: Res<CurrentStage>,
    enemies: Res<EnemyRegistry>,
    player_config: Res<PlayerConfig>,
    modifiers: Res<StatModifiers>,
    mut targets: ResMut<TargetRegistry>,
) {
    let Some(stage) = stages.get(&current.0) else {
        error!("Stage '{}' not found in registry!", current.0);
        return;
    };

    info!("Building stage: {}", stage.name);

    let (_, problems) = build_stage(
        &mut commands,
        stage,
        StageContext {
            enemies: &enemies,
            player_config: &player_config,
            modifiers: &modifiers,
            targets: &mut targets,
        },
    );

    for problem in problems {
        error!("{}", problem);
    }
}

/// Clean up stage entities when leaving InGame state.
fn cleanup_stage(mut commands: Commands, stage_query: Query<Entity, With<StageEntity>>) {
    for entity in stage_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

/// Send `ArenaEntered` the first time a living player stands in an arena.
pub fn trigger_boss_arenas(
    players: Query<&Transform, (With<Player>, Without<Dead>)>,
    mut arenas: Query<&mut BossArena>,
    mut entered: EventWriter<ArenaEntered>,
) {
    for mut arena in arenas.iter_mut() {
        if arena.triggered {
            continue;
        }
        if players.iter().any(|t| arena.contains(t.translation.x)) {
            arena.triggered = true;
            entered.send(ArenaEntered { boss: arena.boss });
        }
    }
}

/// Minimal kinematic stand-in for a physics engine: move by intent plus
/// any knockback still in effect.
pub fn apply_move_intents(
    time: Res<Time>,
    mut movers: Query<
        (&mut Transform, Option<&MoveIntent>, Option<&Knockback>),
        Or<(With<MoveIntent>, With<Knockback>)>,
    >,
) {
    let dt = time.delta_secs();
    let now = time.elapsed_secs();

    for (mut transform, intent, knockback) in movers.iter_mut() {
        let push = knockback.and_then(|k| k.velocity_at(now)).unwrap_or_default();
        let velocity = intent.map_or(Vec2::ZERO, |i| i.0) + push;
        transform.translation += (velocity * dt).extend(0.0);
    }
}
