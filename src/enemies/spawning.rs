//! Enemy spawning from archetype definitions.

use bevy::prelude::*;
use rand::Rng;

use super::behavior::BehaviorMachine;
use super::boss::PhaseController;
use super::components::{
    ArenaLatch, EncounterMember, Enemy, EnemyType, Facing, GroundProbe, MoveIntent, TrackedTarget,
};
use super::data::{EnemyDefinition, EnemyRegistry};
use super::detection::DetectionState;
use crate::combat::{ArmoredWhileAttacking, Health, Hurtbox, Invulnerability, Team};
use crate::core::SummonRequest;
use crate::world::StageEntity;

/// Horizontal spread of summoned minions around the summon point.
const SUMMON_SCATTER: f32 = 1.5;

/// Spawn one enemy of `archetype` at `position`.
///
/// The enemy joins `encounter` if given; it is counted by the encounter
/// once `enlist_encounter_members` has seen it.
pub fn spawn_enemy(
    commands: &mut Commands,
    definition: &EnemyDefinition,
    archetype: &str,
    position: Vec2,
    encounter: Option<Entity>,
) -> Entity {
    let mut entity = commands.spawn((
        Enemy,
        EnemyType(archetype.to_string()),
        Team::Enemy,
        Transform::from_translation(position.extend(0.0)),
        Health::new(definition.max_health),
        Hurtbox {
            radius: definition.hurtbox_radius,
        },
        BehaviorMachine::new(definition.behavior_config(), position),
        definition.combat_timer(),
        definition.detector(),
        DetectionState::default(),
        definition.attack_profile(),
        (
            MoveIntent::default(),
            Facing::default(),
            GroundProbe::default(),
            TrackedTarget::default(),
        ),
        StageEntity,
    ));

    if definition.invulnerability > 0.0 {
        entity.insert(Invulnerability::new(definition.invulnerability));
    }
    if definition.armored_while_attacking {
        entity.insert(ArmoredWhileAttacking);
    }
    if let Some(encounter) = encounter {
        entity.insert(EncounterMember(encounter));
    }
    if let Some(controller) = definition.phase_controller() {
        entity.insert(controller);
        let needs_arena = definition.boss.as_ref().is_some_and(|b| b.arena_trigger);
        entity.insert(ArenaLatch {
            engaged: !needs_arena,
        });
    }

    let id = entity.id();
    info!(
        "Spawned {} ({}) at ({:.1}, {:.1})",
        definition.name, archetype, position.x, position.y
    );
    id
}

/// Spawn minions requested by a boss phase change.
pub fn spawn_summons(
    mut commands: Commands,
    mut requests: EventReader<SummonRequest>,
    registry: Res<EnemyRegistry>,
    mut bosses: Query<(&mut PhaseController, Option<&EncounterMember>)>,
) {
    let mut rng = rand::thread_rng();

    for request in requests.read() {
        let Ok((mut controller, member)) = bosses.get_mut(request.boss) else {
            debug!("Summon request from {:?} ignored: boss is gone", request.boss);
            continue;
        };

        let Some(definition) = registry.get(&request.archetype) else {
            warn!("Unknown summon archetype: {}", request.archetype);
            continue;
        };

        let encounter = member.map(|m| m.0);
        for _ in 0..request.count {
            let offset = rng.gen_range(-SUMMON_SCATTER..=SUMMON_SCATTER);
            let position = request.origin + Vec2::new(offset, 0.0);
            let minion = spawn_enemy(
                &mut commands,
                definition,
                &request.archetype,
                position,
                encounter,
            );
            controller.track_spawned(minion);
        }
    }
}
