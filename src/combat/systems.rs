//! Combat systems - attack resolution and damage handling.

use std::collections::HashSet;

use bevy::prelude::*;

use super::components::*;
use crate::core::GameState;
use crate::enemies::{BehaviorMachine, StatefulEnemy};

/// Speed of the push a hit gives its target, away from the attack origin.
const KNOCKBACK_STRENGTH: f32 = 5.0;

/// System set ordering for combat.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSet {
    /// Turn attack intents into damage events.
    Resolve,
    /// Apply damage to health pools.
    Damage,
}

/// Configure combat systems.
pub fn setup_combat_systems(app: &mut App) {
    app
        // System ordering
        .configure_sets(
            Update,
            (CombatSet::Resolve, CombatSet::Damage)
                .chain()
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(Update, resolve_attack_intents.in_set(CombatSet::Resolve))
        .add_systems(Update, apply_damage.in_set(CombatSet::Damage));
}

/// Reference damage-resolution collaborator.
///
/// Every living actor of the intent's target team whose hurtbox overlaps
/// the intent circle receives one `DamageEvent`.
pub fn resolve_attack_intents(
    mut intents: EventReader<AttackIntent>,
    targets: Query<(Entity, &Transform, &Team, &Hurtbox), Without<Dead>>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    for intent in intents.read() {
        let mut hits = 0;

        for (entity, transform, team, hurtbox) in targets.iter() {
            if entity == intent.attacker || *team != intent.target {
                continue;
            }

            let offset = transform.translation.truncate() - intent.origin;
            if offset.length() > intent.radius + hurtbox.radius {
                continue;
            }

            damage_events.send(DamageEvent {
                target: entity,
                source: intent.attacker,
                amount: intent.damage,
                knockback: offset.normalize_or_zero() * KNOCKBACK_STRENGTH,
            });
            hits += 1;
        }

        debug!(
            "Attack from {:?} ({:?}, {} dmg) hit {} target(s)",
            intent.attacker, intent.kind, intent.damage, hits
        );
    }
}

/// Apply damage to entities.
pub fn apply_damage(
    mut commands: Commands,
    time: Res<Time>,
    mut damage_events: EventReader<DamageEvent>,
    mut health_query: Query<(
        &mut Health,
        Option<&mut Invulnerability>,
        Option<&ArmoredWhileAttacking>,
        Option<&BehaviorMachine>,
    )>,
    mut hit_events: EventWriter<HitEvent>,
    mut death_events: EventWriter<DeathEvent>,
) {
    let now = time.elapsed_secs();

    // Track entities that died this frame to avoid duplicate death events
    let mut died_this_frame = HashSet::new();

    for event in damage_events.read() {
        if died_this_frame.contains(&event.target) {
            continue;
        }

        let Ok((mut health, invulnerability, armored, machine)) =
            health_query.get_mut(event.target)
        else {
            continue;
        };

        if health.is_dead() {
            continue;
        }

        if invulnerability.as_ref().is_some_and(|i| i.is_active(now)) {
            debug!("Hit on {:?} ignored: invulnerable", event.target);
            continue;
        }

        if armored.is_some() && machine.is_some_and(|m| m.is_attack_locked(now)) {
            debug!("Hit on {:?} ignored: armored while attacking", event.target);
            continue;
        }

        let result = health.apply_damage(event.amount);
        if let Some(mut invulnerability) = invulnerability {
            invulnerability.arm(now);
        }

        if result.became_dead {
            died_this_frame.insert(event.target);
            commands.entity(event.target).insert(Dead);
            death_events.send(DeathEvent {
                entity: event.target,
                killed_by: Some(event.source),
            });
            info!("{:?} killed by {:?}", event.target, event.source);
        } else if result.applied > 0.0 {
            if event.knockback != Vec2::ZERO {
                commands
                    .entity(event.target)
                    .try_insert(Knockback::new(event.knockback, now));
            }
            hit_events.send(HitEvent {
                entity: event.target,
                amount: result.applied,
                remaining: result.new_health,
            });
        }
    }
}
