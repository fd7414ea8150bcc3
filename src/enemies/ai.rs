//! Enemy AI systems.
//!
//! These systems feed the per-enemy `BehaviorMachine` with detection results
//! and apply what it decides: movement intent, animation cues and attack
//! intents. All of them run once per frame, chained, before combat resolution.

use bevy::prelude::*;

use super::behavior::{BehaviorFault, BehaviorMachine, ImpactTiming, TickInput, TickOutput};
use super::boss::PhaseController;
use super::components::{
    AnimationDriver, ArenaLatch, AttackProfile, Encounter, EncounterMember, Enemy, EnemyType,
    Facing, GroundProbe, MoveIntent, Targetable, TrackedTarget,
};
use super::detection::{Candidate, DetectionState, Detector};
use crate::combat::{CombatTimer, Dead, Health};
use crate::core::{
    AnimationCue, ArenaEntered, AttackIntent, AttackKind, FocusOn, HitEvent, SummonRequest, Team,
    UiNotice,
};

/// Disable freshly spawned enemies whose attack timing depends on an
/// animation collaborator that isn't there.
pub fn validate_new_enemies(
    mut query: Query<
        (&EnemyType, &mut BehaviorMachine, Has<AnimationDriver>),
        Added<BehaviorMachine>,
    >,
) {
    for (enemy_type, mut machine, has_driver) in query.iter_mut() {
        if machine.config().impact == ImpactTiming::AnimationEvent && !has_driver {
            let fault = BehaviorFault::MissingDependency("animation driver");
            warn!("Disabling {}: {}", enemy_type.0, fault);
            machine.disable(fault);
        }
    }
}

/// Count newly spawned members into their encounter.
pub fn enlist_encounter_members(
    members: Query<&EncounterMember, Added<EncounterMember>>,
    mut encounters: Query<&mut Encounter>,
) {
    for member in members.iter() {
        match encounters.get_mut(member.0) {
            Ok(mut encounter) => encounter.enlist(),
            Err(_) => warn!("Enemy joined missing encounter {:?}", member.0),
        }
    }
}

/// Latch bosses awake when the player walks into their arena.
pub fn engage_boss_on_arena_entry(
    mut arena_events: EventReader<ArenaEntered>,
    mut bosses: Query<(&EnemyType, &mut ArenaLatch)>,
) {
    for event in arena_events.read() {
        let Ok((enemy_type, mut latch)) = bosses.get_mut(event.boss) else {
            continue;
        };
        if !latch.engaged {
            latch.engaged = true;
            info!("Boss {} engaged", enemy_type.0);
        }
    }
}

/// Let enemies react to hits they survived.
pub fn react_to_hits(
    time: Res<Time>,
    mut hits: EventReader<HitEvent>,
    mut machines: Query<&mut BehaviorMachine>,
    mut cues: EventWriter<AnimationCue>,
) {
    let now = time.elapsed_secs();

    for hit in hits.read() {
        let Ok(mut machine) = machines.get_mut(hit.entity) else {
            continue;
        };
        if let Some(cue) = machine.on_hit(now) {
            cues.send(AnimationCue {
                entity: hit.entity,
                cue,
            });
        }
    }
}

/// Pick a target for every enemy and recompute its ranges.
pub fn refresh_detection(
    targets: Query<(Entity, &Transform, &Team, &Targetable), Without<Dead>>,
    mut enemies: Query<
        (
            Entity,
            &Transform,
            &Detector,
            &BehaviorMachine,
            &mut TrackedTarget,
            &mut DetectionState,
            Option<&ArenaLatch>,
        ),
        With<Enemy>,
    >,
) {
    let candidates: Vec<Candidate> = targets
        .iter()
        .filter(|(_, _, team, _)| **team == Team::Player)
        .map(|(entity, transform, _, targetable)| Candidate {
            entity,
            position: transform.translation.truncate(),
            order: targetable.order,
        })
        .collect();

    for (entity, transform, detector, machine, mut tracked, mut detection, latch) in
        enemies.iter_mut()
    {
        if latch.is_some_and(|l| !l.engaged) {
            tracked.0 = None;
            *detection = DetectionState::default();
            continue;
        }

        if let Some(previous) = tracked.0 {
            if !candidates.iter().any(|c| c.entity == previous) {
                debug!("{:?}: {}", entity, BehaviorFault::StaleReference(previous));
                tracked.0 = None;
            }
        }

        let position = transform.translation.truncate();
        let selected = detector.select_target(position, tracked.0, &candidates);
        tracked.0 = selected.map(|c| c.entity);

        *detection = detector.refresh(
            position,
            machine.facing(),
            selected.map(|c| (c.entity, c.position)),
            machine.is_engaged(),
        );
    }
}

/// Tick every behavior machine and publish its decisions.
#[allow(clippy::too_many_arguments)]
pub fn run_behavior(
    mut commands: Commands,
    time: Res<Time>,
    mut enemies: Query<
        (
            Entity,
            &Transform,
            &Health,
            &DetectionState,
            Option<&GroundProbe>,
            &Detector,
            &AttackProfile,
            &mut BehaviorMachine,
            &mut CombatTimer,
            &mut MoveIntent,
            &mut Facing,
            Option<&EncounterMember>,
            Option<&mut PhaseController>,
        ),
        With<Enemy>,
    >,
    summons: Query<(&Health, &EncounterMember)>,
    mut encounters: Query<&mut Encounter>,
    mut cues: EventWriter<AnimationCue>,
    mut intents: EventWriter<AttackIntent>,
    mut focus: EventWriter<FocusOn>,
    mut notices: EventWriter<UiNotice>,
) {
    let now = time.elapsed_secs();
    let mut dismissed = Vec::new();

    for (
        entity,
        transform,
        health,
        detection,
        probe,
        detector,
        profile,
        mut machine,
        mut timer,
        mut move_intent,
        mut facing,
        member,
        controller,
    ) in enemies.iter_mut()
    {
        let position = transform.translation.truncate();
        let input = TickInput {
            now,
            position,
            alive: !health.is_dead(),
            detection: *detection,
            ground_ahead: probe.map_or(true, |p| p.ground_ahead),
        };

        let TickOutput {
            velocity,
            facing: new_facing,
            cues: new_cues,
            attack_started,
            impact,
            died,
            remove,
        } = machine.tick(&input, &mut timer);

        move_intent.0 = velocity;
        facing.0 = new_facing;
        cues.send_batch(new_cues.into_iter().map(|cue| AnimationCue { entity, cue }));

        if let Some(kind) = attack_started {
            debug!("{:?} starts a {:?} attack", entity, kind);
        }

        if let Some(kind) = impact {
            intents.send(attack_intent(entity, position, new_facing, detector, profile, kind));
        }

        if died {
            if let Some(member) = member {
                count_out(member.0, &mut encounters, &mut focus, &mut notices);
            }

            if let Some(mut controller) = controller {
                for minion in controller.take_spawned() {
                    if let Some(mut minion_commands) = commands.get_entity(minion) {
                        minion_commands.despawn_recursive();
                        dismissed.push(minion);
                    }
                }
                info!("Boss {:?} defeated", entity);
                focus.send(FocusOn { entity });
                notices.send(UiNotice::Victory);
            }
        }

        if remove {
            commands.entity(entity).despawn_recursive();
        }
    }

    // Minions removed alive never reach their own death tick. Dead ones
    // count themselves out.
    for minion in dismissed {
        if let Ok((health, member)) = summons.get(minion) {
            if !health.is_dead() {
                count_out(member.0, &mut encounters, &mut focus, &mut notices);
            }
        }
    }
}

/// One member of `encounter` is gone; announce the encounter when it empties.
fn count_out(
    encounter: Entity,
    encounters: &mut Query<&mut Encounter>,
    focus: &mut EventWriter<FocusOn>,
    notices: &mut EventWriter<UiNotice>,
) {
    let Ok(mut state) = encounters.get_mut(encounter) else {
        return;
    };
    if state.notify_killed() {
        info!("Encounter '{}' cleared", state.name);
        focus.send(FocusOn { entity: encounter });
        notices.send(UiNotice::EncounterCleared);
    }
}

/// Advance boss phases from current health and request summons.
pub fn boss_phases(
    mut bosses: Query<
        (Entity, &Transform, &Health, &EnemyType, &mut PhaseController),
        Without<Dead>,
    >,
    mut summons: EventWriter<SummonRequest>,
) {
    for (entity, transform, health, enemy_type, mut controller) in bosses.iter_mut() {
        let Some(change) = controller.observe(health.current()) else {
            continue;
        };

        info!(
            "Boss {} enters phase {} (from {}) at {:.0} health",
            enemy_type.0,
            change.to,
            change.from,
            health.current()
        );

        if change.summon == 0 {
            continue;
        }
        if let Some(archetype) = controller.summon_archetype.clone() {
            summons.send(SummonRequest {
                boss: entity,
                archetype,
                count: change.summon,
                origin: transform.translation.truncate(),
            });
        }
    }
}

/// Build the damage request for an attack that lands now.
pub(crate) fn attack_intent(
    attacker: Entity,
    position: Vec2,
    facing: f32,
    detector: &Detector,
    profile: &AttackProfile,
    kind: AttackKind,
) -> AttackIntent {
    let damage = match kind {
        AttackKind::Normal => profile.damage,
        AttackKind::Special => profile.special_damage,
    };
    AttackIntent {
        attacker,
        kind,
        damage,
        origin: detector.attack_origin(position, facing),
        radius: profile.radius,
        target: Team::Player,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_attacks_use_special_damage_at_mirrored_origin() {
        let detector = Detector {
            attack_offset: Vec2::new(0.6, 0.2),
            ..default()
        };
        let profile = AttackProfile {
            damage: 15.0,
            special_damage: 40.0,
            radius: 0.8,
        };

        let intent = attack_intent(
            Entity::from_raw(1),
            Vec2::new(5.0, 0.0),
            -1.0,
            &detector,
            &profile,
            AttackKind::Special,
        );

        assert_eq!(intent.damage, 40.0);
        assert_eq!(intent.origin, Vec2::new(4.4, 0.2));
        assert_eq!(intent.target, Team::Player);
    }
}
