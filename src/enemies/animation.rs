//! Bridge between the animation collaborator and the behavior machines.
//!
//! Outbound cues are sent by `ai::run_behavior` straight from tick output.
//! This module handles the inbound direction: animation-authored moments
//! (attack state enter/exit, impact frame) are routed to the
//! `StatefulEnemy` hooks, and an impact frame becomes an `AttackIntent`.

use bevy::prelude::*;

use super::ai::attack_intent;
use super::behavior::{BehaviorMachine, StatefulEnemy};
use super::components::{AnimationDriver, AttackProfile, Facing};
use super::detection::Detector;
use crate::core::{AnimationSignal, AttackIntent, Signal};

/// Route animation signals to the behavior hooks.
pub fn route_animation_signals(
    mut signals: EventReader<AnimationSignal>,
    mut enemies: Query<
        (&Transform, &Facing, &Detector, &AttackProfile, &mut BehaviorMachine),
        With<AnimationDriver>,
    >,
    mut intents: EventWriter<AttackIntent>,
) {
    for AnimationSignal { entity, signal } in signals.read() {
        let Ok((transform, facing, detector, profile, mut machine)) = enemies.get_mut(*entity)
        else {
            debug!("Animation signal {:?} for unknown driver {:?}", signal, entity);
            continue;
        };

        let result = match signal {
            Signal::AttackStateEnter => machine.on_attack_state_enter(),
            Signal::AttackStateExit => machine.on_attack_state_exit(),
            Signal::AttackImpactFrame => machine.on_attack_impact_frame().map(|kind| {
                intents.send(attack_intent(
                    *entity,
                    transform.translation.truncate(),
                    facing.0,
                    detector,
                    profile,
                    kind,
                ));
            }),
        };

        if let Err(fault) = result {
            debug!("Animation signal {:?} on {:?} ignored: {}", signal, entity, fault);
        }
    }
}
