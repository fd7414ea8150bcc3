//! Player spawning, attacks, and defeat handling.

use bevy::prelude::*;

use super::components::*;
use crate::combat::{CombatSet, Dead, Health, Hurtbox, Invulnerability, Team};
use crate::core::{AttackIntent, AttackKind, DeathEvent, GameState, PlayerAttackRequest, UiNotice};
use crate::enemies::{Facing, TargetRegistry};
use crate::progression::StatModifiers;
use crate::world::StageEntity;

/// Set up player combat systems.
pub fn setup_player_systems(app: &mut App) {
    app.init_resource::<PlayerConfig>()
        .add_systems(
            Update,
            handle_attack_requests
                .before(CombatSet::Resolve)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            Update,
            (start_defeat_countdown, tick_defeat_countdown)
                .chain()
                .after(CombatSet::Damage)
                .run_if(in_state(GameState::InGame)),
        );
}

/// Spawn the player with upgrade bonuses applied.
pub fn spawn_player(
    commands: &mut Commands,
    position: Vec2,
    config: &PlayerConfig,
    modifiers: &StatModifiers,
    targets: &mut TargetRegistry,
) -> Entity {
    let health = Health::new(config.max_health).with_bonus(modifiers.health_bonus);
    info!(
        "Spawning player at ({:.1}, {:.1}) with {:.0} health, +{:.0} damage",
        position.x,
        position.y,
        health.maximum(),
        modifiers.damage_bonus
    );

    commands
        .spawn((
            Player,
            Team::Player,
            Transform::from_translation(position.extend(0.0)),
            health,
            Invulnerability::new(config.invulnerability),
            Hurtbox::default(),
            PlayerCombat::with_bonus(modifiers.damage_bonus),
            Facing::default(),
            targets.register(),
            StageEntity,
        ))
        .id()
}

/// Turn accepted attack presses into attack intents against enemies.
pub fn handle_attack_requests(
    time: Res<Time>,
    config: Res<PlayerConfig>,
    mut requests: EventReader<PlayerAttackRequest>,
    mut players: Query<(&Transform, &Facing, &mut PlayerCombat), (With<Player>, Without<Dead>)>,
    mut intents: EventWriter<AttackIntent>,
) {
    let now = time.elapsed_secs();

    for request in requests.read() {
        let Ok((transform, facing, mut combat)) = players.get_mut(request.player) else {
            continue;
        };

        let Some(step) = combat.try_attack(now, &config) else {
            continue;
        };

        let kind = if step == CHAIN_LENGTH {
            AttackKind::Special
        } else {
            AttackKind::Normal
        };
        let origin = transform.translation.truncate()
            + Vec2::new(facing.0.signum() * config.attack_reach, 0.0);

        intents.send(AttackIntent {
            attacker: request.player,
            kind,
            damage: combat.damage_for(step, &config),
            origin,
            radius: config.attack_radius,
            target: Team::Enemy,
        });
        debug!("Player attack {} at ({:.1}, {:.1})", step, origin.x, origin.y);
    }
}

/// Start the defeat countdown when the player dies.
pub fn start_defeat_countdown(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    mut deaths: EventReader<DeathEvent>,
    players: Query<(), With<Player>>,
) {
    for death in deaths.read() {
        if players.get(death.entity).is_err() {
            continue;
        }
        info!("Player died");
        commands.entity(death.entity).insert(DefeatCountdown {
            at: time.elapsed_secs() + config.defeat_delay,
        });
    }
}

/// Show the defeat notice once the countdown ran out.
pub fn tick_defeat_countdown(
    mut commands: Commands,
    time: Res<Time>,
    countdowns: Query<(Entity, &DefeatCountdown)>,
    mut notices: EventWriter<UiNotice>,
) {
    let now = time.elapsed_secs();
    for (entity, countdown) in countdowns.iter() {
        if now >= countdown.at {
            commands.entity(entity).remove::<DefeatCountdown>();
            notices.send(UiNotice::Defeat);
        }
    }
}
