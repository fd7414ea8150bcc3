//! Platformer AI - headless demo.
//!
//! Builds the default stage and lets a scripted player walk right, fighting
//! whatever it meets, until the boss or the player falls.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use platformer_ai::combat::Dead;
use platformer_ai::core::{GameState, PlayerAttackRequest};
use platformer_ai::enemies::{Enemy, Facing};
use platformer_ai::player::Player;

/// Player walking speed in the demo script.
const WALK_SPEED: f32 = 4.0;
/// Distance at which the scripted player stops and swings.
const SWING_DISTANCE: f32 = 1.2;
/// Give up after this many seconds.
const TIME_LIMIT: f32 = 180.0;

fn main() {
    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
            LogPlugin::default(),
            StatesPlugin,
        ))
        // Our game plugin
        .add_plugins(platformer_ai::PlatformerAiPlugin)
        .add_systems(
            Update,
            (scripted_player, time_limit).run_if(in_state(GameState::InGame)),
        )
        .add_systems(OnEnter(GameState::Victory), exit_demo)
        .add_systems(OnEnter(GameState::Defeat), exit_demo)
        .run();
}

/// Walk towards the nearest living enemy ahead and attack it.
fn scripted_player(
    time: Res<Time>,
    mut players: Query<(Entity, &mut Transform, &mut Facing), (With<Player>, Without<Dead>)>,
    enemies: Query<&Transform, (With<Enemy>, Without<Dead>, Without<Player>)>,
    mut attacks: EventWriter<PlayerAttackRequest>,
) {
    let Ok((player, mut transform, mut facing)) = players.get_single_mut() else {
        return;
    };

    let position = transform.translation.truncate();
    let nearest = enemies
        .iter()
        .map(|t| t.translation.truncate())
        .min_by(|a, b| position.distance(*a).total_cmp(&position.distance(*b)));

    let Some(target) = nearest else {
        transform.translation.x += WALK_SPEED * time.delta_secs();
        facing.0 = 1.0;
        return;
    };

    let dx = target.x - position.x;
    facing.0 = if dx < 0.0 { -1.0 } else { 1.0 };

    if dx.abs() > SWING_DISTANCE {
        transform.translation.x += facing.0 * WALK_SPEED * time.delta_secs();
    } else {
        attacks.send(PlayerAttackRequest { player });
    }
}

fn time_limit(time: Res<Time>, mut exit: EventWriter<AppExit>) {
    if time.elapsed_secs() > TIME_LIMIT {
        warn!("Demo timed out");
        exit.send(AppExit::Success);
    }
}

fn exit_demo(state: Res<State<GameState>>, mut exit: EventWriter<AppExit>) {
    info!("Demo finished: {:?}", state.get());
    exit.send(AppExit::Success);
}
