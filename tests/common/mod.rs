//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` + `StatesPlugin` provide the ECS runtime.
//! - time advances by a fixed step per `update()`.
//! - data comes from the shipped `assets/`, saves go to a temp file.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use platformer_ai::core::DataPaths;
use platformer_ai::enemies::{spawn_enemy, EnemyRegistry, TargetRegistry};
use platformer_ai::player::{spawn_player, PlayerConfig};
use platformer_ai::progression::StatModifiers;
use platformer_ai::world::CurrentStage;
use platformer_ai::PlatformerAiPlugin;

/// Simulated seconds per `update()`.
pub const DT: f32 = 0.05;

/// A stage name no file provides, for hand-built scenarios.
pub const EMPTY_STAGE: &str = "empty";

static SAVE_COUNTER: AtomicU32 = AtomicU32::new(0);

fn temp_save_file() -> PathBuf {
    let n = SAVE_COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "platformer-ai-test-{}-{}.ron",
        std::process::id(),
        n
    ))
}

/// Headless app that builds `stage` on entering the game. Not yet updated.
pub fn app_headless(stage: &str) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(DT)));
    app.insert_resource(DataPaths {
        enemies_dir: PathBuf::from("assets/data/enemies"),
        stages_dir: PathBuf::from("assets/data/stages"),
        save_file: temp_save_file(),
    });
    app.insert_resource(CurrentStage(stage.to_string()));
    app.add_plugins(PlatformerAiPlugin);
    app
}

/// Headless app that ran its startup and is in `InGame` with nothing spawned.
pub fn empty_arena() -> App {
    let mut app = app_headless(EMPTY_STAGE);
    app.update();
    app
}

/// Advance the simulation by roughly `seconds`.
pub fn run_for(app: &mut App, seconds: f32) {
    let frames = (seconds / DT).ceil() as u32;
    for _ in 0..frames {
        app.update();
    }
}

pub fn add_player(app: &mut App, position: Vec2) -> Entity {
    app.world_mut()
        .run_system_once(
            move |mut commands: Commands,
                  config: Res<PlayerConfig>,
                  modifiers: Res<StatModifiers>,
                  mut targets: ResMut<TargetRegistry>| {
                spawn_player(&mut commands, position, &config, &modifiers, &mut targets)
            },
        )
        .expect("spawn player")
}

pub fn add_enemy(
    app: &mut App,
    archetype: &'static str,
    position: Vec2,
    encounter: Option<Entity>,
) -> Entity {
    app.world_mut()
        .run_system_once(move |mut commands: Commands, registry: Res<EnemyRegistry>| {
            let definition = registry.get(archetype).expect("archetype loaded");
            spawn_enemy(&mut commands, definition, archetype, position, encounter)
        })
        .expect("spawn enemy")
}

/// Every event of type `E` seen since recording started.
#[derive(Resource)]
pub struct Recorded<E: Event>(pub Vec<E>);

impl<E: Event> Default for Recorded<E> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

fn record<E: Event + Clone>(mut reader: EventReader<E>, mut recorded: ResMut<Recorded<E>>) {
    recorded.0.extend(reader.read().cloned());
}

/// Start recording events of type `E`.
pub fn record_events<E: Event + Clone>(app: &mut App) {
    app.init_resource::<Recorded<E>>()
        .add_systems(Last, record::<E>);
}

pub fn recorded<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world().resource::<Recorded<E>>().0.clone()
}

/// Number of live entities with component `C`.
pub fn count<C: Component>(app: &mut App) -> usize {
    let mut query = app.world_mut().query_filtered::<(), With<C>>();
    query.iter(app.world()).count()
}
