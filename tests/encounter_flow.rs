mod common;

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;

use common::*;
use platformer_ai::combat::{Health, Knockback};
use platformer_ai::core::{
    AnimationCue, AnimationSignal, AttackIntent, Cue, DamageEvent, FocusOn, GameState, Signal,
    UiNotice,
};
use platformer_ai::enemies::{
    spawn_enemy, AnimationDriver, ArenaLatch, BehaviorFault, BehaviorMachine, Encounter, Enemy,
    EnemyRegistry, EnemyType, ImpactTiming,
};
use platformer_ai::player::Player;

fn hit(app: &mut App, target: Entity, amount: f32) {
    app.world_mut().send_event(DamageEvent {
        target,
        source: Entity::PLACEHOLDER,
        amount,
        knockback: Vec2::ZERO,
    });
}

/// A golem whose slam waits for the animation's impact frame.
fn animated_golem(app: &mut App, position: Vec2, with_driver: bool) -> Entity {
    app.world_mut()
        .run_system_once(move |mut commands: Commands, registry: Res<EnemyRegistry>| {
            let mut definition = registry.get("golem").expect("golem loaded").clone();
            definition.attack.impact = ImpactTiming::AnimationEvent;
            let golem = spawn_enemy(&mut commands, &definition, "golem", position, None);
            if with_driver {
                commands.entity(golem).insert(AnimationDriver);
            }
            golem
        })
        .expect("spawn golem")
}

fn x_of(app: &App, entity: Entity) -> f32 {
    app.world().get::<Transform>(entity).unwrap().translation.x
}

#[test]
fn forest_stage_builds_from_data() {
    let mut app = app_headless("forest");
    app.update();

    assert_eq!(
        *app.world().resource::<State<GameState>>().get(),
        GameState::InGame
    );
    assert_eq!(count::<Player>(&mut app), 1);
    assert_eq!(count::<Enemy>(&mut app), 5);
    assert_eq!(count::<Encounter>(&mut app), 3);

    let mut latches = app.world_mut().query::<&ArenaLatch>();
    let latches: Vec<_> = latches.iter(app.world()).collect();
    assert_eq!(latches.len(), 1);
    assert!(!latches[0].engaged);
}

#[test]
fn patroller_walks_up_and_hurts_the_player() {
    let mut app = empty_arena();
    record_events::<AttackIntent>(&mut app);

    let player = add_player(&mut app, Vec2::ZERO);
    let patroller = add_enemy(&mut app, "patroller", Vec2::new(3.0, 0.0), None);

    run_for(&mut app, 3.0);

    let intents = recorded::<AttackIntent>(&app);
    assert!(intents.iter().any(|i| i.attacker == patroller));

    let health = app.world().get::<Health>(player).unwrap();
    assert!(health.current() < 100.0);
}

#[test]
fn last_kill_clears_the_encounter_once() {
    let mut app = empty_arena();
    record_events::<UiNotice>(&mut app);
    record_events::<FocusOn>(&mut app);

    let encounter = app.world_mut().spawn(Encounter::new("gate")).id();
    let a = add_enemy(&mut app, "patroller", Vec2::new(50.0, 0.0), Some(encounter));
    let b = add_enemy(&mut app, "patroller", Vec2::new(55.0, 0.0), Some(encounter));
    app.update();
    assert_eq!(app.world().get::<Encounter>(encounter).unwrap().remaining(), 2);

    hit(&mut app, a, 100.0);
    app.update();
    assert!(recorded::<UiNotice>(&app).is_empty());

    hit(&mut app, b, 100.0);
    run_for(&mut app, 0.2);

    let cleared = recorded::<UiNotice>(&app)
        .into_iter()
        .filter(|n| *n == UiNotice::EncounterCleared)
        .count();
    assert_eq!(cleared, 1);
    assert!(recorded::<FocusOn>(&app).iter().any(|f| f.entity == encounter));

    // Removed after the death delay.
    run_for(&mut app, 1.5);
    assert!(app.world().get_entity(a).is_err());
    assert!(app.world().get_entity(b).is_err());
}

#[test]
fn player_death_leads_to_defeat() {
    let mut app = empty_arena();
    let player = add_player(&mut app, Vec2::ZERO);

    hit(&mut app, player, 500.0);
    run_for(&mut app, 0.5);
    assert_eq!(
        *app.world().resource::<State<GameState>>().get(),
        GameState::InGame
    );

    run_for(&mut app, 1.0);
    assert_eq!(
        *app.world().resource::<State<GameState>>().get(),
        GameState::Defeat
    );
}

#[test]
fn animation_timed_enemy_without_driver_is_disabled() {
    let mut app = empty_arena();
    let golem = animated_golem(&mut app, Vec2::ZERO, false);
    app.update();

    let machine = app.world().get::<BehaviorMachine>(golem).unwrap();
    assert!(!machine.is_enabled());
    assert_eq!(
        machine.fault(),
        Some(&BehaviorFault::MissingDependency("animation driver"))
    );
}

#[test]
fn impact_frame_signal_delivers_the_hit() {
    let mut app = empty_arena();
    record_events::<AnimationCue>(&mut app);
    record_events::<AttackIntent>(&mut app);

    add_player(&mut app, Vec2::ZERO);
    let golem = animated_golem(&mut app, Vec2::new(-1.0, 0.0), true);

    run_for(&mut app, 0.5);

    let swung = recorded::<AnimationCue>(&app)
        .iter()
        .any(|c| c.entity == golem && matches!(c.cue, Cue::PlayAttack { .. }));
    assert!(swung);
    assert!(!recorded::<AttackIntent>(&app)
        .iter()
        .any(|i| i.attacker == golem));

    app.world_mut().send_event(AnimationSignal {
        entity: golem,
        signal: Signal::AttackImpactFrame,
    });
    app.update();

    let intents: Vec<_> = recorded::<AttackIntent>(&app)
        .into_iter()
        .filter(|i| i.attacker == golem)
        .collect();
    assert_eq!(intents.len(), 1);
    assert_eq!(intents[0].damage, 15.0);
}

#[test]
fn ruins_golem_attacks_when_built_from_the_stage() {
    let mut app = app_headless("ruins");
    record_events::<AttackIntent>(&mut app);
    app.update();

    let mut golems = app.world_mut().query::<(Entity, &EnemyType)>();
    let golem = golems
        .iter(app.world())
        .find(|(_, t)| t.0 == "golem")
        .map(|(e, _)| e)
        .expect("golem placed");
    assert!(app.world().get::<BehaviorMachine>(golem).unwrap().is_enabled());

    let mut players = app.world_mut().query_filtered::<&mut Transform, With<Player>>();
    players.single_mut(app.world_mut()).translation.x = 9.0;
    run_for(&mut app, 3.0);

    assert!(recorded::<AttackIntent>(&app)
        .iter()
        .any(|i| i.attacker == golem));
}

#[test]
fn hits_push_the_target_for_a_moment() {
    let mut app = empty_arena();
    let player = add_player(&mut app, Vec2::ZERO);

    app.world_mut().send_event(DamageEvent {
        target: player,
        source: Entity::PLACEHOLDER,
        amount: 5.0,
        knockback: Vec2::new(5.0, 0.0),
    });
    run_for(&mut app, 0.1);
    assert!(app.world().get::<Knockback>(player).is_some());
    assert!(x_of(&app, player) > 0.0);

    run_for(&mut app, 0.3);
    let settled = x_of(&app, player);
    assert!(settled < 2.0);

    run_for(&mut app, 0.5);
    assert_eq!(x_of(&app, player), settled);
}
