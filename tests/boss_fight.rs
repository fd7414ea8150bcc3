mod common;

use bevy::prelude::*;

use common::*;
use platformer_ai::core::{ArenaEntered, AttackIntent, DamageEvent, FocusOn, GameState, UiNotice};
use platformer_ai::enemies::{ArenaLatch, Encounter, EnemyType, PhaseController};
use platformer_ai::player::Player;

fn hit(app: &mut App, target: Entity, amount: f32) {
    app.world_mut().send_event(DamageEvent {
        target,
        source: Entity::PLACEHOLDER,
        amount,
        knockback: Vec2::ZERO,
    });
}

fn bats(app: &mut App) -> usize {
    let mut query = app.world_mut().query::<&EnemyType>();
    query.iter(app.world()).filter(|t| t.0 == "bat").count()
}

fn game_state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

#[test]
fn boss_waits_for_the_arena_trigger() {
    let mut app = empty_arena();
    record_events::<AttackIntent>(&mut app);

    add_player(&mut app, Vec2::new(1.5, 0.0));
    let boss = add_enemy(&mut app, "knight_boss", Vec2::ZERO, None);

    run_for(&mut app, 2.0);
    assert!(!recorded::<AttackIntent>(&app)
        .iter()
        .any(|i| i.attacker == boss));

    app.world_mut().send_event(ArenaEntered { boss });
    run_for(&mut app, 1.0);
    assert!(recorded::<AttackIntent>(&app)
        .iter()
        .any(|i| i.attacker == boss));
}

#[test]
fn walking_into_the_arena_wakes_the_boss() {
    let mut app = app_headless("forest");
    record_events::<ArenaEntered>(&mut app);
    app.update();

    let mut players = app.world_mut().query_filtered::<&mut Transform, With<Player>>();
    players.single_mut(app.world_mut()).translation.x = 35.0;
    app.update();

    let entered = recorded::<ArenaEntered>(&app);
    assert_eq!(entered.len(), 1);

    let mut bosses = app.world_mut().query_filtered::<Entity, With<PhaseController>>();
    let boss = bosses.single(app.world());
    assert_eq!(entered[0].boss, boss);
    assert!(app.world().get::<ArenaLatch>(boss).unwrap().engaged);

    // Standing in the arena does not fire again.
    run_for(&mut app, 0.5);
    assert_eq!(recorded::<ArenaEntered>(&app).len(), 1);
}

#[test]
fn phase_two_summons_once_and_death_cleans_up() {
    let mut app = empty_arena();
    record_events::<UiNotice>(&mut app);
    let boss = add_enemy(&mut app, "knight_boss", Vec2::ZERO, None);
    app.update();

    hit(&mut app, boss, 55.0);
    run_for(&mut app, 0.2);
    assert_eq!(app.world().get::<PhaseController>(boss).unwrap().phase(), 2);
    assert_eq!(bats(&mut app), 3);

    // Past the invulnerability window, still in phase two.
    run_for(&mut app, 0.6);
    hit(&mut app, boss, 10.0);
    run_for(&mut app, 0.2);
    assert_eq!(bats(&mut app), 3);

    run_for(&mut app, 0.6);
    hit(&mut app, boss, 200.0);
    for _ in 0..10 {
        app.update();
        if recorded::<UiNotice>(&app).contains(&UiNotice::Victory) {
            break;
        }
    }
    assert!(recorded::<UiNotice>(&app).contains(&UiNotice::Victory));
    assert_eq!(bats(&mut app), 0);

    run_for(&mut app, 0.2);
    assert_eq!(game_state(&app), GameState::Victory);
}

#[test]
fn boss_encounter_clears_when_the_boss_takes_its_summons_along() {
    let mut app = empty_arena();
    record_events::<UiNotice>(&mut app);
    record_events::<FocusOn>(&mut app);

    let encounter = app.world_mut().spawn(Encounter::new("boss")).id();
    let boss = add_enemy(&mut app, "knight_boss", Vec2::ZERO, Some(encounter));
    app.update();

    hit(&mut app, boss, 55.0);
    run_for(&mut app, 0.2);
    assert_eq!(bats(&mut app), 3);
    assert_eq!(app.world().get::<Encounter>(encounter).unwrap().remaining(), 4);

    run_for(&mut app, 0.6);
    hit(&mut app, boss, 200.0);
    run_for(&mut app, 0.3);

    assert_eq!(bats(&mut app), 0);
    assert_eq!(app.world().get::<Encounter>(encounter).unwrap().remaining(), 0);

    let notices = recorded::<UiNotice>(&app);
    let cleared = notices
        .iter()
        .filter(|n| **n == UiNotice::EncounterCleared)
        .count();
    assert_eq!(cleared, 1);
    assert!(notices.contains(&UiNotice::Victory));
    assert!(recorded::<FocusOn>(&app).iter().any(|f| f.entity == encounter));
}
