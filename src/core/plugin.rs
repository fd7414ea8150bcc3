//! Core plugin that sets up game states, events, and game-flow systems.

use bevy::prelude::*;

use super::config::DataPaths;
use super::events::*;
use super::states::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, Victory, Defeat)
/// - Data file locations (`DataPaths`, kept if already inserted)
/// - Global events shared by every domain plugin
/// - Outcome handling for UI notices
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Initialize game states
            .init_state::<GameState>()
            .init_resource::<DataPaths>()

            // Register global events
            .add_event::<DamageEvent>()
            .add_event::<HitEvent>()
            .add_event::<DeathEvent>()
            .add_event::<AttackIntent>()
            .add_event::<AnimationCue>()
            .add_event::<AnimationSignal>()
            .add_event::<FocusOn>()
            .add_event::<UiNotice>()
            .add_event::<ArenaEntered>()
            .add_event::<SummonRequest>()
            .add_event::<PlayerAttackRequest>()

            // Loading -> InGame once Startup data loading has run
            .add_systems(OnEnter(GameState::Loading), finish_loading)

            // Terminal outcomes
            .add_systems(
                Update,
                apply_outcome_notices.run_if(in_state(GameState::InGame)),
            );
    }
}

/// Transition from Loading to InGame.
///
/// Definitions are read synchronously on `Startup`, which always runs before
/// the first state transition is applied.
fn finish_loading(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

/// Move to the terminal game state named by a UI notice.
fn apply_outcome_notices(
    mut notices: EventReader<UiNotice>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for notice in notices.read() {
        match notice {
            UiNotice::Victory => {
                info!("Stage boss defeated, showing victory");
                next_state.set(GameState::Victory);
            }
            UiNotice::Defeat => {
                info!("Player defeated, showing defeat");
                next_state.set(GameState::Defeat);
            }
            UiNotice::EncounterCleared => {}
        }
    }
}
