//! Game state definitions that control the overall flow of the simulation.
//!
//! States determine which systems run at any given time. Enemy behavior,
//! combat resolution and the player combo only tick in `InGame`.

use bevy::prelude::*;

/// Main game states.
///
/// - Start in `Loading` while data files are read
/// - Enter `InGame` once loading completes
/// - `Victory` when the stage boss dies
/// - `Defeat` when the player dies
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Active simulation
    InGame,
    /// Stage boss defeated
    Victory,
    /// Player has died
    Defeat,
}
