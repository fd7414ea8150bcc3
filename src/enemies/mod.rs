//! Enemies module - behavior machines, detection, bosses, and spawning.

mod ai;
pub mod animation;
pub mod behavior;
pub mod boss;
mod components;
pub mod data;
pub mod detection;
mod plugin;
mod spawning;

pub use behavior::{
    BehaviorConfig, BehaviorFault, BehaviorMachine, BehaviorState, ImpactTiming, Locomotion,
    StatefulEnemy, TickInput, TickOutput,
};
pub use boss::{PhaseChange, PhaseController};
pub use components::*;
pub use data::{EnemyDefinition, EnemyRegistry};
pub use detection::{Candidate, DetectionState, Detector};
pub use plugin::{EnemyPlugin, EnemySet};
pub use spawning::spawn_enemy;
