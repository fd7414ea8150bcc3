//! Combat module - health, invulnerability, attack timing, and damage.

mod components;
mod plugin;
mod systems;
mod timer;

pub use components::*;
pub use plugin::CombatPlugin;
pub use systems::CombatSet;
pub use timer::CombatTimer;
