//! Player module - player entity, attack chain, and defeat handling.

mod combat;
mod components;
mod plugin;

pub use combat::spawn_player;
pub use components::*;
pub use plugin::PlayerPlugin;
