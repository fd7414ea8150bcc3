//! Core game module - states, events, and fundamental systems.
//!
//! This module provides the foundation that all other game systems build upon.

mod config;
mod events;
mod plugin;
mod states;

pub use config::DataPaths;
pub use events::*;
pub use plugin::CorePlugin;
pub use states::*;
