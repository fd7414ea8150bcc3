//! World module - stage data, stage building, and arena triggers.

mod builder;
mod data;
mod error;
mod plugin;

pub use builder::{build_stage, BossArena, StageContext, StageEntity};
pub use data::{BossArenaDef, CurrentStage, EncounterDef, SpawnDef, StageDefinition, StageRegistry};
pub use error::DataLoadError;
pub use plugin::{setup_stage, WorldPlugin};
