//! Locations of data files, overridable by tests and tools.

use std::path::PathBuf;

use bevy::prelude::*;

/// Where archetype definitions, stages and the save file live.
#[derive(Resource, Debug, Clone)]
pub struct DataPaths {
    pub enemies_dir: PathBuf,
    pub stages_dir: PathBuf,
    pub save_file: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            enemies_dir: PathBuf::from("assets/data/enemies"),
            stages_dir: PathBuf::from("assets/data/stages"),
            save_file: PathBuf::from("save/progress.ron"),
        }
    }
}
