//! Persistent progress: coins, upgrade levels, and collected pickups.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::world::DataLoadError;

/// Upgrade levels bought so far.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpgradeLevels {
    pub health_level: u32,
    pub damage_level: u32,
}

/// Everything that survives between runs.
#[derive(Resource, Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SaveData {
    pub coins: u32,
    pub upgrades: UpgradeLevels,
    /// Ids of coins already picked up; each pays out once.
    pub collected_coins: BTreeSet<String>,
    /// Name of the last stage cleared.
    pub last_stage: Option<String>,
}

impl SaveData {
    pub fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Collect the coin `id` worth `value`. Returns false if it was
    /// collected before.
    pub fn collect_coin(&mut self, id: &str, value: u32) -> bool {
        if !self.collected_coins.insert(id.to_string()) {
            return false;
        }
        self.add_coins(value);
        true
    }

    pub fn is_collected(&self, id: &str) -> bool {
        self.collected_coins.contains(id)
    }
}

/// Read progress from `path`. A missing file is a fresh start.
pub fn load_save(path: &Path) -> Result<SaveData, DataLoadError> {
    if !path.exists() {
        return Ok(SaveData::default());
    }

    let label = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: label.clone(),
        details: e.to_string(),
    })?;

    ron::from_str(&contents).map_err(|e| DataLoadError::ParseError {
        path: label,
        details: e.to_string(),
    })
}

/// Write progress to `path`, creating parent directories as needed.
pub fn write_save(path: &Path, data: &SaveData) -> Result<(), DataLoadError> {
    let label = path.display().to_string();
    let write_error = |details: String| DataLoadError::WriteError {
        path: label.clone(),
        details,
    };

    let text = ron::ser::to_string_pretty(data, ron::ser::PrettyConfig::default())
        .map_err(|e| write_error(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
    }
    fs::write(path, text).map_err(|e| write_error(e.to_string()))
}
