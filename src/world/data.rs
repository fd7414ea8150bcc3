//! Stage data loading from RON files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use super::error::DataLoadError;
use crate::core::DataPaths;
use crate::enemies::EnemyRegistry;

/// One enemy placement.
#[derive(Deserialize, Clone, Debug)]
pub struct SpawnDef {
    pub archetype: String,
    pub position: (f32, f32),
}

/// A group of enemies that is cleared together.
#[derive(Deserialize, Clone, Debug)]
pub struct EncounterDef {
    pub name: String,
    pub spawns: Vec<SpawnDef>,
}

/// Boss placement and the horizontal extent of its arena trigger.
#[derive(Deserialize, Clone, Debug)]
pub struct BossArenaDef {
    pub archetype: String,
    pub position: (f32, f32),
    /// Entering `[min_x, max_x]` wakes the boss.
    pub trigger: (f32, f32),
}

/// Stage definition loaded from RON file.
#[derive(Deserialize, Clone, Debug)]
pub struct StageDefinition {
    pub name: String,
    pub player_start: (f32, f32),
    #[serde(default)]
    pub encounters: Vec<EncounterDef>,
    #[serde(default)]
    pub boss: Option<BossArenaDef>,
}

impl StageDefinition {
    pub fn from_ron(source: &str, contents: &str) -> Result<Self, DataLoadError> {
        let stage: Self = ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: source.to_string(),
            details: e.to_string(),
        })?;

        if let Some(boss) = &stage.boss {
            if boss.trigger.0 > boss.trigger.1 {
                return Err(DataLoadError::InvalidDefinition {
                    name: stage.name.clone(),
                    reason: "boss trigger min_x is greater than max_x".into(),
                });
            }
        }
        Ok(stage)
    }

    pub fn player_start(&self) -> Vec2 {
        Vec2::new(self.player_start.0, self.player_start.1)
    }

    /// Every archetype this stage spawns directly.
    pub fn archetypes(&self) -> impl Iterator<Item = &str> {
        self.encounters
            .iter()
            .flat_map(|e| e.spawns.iter().map(|s| s.archetype.as_str()))
            .chain(self.boss.iter().map(|b| b.archetype.as_str()))
    }

    /// Check that every referenced archetype was loaded.
    pub fn check_archetypes(&self, registry: &EnemyRegistry) -> Result<(), DataLoadError> {
        match self.archetypes().find(|a| registry.get(a).is_none()) {
            Some(missing) => Err(DataLoadError::UnknownArchetype {
                stage: self.name.clone(),
                archetype: missing.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Resource storing all loaded stage definitions.
#[derive(Resource, Default)]
pub struct StageRegistry {
    pub stages: HashMap<String, StageDefinition>,
}

impl StageRegistry {
    /// Get a stage by name.
    pub fn get(&self, name: &str) -> Option<&StageDefinition> {
        self.stages.get(name)
    }
}

/// Resource naming the stage to build on entering the game.
#[derive(Resource, Debug, Clone)]
pub struct CurrentStage(pub String);

impl Default for CurrentStage {
    fn default() -> Self {
        Self("forest".to_string())
    }
}

fn read_stage_file(path: &Path) -> Result<(String, StageDefinition), DataLoadError> {
    let label = path.display().to_string();
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| DataLoadError::FileNotFound(label.clone()))?;
    let stage_name = stem.strip_suffix(".stage").unwrap_or(stem).to_string();

    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: label.clone(),
        details: e.to_string(),
    })?;

    Ok((stage_name, StageDefinition::from_ron(&label, &contents)?))
}

/// Load all stage definitions from the configured directory.
pub fn load_stage_definitions(paths: Res<DataPaths>, mut registry: ResMut<StageRegistry>) {
    let stages_path = &paths.stages_dir;

    let Ok(entries) = fs::read_dir(stages_path) else {
        warn!("Stages directory not found: {:?}", stages_path);
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "ron") {
            continue;
        }
        match read_stage_file(&path) {
            Ok((name, stage)) => {
                info!("Loaded stage: {}", name);
                registry.stages.insert(name, stage);
            }
            Err(e) => error!("Skipping stage: {}", e),
        }
    }

    info!("Loaded {} stage(s)", registry.stages.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAGE: &str = r#"(
        name: "Forest",
        player_start: (0.0, 0.0),
        encounters: [
            (name: "gate", spawns: [
                (archetype: "patroller", position: (8.0, 0.0)),
                (archetype: "bat", position: (12.0, 3.0)),
            ]),
        ],
        boss: Some((archetype: "knight_boss", position: (40.0, 0.0), trigger: (30.0, 50.0))),
    )"#;

    #[test]
    fn lists_every_archetype() {
        let stage = StageDefinition::from_ron("forest.ron", STAGE).unwrap();
        let archetypes: Vec<&str> = stage.archetypes().collect();
        assert_eq!(archetypes, vec!["patroller", "bat", "knight_boss"]);
    }

    #[test]
    fn unknown_archetypes_are_reported() {
        let stage = StageDefinition::from_ron("forest.ron", STAGE).unwrap();
        let err = stage.check_archetypes(&EnemyRegistry::default()).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::UnknownArchetype { ref archetype, .. } if archetype == "patroller"
        ));
    }

    #[test]
    fn inverted_trigger_is_rejected() {
        let text = STAGE.replace("trigger: (30.0, 50.0)", "trigger: (50.0, 30.0)");
        assert!(StageDefinition::from_ron("forest.ron", &text).is_err());
    }
}
