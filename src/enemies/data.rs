//! Enemy data loading from RON files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use super::behavior::{BehaviorConfig, ImpactTiming, Locomotion};
use super::boss::PhaseController;
use super::components::AttackProfile;
use super::detection::Detector;
use crate::combat::CombatTimer;
use crate::core::DataPaths;
use crate::world::DataLoadError;

/// Combo finisher settings.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SpecialAttack {
    /// Every n-th consecutive attack is special.
    pub every: u32,
    pub damage: f32,
}

/// Attack configuration for an enemy type.
#[derive(Deserialize, Clone, Debug)]
pub struct AttackDefinition {
    /// Reach measured from the attack origin.
    pub range: f32,
    /// Radius of the damage circle.
    pub radius: f32,
    /// Attack origin relative to the body (x mirrored by facing).
    #[serde(default)]
    pub offset: (f32, f32),
    pub damage: f32,
    pub cooldown: f32,
    #[serde(default)]
    pub special: Option<SpecialAttack>,
    #[serde(default = "default_combo_reset")]
    pub combo_reset: f32,
    pub impact: ImpactTiming,
    #[serde(default)]
    pub lunge_speed: Option<f32>,
    #[serde(default = "default_attack_lock")]
    pub attack_lock: f32,
    /// Ceiling on an animation-held attack whose exit signal never comes.
    #[serde(default = "default_animation_lock_limit")]
    pub animation_lock_limit: f32,
}

/// Boss-only configuration.
#[derive(Deserialize, Clone, Debug)]
pub struct BossDefinition {
    /// Health values that start a new phase when reached.
    pub thresholds: Vec<f32>,
    /// Archetype summoned on every new phase.
    #[serde(default)]
    pub summon: Option<String>,
    #[serde(default)]
    pub summon_count: u32,
    /// Stay inert until the player enters the arena.
    #[serde(default = "default_true")]
    pub arena_trigger: bool,
}

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug)]
pub struct EnemyDefinition {
    pub name: String,
    pub max_health: f32,
    pub locomotion: Locomotion,
    pub chase_speed: f32,
    #[serde(default)]
    pub patrol_speed: f32,
    #[serde(default)]
    pub patrol_distance: f32,
    pub detection_range: f32,
    #[serde(default = "default_chase_exit_factor")]
    pub chase_exit_factor: f32,
    pub attack: AttackDefinition,
    /// Post-hit invincibility window in seconds.
    #[serde(default)]
    pub invulnerability: f32,
    /// Ignore hits while an attack is in progress.
    #[serde(default)]
    pub armored_while_attacking: bool,
    #[serde(default)]
    pub hurt_duration: f32,
    /// Reaction time before turning to face a target behind.
    #[serde(default)]
    pub turn_delay: f32,
    /// Seconds between death and removal.
    #[serde(default = "default_death_delay")]
    pub death_delay: f32,
    #[serde(default = "default_hurtbox_radius")]
    pub hurtbox_radius: f32,
    #[serde(default)]
    pub boss: Option<BossDefinition>,
}

fn default_combo_reset() -> f32 {
    5.0
}

fn default_attack_lock() -> f32 {
    0.6
}

fn default_animation_lock_limit() -> f32 {
    3.0
}

fn default_chase_exit_factor() -> f32 {
    1.5
}

fn default_death_delay() -> f32 {
    2.0
}

fn default_hurtbox_radius() -> f32 {
    0.5
}

fn default_true() -> bool {
    true
}

impl EnemyDefinition {
    /// Parse a definition from RON text. `source` only labels errors.
    pub fn from_ron(source: &str, contents: &str) -> Result<Self, DataLoadError> {
        let definition: Self = ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: source.to_string(),
            details: e.to_string(),
        })?;
        definition.validate()?;
        Ok(definition)
    }

    /// Reject data the behavior core cannot run sensibly.
    pub fn validate(&self) -> Result<(), DataLoadError> {
        let invalid = |reason: &str| DataLoadError::InvalidDefinition {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        let numbers = [
            self.max_health,
            self.chase_speed,
            self.patrol_speed,
            self.patrol_distance,
            self.detection_range,
            self.chase_exit_factor,
            self.attack.range,
            self.attack.radius,
            self.attack.damage,
            self.attack.cooldown,
            self.attack.combo_reset,
            self.attack.attack_lock,
            self.attack.animation_lock_limit,
            self.invulnerability,
            self.hurt_duration,
            self.turn_delay,
            self.death_delay,
            self.hurtbox_radius,
        ];
        let optional = [
            self.attack.special.as_ref().map(|s| s.damage),
            self.attack.lunge_speed,
            match self.attack.impact {
                ImpactTiming::AfterDelay(delay) => Some(delay),
                ImpactTiming::AnimationEvent => None,
            },
        ];
        let thresholds = self.boss.iter().flat_map(|b| b.thresholds.iter().copied());
        if !numbers
            .into_iter()
            .chain(optional.into_iter().flatten())
            .chain(thresholds)
            .all(f32::is_finite)
        {
            return Err(invalid("every number must be finite"));
        }

        if self.max_health <= 0.0 {
            return Err(invalid("max_health must be positive"));
        }
        if self.detection_range <= 0.0 {
            return Err(invalid("detection_range must be positive"));
        }
        if self.attack.range > self.detection_range {
            return Err(invalid("attack range exceeds detection_range"));
        }
        if self.chase_exit_factor < 1.0 {
            return Err(invalid("chase_exit_factor must be at least 1.0"));
        }
        if self.attack.cooldown < 0.0 || self.attack.damage < 0.0 {
            return Err(invalid("attack cooldown and damage must not be negative"));
        }
        if let ImpactTiming::AfterDelay(delay) = self.attack.impact {
            if delay < 0.0 || delay > self.attack.attack_lock {
                return Err(invalid("impact delay must lie within attack_lock"));
            }
        }
        if self.attack.animation_lock_limit < self.attack.attack_lock {
            return Err(invalid("animation_lock_limit must be at least attack_lock"));
        }
        if self.attack.special.as_ref().is_some_and(|s| s.every == 0) {
            return Err(invalid("special attack 'every' must be at least 1"));
        }
        if let Some(boss) = &self.boss {
            if boss
                .thresholds
                .iter()
                .any(|&t| t <= 0.0 || t > self.max_health)
            {
                return Err(invalid("boss thresholds must lie in (0, max_health]"));
            }
            if boss.summon_count > 0 && boss.summon.is_none() {
                return Err(invalid("summon_count set without a summon archetype"));
            }
        }
        Ok(())
    }

    pub fn behavior_config(&self) -> BehaviorConfig {
        BehaviorConfig {
            locomotion: self.locomotion,
            chase_speed: self.chase_speed,
            patrol_speed: self.patrol_speed,
            patrol_distance: self.patrol_distance,
            impact: self.attack.impact,
            attack_lock: self.attack.attack_lock,
            animation_lock_limit: self.attack.animation_lock_limit,
            lunge_speed: self.attack.lunge_speed,
            hurt_duration: self.hurt_duration,
            turn_delay: self.turn_delay,
            death_delay: self.death_delay,
        }
    }

    pub fn detector(&self) -> Detector {
        Detector {
            detection_range: self.detection_range,
            attack_range: self.attack.range,
            chase_exit_factor: self.chase_exit_factor,
            attack_offset: Vec2::new(self.attack.offset.0, self.attack.offset.1),
        }
    }

    pub fn combat_timer(&self) -> CombatTimer {
        let timer = CombatTimer::new(self.attack.cooldown, self.attack.combo_reset);
        match &self.attack.special {
            Some(special) => timer.with_special_every(special.every),
            None => timer,
        }
    }

    pub fn attack_profile(&self) -> AttackProfile {
        AttackProfile {
            damage: self.attack.damage,
            special_damage: self
                .attack
                .special
                .as_ref()
                .map_or(self.attack.damage, |s| s.damage),
            radius: self.attack.radius,
        }
    }

    pub fn phase_controller(&self) -> Option<PhaseController> {
        self.boss.as_ref().map(|boss| {
            PhaseController::new(boss.thresholds.clone(), boss.summon.clone(), boss.summon_count)
        })
    }
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, EnemyDefinition>,
}

impl EnemyRegistry {
    /// Get an enemy definition by type name.
    pub fn get(&self, enemy_type: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(enemy_type)
    }

    pub fn insert(&mut self, enemy_type: impl Into<String>, definition: EnemyDefinition) {
        self.definitions.insert(enemy_type.into(), definition);
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Read and validate one definition file. The archetype name is the file stem.
pub fn read_definition_file(path: &Path) -> Result<(String, EnemyDefinition), DataLoadError> {
    let label = path.display().to_string();
    let enemy_type = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| DataLoadError::FileNotFound(label.clone()))?
        .to_string();

    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: label.clone(),
        details: e.to_string(),
    })?;

    let definition = EnemyDefinition::from_ron(&label, &contents)?;
    Ok((enemy_type, definition))
}

/// Load every `*.ron` definition in `dir`. Bad files are reported, not fatal.
pub fn read_definitions_dir(
    dir: &Path,
) -> Result<(HashMap<String, EnemyDefinition>, Vec<DataLoadError>), DataLoadError> {
    let entries =
        fs::read_dir(dir).map_err(|_| DataLoadError::FileNotFound(dir.display().to_string()))?;

    let mut definitions = HashMap::new();
    let mut failures = Vec::new();

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "ron") {
            continue;
        }
        match read_definition_file(&path) {
            Ok((enemy_type, definition)) => {
                definitions.insert(enemy_type, definition);
            }
            Err(e) => failures.push(e),
        }
    }

    Ok((definitions, failures))
}

/// Load all enemy definitions from the configured directory.
pub fn load_enemy_definitions(paths: Res<DataPaths>, mut registry: ResMut<EnemyRegistry>) {
    let (definitions, failures) = match read_definitions_dir(&paths.enemies_dir) {
        Ok(result) => result,
        Err(e) => {
            warn!("Enemy definitions unavailable: {}", e);
            return;
        }
    };

    for failure in failures {
        error!("Skipping enemy definition: {}", failure);
    }

    for (enemy_type, definition) in definitions {
        info!("Loaded enemy definition: {} ({})", definition.name, enemy_type);
        registry.insert(enemy_type, definition);
    }

    info!("Loaded {} enemy definitions", registry.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOLEM: &str = r#"(
        name: "Golem",
        max_health: 200.0,
        locomotion: Ground(ledge_aware: true),
        chase_speed: 1.5,
        detection_range: 10.0,
        attack: (
            range: 0.8,
            radius: 0.8,
            offset: (0.6, 0.0),
            damage: 15.0,
            cooldown: 2.0,
            special: Some((every: 3, damage: 10.0)),
            impact: AnimationEvent,
        ),
        invulnerability: 0.5,
        armored_while_attacking: true,
        turn_delay: 0.5,
        death_delay: 3.0,
    )"#;

    #[test]
    fn parses_with_defaults() {
        let golem = EnemyDefinition::from_ron("golem.ron", GOLEM).unwrap();
        assert_eq!(golem.name, "Golem");
        assert_eq!(golem.chase_exit_factor, 1.5);
        assert_eq!(golem.attack.combo_reset, 5.0);
        assert_eq!(golem.patrol_distance, 0.0);
        assert!(golem.boss.is_none());
        assert_eq!(golem.locomotion, Locomotion::Ground { ledge_aware: true });

        let profile = golem.attack_profile();
        assert_eq!(profile.special_damage, 10.0);
        assert_eq!(golem.combat_timer().special_every, Some(3));
        assert_eq!(golem.detector().attack_offset, Vec2::new(0.6, 0.0));
    }

    #[test]
    fn rejects_attack_range_beyond_detection() {
        let text = GOLEM.replace("range: 0.8", "range: 12.0");
        let err = EnemyDefinition::from_ron("golem.ron", &text).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidDefinition { .. }));
    }

    #[test]
    fn rejects_malformed_ron() {
        let err = EnemyDefinition::from_ron("broken.ron", "(name: ").unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { .. }));
    }

    #[test]
    fn boss_thresholds_must_fit_health() {
        let text = GOLEM.replace(
            "death_delay: 3.0,",
            "death_delay: 3.0, boss: Some((thresholds: [250.0])),",
        );
        let err = EnemyDefinition::from_ron("golem.ron", &text).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidDefinition { .. }));
    }

    #[test]
    fn rejects_non_finite_numbers() {
        let golem = EnemyDefinition::from_ron("golem.ron", GOLEM).unwrap();
        let mut broken = Vec::new();

        let mut d = golem.clone();
        d.max_health = f32::NAN;
        broken.push(d);
        let mut d = golem.clone();
        d.detection_range = f32::NAN;
        broken.push(d);
        let mut d = golem.clone();
        d.attack.cooldown = f32::INFINITY;
        broken.push(d);
        let mut d = golem.clone();
        d.attack.damage = f32::NAN;
        broken.push(d);
        let mut d = golem.clone();
        d.boss = Some(BossDefinition {
            thresholds: vec![f32::NAN],
            summon: None,
            summon_count: 0,
            arena_trigger: true,
        });
        broken.push(d);

        for definition in broken {
            let err = definition.validate().unwrap_err();
            assert!(matches!(err, DataLoadError::InvalidDefinition { .. }));
        }
    }

    #[test]
    fn animation_lock_limit_covers_the_fallback_lock() {
        let text = GOLEM.replace(
            "impact: AnimationEvent,",
            "impact: AnimationEvent, attack_lock: 1.0, animation_lock_limit: 0.5,",
        );
        assert!(EnemyDefinition::from_ron("golem.ron", &text).is_err());
    }

    #[test]
    fn timed_impact_must_land_inside_lock() {
        let text = GOLEM.replace("impact: AnimationEvent", "impact: AfterDelay(2.0)");
        assert!(EnemyDefinition::from_ron("golem.ron", &text).is_err());
    }
}
