//! Progression plugin - coins, upgrades, and the save file.

use bevy::prelude::*;

use super::save::{load_save, write_save, SaveData};
use super::upgrades::{purchase, StatModifiers, UpgradeKind, UpgradeRules};
use crate::core::{DataPaths, GameState};
use crate::world::CurrentStage;

/// A coin pickup touched by the player.
#[derive(Event, Debug, Clone)]
pub struct CoinPickup {
    pub id: String,
    pub value: u32,
}

/// The shop asked to buy one upgrade level.
#[derive(Event, Debug, Clone, Copy)]
pub struct UpgradeRequest(pub UpgradeKind);

/// Progression plugin.
///
/// Loads the save file on `Startup`, so `StatModifiers` are ready before the
/// player is spawned on entering the game.
pub struct ProgressionPlugin;

impl Plugin for ProgressionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UpgradeRules>()
            .init_resource::<SaveData>()
            .init_resource::<StatModifiers>()
            .add_event::<CoinPickup>()
            .add_event::<UpgradeRequest>()
            .add_systems(Startup, load_progress)
            .add_systems(Update, (collect_coins, apply_upgrade_requests))
            .add_systems(OnEnter(GameState::Victory), record_cleared_stage);
    }
}

fn load_progress(
    paths: Res<DataPaths>,
    rules: Res<UpgradeRules>,
    mut save: ResMut<SaveData>,
    mut modifiers: ResMut<StatModifiers>,
) {
    match load_save(&paths.save_file) {
        Ok(loaded) => {
            info!(
                "Loaded progress: {} coins, health {} / damage {}",
                loaded.coins, loaded.upgrades.health_level, loaded.upgrades.damage_level
            );
            *save = loaded;
        }
        Err(e) => warn!("Starting with fresh progress: {}", e),
    }
    *modifiers = StatModifiers::derive(&save, &rules);
}

fn persist(paths: &DataPaths, save: &SaveData) {
    if let Err(e) = write_save(&paths.save_file, save) {
        error!("Could not save progress: {}", e);
    }
}

/// Pay out coins that were not collected before and save.
pub fn collect_coins(
    paths: Res<DataPaths>,
    mut pickups: EventReader<CoinPickup>,
    mut save: ResMut<SaveData>,
) {
    let mut changed = false;
    for pickup in pickups.read() {
        if save.collect_coin(&pickup.id, pickup.value) {
            debug!("Collected coin {} (total {})", pickup.id, save.coins);
            changed = true;
        }
    }
    if changed {
        persist(&paths, &save);
    }
}

/// Buy requested upgrades and refresh the stat bonuses.
pub fn apply_upgrade_requests(
    paths: Res<DataPaths>,
    rules: Res<UpgradeRules>,
    mut requests: EventReader<UpgradeRequest>,
    mut save: ResMut<SaveData>,
    mut modifiers: ResMut<StatModifiers>,
) {
    let mut changed = false;
    for UpgradeRequest(kind) in requests.read() {
        match purchase(&mut save, *kind, &rules) {
            Ok(level) => {
                info!("{:?} upgraded to level {}", kind, level);
                changed = true;
            }
            Err(e) => info!("Upgrade refused: {}", e),
        }
    }
    if changed {
        *modifiers = StatModifiers::derive(&save, &rules);
        persist(&paths, &save);
    }
}

fn record_cleared_stage(
    paths: Res<DataPaths>,
    stage: Option<Res<CurrentStage>>,
    mut save: ResMut<SaveData>,
) {
    let Some(stage) = stage else {
        return;
    };
    save.last_stage = Some(stage.0.clone());
    persist(&paths, &save);
}
