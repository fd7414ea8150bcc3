//! Upgrade shop rules and the stat bonuses they grant.

use bevy::prelude::*;
use thiserror::Error;

use super::save::SaveData;

/// Which stat to upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeKind {
    Health,
    Damage,
}

/// Why a purchase was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpgradeError {
    #[error("{kind:?} upgrade needs {cost} coins, only {available} available")]
    NotEnoughCoins {
        kind: UpgradeKind,
        cost: u32,
        available: u32,
    },

    #[error("{0:?} upgrade is already at the maximum level")]
    MaxedOut(UpgradeKind),
}

/// Upgrade economy.
#[derive(Resource, Debug, Clone)]
pub struct UpgradeRules {
    pub max_level: u32,
    pub health_cost: u32,
    pub health_per_level: f32,
    pub damage_cost: u32,
    pub damage_per_level: f32,
}

impl Default for UpgradeRules {
    fn default() -> Self {
        Self {
            max_level: 3,
            health_cost: 20,
            health_per_level: 20.0,
            damage_cost: 25,
            damage_per_level: 5.0,
        }
    }
}

impl UpgradeRules {
    pub fn cost(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Health => self.health_cost,
            UpgradeKind::Damage => self.damage_cost,
        }
    }
}

/// Buy one level of `kind`. Returns the new level.
pub fn purchase(
    save: &mut SaveData,
    kind: UpgradeKind,
    rules: &UpgradeRules,
) -> Result<u32, UpgradeError> {
    let level = match kind {
        UpgradeKind::Health => save.upgrades.health_level,
        UpgradeKind::Damage => save.upgrades.damage_level,
    };
    if level >= rules.max_level {
        return Err(UpgradeError::MaxedOut(kind));
    }

    let cost = rules.cost(kind);
    if save.coins < cost {
        return Err(UpgradeError::NotEnoughCoins {
            kind,
            cost,
            available: save.coins,
        });
    }

    save.coins -= cost;
    let slot = match kind {
        UpgradeKind::Health => &mut save.upgrades.health_level,
        UpgradeKind::Damage => &mut save.upgrades.damage_level,
    };
    *slot += 1;
    Ok(*slot)
}

/// Flat bonuses applied to the player at spawn.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct StatModifiers {
    pub health_bonus: f32,
    pub damage_bonus: f32,
}

impl StatModifiers {
    pub fn derive(save: &SaveData, rules: &UpgradeRules) -> Self {
        let health_level = save.upgrades.health_level.min(rules.max_level);
        let damage_level = save.upgrades.damage_level.min(rules.max_level);
        Self {
            health_bonus: health_level as f32 * rules.health_per_level,
            damage_bonus: damage_level as f32 * rules.damage_per_level,
        }
    }
}
