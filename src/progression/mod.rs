//! Progression module - coins, upgrades, and persistence.

mod plugin;
mod save;
mod upgrades;

pub use plugin::{CoinPickup, ProgressionPlugin, UpgradeRequest};
pub use save::{load_save, write_save, SaveData, UpgradeLevels};
pub use upgrades::{purchase, StatModifiers, UpgradeError, UpgradeKind, UpgradeRules};
