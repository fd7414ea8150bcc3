//! Player-related components.

use bevy::prelude::*;

/// Marker component for the player entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct Player;

/// Base player tuning, before upgrades.
#[derive(Resource, Debug, Clone)]
pub struct PlayerConfig {
    pub max_health: f32,
    /// Damage of chain steps 1 and 2
    pub base_damage: f32,
    /// Minimum seconds between two accepted attacks
    pub attack_rate: f32,
    /// A gap longer than this restarts the chain at step 1
    pub chain_reset: f32,
    /// Damage multiplier of the third chain step
    pub finisher_multiplier: f32,
    /// Distance from the body to the centre of the hit circle
    pub attack_reach: f32,
    pub attack_radius: f32,
    /// Post-hit invincibility window
    pub invulnerability: f32,
    /// Seconds between death and the defeat screen
    pub defeat_delay: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            base_damage: 20.0,
            attack_rate: 0.25,
            chain_reset: 1.0,
            finisher_multiplier: 1.5,
            attack_reach: 1.0,
            attack_radius: 1.0,
            invulnerability: 0.5,
            defeat_delay: 1.0,
        }
    }
}

/// Number of steps in the player's attack chain.
pub const CHAIN_LENGTH: u8 = 3;

/// Three-step melee chain state.
#[derive(Component, Debug, Clone, Default)]
pub struct PlayerCombat {
    step: u8,
    last_attack: Option<f32>,
    /// Flat damage added by upgrades
    pub damage_bonus: f32,
}

impl PlayerCombat {
    pub fn with_bonus(damage_bonus: f32) -> Self {
        Self {
            damage_bonus,
            ..default()
        }
    }

    /// Current chain step, `0` before the first attack.
    pub fn step(&self) -> u8 {
        self.step
    }

    /// Try to attack at `now`. Returns the chain step used, or `None` while
    /// the attack rate still blocks.
    pub fn try_attack(&mut self, now: f32, config: &PlayerConfig) -> Option<u8> {
        let since_last = self.last_attack.map(|t| now - t);
        if since_last.is_some_and(|gap| gap < config.attack_rate) {
            return None;
        }

        self.step = match since_last {
            Some(gap) if gap <= config.chain_reset => self.step % CHAIN_LENGTH + 1,
            _ => 1,
        };
        self.last_attack = Some(now);
        Some(self.step)
    }

    /// Damage dealt by chain `step`.
    pub fn damage_for(&self, step: u8, config: &PlayerConfig) -> f32 {
        let base = config.base_damage + self.damage_bonus;
        if step == CHAIN_LENGTH {
            base * config.finisher_multiplier
        } else {
            base
        }
    }
}

/// Pending defeat notification after the player died.
#[derive(Component, Debug, Clone, Copy)]
pub struct DefeatCountdown {
    pub at: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_cycles_through_three_steps() {
        let config = PlayerConfig::default();
        let mut combat = PlayerCombat::default();

        let steps: Vec<u8> = [0.0, 0.3, 0.6, 0.9]
            .into_iter()
            .filter_map(|t| combat.try_attack(t, &config))
            .collect();

        assert_eq!(steps, vec![1, 2, 3, 1]);
    }

    #[test]
    fn attack_rate_rejects_spam() {
        let config = PlayerConfig::default();
        let mut combat = PlayerCombat::default();

        assert_eq!(combat.try_attack(1.0, &config), Some(1));
        assert_eq!(combat.try_attack(1.1, &config), None);
        assert_eq!(combat.try_attack(1.3, &config), Some(2));
    }

    #[test]
    fn long_pause_restarts_chain() {
        let config = PlayerConfig::default();
        let mut combat = PlayerCombat::default();

        combat.try_attack(0.0, &config);
        combat.try_attack(0.5, &config);
        assert_eq!(combat.try_attack(2.0, &config), Some(1));
    }

    #[test]
    fn finisher_scales_bonus_damage() {
        let config = PlayerConfig::default();
        let combat = PlayerCombat::with_bonus(5.0);

        assert_eq!(combat.damage_for(1, &config), 25.0);
        assert_eq!(combat.damage_for(3, &config), 37.5);
    }
}
