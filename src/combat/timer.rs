//! Attack cooldown and combo bookkeeping.

use bevy::prelude::*;

use crate::core::AttackKind;

/// Attack cooldown plus a restartable combo counter.
///
/// All times are absolute simulation seconds. The combo reset is a single
/// deadline that every recorded attack replaces, so a burst of attacks never
/// accumulates extra time.
#[derive(Component, Debug, Clone)]
pub struct CombatTimer {
    pub cooldown: f32,
    pub combo_reset_window: f32,
    /// Every `n`-th consecutive attack is special. `None` disables specials.
    pub special_every: Option<u32>,
    last_attack_time: Option<f32>,
    combo_count: u32,
    combo_reset_deadline: Option<f32>,
}

impl CombatTimer {
    pub fn new(cooldown: f32, combo_reset_window: f32) -> Self {
        Self {
            cooldown: cooldown.max(0.0),
            combo_reset_window: combo_reset_window.max(0.0),
            special_every: None,
            last_attack_time: None,
            combo_count: 0,
            combo_reset_deadline: None,
        }
    }

    pub fn with_special_every(mut self, every: u32) -> Self {
        self.special_every = (every > 0).then_some(every);
        self
    }

    pub fn combo_count(&self) -> u32 {
        self.combo_count
    }

    pub fn last_attack_time(&self) -> Option<f32> {
        self.last_attack_time
    }

    pub fn combo_reset_deadline(&self) -> Option<f32> {
        self.combo_reset_deadline
    }

    pub fn can_attack(&self, now: f32) -> bool {
        match self.last_attack_time {
            Some(last) => now >= last + self.cooldown,
            None => true,
        }
    }

    /// Record an attack at `now` and classify it.
    pub fn record_attack(&mut self, now: f32) -> AttackKind {
        // An expired combo must not leak into this attack.
        self.tick_combo_reset(now);

        let kind = match self.special_every {
            Some(every) if self.combo_count + 1 >= every => {
                self.combo_count = 0;
                AttackKind::Special
            }
            _ => {
                self.combo_count += 1;
                AttackKind::Normal
            }
        };

        self.last_attack_time = Some(now);
        self.combo_reset_deadline = Some(now + self.combo_reset_window);
        kind
    }

    /// Clear the combo once its deadline has passed.
    pub fn tick_combo_reset(&mut self, now: f32) {
        if self.combo_reset_deadline.is_some_and(|deadline| now >= deadline) {
            if self.combo_count > 0 {
                debug!("Attack combo reset due to inactivity");
            }
            self.combo_count = 0;
            self.combo_reset_deadline = None;
        }
    }

    /// Drop the pending combo deadline, used when the owner dies.
    pub fn cancel(&mut self) {
        self.combo_reset_deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_gates_attacks() {
        let mut timer = CombatTimer::new(2.0, 5.0);
        assert!(timer.can_attack(0.0));
        timer.record_attack(1.0);
        assert!(!timer.can_attack(2.5));
        assert!(timer.can_attack(3.0));
    }

    #[test]
    fn every_third_attack_is_special_and_resets() {
        let mut timer = CombatTimer::new(0.0, 5.0).with_special_every(3);
        assert_eq!(timer.record_attack(0.0), AttackKind::Normal);
        assert_eq!(timer.combo_count(), 1);
        assert_eq!(timer.record_attack(1.0), AttackKind::Normal);
        assert_eq!(timer.combo_count(), 2);
        assert_eq!(timer.record_attack(2.0), AttackKind::Special);
        assert_eq!(timer.combo_count(), 0);
        // The cycle repeats.
        assert_eq!(timer.record_attack(3.0), AttackKind::Normal);
        assert_eq!(timer.record_attack(4.0), AttackKind::Normal);
        assert_eq!(timer.record_attack(5.0), AttackKind::Special);
    }

    #[test]
    fn long_gap_resets_combo_before_next_attack() {
        let mut timer = CombatTimer::new(0.0, 5.0).with_special_every(3);
        timer.record_attack(0.0);
        timer.record_attack(1.0);
        // Gap longer than the reset window: this would have been special.
        assert_eq!(timer.record_attack(7.0), AttackKind::Normal);
        assert_eq!(timer.combo_count(), 1);
    }

    #[test]
    fn reset_deadline_restarts_on_every_attack() {
        let mut timer = CombatTimer::new(0.0, 5.0);
        timer.record_attack(0.0);
        timer.record_attack(4.0);
        assert_eq!(timer.combo_reset_deadline(), Some(9.0));

        timer.tick_combo_reset(6.0);
        assert_eq!(timer.combo_count(), 2);
        timer.tick_combo_reset(9.0);
        assert_eq!(timer.combo_count(), 0);
        assert_eq!(timer.combo_reset_deadline(), None);
    }

    #[test]
    fn without_threshold_attacks_are_always_normal() {
        let mut timer = CombatTimer::new(0.0, 10.0);
        for i in 0..6 {
            assert_eq!(timer.record_attack(i as f32), AttackKind::Normal);
        }
        assert_eq!(timer.combo_count(), 6);
    }

    #[test]
    fn cancel_keeps_combo_from_resetting_later() {
        let mut timer = CombatTimer::new(1.0, 1.0);
        timer.record_attack(0.0);
        timer.cancel();
        timer.tick_combo_reset(10.0);
        assert_eq!(timer.combo_reset_deadline(), None);
    }
}
