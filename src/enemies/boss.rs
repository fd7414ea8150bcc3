//! Boss phase escalation.

use bevy::prelude::*;

/// A forward-only phase change reported by `PhaseController::observe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: u32,
    pub to: u32,
    /// Actors to summon for the phases entered by this change.
    pub summon: u32,
}

/// Health-threshold phases for a boss.
///
/// Phase 1 is the starting phase; each threshold at or above the current
/// health adds one. Phases never go back down, even after healing, and the
/// summon of a phase fires at most once.
#[derive(Component, Debug, Clone)]
pub struct PhaseController {
    phase: u32,
    /// Health values, highest first. Crossing `thresholds[i]` enters phase `i + 2`.
    thresholds: Vec<f32>,
    pub summon_archetype: Option<String>,
    pub summon_count: u32,
    /// `summoned[i]` latches the summon of phase `i + 2`.
    summoned: Vec<bool>,
    /// Weak references to summoned actors, used only for cleanup.
    spawned: Vec<Entity>,
}

impl PhaseController {
    pub fn new(
        mut thresholds: Vec<f32>,
        summon_archetype: Option<String>,
        summon_count: u32,
    ) -> Self {
        thresholds.sort_by(|a, b| b.total_cmp(a));
        let summoned = vec![false; thresholds.len()];
        Self {
            phase: 1,
            thresholds,
            summon_archetype,
            summon_count,
            summoned,
            spawned: Vec::new(),
        }
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }

    pub fn thresholds(&self) -> &[f32] {
        &self.thresholds
    }

    /// Feed the current health; returns a change when a new phase is entered.
    pub fn observe(&mut self, current_health: f32) -> Option<PhaseChange> {
        let crossed = self
            .thresholds
            .iter()
            .filter(|&&threshold| current_health <= threshold)
            .count() as u32;
        let target = 1 + crossed;

        if target <= self.phase {
            return None;
        }

        let from = self.phase;
        let mut summon = 0;
        for phase in (from + 1)..=target {
            let latch = &mut self.summoned[(phase - 2) as usize];
            if !*latch {
                *latch = true;
                summon += self.summon_count;
            }
        }
        self.phase = target;

        Some(PhaseChange {
            from,
            to: target,
            summon,
        })
    }

    pub fn track_spawned(&mut self, entity: Entity) {
        self.spawned.push(entity);
    }

    /// Hand over every tracked summon for cleanup.
    pub fn take_spawned(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.spawned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_hit_across_threshold_enters_phase_two_once() {
        let mut boss = PhaseController::new(vec![50.0], Some("bat".into()), 3);

        assert_eq!(boss.observe(60.0), None);
        assert_eq!(
            boss.observe(45.0),
            Some(PhaseChange {
                from: 1,
                to: 2,
                summon: 3,
            })
        );
        assert_eq!(boss.phase(), 2);

        // Healing back above the threshold neither regresses nor re-summons.
        assert_eq!(boss.observe(80.0), None);
        assert_eq!(boss.phase(), 2);
        assert_eq!(boss.observe(40.0), None);
    }

    #[test]
    fn crossing_several_thresholds_sums_summons() {
        let mut boss = PhaseController::new(vec![25.0, 75.0, 50.0], None, 2);
        assert_eq!(boss.thresholds(), &[75.0, 50.0, 25.0]);

        assert_eq!(
            boss.observe(40.0),
            Some(PhaseChange {
                from: 1,
                to: 3,
                summon: 4,
            })
        );
        assert_eq!(
            boss.observe(10.0),
            Some(PhaseChange {
                from: 3,
                to: 4,
                summon: 2,
            })
        );
        assert_eq!(boss.observe(0.0), None);
    }

    #[test]
    fn spawned_are_handed_over_once() {
        let mut boss = PhaseController::new(vec![50.0], None, 1);
        boss.track_spawned(Entity::from_raw(3));
        boss.track_spawned(Entity::from_raw(4));
        assert_eq!(boss.take_spawned().len(), 2);
        assert!(boss.take_spawned().is_empty());
    }

    #[test]
    fn no_thresholds_never_changes_phase() {
        let mut boss = PhaseController::new(Vec::new(), None, 3);
        assert_eq!(boss.observe(0.0), None);
        assert_eq!(boss.phase(), 1);
    }
}
