//! Distance-based target detection.
//!
//! Every archetype uses the same circular range checks. Entry into a chase
//! uses `detection_range`; once engaged, the actor keeps chasing until the
//! target is farther than `detection_range * chase_exit_factor`. The gap
//! between the two radii keeps an actor sitting on the boundary from
//! flapping between Chase and Patrol.

use bevy::prelude::*;

/// Result of one detection refresh. Recomputed every tick, never stored
/// across ticks by anything but the owning enemy.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct DetectionState {
    pub target: Option<Entity>,
    pub target_position: Option<Vec2>,
    pub distance_to_target: f32,
    pub in_detection_range: bool,
    pub in_attack_range: bool,
}

/// A potential target as seen by `select_target`.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub entity: Entity,
    pub position: Vec2,
    /// Registration order, lower was registered first.
    pub order: u64,
}

/// Configured radii for one enemy.
#[derive(Component, Debug, Clone)]
pub struct Detector {
    pub detection_range: f32,
    pub attack_range: f32,
    pub chase_exit_factor: f32,
    /// Attack origin relative to the body, x mirrored by facing.
    pub attack_offset: Vec2,
}

impl Default for Detector {
    fn default() -> Self {
        Self {
            detection_range: 8.0,
            attack_range: 1.5,
            chase_exit_factor: 1.5,
            attack_offset: Vec2::ZERO,
        }
    }
}

impl Detector {
    /// Radius within which an already engaged actor keeps its target.
    pub fn exit_range(&self) -> f32 {
        self.detection_range * self.chase_exit_factor.max(1.0)
    }

    /// World-space attack origin for an actor at `position` facing `facing`.
    pub fn attack_origin(&self, position: Vec2, facing: f32) -> Vec2 {
        position + Vec2::new(self.attack_offset.x * facing.signum(), self.attack_offset.y)
    }

    /// Recompute detection against a single target.
    ///
    /// `engaged` is true while the owner is chasing or attacking, which
    /// widens the keep-chasing radius.
    pub fn refresh(
        &self,
        self_position: Vec2,
        facing: f32,
        target: Option<(Entity, Vec2)>,
        engaged: bool,
    ) -> DetectionState {
        let Some((entity, target_position)) = target else {
            return DetectionState::default();
        };

        let distance = self_position.distance(target_position);
        let range = if engaged {
            self.exit_range()
        } else {
            self.detection_range
        };
        let in_detection_range = distance <= range;

        let attack_distance = self
            .attack_origin(self_position, facing)
            .distance(target_position);

        DetectionState {
            target: Some(entity),
            target_position: Some(target_position),
            distance_to_target: distance,
            in_detection_range,
            in_attack_range: in_detection_range && attack_distance <= self.attack_range,
        }
    }

    /// Pick a single target, first-detected-wins.
    ///
    /// The current target is kept while it is still a candidate inside the
    /// keep-chasing radius. Otherwise the earliest-registered candidate inside
    /// detection range wins, regardless of which one is nearest.
    pub fn select_target(
        &self,
        self_position: Vec2,
        current: Option<Entity>,
        candidates: &[Candidate],
    ) -> Option<Candidate> {
        if let Some(current) = current {
            let kept = candidates.iter().find(|c| {
                c.entity == current && self_position.distance(c.position) <= self.exit_range()
            });
            if let Some(kept) = kept {
                return Some(*kept);
            }
        }

        candidates
            .iter()
            .filter(|c| self_position.distance(c.position) <= self.detection_range)
            .min_by_key(|c| c.order)
            .copied()
    }
}
