//! Enemy-related components.

use bevy::prelude::*;

/// Marker component for all enemies.
#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy;

/// Enemy archetype identifier (matches RON file name).
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct EnemyType(pub String);

/// Velocity the physics collaborator should apply this tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveIntent(pub Vec2);

/// Horizontal facing, `1.0` right or `-1.0` left.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Facing(pub f32);

impl Default for Facing {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Ground-ahead probe written by the physics collaborator.
///
/// Enemies without a probe are treated as always supported.
#[derive(Component, Debug, Clone, Copy)]
pub struct GroundProbe {
    pub ground_ahead: bool,
}

impl Default for GroundProbe {
    fn default() -> Self {
        Self { ground_ahead: true }
    }
}

/// Stable detection order; lower values were registered first.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Targetable {
    pub order: u64,
}

/// Hands out `Targetable` orders in registration sequence.
#[derive(Resource, Debug, Default)]
pub struct TargetRegistry {
    next: u64,
}

impl TargetRegistry {
    pub fn register(&mut self) -> Targetable {
        let order = self.next;
        self.next += 1;
        Targetable { order }
    }
}

/// The target an enemy is currently tracking.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct TrackedTarget(pub Option<Entity>);

/// Present when an animation collaborator drives this entity and will
/// report `AnimationSignal`s for it.
#[derive(Component, Debug, Clone, Copy)]
pub struct AnimationDriver;

/// Attack damage and reach of the archetype.
#[derive(Component, Debug, Clone)]
pub struct AttackProfile {
    pub damage: f32,
    pub special_damage: f32,
    pub radius: f32,
}

/// Encounter context an enemy was spawned into.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncounterMember(pub Entity);

/// A group of enemies that is "cleared" when its last member dies.
///
/// Replaces a scene-wide enemy counter: every enemy receives its encounter
/// through `EncounterMember` at spawn.
#[derive(Component, Debug, Clone)]
pub struct Encounter {
    pub name: String,
    remaining: u32,
    cleared: bool,
}

impl Encounter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            remaining: 0,
            cleared: false,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    pub fn enlist(&mut self) {
        self.remaining += 1;
    }

    /// Record a kill. Returns true exactly once, when the last member falls.
    pub fn notify_killed(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 && !self.cleared {
            self.cleared = true;
            return true;
        }
        false
    }
}

/// Boss that stays inert until the player enters its arena.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ArenaLatch {
    pub engaged: bool,
}
