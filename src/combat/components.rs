//! Combat-related components.

use bevy::prelude::*;

// Re-export from core to avoid duplication
pub use crate::core::{AttackIntent, AttackKind, DamageEvent, DeathEvent, HitEvent, Team};

/// Outcome of a single `apply_damage` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageResult {
    pub new_health: f32,
    /// Damage actually removed from the pool.
    pub applied: f32,
    /// True only on the call that took health to zero.
    pub became_dead: bool,
}

/// Anything that can be hurt and healed.
pub trait Damageable {
    fn apply_damage(&mut self, amount: f32) -> DamageResult;
    fn heal(&mut self, amount: f32) -> f32;
    fn is_alive(&self) -> bool;
}

/// Component for entities that can take damage.
///
/// Invariant: `0 <= current <= maximum`. Death is one-way: once `alive` is
/// false no operation brings it back.
#[derive(Component, Debug, Clone)]
pub struct Health {
    current: f32,
    maximum: f32,
    alive: bool,
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            maximum: max,
            alive: max > 0.0,
        }
    }

    /// Raise the maximum (and current) pool, used for upgrade modifiers at spawn.
    pub fn with_bonus(mut self, bonus: f32) -> Self {
        if self.alive && bonus > 0.0 {
            self.maximum += bonus;
            self.current += bonus;
        }
        self
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn maximum(&self) -> f32 {
        self.maximum
    }

    pub fn is_dead(&self) -> bool {
        !self.alive
    }
}

impl Damageable for Health {
    fn apply_damage(&mut self, amount: f32) -> DamageResult {
        // NaN and negative amounts are rejected; healing goes through `heal`.
        let amount = if amount.is_nan() { 0.0 } else { amount.max(0.0) };

        if !self.alive {
            return DamageResult {
                new_health: self.current,
                applied: 0.0,
                became_dead: false,
            };
        }

        let actual = amount.min(self.current);
        self.current -= actual;

        let became_dead = self.current <= 0.0;
        if became_dead {
            self.current = 0.0;
            self.alive = false;
        }

        DamageResult {
            new_health: self.current,
            applied: actual,
            became_dead,
        }
    }

    fn heal(&mut self, amount: f32) -> f32 {
        if !self.alive || amount.is_nan() || amount <= 0.0 {
            return 0.0;
        }
        let actual = amount.min(self.maximum - self.current);
        self.current += actual;
        actual
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Post-hit invincibility window.
#[derive(Component, Debug, Clone, Default)]
pub struct Invulnerability {
    /// Length of the window in seconds; 0 disables it.
    pub window: f32,
    until: Option<f32>,
}

impl Invulnerability {
    pub fn new(window: f32) -> Self {
        Self {
            window: window.max(0.0),
            until: None,
        }
    }

    pub fn arm(&mut self, now: f32) {
        if self.window > 0.0 {
            self.until = Some(now + self.window);
        }
    }

    pub fn is_active(&self, now: f32) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    pub fn clear(&mut self) {
        self.until = None;
    }
}

/// Push from a hit, added on top of movement until it runs out.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Knockback {
    pub velocity: Vec2,
    pub until: f32,
}

impl Knockback {
    /// Seconds a single hit keeps pushing.
    pub const DURATION: f32 = 0.15;

    pub fn new(velocity: Vec2, now: f32) -> Self {
        Self {
            velocity,
            until: now + Self::DURATION,
        }
    }

    /// The push still in effect at `now`, if any.
    pub fn velocity_at(&self, now: f32) -> Option<Vec2> {
        (now < self.until).then_some(self.velocity)
    }
}

/// Marker: hits are ignored while this actor is mid-attack.
#[derive(Component, Debug, Clone, Copy)]
pub struct ArmoredWhileAttacking;

/// Circular hit area around the entity's position.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hurtbox {
    pub radius: f32,
}

impl Default for Hurtbox {
    fn default() -> Self {
        Self { radius: 0.5 }
    }
}

/// Marker component for entities that have died (prevents multiple death events).
#[derive(Component, Debug, Clone, Copy)]
pub struct Dead;
