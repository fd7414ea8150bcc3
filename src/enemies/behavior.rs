//! Enemy behavior state machine.
//!
//! `BehaviorMachine` is plain data with a single `tick` entry point so it can
//! be driven by the ECS systems in `ai.rs` or directly from tests. Nothing in
//! here blocks or sleeps: every delay is an absolute deadline compared with
//! the `now` passed into `tick`.

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use super::detection::DetectionState;
use crate::combat::CombatTimer;
use crate::core::{AttackKind, Cue};

/// Behavior states. Only `tick` and the animation hooks change them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BehaviorState {
    #[default]
    Patrol,
    Chase,
    Attack,
    /// Brief stagger after a hit taken outside of an attack.
    Hurt,
    /// Terminal.
    Dead,
}

/// Movement style of an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub enum Locomotion {
    /// Walks horizontally; gravity is left to the physics collaborator.
    Ground {
        #[serde(default)]
        ledge_aware: bool,
    },
    /// Moves freely along the vector to its target.
    Flying,
}

/// When an attack deals its damage.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub enum ImpactTiming {
    /// Wait for the animation collaborator's impact-frame signal.
    AnimationEvent,
    /// Fire on our own after this many seconds.
    AfterDelay(f32),
}

/// Failures the behavior core can report. None of them is fatal; callers
/// log them and carry on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BehaviorFault {
    #[error("missing dependency: {0}")]
    MissingDependency(&'static str),

    #[error("transition requested from absorbing state {from:?}")]
    InvalidTransition { from: BehaviorState },

    #[error("target {0:?} no longer exists")]
    StaleReference(Entity),

    #[error("impact frame reported with no attack pending")]
    NoPendingAttack,
}

/// Archetype parameters the machine needs.
#[derive(Debug, Clone)]
pub struct BehaviorConfig {
    pub locomotion: Locomotion,
    pub chase_speed: f32,
    pub patrol_speed: f32,
    /// Half-width of the patrol span around the spawn x. 0 stands still.
    pub patrol_distance: f32,
    pub impact: ImpactTiming,
    /// Hold after an attack starts when no animation reports the attack state.
    pub attack_lock: f32,
    /// Longest an attack holds the actor in place without an exit signal.
    pub animation_lock_limit: f32,
    pub lunge_speed: Option<f32>,
    pub hurt_duration: f32,
    pub turn_delay: f32,
    pub death_delay: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            locomotion: Locomotion::Ground { ledge_aware: false },
            chase_speed: 3.0,
            patrol_speed: 2.0,
            patrol_distance: 3.0,
            impact: ImpactTiming::AfterDelay(0.3),
            attack_lock: 0.6,
            animation_lock_limit: 3.0,
            lunge_speed: None,
            hurt_duration: 0.0,
            turn_delay: 0.0,
            death_delay: 2.0,
        }
    }
}

/// Everything the machine reads in one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    pub now: f32,
    pub position: Vec2,
    pub alive: bool,
    pub detection: DetectionState,
    pub ground_ahead: bool,
}

/// Everything the machine asks of its collaborators after one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutput {
    pub velocity: Vec2,
    pub facing: f32,
    pub cues: Vec<Cue>,
    /// An attack began this tick.
    pub attack_started: Option<AttackKind>,
    /// A timed impact is due this tick.
    pub impact: Option<AttackKind>,
    /// The actor died this tick.
    pub died: bool,
    /// The death delay elapsed; the actor should be removed.
    pub remove: bool,
}

/// Hooks the animation collaborator calls into.
pub trait StatefulEnemy {
    fn behavior_state(&self) -> BehaviorState;
    fn is_attack_locked(&self, now: f32) -> bool;
    fn on_attack_state_enter(&mut self) -> Result<(), BehaviorFault>;
    fn on_attack_state_exit(&mut self) -> Result<(), BehaviorFault>;
    fn on_attack_impact_frame(&mut self) -> Result<AttackKind, BehaviorFault>;
}

/// Per-enemy behavior state machine.
#[derive(Component, Debug, Clone)]
pub struct BehaviorMachine {
    config: BehaviorConfig,
    state: BehaviorState,
    facing: f32,
    patrol_origin: f32,
    patrol_direction: f32,
    enabled: bool,
    fault: Option<BehaviorFault>,
    walking: bool,
    /// Whether the actor was chasing or attacking when its stagger began.
    engaged_before_hurt: bool,

    pending_attack: Option<AttackKind>,
    animation_attacking: bool,
    lunge_target: Option<Vec2>,

    // Deadlines, all cleared on death.
    attack_lock_until: Option<f32>,
    attack_lock_ceiling: Option<f32>,
    impact_at: Option<f32>,
    hurt_until: Option<f32>,
    turn_at: Option<f32>,
    removal_at: Option<f32>,
}

impl BehaviorMachine {
    pub fn new(config: BehaviorConfig, spawn_position: Vec2) -> Self {
        Self {
            config,
            state: BehaviorState::Patrol,
            facing: 1.0,
            patrol_origin: spawn_position.x,
            patrol_direction: 1.0,
            enabled: true,
            fault: None,
            walking: false,
            engaged_before_hurt: false,
            pending_attack: None,
            animation_attacking: false,
            lunge_target: None,
            attack_lock_until: None,
            attack_lock_ceiling: None,
            impact_at: None,
            hurt_until: None,
            turn_at: None,
            removal_at: None,
        }
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    pub fn state(&self) -> BehaviorState {
        self.state
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn fault(&self) -> Option<&BehaviorFault> {
        self.fault.as_ref()
    }

    /// True while the wider keep-chasing radius applies. A stagger keeps
    /// whatever engagement the actor had when it was hit.
    pub fn is_engaged(&self) -> bool {
        match self.state {
            BehaviorState::Chase | BehaviorState::Attack => true,
            BehaviorState::Hurt => self.engaged_before_hurt,
            BehaviorState::Patrol | BehaviorState::Dead => false,
        }
    }

    /// True while any deadline of this actor is still pending.
    pub fn has_pending_deadlines(&self) -> bool {
        self.attack_lock_until.is_some()
            || self.attack_lock_ceiling.is_some()
            || self.impact_at.is_some()
            || self.hurt_until.is_some()
            || self.turn_at.is_some()
    }

    /// Make the machine inert. It keeps its state but never ticks again.
    pub fn disable(&mut self, fault: BehaviorFault) {
        self.enabled = false;
        self.fault = Some(fault);
    }

    /// Advance one simulation step.
    pub fn tick(&mut self, input: &TickInput, timer: &mut CombatTimer) -> TickOutput {
        let now = input.now;
        let mut out = TickOutput {
            facing: self.facing,
            ..default()
        };

        if self.state == BehaviorState::Dead {
            if self.removal_at.is_some_and(|at| now >= at) {
                self.removal_at = None;
                out.remove = true;
            }
            return out;
        }

        if !input.alive {
            self.enter_dead(now, timer, &mut out);
            return out;
        }

        // A disabled actor can still die and be removed, but never acts.
        if !self.enabled {
            return out;
        }

        timer.tick_combo_reset(now);

        if self.state == BehaviorState::Attack {
            if input.detection.target.is_none() {
                // Target gone mid-swing: the pending hit has nobody to land on.
                self.pending_attack = None;
                self.impact_at = None;
                self.clear_attack_lock();
                self.patrol(input, &mut out);
                return out;
            }
            self.fire_due_impact(now, &mut out);
            if self.is_attack_locked(now) {
                out.velocity = self.lunge_velocity(input.position);
                return out;
            }
            self.clear_attack_lock();
        }

        if self.state == BehaviorState::Hurt {
            if self.hurt_until.is_some_and(|until| now < until) {
                self.set_walking(false, &mut out);
                return out;
            }
            self.hurt_until = None;
            self.engaged_before_hurt = false;
        }

        let detection = input.detection;
        let target_position = detection
            .target_position
            .filter(|_| detection.target.is_some() && detection.in_detection_range);

        let Some(target_position) = target_position else {
            self.patrol(input, &mut out);
            return out;
        };

        if !self.face_towards(target_position.x - input.position.x, now, &mut out) {
            // Still turning around: hold still until the turn completes.
            self.state = BehaviorState::Chase;
            self.set_walking(false, &mut out);
            return out;
        }

        if detection.in_attack_range && timer.can_attack(now) {
            self.start_attack(now, target_position, timer, &mut out);
            return out;
        }

        self.chase(input, target_position, &mut out);
        out
    }

    /// A hit landed and the actor survived it. Returns the cue to play.
    pub fn on_hit(&mut self, now: f32) -> Option<Cue> {
        match self.state {
            BehaviorState::Dead => None,
            // Attacks are not interrupted by damage.
            BehaviorState::Attack => None,
            _ => {
                if self.enabled && self.config.hurt_duration > 0.0 {
                    self.engaged_before_hurt = self.is_engaged();
                    self.state = BehaviorState::Hurt;
                    self.hurt_until = Some(now + self.config.hurt_duration);
                }
                Some(Cue::PlayHurt)
            }
        }
    }

    fn enter_dead(&mut self, now: f32, timer: &mut CombatTimer, out: &mut TickOutput) {
        self.state = BehaviorState::Dead;
        timer.cancel();

        self.pending_attack = None;
        self.clear_attack_lock();
        self.impact_at = None;
        self.hurt_until = None;
        self.engaged_before_hurt = false;
        self.turn_at = None;
        self.removal_at = Some(now + self.config.death_delay.max(0.0));

        self.set_walking(false, out);
        out.cues.push(Cue::PlayDeath);
        out.died = true;
    }

    fn start_attack(
        &mut self,
        now: f32,
        target_position: Vec2,
        timer: &mut CombatTimer,
        out: &mut TickOutput,
    ) {
        let kind = timer.record_attack(now);

        self.state = BehaviorState::Attack;
        self.pending_attack = Some(kind);
        self.attack_lock_until = Some(now + self.config.attack_lock.max(0.0));
        let ceiling = self.config.animation_lock_limit.max(self.config.attack_lock);
        self.attack_lock_ceiling = Some(now + ceiling.max(0.0));
        self.impact_at = match self.config.impact {
            ImpactTiming::AfterDelay(delay) => Some(now + delay.max(0.0)),
            ImpactTiming::AnimationEvent => None,
        };
        self.lunge_target = self.config.lunge_speed.map(|_| target_position);

        self.set_walking(false, out);
        out.cues.push(Cue::PlayAttack {
            special: kind == AttackKind::Special,
        });
        out.attack_started = Some(kind);

        // A zero-delay impact lands on the same tick.
        self.fire_due_impact(now, out);
    }

    fn clear_attack_lock(&mut self) {
        self.animation_attacking = false;
        self.attack_lock_until = None;
        self.attack_lock_ceiling = None;
        self.lunge_target = None;
    }

    fn fire_due_impact(&mut self, now: f32, out: &mut TickOutput) {
        if self.impact_at.is_some_and(|at| now >= at) {
            self.impact_at = None;
            if let Some(kind) = self.pending_attack.take() {
                out.impact = Some(kind);
            }
        }
    }

    fn lunge_velocity(&mut self, position: Vec2) -> Vec2 {
        let (Some(target), Some(speed)) = (self.lunge_target, self.config.lunge_speed) else {
            return Vec2::ZERO;
        };
        let to_target = target - position;
        if to_target.length() < 0.1 {
            self.lunge_target = None;
            return Vec2::ZERO;
        }
        to_target.normalize() * speed
    }

    fn chase(&mut self, input: &TickInput, target_position: Vec2, out: &mut TickOutput) {
        self.state = BehaviorState::Chase;

        let velocity = if input.detection.in_attack_range {
            // In reach but cooling down: hold position.
            Vec2::ZERO
        } else {
            match self.config.locomotion {
                Locomotion::Ground { ledge_aware } => {
                    if ledge_aware && !input.ground_ahead {
                        Vec2::ZERO
                    } else {
                        Vec2::new(self.facing * self.config.chase_speed, 0.0)
                    }
                }
                Locomotion::Flying => {
                    (target_position - input.position).normalize_or_zero() * self.config.chase_speed
                }
            }
        };

        self.set_walking(velocity != Vec2::ZERO, out);
        out.velocity = velocity;
    }

    fn patrol(&mut self, input: &TickInput, out: &mut TickOutput) {
        self.state = BehaviorState::Patrol;
        self.turn_at = None;

        if self.config.patrol_distance <= 0.0 || self.config.patrol_speed <= 0.0 {
            self.set_walking(false, out);
            return;
        }

        let offset = input.position.x - self.patrol_origin;
        let past_bound = offset.abs() > self.config.patrol_distance
            && offset.signum() == self.patrol_direction;
        let at_ledge = matches!(
            self.config.locomotion,
            Locomotion::Ground { ledge_aware: true }
        ) && !input.ground_ahead;

        if past_bound || at_ledge {
            self.patrol_direction = -self.patrol_direction;
        }

        self.facing = self.patrol_direction;
        out.facing = self.facing;
        out.velocity = Vec2::new(self.patrol_direction * self.config.patrol_speed, 0.0);
        self.set_walking(true, out);
    }

    /// Turn to face `dx`. Returns false while a delayed turn is in progress.
    fn face_towards(&mut self, dx: f32, now: f32, out: &mut TickOutput) -> bool {
        if dx == 0.0 || dx.signum() == self.facing {
            self.turn_at = None;
            return true;
        }

        if self.config.turn_delay <= 0.0 {
            self.facing = dx.signum();
            out.facing = self.facing;
            return true;
        }

        match self.turn_at {
            None => {
                self.turn_at = Some(now + self.config.turn_delay);
                false
            }
            Some(at) if now >= at => {
                self.turn_at = None;
                self.facing = dx.signum();
                out.facing = self.facing;
                true
            }
            Some(_) => false,
        }
    }

    fn set_walking(&mut self, walking: bool, out: &mut TickOutput) {
        if self.walking != walking {
            self.walking = walking;
            out.cues.push(Cue::Walking(walking));
        }
    }
}

impl StatefulEnemy for BehaviorMachine {
    fn behavior_state(&self) -> BehaviorState {
        self.state
    }

    fn is_attack_locked(&self, now: f32) -> bool {
        if self.state != BehaviorState::Attack {
            return false;
        }
        let animating =
            self.animation_attacking && self.attack_lock_ceiling.is_some_and(|at| now < at);
        animating || self.attack_lock_until.is_some_and(|until| now < until)
    }

    fn on_attack_state_enter(&mut self) -> Result<(), BehaviorFault> {
        if self.state == BehaviorState::Dead {
            return Err(BehaviorFault::InvalidTransition { from: self.state });
        }
        self.animation_attacking = true;
        Ok(())
    }

    fn on_attack_state_exit(&mut self) -> Result<(), BehaviorFault> {
        if self.state == BehaviorState::Dead {
            return Err(BehaviorFault::InvalidTransition { from: self.state });
        }
        self.animation_attacking = false;
        self.attack_lock_until = None;
        self.attack_lock_ceiling = None;
        Ok(())
    }

    fn on_attack_impact_frame(&mut self) -> Result<AttackKind, BehaviorFault> {
        if self.state == BehaviorState::Dead {
            return Err(BehaviorFault::InvalidTransition { from: self.state });
        }
        self.impact_at = None;
        self.pending_attack.take().ok_or(BehaviorFault::NoPendingAttack)
    }
}
