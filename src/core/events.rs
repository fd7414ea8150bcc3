//! Global events used for cross-system communication.
//!
//! Events are the only channel between the behavior core and its external
//! collaborators. The core never mutates a foreign actor's health directly:
//! it emits an `AttackIntent`, the damage-resolution systems turn that into
//! `DamageEvent`s, and health changes come back as `HitEvent`/`DeathEvent`.

use bevy::prelude::*;

/// Which side an actor fights on. Doubles as the target tag of an attack.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Player,
    Enemy,
}

/// Whether an attack is a regular hit or the combo finisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttackKind {
    #[default]
    Normal,
    Special,
}

/// Sent when an entity should take damage.
///
/// The damage system listens for these events and applies the actual
/// health reduction, honouring invulnerability windows.
#[derive(Event, Debug, Clone)]
pub struct DamageEvent {
    /// Entity receiving damage
    pub target: Entity,
    /// Entity that caused the damage
    pub source: Entity,
    /// Damage amount
    pub amount: f32,
    /// Knockback direction and force
    pub knockback: Vec2,
}

/// Sent when damage was applied and the entity survived it.
#[derive(Event, Debug, Clone)]
pub struct HitEvent {
    pub entity: Entity,
    pub amount: f32,
    pub remaining: f32,
}

/// Sent exactly once when an entity's health first reaches zero.
#[derive(Event, Debug, Clone)]
pub struct DeathEvent {
    /// Entity that died
    pub entity: Entity,
    /// Entity that killed them (if any)
    pub killed_by: Option<Entity>,
}

/// A request to deal damage in an area, resolved by the damage systems.
///
/// Not retained after it has been consumed.
#[derive(Event, Debug, Clone)]
pub struct AttackIntent {
    pub attacker: Entity,
    pub kind: AttackKind,
    pub damage: f32,
    /// World-space centre of the hit circle.
    pub origin: Vec2,
    pub radius: f32,
    /// Only actors on this team can be hit.
    pub target: Team,
}

/// Discrete animation cues sent to the animation collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    PlayAttack { special: bool },
    PlayHurt,
    PlayDeath,
    Walking(bool),
}

/// Outbound animation cue for one entity.
#[derive(Event, Debug, Clone)]
pub struct AnimationCue {
    pub entity: Entity,
    pub cue: Cue,
}

/// Animation-authored moments reported back by the animation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    AttackStateEnter,
    /// "Deal damage now".
    AttackImpactFrame,
    AttackStateExit,
}

/// Inbound animation signal for one entity.
#[derive(Event, Debug, Clone)]
pub struct AnimationSignal {
    pub entity: Entity,
    pub signal: Signal,
}

/// Ask the camera collaborator to focus on an entity.
#[derive(Event, Debug, Clone)]
pub struct FocusOn {
    pub entity: Entity,
}

/// One-shot notifications for the UI collaborator.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiNotice {
    Victory,
    Defeat,
    EncounterCleared,
}

/// Sent by the arena trigger volume when the player walks into a boss arena.
#[derive(Event, Debug, Clone)]
pub struct ArenaEntered {
    pub boss: Entity,
}

/// Ask for additional actors to be spawned on behalf of a boss.
#[derive(Event, Debug, Clone)]
pub struct SummonRequest {
    pub boss: Entity,
    pub archetype: String,
    pub count: u32,
    pub origin: Vec2,
}

/// Sent by the input collaborator when the player presses attack.
#[derive(Event, Debug, Clone)]
pub struct PlayerAttackRequest {
    pub player: Entity,
}
