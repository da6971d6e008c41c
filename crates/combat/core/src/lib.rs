//! Combat resolution rules for a real-time wave-defense game.
//!
//! `combat-core` owns the numeric and state-machine side of combat: attribute
//! aggregation, timed buffs, passive triggers, skill resolution and the
//! geometric target queries behind them. Position integration, AI and
//! rendering live outside; they talk to this crate through the
//! [`env::CombatWorld`] seam, and [`state::Arena`] provides an in-memory
//! implementation plus a frame-stepped scheduler.
pub mod buff;
pub mod config;
pub mod env;
pub mod equipment;
pub mod error;
pub mod passive;
pub mod skill;
pub mod state;
pub mod stats;

pub use buff::{
    BuffApplication, BuffCategory, BuffDefinition, BuffEffect, BuffInstance, BuffPulse,
    BuffRegistry, BuffTickReport, ControlFlags, PulseKind, StackOutcome, StackPolicy, TickRate,
};
pub use config::CombatConfig;
pub use env::{
    CombatEvent, CombatHook, CombatWorld, CombatantView, DefinitionCatalog, DefinitionOracle,
};
pub use equipment::{
    EquipmentDefinition, EquipmentInstance, EquipmentSlot, Loadout, Quality, SkillTreeKind,
};
pub use error::{CastError, CombatError, ErrorSeverity};
pub use passive::{
    PassiveAction, PassiveDefinition, PassiveEffect, PassiveFired, PassiveInstance,
    PassiveTrigger, PassiveTriggerEngine, TriggerKind,
};
pub use skill::{
    AttackStyle, CastReport, CooldownTracker, DamageProfile, Dash, MovementSpec, Projectile,
    ProjectileSpec, ProjectileStatus, RangeShape, SkillCategory, SkillDefinition, SkillResolver,
};
pub use state::{Arena, BuffId, Combatant, EntityId, EquipmentId, PassiveId, SkillId, Team};
pub use stats::{
    AttributeAggregator, AttributeKind, AttributeModifier, AttributeSet, HealthMeter,
    ModifierMode, ModifierTable,
};
