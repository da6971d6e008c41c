//! Combat state: identifiers, per-entity state and the reference world.
//!
//! - [`common`]: ids and teams shared by every layer
//! - [`combatant`]: one entity's health, attributes and schedules
//! - [`arena`]: the in-memory [`crate::env::CombatWorld`] and its scheduler
pub mod arena;
pub mod combatant;
pub mod common;

pub use arena::Arena;
pub use combatant::Combatant;
pub use common::{BuffId, EntityId, EquipmentId, PassiveId, SkillId, Team};
