//! Timed status effects.
//!
//! Definitions are authored once and shared behind `Arc`; each combatant owns
//! a [`BuffRegistry`] holding its active [`BuffInstance`]s.
mod definition;
mod instance;
mod registry;

pub use definition::{BuffCategory, BuffDefinition, BuffEffect, StackPolicy, TickRate};
pub use instance::BuffInstance;
pub use registry::{BuffApplication, BuffRegistry, BuffTickReport, StackOutcome};

use bitflags::bitflags;

use crate::env::CombatWorld;
use crate::state::{BuffId, EntityId};

bitflags! {
    /// Control effects currently constraining a combatant.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ControlFlags: u8 {
        const STUNNED = 1 << 0;
        const SILENCED = 1 << 1;
        const SLOWED = 1 << 2;
        const SHIELDED = 1 << 3;
    }
}

/// A periodic effect produced by a buff tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuffPulse {
    pub buff: BuffId,
    pub caster: Option<EntityId>,
    pub kind: PulseKind,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PulseKind {
    /// Damage to the buff owner.
    Damage(f32),
    /// Healing to the buff owner.
    Heal(f32),
    /// Damage to hostiles around the owner, owner excluded.
    AreaDamage { radius: f32, amount: f32 },
    /// Healing to friendlies around the owner, owner excluded.
    AreaHeal { radius: f32, amount: f32 },
}

impl BuffPulse {
    /// Applies the pulse on behalf of `owner`.
    ///
    /// Does nothing when the owner is gone or dead.
    pub fn apply(&self, owner: EntityId, world: &mut dyn CombatWorld) {
        let Some(view) = world.combatant(owner).filter(|v| v.alive) else {
            return;
        };
        match self.kind {
            PulseKind::Damage(amount) => {
                world.take_damage(owner, amount);
            }
            PulseKind::Heal(amount) => {
                world.heal(owner, amount);
            }
            PulseKind::AreaDamage { radius, amount } => {
                for id in world.entities_in_radius(view.position, radius) {
                    if id == owner {
                        continue;
                    }
                    if let Some(other) = world.combatant(id)
                        && other.alive
                        && view.team.is_hostile_to(other.team)
                    {
                        world.take_damage(id, amount);
                    }
                }
            }
            PulseKind::AreaHeal { radius, amount } => {
                for id in world.entities_in_radius(view.position, radius) {
                    if id == owner {
                        continue;
                    }
                    if let Some(other) = world.combatant(id)
                        && other.alive
                        && view.team.is_friendly_to(other.team)
                    {
                        world.heal(id, amount);
                    }
                }
            }
        }
    }
}
