//! Traits describing what combat needs from its surroundings.
//!
//! [`CombatWorld`] is the narrow mutable interface through which resolution
//! code reaches other combatants: spatial queries, damage, healing, buff
//! application, transforms, cooldowns and the effect channel.
//! [`DefinitionOracle`] is the read-only lookup of authored definitions.
mod catalog;

pub use catalog::DefinitionCatalog;

use std::sync::Arc;

use glam::Vec3;

use crate::buff::{BuffApplication, BuffDefinition, ControlFlags, StackOutcome};
use crate::equipment::EquipmentDefinition;
use crate::passive::{PassiveDefinition, TriggerKind};
use crate::skill::{Dash, Projectile, SkillDefinition};
use crate::state::{BuffId, EntityId, EquipmentId, PassiveId, SkillId, Team};
use crate::stats::AttributeSet;

/// Snapshot of a combatant taken at query time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatantView {
    pub id: EntityId,
    pub position: Vec3,
    pub forward: Vec3,
    pub team: Team,
    pub alive: bool,
    pub attributes: AttributeSet,
    pub health: f32,
    pub max_health: f32,
    pub control: ControlFlags,
    /// Life-steal ratio granted by active buffs.
    pub life_steal_ratio: f32,
}

impl CombatantView {
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    pub fn is_hostile_to(&self, other: &CombatantView) -> bool {
        self.team.is_hostile_to(other.team)
    }
}

/// Combat moments that drive passive triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CombatHook {
    Attack,
    Hit,
    Kill,
}

/// Fire-and-forget notices for presentation layers.
#[derive(Clone, Debug, PartialEq)]
pub enum CombatEvent {
    HitFlash {
        target: EntityId,
        amount: f32,
    },
    Death {
        entity: EntityId,
    },
    BuffApplied {
        target: EntityId,
        buff: BuffId,
        outcome: StackOutcome,
    },
    BuffExpired {
        target: EntityId,
        buff: BuffId,
    },
    ProjectileLaunched {
        owner: EntityId,
        skill: SkillId,
    },
    PassiveTriggered {
        owner: EntityId,
        passive: PassiveId,
    },
}

/// Mutable world interface consumed by skill resolution, projectiles and
/// buff pulses.
///
/// Every method tolerates unknown or dead entities by doing nothing and
/// returning a neutral value.
pub trait CombatWorld {
    fn combatant(&self, id: EntityId) -> Option<CombatantView>;

    /// Ids of every combatant within `radius` of `center`, in no particular order.
    fn entities_in_radius(&self, center: Vec3, radius: f32) -> Vec<EntityId>;

    /// Applies already-mitigated damage; returns the health actually removed.
    fn take_damage(&mut self, target: EntityId, amount: f32) -> f32;

    /// Returns the health actually restored.
    fn heal(&mut self, target: EntityId, amount: f32) -> f32;

    fn add_buff(
        &mut self,
        target: EntityId,
        definition: Arc<BuffDefinition>,
        caster: Option<EntityId>,
    ) -> Option<BuffApplication>;

    fn set_position(&mut self, id: EntityId, position: Vec3);

    fn set_forward(&mut self, id: EntityId, forward: Vec3);

    fn cooldown_remaining(&self, id: EntityId, skill: SkillId) -> f32;

    fn start_cooldown(&mut self, id: EntityId, skill: SkillId, seconds: f32);

    /// Passive bonus damage the attacker adds on top of `base`.
    fn damage_bonus(&self, attacker: EntityId, base: f32, context: TriggerKind) -> f32;

    /// Amount the target subtracts from `incoming`; may consume absorb pools.
    fn damage_reduction(&mut self, target: EntityId, incoming: f32) -> f32;

    /// Runs the passive hook of `id`; `opponent` receives opponent-directed effects.
    fn notify(&mut self, id: EntityId, hook: CombatHook, opponent: Option<EntityId>);

    fn spawn_projectile(&mut self, projectile: Projectile);

    fn begin_dash(&mut self, dash: Dash);

    fn emit(&mut self, _event: CombatEvent) {}
}

/// Read-only lookup of authored definitions by stable id.
pub trait DefinitionOracle: Send + Sync {
    fn buff(&self, id: BuffId) -> Option<Arc<BuffDefinition>>;
    fn skill(&self, id: SkillId) -> Option<Arc<SkillDefinition>>;
    fn passive(&self, id: PassiveId) -> Option<Arc<PassiveDefinition>>;
    fn equipment(&self, id: EquipmentId) -> Option<Arc<EquipmentDefinition>>;
}
