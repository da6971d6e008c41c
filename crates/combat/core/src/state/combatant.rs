//! Per-entity combat state.
//!
//! A [`Combatant`] is plain composed state: health, transform, team, the
//! attribute aggregator and the three per-entity schedules (buffs, passives,
//! cooldowns). Nothing here reaches other entities; cross-entity effects are
//! returned to the caller ([`BuffTickReport`], [`PassiveFired`]) and applied
//! through [`crate::env::CombatWorld`].
//!
//! Every mutating method ends with `sync`, which folds the buff and passive
//! dirty flags into the aggregator and re-clamps health to the new maximum.

use std::sync::Arc;

use glam::Vec3;

use crate::buff::{BuffApplication, BuffCategory, BuffDefinition, BuffRegistry, BuffTickReport};
use crate::env::CombatantView;
use crate::equipment::{EquipmentInstance, EquipmentSlot, Loadout, SkillTreeKind};
use crate::passive::{PassiveDefinition, PassiveFired, PassiveTriggerEngine, TriggerKind};
use crate::skill::{CooldownTracker, SkillDefinition};
use crate::state::{BuffId, EntityId, SkillId, Team};
use crate::stats::{AttributeAggregator, AttributeSet, HealthMeter};

#[derive(Clone, Debug)]
pub struct Combatant {
    id: EntityId,
    team: Team,
    position: Vec3,
    forward: Vec3,
    health: HealthMeter,
    aggregator: AttributeAggregator,
    loadout: Loadout,
    buffs: BuffRegistry,
    passives: PassiveTriggerEngine,
    cooldowns: CooldownTracker,
    skills: Vec<Arc<SkillDefinition>>,
}

impl Combatant {
    /// Creates a combatant at full health. A missing base record falls back
    /// to [`AttributeSet::DEFAULT_BASE`].
    pub fn new(id: EntityId, team: Team, base: Option<AttributeSet>) -> Self {
        let aggregator = AttributeAggregator::new(base);
        let max_health = aggregator.recalculate(&Default::default()).max_health;
        Self {
            id,
            team,
            position: Vec3::ZERO,
            forward: Vec3::Z,
            health: HealthMeter::new(max_health),
            aggregator,
            loadout: Loadout::new(),
            buffs: BuffRegistry::new(id),
            passives: PassiveTriggerEngine::new(),
            cooldowns: CooldownTracker::new(),
            skills: Vec::new(),
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_forward(mut self, forward: Vec3) -> Self {
        self.set_forward(forward);
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn health(&self) -> &HealthMeter {
        &self.health
    }

    pub fn buffs(&self) -> &BuffRegistry {
        &self.buffs
    }

    pub fn passives(&self) -> &PassiveTriggerEngine {
        &self.passives
    }

    pub fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }

    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    pub fn skills(&self) -> &[Arc<SkillDefinition>] {
        &self.skills
    }

    pub fn skill(&self, id: SkillId) -> Option<&Arc<SkillDefinition>> {
        self.skills.iter().find(|skill| skill.id == id)
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    /// Effective attributes: base and equipment, with buff and passive
    /// modifiers applied. Cached until a source changes.
    pub fn attributes(&self) -> AttributeSet {
        self.aggregator.current_with(|| {
            let mut table = self.buffs.modifier_table();
            table.merge(&self.passives.attribute_bonuses());
            table
        })
    }

    pub fn view(&self) -> CombatantView {
        CombatantView {
            id: self.id,
            position: self.position,
            forward: self.forward,
            team: self.team,
            alive: self.is_alive(),
            attributes: self.attributes(),
            health: self.health.current(),
            max_health: self.health.maximum(),
            control: self.buffs.control_state(),
            life_steal_ratio: self.buffs.life_steal_ratio(),
        }
    }

    /// Movement speed after slows.
    pub fn move_speed(&self) -> f32 {
        self.attributes().move_speed * self.buffs.movement_speed_modifier()
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Zero vectors are ignored.
    pub fn set_forward(&mut self, forward: Vec3) {
        let forward = forward.normalize_or_zero();
        if forward != Vec3::ZERO {
            self.forward = forward;
        }
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Removes health; returns the amount removed. On death every buff is
    /// cleared.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if !self.is_alive() {
            return 0.0;
        }
        let dealt = self.health.take_damage(amount);
        if self.health.is_depleted() {
            let cleared = self.buffs.clear();
            tracing::debug!(entity = %self.id, cleared, "combatant died");
            self.sync();
        }
        dealt
    }

    /// Restores health; dead combatants cannot be healed.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.is_alive() {
            return 0.0;
        }
        self.health.heal(amount)
    }

    // ========================================================================
    // Buffs
    // ========================================================================

    pub fn add_buff(
        &mut self,
        definition: Arc<BuffDefinition>,
        caster: Option<EntityId>,
    ) -> Option<BuffApplication> {
        if !self.is_alive() {
            return None;
        }
        let application = self.buffs.add(definition, caster);
        self.sync();
        application
    }

    pub fn update_buffs(&mut self, dt: f32) -> BuffTickReport {
        let report = self.buffs.update(dt);
        self.sync();
        report
    }

    pub fn dispel(&mut self, max_count: usize) -> usize {
        let removed = self.buffs.dispel(max_count);
        self.sync();
        removed
    }

    pub fn remove_buffs_by_definition(&mut self, id: BuffId) -> usize {
        let removed = self.buffs.remove_by_definition(id);
        self.sync();
        removed
    }

    pub fn remove_buffs_by_category(&mut self, category: BuffCategory) -> usize {
        let removed = self.buffs.remove_by_category(category);
        self.sync();
        removed
    }

    // ========================================================================
    // Passives and skills
    // ========================================================================

    pub fn add_passive(&mut self, definition: Arc<PassiveDefinition>) -> bool {
        let added = self.passives.add(definition);
        self.sync();
        added
    }

    /// Learns a skill, replacing an earlier definition with the same id, and
    /// registers the passive it carries.
    pub fn learn_skill(&mut self, skill: Arc<SkillDefinition>) {
        if let Some(passive) = &skill.passive {
            self.add_passive(Arc::new(passive.clone()));
        }
        match self.skills.iter_mut().find(|known| known.id == skill.id) {
            Some(known) => *known = skill,
            None => self.skills.push(skill),
        }
    }

    pub fn update_passives(&mut self, dt: f32) -> Vec<PassiveFired> {
        let fired = self.passives.update(dt, self.health.fraction());
        self.sync();
        fired
    }

    pub fn on_attack(&mut self) -> Vec<PassiveFired> {
        let fired = self.passives.on_attack();
        self.sync();
        fired
    }

    pub fn on_hit(&mut self) -> Vec<PassiveFired> {
        let fired = self.passives.on_hit();
        self.sync();
        fired
    }

    pub fn on_kill(&mut self) -> Vec<PassiveFired> {
        let fired = self.passives.on_kill();
        self.sync();
        fired
    }

    /// Passive bonus on top of `base` for an attack in `context`.
    pub fn damage_bonus(&self, base: f32, context: TriggerKind) -> f32 {
        self.passives.damage_modifier(base, context)
    }

    /// Amount of `incoming` this combatant cancels: passive reduction and
    /// absorb pools first, then buff shields, then the `damage_reduction`
    /// percentage attribute. Consumes absorb pools.
    pub fn mitigate(&mut self, incoming: f32) -> f32 {
        let incoming = incoming.max(0.0);
        let mut left = incoming - self.passives.damage_reduction_modifier(incoming);
        left -= self.buffs.absorb(left);
        self.sync();
        let percent = (self.attributes().damage_reduction / 100.0).clamp(0.0, 1.0);
        left -= left * percent;
        incoming - left.max(0.0)
    }

    pub fn update_cooldowns(&mut self, dt: f32) {
        self.cooldowns.update(dt);
    }

    pub fn cooldown_remaining(&self, skill: SkillId) -> f32 {
        self.cooldowns.remaining(skill)
    }

    pub fn start_cooldown(&mut self, skill: SkillId, seconds: f32) {
        self.cooldowns.start(skill, seconds);
    }

    // ========================================================================
    // Equipment
    // ========================================================================

    /// Equips an item; returns the item previously in that slot.
    pub fn equip(&mut self, item: EquipmentInstance) -> Option<EquipmentInstance> {
        let previous = self.loadout.equip(item);
        self.refresh_equipment();
        previous
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<EquipmentInstance> {
        let removed = self.loadout.unequip(slot);
        self.refresh_equipment();
        removed
    }

    pub fn upgrade_quality(&mut self, slot: EquipmentSlot) -> bool {
        let upgraded = self
            .loadout
            .get_mut(slot)
            .is_some_and(|item| item.upgrade_quality());
        if upgraded {
            self.refresh_equipment();
        }
        upgraded
    }

    pub fn upgrade_skill_tree(&mut self, slot: EquipmentSlot, kind: SkillTreeKind) -> bool {
        self.loadout
            .get_mut(slot)
            .is_some_and(|item| item.upgrade_tree(kind))
    }

    fn refresh_equipment(&mut self) {
        self.aggregator.set_equipment(self.loadout.total_bonus());
        self.sync();
    }

    fn sync(&mut self) {
        let buffs_changed = self.buffs.take_dirty();
        let passives_changed = self.passives.take_dirty();
        if buffs_changed || passives_changed {
            self.aggregator.mark_dirty();
        }
        let max_health = self.attributes().max_health;
        self.health.set_maximum(max_health);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buff::BuffEffect;
    use crate::equipment::{EquipmentDefinition, Quality};
    use crate::passive::{PassiveEffect, PassiveTrigger};
    use crate::state::{EquipmentId, PassiveId};
    use crate::stats::{AttributeKind, AttributeModifier};

    fn fighter() -> Combatant {
        Combatant::new(EntityId(1), Team::Player, None)
    }

    #[test]
    fn starts_at_full_default_health() {
        let unit = fighter();
        assert_eq!(unit.health().current(), 100.0);
        assert_eq!(unit.attributes(), AttributeSet::DEFAULT_BASE);
        assert!(unit.is_alive());
    }

    #[test]
    fn attribute_buff_changes_then_reverts() {
        let mut unit = fighter();
        let rage = Arc::new(
            BuffDefinition::new(
                BuffId(1),
                "rage",
                BuffCategory::Positive,
                BuffEffect::Attribute(AttributeModifier::flat(AttributeKind::AttackPower, 5.0)),
            )
            .with_duration(2.0),
        );
        unit.add_buff(rage, None);
        assert_eq!(unit.attributes().attack_power, 15.0);

        unit.update_buffs(2.5);
        assert!(unit.buffs().is_empty());
        assert_eq!(unit.attributes().attack_power, 10.0);
    }

    #[test]
    fn losing_max_health_clamps_current() {
        let mut unit = fighter();
        let frailty = Arc::new(BuffDefinition::new(
            BuffId(2),
            "frailty",
            BuffCategory::Negative,
            BuffEffect::Attribute(AttributeModifier::percent(AttributeKind::MaxHealth, -50.0)),
        ));
        unit.add_buff(frailty, None);
        assert_eq!(unit.health().maximum(), 50.0);
        assert_eq!(unit.health().current(), 50.0);
    }

    #[test]
    fn death_clears_buffs_and_blocks_healing() {
        let mut unit = fighter();
        let mark = Arc::new(BuffDefinition::new(
            BuffId(3),
            "mark",
            BuffCategory::Negative,
            BuffEffect::Silence,
        ));
        unit.add_buff(mark, None);
        assert_eq!(unit.take_damage(250.0), 100.0);
        assert!(!unit.is_alive());
        assert!(unit.buffs().is_empty());
        assert_eq!(unit.heal(10.0), 0.0);
        assert_eq!(unit.take_damage(10.0), 0.0);
    }

    #[test]
    fn triggered_attribute_bonus_accumulates() {
        let mut unit = fighter();
        unit.add_passive(Arc::new(PassiveDefinition::new(
            PassiveId(1),
            "bloodlust",
            PassiveTrigger::OnKill,
            PassiveEffect::AttributeBonus(AttributeModifier::flat(AttributeKind::AttackPower, 2.0)),
        )));
        unit.on_kill();
        unit.on_kill();
        assert_eq!(unit.attributes().attack_power, 14.0);
    }

    #[test]
    fn mitigation_layers_passive_shield_and_attribute() {
        let base = AttributeSet::DEFAULT_BASE.with(AttributeKind::DamageReduction, 50.0);
        let mut unit = Combatant::new(EntityId(2), Team::Player, Some(base));
        let barrier = Arc::new(BuffDefinition::new(
            BuffId(4),
            "barrier",
            BuffCategory::Positive,
            BuffEffect::Shield { amount: 4.0 },
        ));
        unit.add_buff(barrier, None);
        // 20 - 4 absorbed = 16, then half of that.
        assert_eq!(unit.mitigate(20.0), 12.0);
        assert!(unit.buffs().is_empty());
    }

    #[test]
    fn equipment_feeds_the_aggregator() {
        let mut unit = fighter();
        let sword = Arc::new(EquipmentDefinition {
            id: EquipmentId(1),
            name: "sword".into(),
            slot: EquipmentSlot::Weapon,
            quality_bonuses: vec![
                AttributeSet::ZERO.with(AttributeKind::AttackPower, 5.0),
                AttributeSet::ZERO.with(AttributeKind::AttackPower, 8.0),
            ],
            skill_trees: vec![SkillTreeKind::CrazyBlade],
        });
        unit.equip(EquipmentInstance::new(sword, Quality::Green));
        assert_eq!(unit.attributes().attack_power, 15.0);

        assert!(unit.upgrade_quality(EquipmentSlot::Weapon));
        assert_eq!(unit.attributes().attack_power, 18.0);

        unit.unequip(EquipmentSlot::Weapon);
        assert_eq!(unit.attributes().attack_power, 10.0);
    }

    #[test]
    fn learning_a_skill_registers_its_passive() {
        let mut unit = fighter();
        let mut skill = SkillDefinition::new(SkillId(7), "cleave");
        skill.passive = Some(PassiveDefinition::new(
            PassiveId(9),
            "sharpness",
            PassiveTrigger::None,
            PassiveEffect::ExtraDamage { amount: 3.0 },
        ));
        unit.learn_skill(Arc::new(skill));
        assert!(unit.skill(SkillId(7)).is_some());
        assert_eq!(unit.damage_bonus(10.0, TriggerKind::OnAttack), 3.0);
    }
}
