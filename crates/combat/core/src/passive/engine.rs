//! Per-combatant passive evaluation.
//!
//! The engine decides *when* passives fire. Effects that touch other systems
//! (healing, debuffing the opponent, host callbacks) are handed back as
//! [`PassiveFired`] records for the owner to apply; effects that only shape
//! numbers (damage modifiers, mitigation, attribute grants) are read through
//! the query methods.

use std::sync::Arc;

use arrayvec::ArrayVec;

use super::definition::{PassiveDefinition, PassiveEffect, PassiveTrigger, TriggerKind};
use crate::config::CombatConfig;
use crate::state::PassiveId;
use crate::stats::ModifierTable;

/// Immediate consequence of a passive firing.
#[derive(Clone, Debug, PartialEq)]
pub enum PassiveAction {
    /// The effect is read through damage or mitigation queries.
    Modifier,
    /// A triggered attribute bonus gained another grant.
    AttributeGranted,
    /// The passive's absorb pool was refilled to this amount.
    ShieldRaised(f32),
    /// The owner heals by this amount.
    Heal(f32),
    /// The current opponent is stunned.
    Stun { duration: f32 },
    /// The current opponent is slowed.
    Slow { percent: f32, duration: f32 },
    Custom(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct PassiveFired {
    pub passive: PassiveId,
    pub action: PassiveAction,
}

/// Runtime counters of one passive.
#[derive(Clone, Debug, PartialEq)]
pub struct PassiveInstance {
    definition: Arc<PassiveDefinition>,
    attack_count: u32,
    interval_timer: f32,
    cooldown_remaining: f32,
    health_low_latched: bool,
    grants: u32,
    shield_pool: f32,
}

impl PassiveInstance {
    fn new(definition: Arc<PassiveDefinition>) -> Self {
        let interval_timer = match definition.trigger {
            PassiveTrigger::Interval { seconds } => seconds,
            _ => 0.0,
        };
        let shield_pool = match definition.effect {
            PassiveEffect::Shield { amount } if definition.is_permanent() => amount.max(0.0),
            _ => 0.0,
        };
        Self {
            definition,
            attack_count: 0,
            interval_timer,
            cooldown_remaining: 0.0,
            health_low_latched: false,
            grants: 0,
            shield_pool,
        }
    }

    pub fn definition(&self) -> &Arc<PassiveDefinition> {
        &self.definition
    }

    pub fn id(&self) -> PassiveId {
        self.definition.id
    }

    pub fn attack_count(&self) -> u32 {
        self.attack_count
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    pub fn is_latched(&self) -> bool {
        self.health_low_latched
    }

    pub fn shield_pool(&self) -> f32 {
        self.shield_pool
    }

    /// Applies the effect unless cooling down. Sets `dirty` when the
    /// attribute contribution changes.
    fn fire(&mut self, dirty: &mut bool) -> Option<PassiveFired> {
        if self.definition.cooldown.is_some() && self.cooldown_remaining > 0.0 {
            tracing::trace!(passive = %self.id(), "passive cooling down");
            return None;
        }

        let action = match &self.definition.effect {
            PassiveEffect::AttributeBonus(_) => {
                self.grants += 1;
                *dirty = true;
                PassiveAction::AttributeGranted
            }
            PassiveEffect::Shield { amount } => {
                self.shield_pool = self.shield_pool.max(*amount);
                PassiveAction::ShieldRaised(self.shield_pool)
            }
            PassiveEffect::HealthRegen { amount } => PassiveAction::Heal(*amount),
            PassiveEffect::Stun { duration } => PassiveAction::Stun {
                duration: *duration,
            },
            PassiveEffect::Slow { percent, duration } => PassiveAction::Slow {
                percent: *percent,
                duration: *duration,
            },
            PassiveEffect::Custom { tag } => PassiveAction::Custom(tag.clone()),
            PassiveEffect::DamageMultiplier { .. }
            | PassiveEffect::ExtraDamage { .. }
            | PassiveEffect::CriticalHit { .. }
            | PassiveEffect::DamageReduction { .. } => PassiveAction::Modifier,
        };

        if let Some(cooldown) = self.definition.cooldown {
            self.cooldown_remaining = cooldown.max(0.0);
        }
        tracing::debug!(passive = %self.id(), trigger = %self.definition.trigger.kind(), "passive fired");
        Some(PassiveFired {
            passive: self.id(),
            action,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct PassiveTriggerEngine {
    instances: ArrayVec<PassiveInstance, { CombatConfig::MAX_PASSIVES }>,
    dirty: bool,
}

impl PassiveTriggerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PassiveInstance> {
        self.instances.iter()
    }

    pub fn get(&self, id: PassiveId) -> Option<&PassiveInstance> {
        self.instances.iter().find(|inst| inst.id() == id)
    }

    /// Registers a passive; returns `false` for duplicates or when full.
    pub fn add(&mut self, definition: Arc<PassiveDefinition>) -> bool {
        if self.get(definition.id).is_some() {
            return false;
        }
        if self.instances.is_full() {
            tracing::warn!(passive = %definition.id, "passive capacity reached; passive dropped");
            return false;
        }
        if definition.is_permanent() && matches!(definition.effect, PassiveEffect::AttributeBonus(_))
        {
            self.dirty = true;
        }
        self.instances.push(PassiveInstance::new(definition));
        true
    }

    pub fn remove(&mut self, id: PassiveId) -> bool {
        let Some(index) = self.instances.iter().position(|inst| inst.id() == id) else {
            return false;
        };
        let removed = self.instances.remove(index);
        if matches!(removed.definition.effect, PassiveEffect::AttributeBonus(_)) {
            self.dirty = true;
        }
        true
    }

    // ========================================================================
    // Time and event triggers
    // ========================================================================

    /// Advances cooldowns, interval timers and health-low latches.
    pub fn update(&mut self, dt: f32, health_fraction: f32) -> Vec<PassiveFired> {
        let health_percent = health_fraction * 100.0;
        let mut fired = Vec::new();
        let dirty = &mut self.dirty;

        for instance in self.instances.iter_mut() {
            instance.cooldown_remaining = (instance.cooldown_remaining - dt).max(0.0);

            let trigger = instance.definition.trigger;
            match trigger {
                PassiveTrigger::Interval { seconds } if seconds > 0.0 => {
                    instance.interval_timer -= dt;
                    if instance.interval_timer <= 0.0 {
                        instance.interval_timer = seconds;
                        fired.extend(instance.fire(dirty));
                    }
                }
                PassiveTrigger::OnHealthLow { threshold_percent } => {
                    if health_percent <= threshold_percent {
                        if !instance.health_low_latched {
                            instance.health_low_latched = true;
                            fired.extend(instance.fire(dirty));
                        }
                    } else {
                        instance.health_low_latched = false;
                    }
                }
                _ => {}
            }
        }
        fired
    }

    /// The owner attacked: fires OnAttack passives and advances attack counters.
    pub fn on_attack(&mut self) -> Vec<PassiveFired> {
        let mut fired = Vec::new();
        let dirty = &mut self.dirty;
        for instance in self.instances.iter_mut() {
            let trigger = instance.definition.trigger;
            match trigger {
                PassiveTrigger::OnAttack => fired.extend(instance.fire(dirty)),
                PassiveTrigger::OnAttackCount { threshold } => {
                    instance.attack_count += 1;
                    if instance.attack_count >= threshold.max(1) {
                        instance.attack_count = 0;
                        fired.extend(instance.fire(dirty));
                    }
                }
                _ => {}
            }
        }
        fired
    }

    /// The owner was hit.
    pub fn on_hit(&mut self) -> Vec<PassiveFired> {
        self.fire_matching(TriggerKind::OnHit)
    }

    /// The owner killed something.
    pub fn on_kill(&mut self) -> Vec<PassiveFired> {
        self.fire_matching(TriggerKind::OnKill)
    }

    fn fire_matching(&mut self, kind: TriggerKind) -> Vec<PassiveFired> {
        let dirty = &mut self.dirty;
        self.instances
            .iter_mut()
            .filter(|inst| inst.definition.trigger.kind() == kind)
            .filter_map(|inst| inst.fire(dirty))
            .collect()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Bonus damage on top of `base` for an attack in `context`.
    ///
    /// Sums every passive whose trigger is `context` or permanent.
    pub fn damage_modifier(&self, base: f32, context: TriggerKind) -> f32 {
        self.instances
            .iter()
            .filter(|inst| {
                let kind = inst.definition.trigger.kind();
                kind == context || kind == TriggerKind::None
            })
            .map(|inst| match inst.definition.effect {
                PassiveEffect::DamageMultiplier { multiplier } => base * (multiplier - 1.0),
                PassiveEffect::ExtraDamage { amount } => amount,
                PassiveEffect::CriticalHit { multiplier } => base * (multiplier - 1.0),
                _ => 0.0,
            })
            .sum()
    }

    /// Amount to subtract from `incoming`: percentage reduction from OnHit and
    /// permanent passives, then absorb pools. Absorbed amounts are consumed.
    pub fn damage_reduction_modifier(&mut self, incoming: f32) -> f32 {
        let incoming = incoming.max(0.0);
        let reduction: f32 = self
            .instances
            .iter()
            .filter(|inst| {
                matches!(
                    inst.definition.trigger.kind(),
                    TriggerKind::OnHit | TriggerKind::None
                )
            })
            .filter_map(|inst| match inst.definition.effect {
                PassiveEffect::DamageReduction { percent } => {
                    Some(incoming * percent.clamp(0.0, 1.0))
                }
                _ => None,
            })
            .sum();
        let reduction = reduction.min(incoming);

        let mut left = incoming - reduction;
        for instance in self.instances.iter_mut() {
            if left <= 0.0 {
                break;
            }
            let absorbed = left.min(instance.shield_pool);
            instance.shield_pool -= absorbed;
            left -= absorbed;
        }
        incoming - left
    }

    /// Attribute contribution of permanent bonuses and accumulated grants.
    pub fn attribute_bonuses(&self) -> ModifierTable {
        let mut table = ModifierTable::new();
        for instance in &self.instances {
            if let PassiveEffect::AttributeBonus(modifier) = instance.definition.effect {
                if instance.definition.is_permanent() {
                    table.add(modifier);
                } else if instance.grants > 0 {
                    table.add(modifier.scaled(instance.grants as f32));
                }
            }
        }
        table
    }

    /// Returns and clears the "attribute contribution changed" flag.
    pub fn take_dirty(&mut self) -> bool {
        core::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{AttributeKind, AttributeModifier};

    fn passive(id: u32, trigger: PassiveTrigger, effect: PassiveEffect) -> Arc<PassiveDefinition> {
        Arc::new(PassiveDefinition::new(
            PassiveId(id),
            format!("passive-{id}"),
            trigger,
            effect,
        ))
    }

    #[test]
    fn attack_count_fires_on_threshold_and_resets() {
        let mut engine = PassiveTriggerEngine::new();
        engine.add(passive(
            1,
            PassiveTrigger::OnAttackCount { threshold: 3 },
            PassiveEffect::HealthRegen { amount: 5.0 },
        ));

        assert!(engine.on_attack().is_empty());
        assert!(engine.on_attack().is_empty());
        let fired = engine.on_attack();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].action, PassiveAction::Heal(5.0));
        assert_eq!(engine.get(PassiveId(1)).unwrap().attack_count(), 0);

        assert!(engine.on_attack().is_empty());
        assert!(engine.on_attack().is_empty());
    }

    #[test]
    fn extra_damage_applies_for_matching_or_permanent_trigger() {
        let mut engine = PassiveTriggerEngine::new();
        engine.add(passive(
            1,
            PassiveTrigger::OnAttack,
            PassiveEffect::ExtraDamage { amount: 10.0 },
        ));
        engine.add(passive(
            2,
            PassiveTrigger::None,
            PassiveEffect::DamageMultiplier { multiplier: 1.5 },
        ));
        engine.add(passive(
            3,
            PassiveTrigger::OnKill,
            PassiveEffect::CriticalHit { multiplier: 2.0 },
        ));

        // 10 flat + 20 × 0.5
        assert_eq!(engine.damage_modifier(20.0, TriggerKind::OnAttack), 20.0);
        // Only the permanent multiplier matches OnHit.
        assert_eq!(engine.damage_modifier(20.0, TriggerKind::OnHit), 10.0);
        // OnKill adds the critical passive.
        assert_eq!(engine.damage_modifier(20.0, TriggerKind::OnKill), 30.0);
    }

    #[test]
    fn health_low_is_edge_triggered_with_inclusive_threshold() {
        let mut engine = PassiveTriggerEngine::new();
        engine.add(passive(
            1,
            PassiveTrigger::OnHealthLow {
                threshold_percent: 50.0,
            },
            PassiveEffect::HealthRegen { amount: 20.0 },
        ));

        assert!(engine.update(0.1, 0.75).is_empty());
        assert_eq!(engine.update(0.1, 0.5).len(), 1);
        assert!(engine.update(0.1, 0.25).is_empty());
        assert!(engine.update(0.1, 0.5).is_empty());
        assert!(engine.get(PassiveId(1)).unwrap().is_latched());
        // Re-arms only strictly above the threshold.
        assert!(engine.update(0.1, 0.625).is_empty());
        assert!(!engine.get(PassiveId(1)).unwrap().is_latched());
        assert_eq!(engine.update(0.1, 0.25).len(), 1);
    }

    #[test]
    fn interval_fires_and_resets() {
        let mut engine = PassiveTriggerEngine::new();
        engine.add(passive(
            1,
            PassiveTrigger::Interval { seconds: 2.0 },
            PassiveEffect::Custom { tag: "pulse".into() },
        ));
        assert!(engine.update(1.5, 1.0).is_empty());
        let fired = engine.update(0.5, 1.0);
        assert_eq!(fired[0].action, PassiveAction::Custom("pulse".into()));
        assert!(engine.update(1.5, 1.0).is_empty());
        assert_eq!(engine.update(0.5, 1.0).len(), 1);
    }

    #[test]
    fn cooldown_suppresses_refiring() {
        let mut engine = PassiveTriggerEngine::new();
        engine.add(Arc::new(
            PassiveDefinition::new(
                PassiveId(1),
                "stunning blow",
                PassiveTrigger::OnAttack,
                PassiveEffect::Stun { duration: 1.0 },
            )
            .with_cooldown(10.0),
        ));

        assert_eq!(engine.on_attack().len(), 1);
        assert!(engine.on_attack().is_empty());
        engine.update(9.0, 1.0);
        assert!(engine.on_attack().is_empty());
        engine.update(1.0, 1.0);
        assert_eq!(engine.get(PassiveId(1)).unwrap().cooldown_remaining(), 0.0);
        assert_eq!(engine.on_attack().len(), 1);
    }

    #[test]
    fn reduction_then_shield_absorb() {
        let mut engine = PassiveTriggerEngine::new();
        engine.add(passive(
            1,
            PassiveTrigger::None,
            PassiveEffect::DamageReduction { percent: 0.2 },
        ));
        engine.add(passive(
            2,
            PassiveTrigger::None,
            PassiveEffect::Shield { amount: 50.0 },
        ));
        engine.add(passive(
            3,
            PassiveTrigger::OnKill,
            PassiveEffect::DamageReduction { percent: 0.5 },
        ));

        // 100 incoming: 20 reduced, 50 absorbed.
        assert_eq!(engine.damage_reduction_modifier(100.0), 70.0);
        // Shield is spent: only the percentage remains.
        assert_eq!(engine.damage_reduction_modifier(100.0), 20.0);
    }

    #[test]
    fn attribute_bonus_permanent_and_granted() {
        let mut engine = PassiveTriggerEngine::new();
        engine.add(passive(
            1,
            PassiveTrigger::None,
            PassiveEffect::AttributeBonus(AttributeModifier::flat(AttributeKind::Defense, 5.0)),
        ));
        assert!(engine.take_dirty());
        engine.add(passive(
            2,
            PassiveTrigger::OnKill,
            PassiveEffect::AttributeBonus(AttributeModifier::flat(AttributeKind::AttackPower, 1.0)),
        ));
        assert!(!engine.take_dirty());

        engine.on_kill();
        engine.on_kill();
        assert!(engine.take_dirty());

        let table = engine.attribute_bonuses();
        assert_eq!(table.flat(AttributeKind::Defense), 5.0);
        assert_eq!(table.flat(AttributeKind::AttackPower), 2.0);
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut engine = PassiveTriggerEngine::new();
        let def = passive(1, PassiveTrigger::OnHit, PassiveEffect::HealthRegen { amount: 1.0 });
        assert!(engine.add(def.clone()));
        assert!(!engine.add(def));
        assert_eq!(engine.on_hit().len(), 1);
        assert!(engine.remove(PassiveId(1)));
        assert!(engine.is_empty());
    }
}
