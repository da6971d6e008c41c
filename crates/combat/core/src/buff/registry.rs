//! Per-combatant buff collection.
//!
//! The registry never talks to the world directly. Periodic effects come out
//! of [`BuffRegistry::update`] as [`BuffPulse`]s and stack-threshold bursts
//! come out of [`BuffRegistry::add`] as part of the [`BuffApplication`]; the
//! owner applies them through the world afterwards. This keeps the registry
//! exclusively owned by its combatant while it is being mutated.
//!
//! # Ordering
//!
//! Instances are kept in insertion order. `update` walks them oldest first;
//! `dispel` walks them newest first.

use std::sync::Arc;

use arrayvec::ArrayVec;

use super::definition::{BuffCategory, BuffDefinition, BuffEffect, StackPolicy};
use super::instance::BuffInstance;
use super::{BuffPulse, ControlFlags, PulseKind};
use crate::config::CombatConfig;
use crate::state::{BuffId, EntityId};
use crate::stats::ModifierTable;

/// What an [`BuffRegistry::add`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum StackOutcome {
    /// A new instance was created.
    Applied,
    /// Remaining duration was reset to the full duration.
    Refreshed,
    /// Full duration was added to the remaining duration.
    Extended,
    /// Stack count increased.
    Stacked,
    /// Stack count reached the stack-counter threshold; the instance burst and expired.
    ThresholdReached,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuffApplication {
    pub buff: BuffId,
    pub outcome: StackOutcome,
    pub stacks: u32,
    /// Damage the owner must take because a stack counter burst.
    pub burst_damage: Option<f32>,
}

/// Result of one [`BuffRegistry::update`] step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuffTickReport {
    /// Periodic effects that fired, in registration order.
    pub pulses: Vec<BuffPulse>,
    /// Buffs that ran out this step, in registration order.
    pub expired: Vec<BuffId>,
}

#[derive(Clone, Debug)]
pub struct BuffRegistry {
    owner: EntityId,
    instances: ArrayVec<BuffInstance, { CombatConfig::MAX_BUFFS }>,
    next_sequence: u64,
    dirty: bool,
}

impl BuffRegistry {
    pub fn new(owner: EntityId) -> Self {
        Self {
            owner,
            instances: ArrayVec::new(),
            next_sequence: 0,
            dirty: false,
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuffInstance> {
        self.instances.iter()
    }

    /// First active instance of a definition.
    pub fn find(&self, id: BuffId) -> Option<&BuffInstance> {
        self.instances.iter().find(|inst| inst.id() == id)
    }

    pub fn contains(&self, id: BuffId) -> bool {
        self.find(id).is_some()
    }

    // ========================================================================
    // Application
    // ========================================================================

    /// Applies a buff, merging with an existing instance according to the
    /// definition's stack policy.
    ///
    /// Returns `None` when a new instance would be needed but the registry is
    /// full.
    pub fn add(
        &mut self,
        definition: Arc<BuffDefinition>,
        caster: Option<EntityId>,
    ) -> Option<BuffApplication> {
        if definition.stacking != StackPolicy::Independent
            && let Some(index) = self
                .instances
                .iter()
                .position(|inst| inst.id() == definition.id)
        {
            return Some(self.restack(index));
        }

        if self.instances.is_full() {
            tracing::warn!(
                owner = %self.owner,
                buff = %definition.id,
                "buff registry full; application dropped"
            );
            return None;
        }

        let instance = BuffInstance::new(definition, self.owner, caster, self.next_sequence);
        self.next_sequence += 1;
        if !instance.applied().is_empty() {
            self.dirty = true;
        }
        let application = BuffApplication {
            buff: instance.id(),
            outcome: StackOutcome::Applied,
            stacks: instance.stacks(),
            burst_damage: None,
        };
        tracing::debug!(owner = %self.owner, buff = %application.buff, "buff applied");
        self.instances.push(instance);
        Some(application)
    }

    fn restack(&mut self, index: usize) -> BuffApplication {
        let instance = &mut self.instances[index];
        let definition = Arc::clone(instance.definition());
        let buff = definition.id;

        let outcome = match definition.stacking {
            StackPolicy::Duration => {
                instance.extend();
                StackOutcome::Extended
            }
            StackPolicy::Count { .. } if instance.stacks() < definition.max_stacks() => {
                instance.add_stack();
                if !instance.applied().is_empty() {
                    self.dirty = true;
                }
                StackOutcome::Stacked
            }
            _ => {
                instance.refresh();
                StackOutcome::Refreshed
            }
        };
        let stacks = instance.stacks();

        if outcome == StackOutcome::Stacked
            && let BuffEffect::StackCounter {
                threshold,
                burst_damage,
            } = definition.effect
            && stacks >= threshold
        {
            instance.force_expire();
            self.remove_at(index);
            tracing::debug!(owner = %self.owner, %buff, stacks, "stack threshold reached");
            return BuffApplication {
                buff,
                outcome: StackOutcome::ThresholdReached,
                stacks,
                burst_damage: Some(burst_damage),
            };
        }

        tracing::trace!(owner = %self.owner, %buff, %outcome, stacks, "buff restacked");
        BuffApplication {
            buff,
            outcome,
            stacks,
            burst_damage: None,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Advances every instance by `dt`, collecting periodic effects and
    /// removing expired instances.
    pub fn update(&mut self, dt: f32) -> BuffTickReport {
        let mut report = BuffTickReport::default();

        for instance in self.instances.iter_mut() {
            if instance.advance(dt)
                && let Some(kind) = pulse_kind(&instance.definition().effect, instance.stacks())
            {
                report.pulses.push(BuffPulse {
                    buff: instance.id(),
                    caster: instance.caster(),
                    kind,
                });
            }
        }

        let mut index = 0;
        while index < self.instances.len() {
            if self.instances[index].is_expired() {
                let removed = self.remove_at(index);
                tracing::debug!(owner = %self.owner, buff = %removed.id(), "buff expired");
                report.expired.push(removed.id());
            } else {
                index += 1;
            }
        }

        report
    }

    /// Removes up to `max_count` dispellable negative buffs, newest first.
    pub fn dispel(&mut self, max_count: usize) -> usize {
        let mut removed = 0;
        let mut index = self.instances.len();
        while index > 0 && removed < max_count {
            index -= 1;
            let definition = self.instances[index].definition();
            if definition.dispellable && definition.category == BuffCategory::Negative {
                let instance = self.remove_at(index);
                tracing::debug!(owner = %self.owner, buff = %instance.id(), "buff dispelled");
                removed += 1;
            }
        }
        removed
    }

    pub fn remove_by_definition(&mut self, id: BuffId) -> usize {
        self.remove_where(|inst| inst.id() == id)
    }

    pub fn remove_by_category(&mut self, category: BuffCategory) -> usize {
        self.remove_where(|inst| inst.definition().category == category)
    }

    /// Removes everything, e.g. when the owner dies.
    pub fn clear(&mut self) -> usize {
        self.remove_where(|_| true)
    }

    fn remove_where(&mut self, mut predicate: impl FnMut(&BuffInstance) -> bool) -> usize {
        let mut removed = 0;
        let mut index = 0;
        while index < self.instances.len() {
            if predicate(&self.instances[index]) {
                self.remove_at(index);
                removed += 1;
            } else {
                index += 1;
            }
        }
        removed
    }

    fn remove_at(&mut self, index: usize) -> BuffInstance {
        let instance = self.instances.remove(index);
        if !instance.applied().is_empty() {
            self.dirty = true;
        }
        instance
    }

    // ========================================================================
    // Derived queries
    // ========================================================================

    pub fn is_stunned(&self) -> bool {
        self.has_effect(|effect| matches!(effect, BuffEffect::Stun))
    }

    pub fn is_silenced(&self) -> bool {
        self.has_effect(|effect| matches!(effect, BuffEffect::Silence))
    }

    fn has_effect(&self, check: impl Fn(&BuffEffect) -> bool) -> bool {
        self.instances
            .iter()
            .any(|inst| check(&inst.definition().effect))
    }

    pub fn control_state(&self) -> ControlFlags {
        let mut flags = ControlFlags::empty();
        for instance in &self.instances {
            match instance.definition().effect {
                BuffEffect::Stun => flags |= ControlFlags::STUNNED,
                BuffEffect::Silence => flags |= ControlFlags::SILENCED,
                BuffEffect::Slow { .. } => flags |= ControlFlags::SLOWED,
                BuffEffect::Shield { .. } if instance.shield_remaining() > 0.0 => {
                    flags |= ControlFlags::SHIELDED
                }
                _ => {}
            }
        }
        flags
    }

    /// Product of `(1 - percent)` over active slows.
    pub fn movement_speed_modifier(&self) -> f32 {
        self.instances
            .iter()
            .filter_map(|inst| match inst.definition().effect {
                BuffEffect::Slow { percent } => Some(1.0 - percent.clamp(0.0, 1.0)),
                _ => None,
            })
            .product()
    }

    /// Sum of life-steal ratios granted by active buffs.
    pub fn life_steal_ratio(&self) -> f32 {
        self.instances
            .iter()
            .filter_map(|inst| match inst.definition().effect {
                BuffEffect::LifeSteal { ratio } => Some(ratio.max(0.0)),
                _ => None,
            })
            .sum()
    }

    /// Soaks incoming damage with active shields, oldest first. Shields that
    /// run dry are removed. Returns the amount absorbed.
    pub fn absorb(&mut self, incoming: f32) -> f32 {
        let mut left = incoming.max(0.0);
        let mut index = 0;
        while index < self.instances.len() && left > 0.0 {
            let instance = &mut self.instances[index];
            if matches!(instance.definition().effect, BuffEffect::Shield { .. }) {
                left -= instance.absorb(left);
                if instance.shield_remaining() <= 0.0 {
                    let broken = self.remove_at(index);
                    tracing::debug!(owner = %self.owner, buff = %broken.id(), "shield broken");
                    continue;
                }
            }
            index += 1;
        }
        incoming.max(0.0) - left
    }

    /// Attribute contribution of every active instance.
    pub fn modifier_table(&self) -> ModifierTable {
        let mut table = ModifierTable::new();
        for instance in &self.instances {
            table.extend(instance.applied().iter().copied());
        }
        table
    }

    /// Returns and clears the "attribute contribution changed" flag.
    pub fn take_dirty(&mut self) -> bool {
        core::mem::take(&mut self.dirty)
    }
}

fn pulse_kind(effect: &BuffEffect, stacks: u32) -> Option<PulseKind> {
    let scale = stacks as f32;
    match *effect {
        BuffEffect::DamageOverTime { per_tick } => Some(PulseKind::Damage(per_tick * scale)),
        BuffEffect::HealOverTime { per_tick } => Some(PulseKind::Heal(per_tick * scale)),
        BuffEffect::AreaDamage { radius, per_tick } => Some(PulseKind::AreaDamage {
            radius,
            amount: per_tick,
        }),
        BuffEffect::AreaHeal { radius, per_tick } => Some(PulseKind::AreaHeal {
            radius,
            amount: per_tick,
        }),
        _ => None,
    }
}
