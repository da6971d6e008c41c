use std::sync::Arc;

use super::definition::{BuffDefinition, BuffEffect};
use crate::state::{BuffId, EntityId};
use crate::stats::AttributeModifier;

/// A buff active on one combatant.
///
/// `applied` caches the attribute contribution currently in effect so that
/// removing the instance removes exactly what it added.
#[derive(Clone, Debug, PartialEq)]
pub struct BuffInstance {
    definition: Arc<BuffDefinition>,
    target: EntityId,
    caster: Option<EntityId>,
    remaining: f32,
    stacks: u32,
    tick_timer: f32,
    applied: Vec<AttributeModifier>,
    shield_remaining: f32,
    sequence: u64,
}

impl BuffInstance {
    pub(crate) fn new(
        definition: Arc<BuffDefinition>,
        target: EntityId,
        caster: Option<EntityId>,
        sequence: u64,
    ) -> Self {
        let remaining = full_duration(&definition);
        let tick_timer = definition.tick_rate.interval().unwrap_or(0.0);
        let shield_remaining = match definition.effect {
            BuffEffect::Shield { amount } => amount.max(0.0),
            _ => 0.0,
        };
        let mut instance = Self {
            definition,
            target,
            caster,
            remaining,
            stacks: 1,
            tick_timer,
            applied: Vec::new(),
            shield_remaining,
            sequence,
        };
        instance.reapply();
        instance
    }

    pub fn definition(&self) -> &Arc<BuffDefinition> {
        &self.definition
    }

    pub fn id(&self) -> BuffId {
        self.definition.id
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn caster(&self) -> Option<EntityId> {
        self.caster
    }

    /// Remaining seconds; `f32::INFINITY` for permanent buffs.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn stacks(&self) -> u32 {
        self.stacks
    }

    pub fn applied(&self) -> &[AttributeModifier] {
        &self.applied
    }

    pub fn shield_remaining(&self) -> f32 {
        self.shield_remaining
    }

    /// Insertion order within the owning registry.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    pub(crate) fn refresh(&mut self) {
        self.remaining = full_duration(&self.definition);
        if let BuffEffect::Shield { amount } = self.definition.effect {
            self.shield_remaining = amount.max(0.0);
        }
    }

    pub(crate) fn extend(&mut self) {
        if !self.definition.is_permanent() {
            self.remaining += self.definition.duration;
        }
    }

    /// Adds one stack, re-deriving the attribute contribution.
    pub(crate) fn add_stack(&mut self) {
        self.stacks = (self.stacks + 1).min(self.definition.max_stacks());
        self.reapply();
    }

    pub(crate) fn force_expire(&mut self) {
        self.remaining = 0.0;
    }

    /// Advances timers by `dt`; returns true when a tick fires.
    pub(crate) fn advance(&mut self, dt: f32) -> bool {
        if !self.definition.is_permanent() {
            self.remaining -= dt;
        }
        let Some(interval) = self.definition.tick_rate.interval() else {
            return false;
        };
        if !self.definition.effect.is_periodic() {
            return false;
        }
        self.tick_timer -= dt;
        if self.tick_timer <= 0.0 {
            self.tick_timer = interval;
            true
        } else {
            false
        }
    }

    /// Soaks up to `incoming` damage from the shield pool.
    pub(crate) fn absorb(&mut self, incoming: f32) -> f32 {
        let absorbed = incoming.min(self.shield_remaining).max(0.0);
        self.shield_remaining -= absorbed;
        absorbed
    }

    fn reapply(&mut self) {
        let factor = self.stacks as f32;
        self.applied = self
            .definition
            .effect
            .modifiers()
            .iter()
            .map(|m| m.scaled(factor))
            .collect();
    }
}

fn full_duration(definition: &BuffDefinition) -> f32 {
    if definition.is_permanent() {
        f32::INFINITY
    } else {
        definition.duration
    }
}
