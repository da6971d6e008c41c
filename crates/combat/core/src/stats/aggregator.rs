//! Cached attribute composition.
//!
//! ```text
//! effective = ModifierTable(buffs ⊕ passives).apply(base ⊕ equipment)
//! ```
//!
//! The aggregator owns the base record and the equipment record. Buff and
//! passive modifiers are supplied lazily by the owner when a recompute is
//! needed. Any source change must be signalled with
//! [`AttributeAggregator::mark_dirty`]; reads between changes return the
//! cached result.

use std::cell::Cell;

use super::attributes::AttributeSet;
use super::bonus::ModifierTable;

#[derive(Clone, Debug)]
pub struct AttributeAggregator {
    base: AttributeSet,
    equipment: AttributeSet,
    cache: Cell<AttributeSet>,
    dirty: Cell<bool>,
}

impl AttributeAggregator {
    /// Creates an aggregator; a missing base record falls back to
    /// [`AttributeSet::DEFAULT_BASE`].
    pub fn new(base: Option<AttributeSet>) -> Self {
        let base = base.unwrap_or(AttributeSet::DEFAULT_BASE);
        Self {
            base,
            equipment: AttributeSet::ZERO,
            cache: Cell::new(base),
            dirty: Cell::new(true),
        }
    }

    pub fn base(&self) -> &AttributeSet {
        &self.base
    }

    pub fn equipment(&self) -> &AttributeSet {
        &self.equipment
    }

    pub fn set_base(&mut self, base: Option<AttributeSet>) {
        self.base = base.unwrap_or(AttributeSet::DEFAULT_BASE);
        self.mark_dirty();
    }

    /// Replaces the equipment contribution; `None` means nothing equipped.
    pub fn set_equipment(&mut self, equipment: Option<AttributeSet>) {
        self.equipment = equipment.unwrap_or(AttributeSet::ZERO);
        self.mark_dirty();
    }

    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Pure composition of every source, bypassing the cache.
    pub fn recalculate(&self, modifiers: &ModifierTable) -> AttributeSet {
        let raw = self.base.combine(&self.equipment);
        modifiers.apply(&raw)
    }

    /// Returns the cached attributes, recomputing first if a source changed.
    ///
    /// `modifiers` is only invoked on a recompute.
    pub fn current_with(&self, modifiers: impl FnOnce() -> ModifierTable) -> AttributeSet {
        if self.dirty.get() {
            let table = modifiers();
            self.cache.set(self.recalculate(&table));
            self.dirty.set(false);
        }
        self.cache.get()
    }
}

impl Default for AttributeAggregator {
    fn default() -> Self {
        Self::new(None)
    }
}
