//! Attribute modifiers and their per-kind accumulation.
//!
//! Modifiers from every active source are grouped by attribute kind and
//! applied in a fixed order:
//! Flat (summed) → Percent (summed, then multiplied) → Clamp at zero
//!
//! ```text
//! final = max(0, (base + Σflat) × (1 + Σpercent / 100))
//! ```

use strum::EnumCount;

use super::attributes::{AttributeKind, AttributeSet};

/// How a modifier's value is folded into its attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierMode {
    /// Added to the attribute before percentages.
    #[default]
    Flat,
    /// Percentage of the flat-adjusted value (`20.0` = +20%).
    Percent,
}

/// A single attribute change contributed by a buff or passive.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeModifier {
    pub kind: AttributeKind,
    pub value: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: ModifierMode,
}

impl AttributeModifier {
    pub const fn flat(kind: AttributeKind, value: f32) -> Self {
        Self {
            kind,
            value,
            mode: ModifierMode::Flat,
        }
    }

    pub const fn percent(kind: AttributeKind, value: f32) -> Self {
        Self {
            kind,
            value,
            mode: ModifierMode::Percent,
        }
    }

    /// Same modifier with its value multiplied by `factor` (stack scaling).
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            value: self.value * factor,
            ..self
        }
    }
}

/// Per-kind accumulation of modifiers.
///
/// The table is rebuilt from the currently active sources whenever the
/// aggregator recomputes, so removing a source removes its contribution
/// exactly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModifierTable {
    flat: [f32; AttributeKind::COUNT],
    percent: [f32; AttributeKind::COUNT],
    len: usize,
}

impl ModifierTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, modifier: AttributeModifier) {
        let slot = modifier.kind.index();
        match modifier.mode {
            ModifierMode::Flat => self.flat[slot] += modifier.value,
            ModifierMode::Percent => self.percent[slot] += modifier.value,
        }
        self.len += 1;
    }

    pub fn extend(&mut self, modifiers: impl IntoIterator<Item = AttributeModifier>) {
        for modifier in modifiers {
            self.add(modifier);
        }
    }

    /// Folds another table into this one.
    pub fn merge(&mut self, other: &ModifierTable) {
        for slot in 0..AttributeKind::COUNT {
            self.flat[slot] += other.flat[slot];
            self.percent[slot] += other.percent[slot];
        }
        self.len += other.len;
    }

    pub fn flat(&self, kind: AttributeKind) -> f32 {
        self.flat[kind.index()]
    }

    pub fn percent(&self, kind: AttributeKind) -> f32 {
        self.percent[kind.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of modifiers folded into the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Applies the table to `base` and clamps every field at zero.
    pub fn apply(&self, base: &AttributeSet) -> AttributeSet {
        if self.is_empty() {
            return base.non_negative();
        }
        let mut out = *base;
        for kind in <AttributeKind as strum::IntoEnumIterator>::iter() {
            let slot = kind.index();
            let after_flat = base.get(kind) + self.flat[slot];
            let value = if self.percent[slot] == 0.0 {
                after_flat
            } else {
                after_flat * (1.0 + self.percent[slot] / 100.0)
            };
            out = out.with(kind, value);
        }
        out.non_negative()
    }
}
