//! Attribute records - the value type every other layer composes.
//!
//! An [`AttributeSet`] is a plain `Copy` record. Combining two records never
//! mutates either input; equipment bonuses, base presets and aggregated
//! results are all just sets.

use core::ops::Add;

use crate::config::CombatConfig;

// ============================================================================
// Attribute Kind
// ============================================================================

/// Names one field of an [`AttributeSet`].
///
/// Used by buff and passive modifiers to address the attribute they change.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AttributeKind {
    MaxHealth,
    AttackPower,
    Defense,
    AttackSpeed,
    MoveSpeed,
    AttackRange,
    CriticalRate,
    CriticalDamage,
    DamageReduction,
}

impl AttributeKind {
    /// Dense index used by fixed-size per-kind tables.
    pub const fn index(self) -> usize {
        match self {
            Self::MaxHealth => 0,
            Self::AttackPower => 1,
            Self::Defense => 2,
            Self::AttackSpeed => 3,
            Self::MoveSpeed => 4,
            Self::AttackRange => 5,
            Self::CriticalRate => 6,
            Self::CriticalDamage => 7,
            Self::DamageReduction => 8,
        }
    }
}

// ============================================================================
// Attribute Set
// ============================================================================

/// Numeric combat attributes of a combatant.
///
/// Health, attack, defense, speeds and range are absolute values; critical
/// rate/damage and damage reduction are percentages (`20.0` = 20%).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AttributeSet {
    pub max_health: f32,
    pub attack_power: f32,
    pub defense: f32,
    pub attack_speed: f32,
    pub move_speed: f32,
    pub attack_range: f32,
    pub crit_rate: f32,
    pub crit_damage: f32,
    pub damage_reduction: f32,
}

impl AttributeSet {
    /// Neutral element of [`AttributeSet::combine`].
    pub const ZERO: Self = Self {
        max_health: 0.0,
        attack_power: 0.0,
        defense: 0.0,
        attack_speed: 0.0,
        move_speed: 0.0,
        attack_range: 0.0,
        crit_rate: 0.0,
        crit_damage: 0.0,
        damage_reduction: 0.0,
    };

    /// Record used when a combatant has no authored base attributes.
    pub const DEFAULT_BASE: Self = Self {
        max_health: 100.0,
        attack_power: 10.0,
        defense: 5.0,
        attack_speed: 1.0,
        move_speed: 5.0,
        attack_range: 2.0,
        crit_rate: 0.0,
        crit_damage: 0.0,
        damage_reduction: 0.0,
    };

    /// Field-wise sum of two records.
    #[must_use]
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            max_health: self.max_health + other.max_health,
            attack_power: self.attack_power + other.attack_power,
            defense: self.defense + other.defense,
            attack_speed: self.attack_speed + other.attack_speed,
            move_speed: self.move_speed + other.move_speed,
            attack_range: self.attack_range + other.attack_range,
            crit_rate: self.crit_rate + other.crit_rate,
            crit_damage: self.crit_damage + other.crit_damage,
            damage_reduction: self.damage_reduction + other.damage_reduction,
        }
    }

    pub fn get(&self, kind: AttributeKind) -> f32 {
        match kind {
            AttributeKind::MaxHealth => self.max_health,
            AttributeKind::AttackPower => self.attack_power,
            AttributeKind::Defense => self.defense,
            AttributeKind::AttackSpeed => self.attack_speed,
            AttributeKind::MoveSpeed => self.move_speed,
            AttributeKind::AttackRange => self.attack_range,
            AttributeKind::CriticalRate => self.crit_rate,
            AttributeKind::CriticalDamage => self.crit_damage,
            AttributeKind::DamageReduction => self.damage_reduction,
        }
    }

    /// Returns a copy with one field replaced.
    #[must_use]
    pub fn with(mut self, kind: AttributeKind, value: f32) -> Self {
        *self.field_mut(kind) = value;
        self
    }

    fn field_mut(&mut self, kind: AttributeKind) -> &mut f32 {
        match kind {
            AttributeKind::MaxHealth => &mut self.max_health,
            AttributeKind::AttackPower => &mut self.attack_power,
            AttributeKind::Defense => &mut self.defense,
            AttributeKind::AttackSpeed => &mut self.attack_speed,
            AttributeKind::MoveSpeed => &mut self.move_speed,
            AttributeKind::AttackRange => &mut self.attack_range,
            AttributeKind::CriticalRate => &mut self.crit_rate,
            AttributeKind::CriticalDamage => &mut self.crit_damage,
            AttributeKind::DamageReduction => &mut self.damage_reduction,
        }
    }

    /// Clamps every field at zero.
    #[must_use]
    pub fn non_negative(self) -> Self {
        Self {
            max_health: self.max_health.max(0.0),
            attack_power: self.attack_power.max(0.0),
            defense: self.defense.max(0.0),
            attack_speed: self.attack_speed.max(0.0),
            move_speed: self.move_speed.max(0.0),
            attack_range: self.attack_range.max(0.0),
            crit_rate: self.crit_rate.max(0.0),
            crit_damage: self.crit_damage.max(0.0),
            damage_reduction: self.damage_reduction.max(0.0),
        }
    }

    /// Seconds between basic attacks; attack speed is guarded to at least 1.
    pub fn attack_interval(&self) -> f32 {
        1.0 / self.attack_speed.max(CombatConfig::MIN_ATTACK_SPEED)
    }
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for AttributeSet {
    type Output = AttributeSet;

    fn add(self, rhs: Self) -> Self::Output {
        self.combine(&rhs)
    }
}
