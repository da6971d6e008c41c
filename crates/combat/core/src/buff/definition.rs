use crate::state::{BuffId, PassiveId};
use crate::stats::AttributeModifier;

/// Broad classification used by dispel and category removal.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BuffCategory {
    Positive,
    Negative,
    #[default]
    Neutral,
}

/// What happens when a buff is applied to a target that already carries it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackPolicy {
    /// Refresh the remaining duration; stacks stay at 1.
    #[default]
    None,
    /// Add the full duration to the remaining time.
    Duration,
    /// Count stacks up to `max_stacks`, refreshing once capped.
    Count { max_stacks: u32 },
    /// Every application is its own instance.
    Independent,
}

/// How often periodic effects fire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TickRate {
    #[default]
    None,
    PerSecond,
    PerHalfSecond,
    PerFrame,
}

impl TickRate {
    /// Seconds between ticks; `None` for buffs that never tick.
    pub const fn interval(self) -> Option<f32> {
        match self {
            Self::None => None,
            Self::PerSecond => Some(1.0),
            Self::PerHalfSecond => Some(0.5),
            Self::PerFrame => Some(0.0),
        }
    }
}

/// Effect carried by a buff.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuffEffect {
    /// Changes one attribute; scaled by the stack count.
    Attribute(AttributeModifier),
    DamageOverTime { per_tick: f32 },
    HealOverTime { per_tick: f32 },
    /// Damages hostiles around the owner on every tick.
    AreaDamage { radius: f32, per_tick: f32 },
    /// Heals friendlies around the owner on every tick.
    AreaHeal { radius: f32, per_tick: f32 },
    /// Deals `burst_damage` to the owner and expires once `threshold` stacks are reached.
    ///
    /// Only a re-application under `Count` stacking can burst; the first
    /// application never does, so a threshold of 1 acts like 2.
    StackCounter { threshold: u32, burst_damage: f32 },
    Stun,
    /// Fraction of movement speed removed (`0.5` halves it).
    Slow { percent: f32 },
    Silence,
    /// Absorbs up to `amount` incoming damage.
    Shield { amount: f32 },
    /// Fraction of dealt damage returned to the owner as healing.
    LifeSteal { ratio: f32 },
    /// Several attribute changes at once; each is scaled by the stack count.
    Composite { modifiers: Vec<AttributeModifier> },
}

impl BuffEffect {
    /// Attribute modifiers contributed at one stack.
    pub fn modifiers(&self) -> &[AttributeModifier] {
        match self {
            Self::Attribute(modifier) => core::slice::from_ref(modifier),
            Self::Composite { modifiers } => modifiers,
            _ => &[],
        }
    }

    /// True for effects that do something on each tick.
    pub fn is_periodic(&self) -> bool {
        matches!(
            self,
            Self::DamageOverTime { .. }
                | Self::HealOverTime { .. }
                | Self::AreaDamage { .. }
                | Self::AreaHeal { .. }
        )
    }
}

/// Authored, immutable buff template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffDefinition {
    pub id: BuffId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: BuffCategory,
    /// Seconds; zero or less means permanent.
    #[cfg_attr(feature = "serde", serde(default = "default_duration"))]
    pub duration: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stacking: StackPolicy,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tick_rate: TickRate,
    pub effect: BuffEffect,
    #[cfg_attr(feature = "serde", serde(default = "default_dispellable"))]
    pub dispellable: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: i32,
}

#[cfg(feature = "serde")]
fn default_duration() -> f32 {
    BuffDefinition::DEFAULT_DURATION
}

#[cfg(feature = "serde")]
fn default_dispellable() -> bool {
    true
}

impl BuffDefinition {
    pub const DEFAULT_DURATION: f32 = 5.0;

    /// Creates a dispellable, non-stacking, non-ticking definition.
    pub fn new(id: BuffId, name: impl Into<String>, category: BuffCategory, effect: BuffEffect) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            duration: Self::DEFAULT_DURATION,
            stacking: StackPolicy::None,
            tick_rate: TickRate::None,
            effect,
            dispellable: true,
            priority: 0,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn with_stacking(mut self, stacking: StackPolicy) -> Self {
        self.stacking = stacking;
        self
    }

    #[must_use]
    pub fn with_tick_rate(mut self, tick_rate: TickRate) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    #[must_use]
    pub fn with_dispellable(mut self, dispellable: bool) -> Self {
        self.dispellable = dispellable;
        self
    }

    pub fn is_permanent(&self) -> bool {
        self.duration <= 0.0
    }

    pub fn max_stacks(&self) -> u32 {
        match self.stacking {
            StackPolicy::Count { max_stacks } => max_stacks.max(1),
            _ => 1,
        }
    }

    /// Debuff applied by a passive's Stun effect.
    pub fn passive_stun(passive: PassiveId, duration: f32) -> Self {
        Self::new(
            BuffId::from_passive(passive),
            "passive stun",
            BuffCategory::Negative,
            BuffEffect::Stun,
        )
        .with_duration(duration.max(f32::EPSILON))
    }

    /// Debuff applied by a passive's Slow effect.
    pub fn passive_slow(passive: PassiveId, percent: f32, duration: f32) -> Self {
        Self::new(
            BuffId::from_passive(passive),
            "passive slow",
            BuffCategory::Negative,
            BuffEffect::Slow { percent },
        )
        .with_duration(duration.max(f32::EPSILON))
    }
}
