use crate::state::PassiveId;
use crate::stats::AttributeModifier;

/// Trigger kind without parameters; used as the context key for damage
/// modifiers.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TriggerKind {
    None,
    OnAttack,
    OnHit,
    OnKill,
    Interval,
    OnHealthLow,
    OnAttackCount,
}

/// When a passive fires.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PassiveTrigger {
    /// Always on; contributes without ever firing.
    #[default]
    None,
    OnAttack,
    OnHit,
    OnKill,
    /// Fires every `seconds`.
    Interval {
        #[cfg_attr(feature = "serde", serde(default = "default_interval"))]
        seconds: f32,
    },
    /// Fires once when health drops to or below `threshold_percent` of maximum.
    OnHealthLow {
        #[cfg_attr(feature = "serde", serde(default = "default_health_threshold"))]
        threshold_percent: f32,
    },
    /// Fires on every `threshold`-th attack.
    OnAttackCount {
        #[cfg_attr(feature = "serde", serde(default = "default_attack_count"))]
        threshold: u32,
    },
}

#[cfg(feature = "serde")]
fn default_interval() -> f32 {
    PassiveTrigger::DEFAULT_INTERVAL
}

#[cfg(feature = "serde")]
fn default_health_threshold() -> f32 {
    PassiveTrigger::DEFAULT_HEALTH_THRESHOLD
}

#[cfg(feature = "serde")]
fn default_attack_count() -> u32 {
    PassiveTrigger::DEFAULT_ATTACK_COUNT
}

impl PassiveTrigger {
    /// Parameter values used when authored content omits them.
    pub const DEFAULT_INTERVAL: f32 = 5.0;
    pub const DEFAULT_HEALTH_THRESHOLD: f32 = 30.0;
    pub const DEFAULT_ATTACK_COUNT: u32 = 3;

    pub fn kind(&self) -> TriggerKind {
        match self {
            Self::None => TriggerKind::None,
            Self::OnAttack => TriggerKind::OnAttack,
            Self::OnHit => TriggerKind::OnHit,
            Self::OnKill => TriggerKind::OnKill,
            Self::Interval { .. } => TriggerKind::Interval,
            Self::OnHealthLow { .. } => TriggerKind::OnHealthLow,
            Self::OnAttackCount { .. } => TriggerKind::OnAttackCount,
        }
    }
}

/// What a passive does.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PassiveEffect {
    /// Permanent when untriggered; each firing of a triggered bonus adds one more grant.
    AttributeBonus(AttributeModifier),
    /// Adds `base × (multiplier - 1)` to outgoing damage.
    DamageMultiplier { multiplier: f32 },
    ExtraDamage { amount: f32 },
    /// Adds `base × (multiplier - 1)` to outgoing damage.
    CriticalHit { multiplier: f32 },
    /// Fraction of incoming damage ignored (`0.2` = 20%).
    DamageReduction { percent: f32 },
    /// Absorb pool refilled to `amount` on firing.
    Shield { amount: f32 },
    HealthRegen { amount: f32 },
    /// Stuns the current opponent.
    Stun { duration: f32 },
    /// Slows the current opponent.
    Slow { percent: f32, duration: f32 },
    /// Host-defined effect identified by `tag`.
    Custom { tag: String },
}

/// Authored, immutable passive template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassiveDefinition {
    pub id: PassiveId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trigger: PassiveTrigger,
    pub effect: PassiveEffect,
    /// Seconds before the passive may fire again.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: Option<f32>,
}

impl PassiveDefinition {
    pub fn new(
        id: PassiveId,
        name: impl Into<String>,
        trigger: PassiveTrigger,
        effect: PassiveEffect,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            trigger,
            effect,
            cooldown: None,
        }
    }

    #[must_use]
    pub fn with_cooldown(mut self, seconds: f32) -> Self {
        self.cooldown = Some(seconds);
        self
    }

    pub fn is_permanent(&self) -> bool {
        matches!(self.trigger, PassiveTrigger::None)
    }
}
