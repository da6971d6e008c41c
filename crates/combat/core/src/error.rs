//! Common error infrastructure for combat-core.
//!
//! Combat failures are never fatal: a rejected cast leaves every piece of
//! state untouched and reports why through a typed error. Numeric and capacity
//! edge cases do not surface as errors at all; they saturate or fall back to
//! documented defaults at the point of use.

use crate::state::{BuffId, EntityId, SkillId};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed on a later tick
/// - **Validation**: the request referenced something that does not exist
/// - **Internal**: authored content is inconsistent and should be fixed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: skill on cooldown, caster stunned, nobody in range.
    Recoverable,

    /// Examples: caster missing or dead.
    Validation,

    /// Examples: ranged skill without projectile parameters, unknown buff id.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if retrying later may succeed.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all combat-core errors.
///
/// Error enums derive `thiserror::Error` for Display and classify themselves
/// here so hosts can pick a logging level or a retry policy uniformly.
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for this variant, suitable for metrics and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Reasons a skill cast was rejected.
///
/// A rejected cast performs no movement, damage, buff application or
/// cooldown update.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CastError {
    #[error("caster {0} does not exist or is not alive")]
    InvalidCaster(EntityId),

    #[error("skill {skill} is cooling down ({remaining:.2}s left)")]
    OnCooldown { skill: SkillId, remaining: f32 },

    #[error("caster {0} is stunned")]
    Stunned(EntityId),

    #[error("caster {0} is silenced")]
    Silenced(EntityId),

    #[error("skill {0} is not defined")]
    UnknownSkill(SkillId),

    #[error("buff {0} is not defined")]
    UnknownBuff(BuffId),

    #[error("ranged skill {0} has no projectile parameters")]
    MissingProjectile(SkillId),

    #[error("skill {0} found nothing to act on")]
    NoTargets(SkillId),
}

impl CombatError for CastError {
    fn severity(&self) -> ErrorSeverity {
        use CastError::*;
        match self {
            InvalidCaster(_) | UnknownSkill(_) => ErrorSeverity::Validation,
            OnCooldown { .. } | Stunned(_) | Silenced(_) | NoTargets(_) => {
                ErrorSeverity::Recoverable
            }
            UnknownBuff(_) | MissingProjectile(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use CastError::*;
        match self {
            InvalidCaster(_) => "CAST_INVALID_CASTER",
            OnCooldown { .. } => "CAST_ON_COOLDOWN",
            Stunned(_) => "CAST_STUNNED",
            Silenced(_) => "CAST_SILENCED",
            UnknownSkill(_) => "CAST_UNKNOWN_SKILL",
            UnknownBuff(_) => "CAST_UNKNOWN_BUFF",
            MissingProjectile(_) => "CAST_MISSING_PROJECTILE",
            NoTargets(_) => "CAST_NO_TARGETS",
        }
    }
}
