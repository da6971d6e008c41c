use crate::passive::PassiveDefinition;
use crate::state::{BuffId, SkillId};

/// Which resolution steps a skill runs.
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
pub enum SkillCategory {
    #[default]
    Damage,
    Status,
    Movement,
    /// Movement, damage and status, in that order.
    Composite,
}

impl SkillCategory {
    pub const fn moves(self) -> bool {
        matches!(self, Self::Movement | Self::Composite)
    }

    pub const fn damages(self) -> bool {
        matches!(self, Self::Damage | Self::Composite)
    }

    pub const fn applies_status(self) -> bool {
        matches!(self, Self::Status | Self::Composite)
    }
}

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
pub enum AttackStyle {
    #[default]
    Melee,
    Ranged,
}

/// Geometric target-selection pattern.
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
pub enum RangeShape {
    /// Nearest hostile.
    #[default]
    Single,
    /// Hostiles within `range_size` degrees centred on the aim direction.
    Arc,
    /// Every hostile in range.
    Circle,
}

/// Damage formula inputs.
///
/// ```text
/// raw = max(1, base_damage
///            + attack_power × attack_ratio
///            + target_health × target_health_percent / 100
///            + caster_max_health × self_health_percent / 100
///            - target_defense / 2)
/// ```
///
/// The default profile reduces to `max(1, attack_power - defense / 2)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageProfile {
    pub base_damage: f32,
    pub attack_ratio: f32,
    /// Percent of the target's current health.
    pub target_health_percent: f32,
    /// Percent of the caster's maximum health.
    pub self_health_percent: f32,
}

impl Default for DamageProfile {
    fn default() -> Self {
        Self {
            base_damage: 0.0,
            attack_ratio: 1.0,
            target_health_percent: 0.0,
            self_health_percent: 0.0,
        }
    }
}

/// Displacement applied by movement skills.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementSpec {
    pub distance: f32,
    /// Seconds taken by a dash; ignored when teleporting.
    pub duration: f32,
    pub teleport: bool,
}

/// Flight parameters of ranged skills.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectileSpec {
    pub speed: f32,
    pub lifetime: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pierce: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub homing: bool,
}

/// Authored, immutable skill template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: SkillCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_basic_attack: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cast_time: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub recovery_time: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack_style: AttackStyle,
    #[cfg_attr(feature = "serde", serde(default))]
    pub range_shape: RangeShape,
    /// Arc width in degrees; unused by other shapes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub range_size: f32,
    /// Maximum targets for Arc and Circle shapes (and pierce hits for projectiles).
    #[cfg_attr(feature = "serde", serde(default = "default_target_count"))]
    pub target_count: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage: DamageProfile,
    #[cfg_attr(feature = "serde", serde(default))]
    pub life_steal_ratio: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub buff_to_target: Option<BuffId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub buff_to_self: Option<BuffId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub movement: MovementSpec,
    #[cfg_attr(feature = "serde", serde(default))]
    pub projectile: Option<ProjectileSpec>,
    /// Registered on the learner when the skill is learned.
    #[cfg_attr(feature = "serde", serde(default))]
    pub passive: Option<PassiveDefinition>,
}

#[cfg(feature = "serde")]
fn default_target_count() -> u32 {
    1
}

impl SkillDefinition {
    /// Creates a single-target melee damage skill with the default profile.
    pub fn new(id: SkillId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category: SkillCategory::Damage,
            is_basic_attack: false,
            cooldown: 0.0,
            cast_time: 0.0,
            recovery_time: 0.0,
            attack_style: AttackStyle::Melee,
            range_shape: RangeShape::Single,
            range_size: 0.0,
            target_count: 1,
            damage: DamageProfile::default(),
            life_steal_ratio: 0.0,
            buff_to_target: None,
            buff_to_self: None,
            movement: MovementSpec::default(),
            projectile: None,
            passive: None,
        }
    }

    /// Creates the basic attack of a combatant.
    pub fn basic_attack(id: SkillId) -> Self {
        Self {
            is_basic_attack: true,
            ..Self::new(id, "basic attack")
        }
    }

    /// Target cap used by Arc and Circle queries; never below one.
    pub fn target_cap(&self) -> usize {
        self.target_count.max(1) as usize
    }
}
