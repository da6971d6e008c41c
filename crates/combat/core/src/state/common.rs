use std::fmt;

/// Unique identifier for any combatant tracked by the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

macro_rules! definition_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

definition_id!(
    /// Stable key of a [`crate::BuffDefinition`].
    BuffId
);
definition_id!(
    /// Stable key of a [`crate::SkillDefinition`].
    SkillId
);
definition_id!(
    /// Stable key of a [`crate::PassiveDefinition`].
    PassiveId
);
definition_id!(
    /// Stable key of an [`crate::EquipmentDefinition`].
    EquipmentId
);

impl BuffId {
    /// Ids at or above this value are reserved for debuffs synthesized from
    /// passive Stun/Slow effects.
    pub const PASSIVE_RESERVED: u32 = 0x8000_0000;

    /// Id of the debuff synthesized by the given passive.
    pub const fn from_passive(passive: PassiveId) -> Self {
        Self(Self::PASSIVE_RESERVED | passive.0)
    }

    pub const fn is_synthesized(self) -> bool {
        self.0 & Self::PASSIVE_RESERVED != 0
    }
}

/// Allegiance of a combatant.
///
/// Two combatants are hostile exactly when their teams differ.
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
pub enum Team {
    Player,
    Enemy,
    #[default]
    Neutral,
    Custom1,
    Custom2,
}

impl Team {
    #[inline]
    pub fn is_hostile_to(self, other: Team) -> bool {
        self != other
    }

    #[inline]
    pub fn is_friendly_to(self, other: Team) -> bool {
        self == other
    }
}
