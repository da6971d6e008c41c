//! Equipment quality tiers, skill trees and the loadout that feeds the
//! attribute aggregator.
//!
//! Quality and skill-tree levels saturate at their maximum instead of
//! failing: upgrading a Red item or maxing out a tree simply reports `false`.

use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::state::EquipmentId;
use crate::stats::AttributeSet;

/// Equipment quality tier, lowest to highest.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Quality {
    #[default]
    Green,
    Blue,
    Purple,
    Orange,
    Red,
}

impl Quality {
    pub const ALL: [Quality; 5] = [
        Quality::Green,
        Quality::Blue,
        Quality::Purple,
        Quality::Orange,
        Quality::Red,
    ];

    pub const fn tier(self) -> u8 {
        self as u8
    }

    pub fn next(self) -> Option<Quality> {
        Self::ALL.get(self.tier() as usize + 1).copied()
    }

    /// Highest skill-tree level an item of this quality may reach.
    pub fn max_tree_level(self) -> u8 {
        (self.tier() + 1).min(CombatConfig::MAX_SKILL_TREE_LEVEL)
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SkillTreeKind {
    CrazyBlade,
    MagicBlade,
    MeleeMaster,
    Tenacity,
    Reflection,
    Recovery,
}

/// Authored equipment template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentDefinition {
    pub id: EquipmentId,
    pub name: String,
    pub slot: EquipmentSlot,
    /// Attribute bonus per quality tier, indexed by [`Quality::tier`].
    /// Tiers without an entry contribute nothing.
    #[cfg_attr(feature = "serde", serde(default))]
    pub quality_bonuses: Vec<AttributeSet>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skill_trees: Vec<SkillTreeKind>,
}

impl EquipmentDefinition {
    pub fn bonus_for(&self, quality: Quality) -> AttributeSet {
        self.quality_bonuses
            .get(quality.tier() as usize)
            .copied()
            .unwrap_or(AttributeSet::ZERO)
    }
}

/// An owned piece of equipment with its upgrade progress.
#[derive(Clone, Debug, PartialEq)]
pub struct EquipmentInstance {
    definition: Arc<EquipmentDefinition>,
    quality: Quality,
    tree_levels: ArrayVec<(SkillTreeKind, u8), { CombatConfig::MAX_SKILL_TREES }>,
}

impl EquipmentInstance {
    pub fn new(definition: Arc<EquipmentDefinition>, quality: Quality) -> Self {
        let tree_levels = definition
            .skill_trees
            .iter()
            .take(CombatConfig::MAX_SKILL_TREES)
            .map(|kind| (*kind, 0))
            .collect();
        Self {
            definition,
            quality,
            tree_levels,
        }
    }

    pub fn definition(&self) -> &Arc<EquipmentDefinition> {
        &self.definition
    }

    pub fn slot(&self) -> EquipmentSlot {
        self.definition.slot
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Raises quality by one tier; returns `false` at Red.
    pub fn upgrade_quality(&mut self) -> bool {
        match self.quality.next() {
            Some(next) => {
                self.quality = next;
                true
            }
            None => false,
        }
    }

    pub fn tree_level(&self, kind: SkillTreeKind) -> Option<u8> {
        self.tree_levels
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, level)| *level)
    }

    /// Raises a skill tree by one level; returns `false` when the tree is
    /// absent or already at the quality's cap.
    pub fn upgrade_tree(&mut self, kind: SkillTreeKind) -> bool {
        let cap = self.quality.max_tree_level();
        match self.tree_levels.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, level)) if *level < cap => {
                *level += 1;
                true
            }
            _ => false,
        }
    }

    pub fn attribute_bonus(&self) -> AttributeSet {
        self.definition.bonus_for(self.quality)
    }
}

/// Items currently worn by a combatant, one per slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Loadout {
    weapon: Option<EquipmentInstance>,
    armor: Option<EquipmentInstance>,
}

impl Loadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equips an item, returning whatever occupied its slot.
    pub fn equip(&mut self, item: EquipmentInstance) -> Option<EquipmentInstance> {
        let slot = self.slot_mut(item.slot());
        slot.replace(item)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<EquipmentInstance> {
        self.slot_mut(slot).take()
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&EquipmentInstance> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_ref(),
            EquipmentSlot::Armor => self.armor.as_ref(),
        }
    }

    pub fn get_mut(&mut self, slot: EquipmentSlot) -> Option<&mut EquipmentInstance> {
        self.slot_mut(slot).as_mut()
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<EquipmentInstance> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
        }
    }

    /// Combined bonus of every equipped item; `None` when nothing is worn.
    pub fn total_bonus(&self) -> Option<AttributeSet> {
        [self.weapon.as_ref(), self.armor.as_ref()]
            .into_iter()
            .flatten()
            .map(EquipmentInstance::attribute_bonus)
            .reduce(|acc, bonus| acc.combine(&bonus))
    }
}
