//! Definition catalog loader.

use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;
use std::path::Path;

use combat_core::{
    AttributeSet, BuffDefinition, BuffId, DefinitionCatalog, EquipmentDefinition,
    PassiveDefinition, SkillDefinition,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Content pack structure for RON files.
///
/// ```ron
/// (
///     buffs: [(id: 1, name: "poison", category: Negative,
///              tick_rate: PerSecond, effect: DamageOverTime(per_tick: 3.0))],
///     skills: [(id: 1, name: "slash", is_basic_attack: true)],
///     presets: {"grunt": (max_health: 80.0, attack_power: 8.0)},
/// )
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentPack {
    pub buffs: Vec<BuffDefinition>,
    pub skills: Vec<SkillDefinition>,
    pub passives: Vec<PassiveDefinition>,
    pub equipment: Vec<EquipmentDefinition>,
    /// Named base attribute records for spawning combatants.
    pub presets: BTreeMap<String, Preset>,
}

/// Base attributes for a spawned combatant.
///
/// Unlike equipment bonuses, fields left out of a preset keep their
/// [`AttributeSet::DEFAULT_BASE`] value rather than zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
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

impl Default for Preset {
    fn default() -> Self {
        AttributeSet::DEFAULT_BASE.into()
    }
}

impl From<AttributeSet> for Preset {
    fn from(set: AttributeSet) -> Self {
        Self {
            max_health: set.max_health,
            attack_power: set.attack_power,
            defense: set.defense,
            attack_speed: set.attack_speed,
            move_speed: set.move_speed,
            attack_range: set.attack_range,
            crit_rate: set.crit_rate,
            crit_damage: set.crit_damage,
            damage_reduction: set.damage_reduction,
        }
    }
}

impl From<Preset> for AttributeSet {
    fn from(preset: Preset) -> Self {
        Self {
            max_health: preset.max_health,
            attack_power: preset.attack_power,
            defense: preset.defense,
            attack_speed: preset.attack_speed,
            move_speed: preset.move_speed,
            attack_range: preset.attack_range,
            crit_rate: preset.crit_rate,
            crit_damage: preset.crit_damage,
            damage_reduction: preset.damage_reduction,
        }
    }
}

impl ContentPack {
    /// Rejects duplicate ids, buff ids in the range reserved for
    /// passive-synthesized debuffs, skills naming buffs the pack lacks and
    /// presets that would spawn dead.
    pub fn validate(&self) -> LoadResult<()> {
        ensure_unique("buff", self.buffs.iter().map(|d| d.id))?;
        ensure_unique("skill", self.skills.iter().map(|d| d.id))?;
        ensure_unique("passive", self.passives.iter().map(|d| d.id))?;
        ensure_unique("equipment", self.equipment.iter().map(|d| d.id))?;

        if let Some(def) = self.buffs.iter().find(|d| d.id.is_synthesized()) {
            anyhow::bail!(
                "buff {} uses an id reserved for passive debuffs (>= {:#x})",
                def.id,
                BuffId::PASSIVE_RESERVED
            );
        }
        for skill in &self.skills {
            for buff in [skill.buff_to_target, skill.buff_to_self].into_iter().flatten() {
                if !self.buffs.iter().any(|d| d.id == buff) {
                    anyhow::bail!("skill {} references unknown buff {}", skill.id, buff);
                }
            }
        }
        if let Some((name, _)) = self.presets.iter().find(|(_, p)| p.max_health <= 0.0) {
            anyhow::bail!("preset {name:?} has no health");
        }
        Ok(())
    }

    pub fn preset(&self, name: &str) -> Option<AttributeSet> {
        self.presets.get(name).copied().map(AttributeSet::from)
    }

    /// Builds a catalog holding a copy of every definition.
    pub fn to_catalog(&self) -> DefinitionCatalog {
        let mut catalog = DefinitionCatalog::new();
        for def in &self.buffs {
            catalog.insert_buff(def.clone());
        }
        for def in &self.skills {
            catalog.insert_skill(def.clone());
        }
        for def in &self.passives {
            catalog.insert_passive(def.clone());
        }
        for def in &self.equipment {
            catalog.insert_equipment(def.clone());
        }
        catalog
    }
}

fn ensure_unique<T>(kind: &str, ids: impl Iterator<Item = T>) -> LoadResult<()>
where
    T: Copy + Eq + Hash + std::fmt::Display,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            anyhow::bail!("duplicate {} id {}", kind, id);
        }
    }
    Ok(())
}

/// Loader for [`ContentPack`]s from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn load(path: &Path) -> LoadResult<ContentPack> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ContentPack> {
        let pack: ContentPack = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse content pack RON: {}", e))?;
        pack.validate()?;

        tracing::debug!(
            buffs = pack.buffs.len(),
            skills = pack.skills.len(),
            passives = pack.passives.len(),
            equipment = pack.equipment.len(),
            presets = pack.presets.len(),
            "content pack loaded"
        );
        Ok(pack)
    }
}
