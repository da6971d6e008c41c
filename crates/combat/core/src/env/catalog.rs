use std::collections::HashMap;
use std::sync::Arc;

use super::DefinitionOracle;
use crate::buff::BuffDefinition;
use crate::equipment::EquipmentDefinition;
use crate::passive::PassiveDefinition;
use crate::skill::SkillDefinition;
use crate::state::{BuffId, EquipmentId, PassiveId, SkillId};

/// In-memory [`DefinitionOracle`] keyed by id.
///
/// Inserting a definition whose id already exists replaces the old one and
/// returns it.
#[derive(Clone, Debug, Default)]
pub struct DefinitionCatalog {
    buffs: HashMap<BuffId, Arc<BuffDefinition>>,
    skills: HashMap<SkillId, Arc<SkillDefinition>>,
    passives: HashMap<PassiveId, Arc<PassiveDefinition>>,
    equipment: HashMap<EquipmentId, Arc<EquipmentDefinition>>,
}

impl DefinitionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_buff(&mut self, def: BuffDefinition) -> Option<Arc<BuffDefinition>> {
        self.buffs.insert(def.id, Arc::new(def))
    }

    pub fn insert_skill(&mut self, def: SkillDefinition) -> Option<Arc<SkillDefinition>> {
        self.skills.insert(def.id, Arc::new(def))
    }

    pub fn insert_passive(&mut self, def: PassiveDefinition) -> Option<Arc<PassiveDefinition>> {
        self.passives.insert(def.id, Arc::new(def))
    }

    pub fn insert_equipment(
        &mut self,
        def: EquipmentDefinition,
    ) -> Option<Arc<EquipmentDefinition>> {
        self.equipment.insert(def.id, Arc::new(def))
    }

    #[must_use]
    pub fn with_buff(mut self, def: BuffDefinition) -> Self {
        self.insert_buff(def);
        self
    }

    #[must_use]
    pub fn with_skill(mut self, def: SkillDefinition) -> Self {
        self.insert_skill(def);
        self
    }

    #[must_use]
    pub fn with_passive(mut self, def: PassiveDefinition) -> Self {
        self.insert_passive(def);
        self
    }

    #[must_use]
    pub fn with_equipment(mut self, def: EquipmentDefinition) -> Self {
        self.insert_equipment(def);
        self
    }

    pub fn buff_count(&self) -> usize {
        self.buffs.len()
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    pub fn passive_count(&self) -> usize {
        self.passives.len()
    }

    pub fn equipment_count(&self) -> usize {
        self.equipment.len()
    }
}

impl DefinitionOracle for DefinitionCatalog {
    fn buff(&self, id: BuffId) -> Option<Arc<BuffDefinition>> {
        self.buffs.get(&id).cloned()
    }

    fn skill(&self, id: SkillId) -> Option<Arc<SkillDefinition>> {
        self.skills.get(&id).cloned()
    }

    fn passive(&self, id: PassiveId) -> Option<Arc<PassiveDefinition>> {
        self.passives.get(&id).cloned()
    }

    fn equipment(&self, id: EquipmentId) -> Option<Arc<EquipmentDefinition>> {
        self.equipment.get(&id).cloned()
    }
}
