//! In-memory world and frame scheduler.
//!
//! [`Arena`] owns every combatant plus the resumable effects that outlive a
//! single call (projectiles in flight, dashes in progress) and queues the
//! fire-and-forget [`CombatEvent`]s for presentation layers.
//!
//! # Step order
//!
//! For each combatant, in registration order:
//! 1. cooldowns
//! 2. buffs (pulses applied, expirations reported)
//! 3. passives (interval and health-low triggers)
//!
//! Then dashes, then projectiles. Effects created during a step start moving
//! on the next one.

use std::sync::Arc;

use glam::Vec3;

use super::combatant::Combatant;
use crate::buff::{BuffApplication, BuffDefinition};
use crate::config::CombatConfig;
use crate::env::{CombatEvent, CombatHook, CombatWorld, CombatantView, DefinitionOracle};
use crate::error::{CastError, CombatError};
use crate::passive::{PassiveAction, PassiveFired, TriggerKind};
use crate::skill::{CastReport, Dash, Projectile, ProjectileStatus, SkillDefinition, SkillResolver};
use crate::state::{BuffId, EntityId, SkillId};

pub struct Arena {
    config: CombatConfig,
    catalog: Arc<dyn DefinitionOracle>,
    combatants: Vec<Combatant>,
    projectiles: Vec<Projectile>,
    dashes: Vec<Dash>,
    events: Vec<CombatEvent>,
}

impl Arena {
    pub fn new(config: CombatConfig, catalog: Arc<dyn DefinitionOracle>) -> Self {
        Self {
            config,
            catalog,
            combatants: Vec::new(),
            projectiles: Vec::new(),
            dashes: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<dyn DefinitionOracle> {
        &self.catalog
    }

    /// Adds a combatant. An existing combatant with the same id is replaced.
    pub fn spawn(&mut self, combatant: Combatant) -> EntityId {
        let id = combatant.id();
        match self.index_of(id) {
            Some(index) => {
                tracing::warn!(entity = %id, "replacing existing combatant");
                self.combatants[index] = combatant;
            }
            None => self.combatants.push(combatant),
        }
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<Combatant> {
        let index = self.index_of(id)?;
        Some(self.combatants.remove(index))
    }

    pub fn get(&self, id: EntityId) -> Option<&Combatant> {
        self.combatants.iter().find(|unit| unit.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|unit| unit.id() == id)
    }

    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn dashes(&self) -> &[Dash] {
        &self.dashes
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.combatants.iter().position(|unit| unit.id() == id)
    }

    // ========================================================================
    // Content shortcuts
    // ========================================================================

    /// Teaches `id` a skill from the catalog.
    pub fn learn(&mut self, id: EntityId, skill: SkillId) -> Result<(), CastError> {
        let definition = self.catalog.skill(skill).ok_or(CastError::UnknownSkill(skill))?;
        let unit = self.get_mut(id).ok_or(CastError::InvalidCaster(id))?;
        unit.learn_skill(definition);
        Ok(())
    }

    /// Applies a catalog buff to `target`.
    pub fn apply_buff(
        &mut self,
        target: EntityId,
        buff: BuffId,
        caster: Option<EntityId>,
    ) -> Result<Option<BuffApplication>, CastError> {
        let definition = self.catalog.buff(buff).ok_or(CastError::UnknownBuff(buff))?;
        Ok(self.add_buff(target, definition, caster))
    }

    // ========================================================================
    // Casting
    // ========================================================================

    /// Casts a skill the caster has learned, falling back to the catalog.
    pub fn cast(
        &mut self,
        caster: EntityId,
        skill: SkillId,
        aim_point: Vec3,
        aim_direction: Vec3,
    ) -> Result<CastReport, CastError> {
        let definition = self
            .get(caster)
            .and_then(|unit| unit.skill(skill).cloned())
            .or_else(|| self.catalog.skill(skill))
            .ok_or(CastError::UnknownSkill(skill))?;
        self.cast_skill(caster, &definition, aim_point, aim_direction)
    }

    pub fn cast_skill(
        &mut self,
        caster: EntityId,
        skill: &Arc<SkillDefinition>,
        aim_point: Vec3,
        aim_direction: Vec3,
    ) -> Result<CastReport, CastError> {
        let catalog = Arc::clone(&self.catalog);
        let config = self.config.clone();
        let resolver = SkillResolver::new(catalog.as_ref(), &config);
        let result = resolver.resolve(self, caster, skill, aim_point, aim_direction);
        if let Err(err) = &result {
            tracing::debug!(
                %caster,
                skill = %skill.id,
                code = err.error_code(),
                severity = err.severity().as_str(),
                "cast rejected: {err}"
            );
        }
        result
    }

    // ========================================================================
    // Scheduling
    // ========================================================================

    /// Advances the whole arena by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        for index in 0..self.combatants.len() {
            let unit = &mut self.combatants[index];
            if !unit.is_alive() {
                continue;
            }
            let id = unit.id();

            unit.update_cooldowns(dt);
            let report = unit.update_buffs(dt);
            for buff in report.expired {
                self.emit(CombatEvent::BuffExpired { target: id, buff });
            }
            for pulse in &report.pulses {
                pulse.apply(id, self);
            }

            let fired = match self.get_mut(id) {
                Some(unit) if unit.is_alive() => unit.update_passives(dt),
                _ => continue,
            };
            self.apply_passive_outcomes(id, None, fired);
        }

        let mut running = Vec::new();
        for mut dash in std::mem::take(&mut self.dashes) {
            if dash.advance(dt, self) {
                running.push(dash);
            }
        }
        running.append(&mut self.dashes);
        self.dashes = running;

        let config = self.config.clone();
        let mut flying = Vec::new();
        for mut projectile in std::mem::take(&mut self.projectiles) {
            if projectile.advance(dt, self, &config) == ProjectileStatus::Flying {
                flying.push(projectile);
            }
        }
        flying.append(&mut self.projectiles);
        self.projectiles = flying;
    }

    /// Applies what fired passives hand back. Opponent-directed effects need
    /// an `opponent`; without one they only emit their event.
    fn apply_passive_outcomes(
        &mut self,
        owner: EntityId,
        opponent: Option<EntityId>,
        fired: Vec<PassiveFired>,
    ) {
        for PassiveFired { passive, action } in fired {
            self.emit(CombatEvent::PassiveTriggered { owner, passive });
            match action {
                PassiveAction::Heal(amount) => {
                    self.heal(owner, amount);
                }
                PassiveAction::Stun { duration } => {
                    if let Some(target) = opponent {
                        let debuff = BuffDefinition::passive_stun(passive, duration);
                        self.add_buff(target, Arc::new(debuff), Some(owner));
                    }
                }
                PassiveAction::Slow { percent, duration } => {
                    if let Some(target) = opponent {
                        let debuff = BuffDefinition::passive_slow(passive, percent, duration);
                        self.add_buff(target, Arc::new(debuff), Some(owner));
                    }
                }
                PassiveAction::Custom(tag) => {
                    tracing::debug!(%owner, %passive, %tag, "custom passive effect");
                }
                PassiveAction::Modifier
                | PassiveAction::AttributeGranted
                | PassiveAction::ShieldRaised(_) => {}
            }
        }
    }
}

impl CombatWorld for Arena {
    fn combatant(&self, id: EntityId) -> Option<CombatantView> {
        self.get(id).map(Combatant::view)
    }

    fn entities_in_radius(&self, center: Vec3, radius: f32) -> Vec<EntityId> {
        self.combatants
            .iter()
            .filter(|unit| unit.position().distance(center) <= radius)
            .map(Combatant::id)
            .collect()
    }

    fn take_damage(&mut self, target: EntityId, amount: f32) -> f32 {
        let Some(unit) = self.get_mut(target) else {
            return 0.0;
        };
        let was_alive = unit.is_alive();
        let dealt = unit.take_damage(amount);
        if was_alive && !unit.is_alive() {
            self.emit(CombatEvent::Death { entity: target });
        }
        dealt
    }

    fn heal(&mut self, target: EntityId, amount: f32) -> f32 {
        self.get_mut(target).map_or(0.0, |unit| unit.heal(amount))
    }

    fn add_buff(
        &mut self,
        target: EntityId,
        definition: Arc<BuffDefinition>,
        caster: Option<EntityId>,
    ) -> Option<BuffApplication> {
        let application = self.get_mut(target)?.add_buff(definition, caster)?;
        self.emit(CombatEvent::BuffApplied {
            target,
            buff: application.buff,
            outcome: application.outcome,
        });
        if let Some(burst) = application.burst_damage {
            let dealt = self.take_damage(target, burst);
            self.emit(CombatEvent::HitFlash {
                target,
                amount: dealt,
            });
        }
        Some(application)
    }

    fn set_position(&mut self, id: EntityId, position: Vec3) {
        if let Some(unit) = self.get_mut(id) {
            unit.set_position(position);
        }
    }

    fn set_forward(&mut self, id: EntityId, forward: Vec3) {
        if let Some(unit) = self.get_mut(id) {
            unit.set_forward(forward);
        }
    }

    fn cooldown_remaining(&self, id: EntityId, skill: SkillId) -> f32 {
        self.get(id).map_or(0.0, |unit| unit.cooldown_remaining(skill))
    }

    fn start_cooldown(&mut self, id: EntityId, skill: SkillId, seconds: f32) {
        if let Some(unit) = self.get_mut(id) {
            unit.start_cooldown(skill, seconds);
        }
    }

    fn damage_bonus(&self, attacker: EntityId, base: f32, context: TriggerKind) -> f32 {
        self.get(attacker)
            .map_or(0.0, |unit| unit.damage_bonus(base, context))
    }

    fn damage_reduction(&mut self, target: EntityId, incoming: f32) -> f32 {
        match self.get_mut(target) {
            Some(unit) if unit.is_alive() => unit.mitigate(incoming),
            _ => 0.0,
        }
    }

    fn notify(&mut self, id: EntityId, hook: CombatHook, opponent: Option<EntityId>) {
        let fired = match self.get_mut(id) {
            Some(unit) if unit.is_alive() => match hook {
                CombatHook::Attack => unit.on_attack(),
                CombatHook::Hit => unit.on_hit(),
                CombatHook::Kill => unit.on_kill(),
            },
            _ => return,
        };
        self.apply_passive_outcomes(id, opponent, fired);
    }

    fn spawn_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    fn begin_dash(&mut self, dash: Dash) {
        self.dashes.push(dash);
    }

    fn emit(&mut self, event: CombatEvent) {
        self.events.push(event);
    }
}
