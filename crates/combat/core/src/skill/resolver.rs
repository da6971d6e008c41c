//! Skill cast resolution.
//!
//! A cast runs up to four steps in a fixed order:
//!
//! 1. **Movement** (Movement/Composite): teleport or schedule a [`Dash`]
//! 2. **Damage** (Damage/Composite): select targets and strike them, or
//!    launch a [`Projectile`] for ranged skills
//! 3. **Status** (Status/Composite): target buff on touched targets, self buff
//!    on the caster
//! 4. **Cooldown**: started only when the cast did something
//!
//! Every precondition and content lookup is checked before step 1, so a
//! rejected cast leaves the world untouched.

use std::sync::Arc;

use glam::Vec3;

use super::damage::{cooldown_for, final_damage, raw_damage};
use super::definition::{AttackStyle, SkillDefinition};
use super::movement::Dash;
use super::projectile::Projectile;
use super::targeting::select_targets;
use crate::buff::{BuffDefinition, ControlFlags};
use crate::config::CombatConfig;
use crate::env::{CombatEvent, CombatHook, CombatWorld, CombatantView, DefinitionOracle};
use crate::error::CastError;
use crate::passive::TriggerKind;
use crate::state::{BuffId, EntityId};

/// Outcome of a successful cast.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CastReport {
    /// Entities damaged (or, for pure status skills, buffed), in hit order.
    pub targets_hit: Vec<EntityId>,
    pub total_damage: f32,
    pub buffs_applied: usize,
    pub projectile_launched: bool,
    pub moved: bool,
}

impl CastReport {
    fn did_something(&self) -> bool {
        self.moved
            || self.projectile_launched
            || !self.targets_hit.is_empty()
            || self.buffs_applied > 0
    }
}

/// Result of striking one target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Strike {
    pub dealt: f32,
    pub killed: bool,
}

/// Applies one hit from `caster` to `target`: raw damage, attacker passive
/// bonus, target mitigation, hit/kill hooks and life steal.
///
/// Returns `None` when the target is missing or already dead.
pub(crate) fn strike(
    world: &mut dyn CombatWorld,
    caster: &CombatantView,
    target: EntityId,
    skill: &SkillDefinition,
) -> Option<Strike> {
    let victim = world.combatant(target).filter(|v| v.alive)?;

    let raw = raw_damage(&skill.damage, caster, &victim);
    let bonus = world.damage_bonus(caster.id, raw, TriggerKind::OnAttack);
    let reduction = world.damage_reduction(target, raw + bonus);
    let amount = final_damage(raw, bonus, reduction);

    let dealt = world.take_damage(target, amount);
    world.emit(CombatEvent::HitFlash {
        target,
        amount: dealt,
    });
    world.notify(target, CombatHook::Hit, Some(caster.id));

    let steal = skill.life_steal_ratio + caster.life_steal_ratio;
    if steal > 0.0 && dealt > 0.0 {
        world.heal(caster.id, dealt * steal);
    }

    let killed = !world.combatant(target).is_some_and(|v| v.alive);
    if killed {
        world.notify(caster.id, CombatHook::Kill, Some(target));
    }
    Some(Strike { dealt, killed })
}

/// Stateless cast resolution against a world and a definition source.
pub struct SkillResolver<'a> {
    oracle: &'a dyn DefinitionOracle,
    config: &'a CombatConfig,
}

impl<'a> SkillResolver<'a> {
    pub fn new(oracle: &'a dyn DefinitionOracle, config: &'a CombatConfig) -> Self {
        Self { oracle, config }
    }

    /// Resolves a cast of `skill` by `caster_id`.
    ///
    /// `aim_direction` is used when non-zero; otherwise the direction toward
    /// `aim_point`, and finally the caster's facing.
    pub fn resolve(
        &self,
        world: &mut dyn CombatWorld,
        caster_id: EntityId,
        skill: &Arc<SkillDefinition>,
        aim_point: Vec3,
        aim_direction: Vec3,
    ) -> Result<CastReport, CastError> {
        let caster = world
            .combatant(caster_id)
            .filter(|v| v.alive)
            .ok_or(CastError::InvalidCaster(caster_id))?;
        if caster.control.contains(ControlFlags::STUNNED) {
            return Err(CastError::Stunned(caster_id));
        }
        if caster.control.contains(ControlFlags::SILENCED) && !skill.is_basic_attack {
            return Err(CastError::Silenced(caster_id));
        }
        let remaining = world.cooldown_remaining(caster_id, skill.id);
        if remaining > 0.0 {
            return Err(CastError::OnCooldown {
                skill: skill.id,
                remaining,
            });
        }

        let ranged = skill.category.damages() && skill.attack_style == AttackStyle::Ranged;
        let projectile = match (ranged, skill.projectile) {
            (true, None) => return Err(CastError::MissingProjectile(skill.id)),
            (true, Some(spec)) => Some(spec),
            (false, _) => None,
        };
        let buff_to_target = self.lookup_buff(skill.buff_to_target)?;
        let buff_to_self = self.lookup_buff(skill.buff_to_self)?;

        let direction = aim(&caster, aim_point, aim_direction);
        let range = self.config.effective_range(caster.attributes.attack_range);
        let mut report = CastReport::default();

        // 1. Movement
        if skill.category.moves() && skill.movement.distance > 0.0 {
            let end = caster.position + direction * skill.movement.distance;
            world.set_forward(caster_id, direction);
            if skill.movement.teleport || skill.movement.duration <= 0.0 {
                world.set_position(caster_id, end);
            } else {
                world.begin_dash(Dash::new(
                    caster_id,
                    caster.position,
                    end,
                    skill.movement.duration,
                ));
            }
            report.moved = true;
        }

        // Teleports change where the rest of the cast happens from.
        let origin = world.combatant(caster_id).unwrap_or(caster);

        // 2. Damage
        if skill.category.damages() {
            if let Some(spec) = projectile {
                world.spawn_projectile(Projectile::launch(
                    &origin,
                    Arc::clone(skill),
                    spec,
                    direction,
                    range,
                    buff_to_target.clone(),
                    self.config,
                ));
                world.emit(CombatEvent::ProjectileLaunched {
                    owner: caster_id,
                    skill: skill.id,
                });
                world.notify(caster_id, CombatHook::Attack, None);
                report.projectile_launched = true;
            } else {
                let targets = select_targets(
                    world,
                    &origin,
                    skill.range_shape,
                    range,
                    skill.range_size,
                    skill.target_cap(),
                    direction,
                );
                for target in targets {
                    if let Some(hit) = strike(world, &origin, target, skill) {
                        report.total_damage += hit.dealt;
                        report.targets_hit.push(target);
                        if hit.killed {
                            tracing::debug!(caster = %caster_id, %target, "target killed");
                        }
                    }
                }
                if let Some(first) = report.targets_hit.first().copied() {
                    world.notify(caster_id, CombatHook::Attack, Some(first));
                }
            }
        }

        // 3. Status
        if skill.category.applies_status() {
            if let Some(buff) = &buff_to_target
                && !report.projectile_launched
            {
                let recipients = if skill.category.damages() {
                    report.targets_hit.clone()
                } else {
                    select_targets(
                        world,
                        &origin,
                        skill.range_shape,
                        range,
                        skill.range_size,
                        skill.target_cap(),
                        direction,
                    )
                };
                for target in recipients {
                    if world
                        .add_buff(target, Arc::clone(buff), Some(caster_id))
                        .is_some()
                    {
                        report.buffs_applied += 1;
                        if !report.targets_hit.contains(&target) {
                            report.targets_hit.push(target);
                        }
                    }
                }
            }
            if let Some(buff) = buff_to_self
                && world.add_buff(caster_id, buff, Some(caster_id)).is_some()
            {
                report.buffs_applied += 1;
            }
        }

        if !report.did_something() {
            tracing::trace!(caster = %caster_id, skill = %skill.id, "cast found nothing to act on");
            return Err(CastError::NoTargets(skill.id));
        }

        // 4. Cooldown
        world.start_cooldown(caster_id, skill.id, cooldown_for(skill, &caster.attributes));

        tracing::debug!(
            caster = %caster_id,
            skill = %skill.id,
            targets = report.targets_hit.len(),
            damage = report.total_damage,
            buffs = report.buffs_applied,
            "cast resolved"
        );
        Ok(report)
    }

    fn lookup_buff(&self, id: Option<BuffId>) -> Result<Option<Arc<BuffDefinition>>, CastError> {
        id.map(|id| self.oracle.buff(id).ok_or(CastError::UnknownBuff(id)))
            .transpose()
    }
}

fn aim(caster: &CombatantView, aim_point: Vec3, aim_direction: Vec3) -> Vec3 {
    let direction = aim_direction.normalize_or_zero();
    if direction != Vec3::ZERO {
        return direction;
    }
    let toward = (aim_point - caster.position).normalize_or_zero();
    if toward != Vec3::ZERO {
        return toward;
    }
    match caster.forward.normalize_or_zero() {
        f if f == Vec3::ZERO => Vec3::Z,
        f => f,
    }
}
