//! Ranged sub-resolution.
//!
//! A projectile is resumable state advanced once per tick:
//! 1. Age; expire once the lifetime has elapsed.
//! 2. Homing: blend the heading toward the nearest un-hit hostile ahead.
//! 3. Integrate position along the heading.
//! 4. Sweep the travelled segment for hostile contacts and strike them.

use std::sync::Arc;

use glam::Vec3;

use super::definition::{ProjectileSpec, SkillDefinition};
use super::resolver::strike;
use crate::buff::BuffDefinition;
use crate::config::CombatConfig;
use crate::env::{CombatWorld, CombatantView};
use crate::state::{EntityId, Team};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ProjectileStatus {
    Flying,
    /// Hit its last allowed target, or its owner no longer exists.
    Spent,
    /// Lifetime elapsed.
    Expired,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    owner: EntityId,
    owner_team: Team,
    skill: Arc<SkillDefinition>,
    buff: Option<Arc<BuffDefinition>>,
    position: Vec3,
    direction: Vec3,
    speed: f32,
    lifetime: f32,
    age: f32,
    pierce: bool,
    homing: bool,
    max_hits: usize,
    search_radius: f32,
    hits: Vec<EntityId>,
}

impl Projectile {
    /// Spawns a projectile in front of `owner`, heading along `direction`.
    pub fn launch(
        owner: &CombatantView,
        skill: Arc<SkillDefinition>,
        spec: ProjectileSpec,
        direction: Vec3,
        range: f32,
        buff: Option<Arc<BuffDefinition>>,
        config: &CombatConfig,
    ) -> Self {
        let mut direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            direction = owner.forward.normalize_or_zero();
        }
        let max_hits = skill.target_cap();
        Self {
            owner: owner.id,
            owner_team: owner.team,
            skill,
            buff,
            position: owner.position + direction * config.projectile_spawn_offset,
            direction,
            speed: spec.speed.max(0.0),
            lifetime: spec.lifetime.max(0.0),
            age: 0.0,
            pierce: spec.pierce,
            homing: spec.homing,
            max_hits,
            search_radius: range * config.homing_search_multiplier,
            hits: Vec::new(),
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn skill(&self) -> &Arc<SkillDefinition> {
        &self.skill
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn hits(&self) -> &[EntityId] {
        &self.hits
    }

    pub fn advance(
        &mut self,
        dt: f32,
        world: &mut dyn CombatWorld,
        config: &CombatConfig,
    ) -> ProjectileStatus {
        self.age += dt;
        if self.age >= self.lifetime {
            tracing::trace!(owner = %self.owner, skill = %self.skill.id, "projectile expired");
            return ProjectileStatus::Expired;
        }

        if self.homing {
            self.steer(dt, world, config);
        }

        let start = self.position;
        let end = start + self.direction * self.speed * dt;
        self.position = end;

        let Some(owner) = world.combatant(self.owner) else {
            return ProjectileStatus::Spent;
        };

        for target in self.contacts(start, end, world, config) {
            if strike(world, &owner, target, &self.skill).is_none() {
                continue;
            }
            self.hits.push(target);
            tracing::debug!(owner = %self.owner, %target, "projectile hit");
            if let Some(buff) = &self.buff {
                world.add_buff(target, Arc::clone(buff), Some(self.owner));
            }
            if !self.pierce || self.hits.len() >= self.max_hits {
                return ProjectileStatus::Spent;
            }
        }
        ProjectileStatus::Flying
    }

    fn is_candidate(&self, view: &CombatantView) -> bool {
        view.alive
            && view.id != self.owner
            && self.owner_team.is_hostile_to(view.team)
            && !self.hits.contains(&view.id)
    }

    fn steer(&mut self, dt: f32, world: &dyn CombatWorld, config: &CombatConfig) {
        let target = world
            .entities_in_radius(self.position, self.search_radius)
            .into_iter()
            .filter_map(|id| world.combatant(id))
            .filter(|view| self.is_candidate(view))
            .filter(|view| {
                let to = (view.position - self.position).normalize_or_zero();
                self.direction.dot(to) > config.homing_front_dot
            })
            .min_by(|a, b| {
                let da = a.position.distance_squared(self.position);
                let db = b.position.distance_squared(self.position);
                da.total_cmp(&db).then(a.id.cmp(&b.id))
            });

        let Some(target) = target else {
            return;
        };
        let desired = (target.position - self.position).normalize_or_zero();
        let t = (config.homing_strength * dt).clamp(0.0, 1.0);
        let blended = self.direction.lerp(desired, t).normalize_or_zero();
        if blended != Vec3::ZERO {
            self.direction = blended;
        }
    }

    fn contacts(
        &self,
        start: Vec3,
        end: Vec3,
        world: &dyn CombatWorld,
        config: &CombatConfig,
    ) -> Vec<EntityId> {
        let center = (start + end) * 0.5;
        let reach = start.distance(end) * 0.5 + config.projectile_radius;
        let mut found: Vec<(f32, EntityId)> = world
            .entities_in_radius(center, reach)
            .into_iter()
            .filter_map(|id| world.combatant(id))
            .filter(|view| self.is_candidate(view))
            .filter(|view| segment_sphere_hit(start, end, view.position, config.projectile_radius))
            .map(|view| (view.position.distance_squared(start), view.id))
            .collect();
        found.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        found.into_iter().map(|(_, id)| id).collect()
    }
}

/// True when the segment `p0 → p1` passes within `radius` of `center`.
pub fn segment_sphere_hit(p0: Vec3, p1: Vec3, center: Vec3, radius: f32) -> bool {
    let d = p1 - p0;
    let m = p0 - center;
    let a = d.dot(d);
    if a <= 1e-6 {
        return m.length() <= radius;
    }
    let t = (-(m.dot(d)) / a).clamp(0.0, 1.0);
    let closest = p0 + d * t;
    (closest - center).length() <= radius
}
