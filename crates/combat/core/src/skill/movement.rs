use glam::Vec3;

use crate::env::CombatWorld;
use crate::state::EntityId;

/// A dash in progress: moves `entity` linearly from `start` to `end` over
/// `duration`, one tick at a time. Dashes cannot be cancelled; they end when
/// the duration elapses or the entity dies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dash {
    entity: EntityId,
    start: Vec3,
    end: Vec3,
    duration: f32,
    elapsed: f32,
}

impl Dash {
    pub fn new(entity: EntityId, start: Vec3, end: Vec3, duration: f32) -> Self {
        Self {
            entity,
            start,
            end,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn end(&self) -> Vec3 {
        self.end
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Advances one tick and moves the entity; returns true while the dash
    /// is still running.
    pub fn advance(&mut self, dt: f32, world: &mut dyn CombatWorld) -> bool {
        if !world.combatant(self.entity).is_some_and(|v| v.alive) {
            return false;
        }
        self.elapsed += dt.max(0.0);
        let t = self.progress();
        world.set_position(self.entity, self.start.lerp(self.end, t));
        !self.is_finished()
    }
}
