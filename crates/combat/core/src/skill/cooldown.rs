use std::collections::HashMap;

use crate::state::SkillId;

/// Remaining cooldown per skill. Entries are dropped once they reach zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CooldownTracker {
    remaining: HashMap<SkillId, f32>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, skill: SkillId, seconds: f32) {
        if seconds > 0.0 {
            self.remaining.insert(skill, seconds);
        } else {
            self.remaining.remove(&skill);
        }
    }

    pub fn remaining(&self, skill: SkillId) -> f32 {
        self.remaining.get(&skill).copied().unwrap_or(0.0)
    }

    pub fn is_ready(&self, skill: SkillId) -> bool {
        self.remaining(skill) <= 0.0
    }

    pub fn update(&mut self, dt: f32) {
        self.remaining.retain(|_, left| {
            *left -= dt;
            *left > 0.0
        });
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
    }

    pub fn active(&self) -> usize {
        self.remaining.len()
    }
}
