//! Damage and cooldown formulas.

use super::definition::{DamageProfile, SkillDefinition};
use crate::config::CombatConfig;
use crate::env::CombatantView;
use crate::stats::AttributeSet;

/// Damage before passive bonuses and target mitigation, floored at
/// [`CombatConfig::MIN_DAMAGE`].
pub fn raw_damage(profile: &DamageProfile, attacker: &CombatantView, target: &CombatantView) -> f32 {
    let offense = profile.base_damage
        + attacker.attributes.attack_power * profile.attack_ratio
        + target.health * profile.target_health_percent / 100.0
        + attacker.max_health * profile.self_health_percent / 100.0;
    (offense - target.attributes.defense / 2.0).max(CombatConfig::MIN_DAMAGE)
}

/// Damage actually dealt once bonus and mitigation are known.
pub fn final_damage(raw: f32, bonus: f32, reduction: f32) -> f32 {
    (raw + bonus - reduction).max(CombatConfig::MIN_DAMAGE)
}

/// Cooldown started by a successful cast.
pub fn cooldown_for(skill: &SkillDefinition, attributes: &AttributeSet) -> f32 {
    if skill.is_basic_attack {
        attributes.attack_interval()
    } else {
        skill.cooldown.max(0.0)
    }
}
