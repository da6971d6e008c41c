//! Skills: authored definitions and their resolution.
//!
//! [`SkillResolver`] validates a cast and runs its movement, damage, status
//! and cooldown steps against a [`crate::env::CombatWorld`]. Ranged casts
//! leave a [`Projectile`] behind and timed movement leaves a [`Dash`]; both
//! are advanced by the world's scheduler.
mod cooldown;
mod damage;
mod definition;
mod movement;
mod projectile;
mod resolver;
mod targeting;

pub use cooldown::CooldownTracker;
pub use damage::{cooldown_for, final_damage, raw_damage};
pub use definition::{
    AttackStyle, DamageProfile, MovementSpec, ProjectileSpec, RangeShape, SkillCategory,
    SkillDefinition,
};
pub use movement::Dash;
pub use projectile::{Projectile, ProjectileStatus, segment_sphere_hit};
pub use resolver::{CastReport, SkillResolver};
pub use targeting::{angle_to, hostiles_in_range, select_targets};
