/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Reach used when a caster's attack-range attribute is zero or negative.
    pub default_attack_range: f32,
    /// How quickly homing projectiles turn toward their target (per second).
    pub homing_strength: f32,
    /// Homing search radius as a multiple of the cast range.
    pub homing_search_multiplier: f32,
    /// Minimum cosine between flight direction and target for homing pickup.
    pub homing_front_dot: f32,
    /// Contact radius used by projectile sweeps.
    pub projectile_radius: f32,
    /// Distance in front of the caster at which projectiles spawn.
    pub projectile_spawn_offset: f32,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_BUFFS: usize = 32;
    pub const MAX_PASSIVES: usize = 16;
    pub const MAX_SKILL_TREES: usize = 6;

    // ===== numeric guards =====
    /// Every applied hit deals at least this much damage.
    pub const MIN_DAMAGE: f32 = 1.0;
    /// Attack speed is raised to this before it divides the basic-attack cooldown.
    pub const MIN_ATTACK_SPEED: f32 = 1.0;
    /// Highest skill-tree level any equipment can reach.
    pub const MAX_SKILL_TREE_LEVEL: u8 = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ATTACK_RANGE: f32 = 1.0;
    pub const DEFAULT_HOMING_STRENGTH: f32 = 5.0;
    pub const DEFAULT_HOMING_SEARCH_MULTIPLIER: f32 = 2.0;
    pub const DEFAULT_HOMING_FRONT_DOT: f32 = 0.5;
    pub const DEFAULT_PROJECTILE_RADIUS: f32 = 0.5;
    pub const DEFAULT_PROJECTILE_SPAWN_OFFSET: f32 = 1.0;

    pub fn new() -> Self {
        Self {
            default_attack_range: Self::DEFAULT_ATTACK_RANGE,
            homing_strength: Self::DEFAULT_HOMING_STRENGTH,
            homing_search_multiplier: Self::DEFAULT_HOMING_SEARCH_MULTIPLIER,
            homing_front_dot: Self::DEFAULT_HOMING_FRONT_DOT,
            projectile_radius: Self::DEFAULT_PROJECTILE_RADIUS,
            projectile_spawn_offset: Self::DEFAULT_PROJECTILE_SPAWN_OFFSET,
        }
    }

    /// Resolves the reach of a caster, falling back to the configured default.
    pub fn effective_range(&self, attack_range: f32) -> f32 {
        if attack_range > 0.0 {
            attack_range
        } else {
            self.default_attack_range
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
