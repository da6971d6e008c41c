use std::sync::Arc;

use combat_core::{
    Arena, AttackStyle, AttributeKind, AttributeModifier, AttributeSet, BuffCategory,
    BuffDefinition, BuffEffect, BuffId, CastError, CombatConfig, CombatEvent, Combatant,
    DefinitionCatalog, EntityId, MovementSpec, PassiveDefinition, PassiveEffect, PassiveId,
    PassiveTrigger, ProjectileSpec, RangeShape, SkillCategory, SkillDefinition, SkillId, Team,
};
use glam::Vec3;

const ATTACKER: EntityId = EntityId(1);
const DEFENDER: EntityId = EntityId(2);
const BASIC: SkillId = SkillId(1);

fn attacker_base() -> AttributeSet {
    AttributeSet::DEFAULT_BASE.with(AttributeKind::AttackPower, 20.0)
}

fn defender_base() -> AttributeSet {
    AttributeSet::DEFAULT_BASE.with(AttributeKind::Defense, 10.0)
}

/// Set `RUST_LOG=combat_core=trace` to see the cast pipeline.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn duel(catalog: DefinitionCatalog) -> Arena {
    init_tracing();
    let mut arena = Arena::new(CombatConfig::default(), Arc::new(catalog));
    arena.spawn(Combatant::new(ATTACKER, Team::Player, Some(attacker_base())));
    arena.spawn(
        Combatant::new(DEFENDER, Team::Enemy, Some(defender_base()))
            .with_position(Vec3::new(0.0, 0.0, 1.0)),
    );
    arena
}

fn health(arena: &Arena, id: EntityId) -> f32 {
    arena.get(id).map_or(-1.0, |unit| unit.health().current())
}

fn basic_catalog() -> DefinitionCatalog {
    DefinitionCatalog::new().with_skill(SkillDefinition::basic_attack(BASIC))
}

#[test]
fn basic_attack_deals_attack_minus_half_defense() {
    let mut arena = duel(basic_catalog());

    let report = arena
        .cast(ATTACKER, BASIC, Vec3::ZERO, Vec3::Z)
        .expect("cast resolves");

    assert_eq!(report.targets_hit, vec![DEFENDER]);
    assert_eq!(report.total_damage, 15.0);
    assert_eq!(health(&arena, DEFENDER), 85.0);
    assert!(arena.events().contains(&CombatEvent::HitFlash {
        target: DEFENDER,
        amount: 15.0,
    }));
}

#[test]
fn basic_attack_cools_down_for_one_attack_interval() {
    let mut arena = duel(basic_catalog());
    arena.cast(ATTACKER, BASIC, Vec3::ZERO, Vec3::Z).expect("first cast");

    let again = arena.cast(ATTACKER, BASIC, Vec3::ZERO, Vec3::Z);
    assert!(matches!(again, Err(CastError::OnCooldown { skill: BASIC, .. })));
    assert_eq!(health(&arena, DEFENDER), 85.0);

    arena.step(1.0);
    arena.cast(ATTACKER, BASIC, Vec3::ZERO, Vec3::Z).expect("ready again");
    assert_eq!(health(&arena, DEFENDER), 70.0);
}

#[test]
fn extra_damage_passive_adds_on_attack() {
    let mut arena = duel(basic_catalog());
    if let Some(unit) = arena.get_mut(ATTACKER) {
        unit.add_passive(Arc::new(PassiveDefinition::new(
            PassiveId(1),
            "keen edge",
            PassiveTrigger::OnAttack,
            PassiveEffect::ExtraDamage { amount: 7.0 },
        )));
    }

    let report = arena.cast(ATTACKER, BASIC, Vec3::ZERO, Vec3::Z).expect("cast");
    assert_eq!(report.total_damage, 22.0);
    assert_eq!(health(&arena, DEFENDER), 78.0);
}

#[test]
fn attack_count_passive_fires_on_third_attack() {
    let mut arena = duel(basic_catalog());
    if let Some(unit) = arena.get_mut(ATTACKER) {
        unit.add_passive(Arc::new(PassiveDefinition::new(
            PassiveId(3),
            "rhythm",
            PassiveTrigger::OnAttackCount { threshold: 3 },
            PassiveEffect::Custom {
                tag: "combo".into(),
            },
        )));
    }
    let triggered = |arena: &Arena| {
        arena
            .events()
            .iter()
            .filter(|event| matches!(event, CombatEvent::PassiveTriggered { .. }))
            .count()
    };

    for _ in 0..2 {
        arena.cast(ATTACKER, BASIC, Vec3::ZERO, Vec3::Z).expect("cast");
        arena.step(1.0);
    }
    assert_eq!(triggered(&arena), 0);

    arena.cast(ATTACKER, BASIC, Vec3::ZERO, Vec3::Z).expect("cast");
    assert_eq!(triggered(&arena), 1);
    assert_eq!(
        arena
            .get(ATTACKER)
            .and_then(|unit| unit.passives().get(PassiveId(3)))
            .map(|inst| inst.attack_count()),
        Some(0)
    );
}

#[test]
fn arc_includes_straight_ahead_and_excludes_past_half_angle() {
    let mut cleave = SkillDefinition::new(SkillId(2), "cleave");
    cleave.range_shape = RangeShape::Arc;
    cleave.range_size = 90.0;
    cleave.target_count = 5;
    let mut arena = duel(DefinitionCatalog::new().with_skill(cleave));
    // atan(1 / 0.9) is about 48 degrees, outside the 45 degree half-angle.
    arena.spawn(
        Combatant::new(EntityId(3), Team::Enemy, Some(defender_base()))
            .with_position(Vec3::new(1.0, 0.0, 0.9)),
    );

    let report = arena
        .cast(ATTACKER, SkillId(2), Vec3::ZERO, Vec3::Z)
        .expect("cast");
    assert_eq!(report.targets_hit, vec![DEFENDER]);
    assert_eq!(health(&arena, EntityId(3)), 100.0);
}

#[test]
fn zero_width_arc_still_hits_dead_ahead() {
    let mut thrust = SkillDefinition::new(SkillId(2), "thrust");
    thrust.range_shape = RangeShape::Arc;
    thrust.range_size = 0.0;
    let mut arena = duel(DefinitionCatalog::new().with_skill(thrust));

    let report = arena
        .cast(ATTACKER, SkillId(2), Vec3::ZERO, Vec3::Z)
        .expect("cast");
    assert_eq!(report.targets_hit, vec![DEFENDER]);
}

#[test]
fn zero_width_arc_misses_slightly_off_axis_target() {
    let mut thrust = SkillDefinition::new(SkillId(2), "thrust");
    thrust.range_shape = RangeShape::Arc;
    thrust.range_size = 0.0;
    thrust.target_count = 5;
    let mut arena = duel(DefinitionCatalog::new().with_skill(thrust));
    // About 0.06 degrees off the aim.
    arena.spawn(
        Combatant::new(EntityId(3), Team::Enemy, Some(defender_base()))
            .with_position(Vec3::new(0.0015, 0.0, 1.5)),
    );

    let report = arena
        .cast(ATTACKER, SkillId(2), Vec3::ZERO, Vec3::Z)
        .expect("cast");
    assert_eq!(report.targets_hit, vec![DEFENDER]);
    assert_eq!(health(&arena, EntityId(3)), 100.0);
}

#[test]
fn circle_takes_nearest_targets_up_to_cap() {
    let mut nova = SkillDefinition::new(SkillId(4), "nova");
    nova.range_shape = RangeShape::Circle;
    nova.target_count = 2;
    let mut arena = duel(DefinitionCatalog::new().with_skill(nova));
    arena.spawn(
        Combatant::new(EntityId(3), Team::Enemy, Some(defender_base()))
            .with_position(Vec3::new(-1.5, 0.0, 0.0)),
    );
    arena.spawn(
        Combatant::new(EntityId(4), Team::Enemy, Some(defender_base()))
            .with_position(Vec3::new(0.0, 0.0, -1.25)),
    );
    // Allies are never targeted.
    arena.spawn(
        Combatant::new(EntityId(5), Team::Player, None).with_position(Vec3::new(0.5, 0.0, 0.0)),
    );

    let report = arena
        .cast(ATTACKER, SkillId(4), Vec3::ZERO, Vec3::Z)
        .expect("cast");
    assert_eq!(report.targets_hit, vec![DEFENDER, EntityId(4)]);
    assert_eq!(health(&arena, EntityId(3)), 100.0);
    assert_eq!(health(&arena, EntityId(5)), 100.0);
}

#[test]
fn missing_targets_reject_without_cooldown() {
    let mut arena = duel(basic_catalog());
    if let Some(defender) = arena.get_mut(DEFENDER) {
        defender.set_position(Vec3::new(0.0, 0.0, 50.0));
    }

    let result = arena.cast(ATTACKER, BASIC, Vec3::ZERO, Vec3::Z);
    assert_eq!(result, Err(CastError::NoTargets(BASIC)));
    assert!(
        arena
            .get(ATTACKER)
            .is_some_and(|unit| unit.cooldowns().is_ready(BASIC))
    );
}

#[test]
fn dead_caster_cannot_cast() {
    let mut arena = duel(basic_catalog());
    if let Some(unit) = arena.get_mut(ATTACKER) {
        unit.take_damage(1000.0);
    }
    let result = arena.cast(ATTACKER, BASIC, Vec3::ZERO, Vec3::Z);
    assert_eq!(result, Err(CastError::InvalidCaster(ATTACKER)));
}

#[test]
fn kill_hook_grants_triggered_bonus() {
    let mut arena = duel(basic_catalog());
    if let Some(unit) = arena.get_mut(ATTACKER) {
        unit.add_passive(Arc::new(PassiveDefinition::new(
            PassiveId(2),
            "trophy",
            PassiveTrigger::OnKill,
            PassiveEffect::AttributeBonus(AttributeModifier::flat(AttributeKind::AttackPower, 2.0)),
        )));
    }
    if let Some(defender) = arena.get_mut(DEFENDER) {
        defender.take_damage(90.0);
    }

    arena.cast(ATTACKER, BASIC, Vec3::ZERO, Vec3::Z).expect("cast");
    assert!(arena.events().contains(&CombatEvent::Death { entity: DEFENDER }));
    assert_eq!(
        arena.get(ATTACKER).map(|unit| unit.attributes().attack_power),
        Some(22.0)
    );
}

#[test]
fn life_steal_heals_caster_by_share_of_damage() {
    let mut drain = SkillDefinition::new(SkillId(5), "drain");
    drain.life_steal_ratio = 0.5;
    let mut arena = duel(DefinitionCatalog::new().with_skill(drain));
    if let Some(unit) = arena.get_mut(ATTACKER) {
        unit.take_damage(50.0);
    }

    arena
        .cast(ATTACKER, SkillId(5), Vec3::ZERO, Vec3::Z)
        .expect("cast");
    assert_eq!(health(&arena, ATTACKER), 57.5);
}

#[test]
fn on_hit_stun_passive_stuns_the_attacker() {
    let mut arena = duel(basic_catalog());
    if let Some(defender) = arena.get_mut(DEFENDER) {
        defender.add_passive(Arc::new(PassiveDefinition::new(
            PassiveId(4),
            "thorn shock",
            PassiveTrigger::OnHit,
            PassiveEffect::Stun { duration: 2.0 },
        )));
    }

    arena.cast(ATTACKER, BASIC, Vec3::ZERO, Vec3::Z).expect("cast");
    assert!(
        arena
            .get(ATTACKER)
            .is_some_and(|unit| unit.buffs().is_stunned())
    );

    arena.step(1.0);
    let blocked = arena.cast(ATTACKER, BASIC, Vec3::ZERO, Vec3::Z);
    assert_eq!(blocked, Err(CastError::Stunned(ATTACKER)));
}

#[test]
fn silence_blocks_skills_but_not_basic_attacks() {
    let mut strike = SkillDefinition::new(SkillId(6), "strike");
    strike.cooldown = 3.0;
    let catalog = basic_catalog().with_skill(strike);
    let mut arena = duel(catalog);
    let hush = Arc::new(BuffDefinition::new(
        BuffId(9),
        "hush",
        BuffCategory::Negative,
        BuffEffect::Silence,
    ));
    if let Some(unit) = arena.get_mut(ATTACKER) {
        unit.add_buff(hush, None);
    }

    assert_eq!(
        arena.cast(ATTACKER, SkillId(6), Vec3::ZERO, Vec3::Z),
        Err(CastError::Silenced(ATTACKER))
    );
    assert!(arena.cast(ATTACKER, BASIC, Vec3::ZERO, Vec3::Z).is_ok());
}

#[test]
fn teleport_moves_caster_along_aim() {
    let mut blink = SkillDefinition::new(SkillId(7), "blink");
    blink.category = SkillCategory::Movement;
    blink.movement = MovementSpec {
        distance: 3.0,
        duration: 0.0,
        teleport: true,
    };
    let mut arena = duel(DefinitionCatalog::new().with_skill(blink));

    let report = arena
        .cast(ATTACKER, SkillId(7), Vec3::ZERO, Vec3::X)
        .expect("cast");
    assert!(report.moved);
    assert_eq!(
        arena.get(ATTACKER).map(Combatant::position),
        Some(Vec3::new(3.0, 0.0, 0.0))
    );
    assert_eq!(
        arena.get(ATTACKER).map(Combatant::forward),
        Some(Vec3::X)
    );
}

#[test]
fn timed_dash_arrives_after_its_duration() {
    let mut lunge = SkillDefinition::new(SkillId(8), "lunge");
    lunge.category = SkillCategory::Movement;
    lunge.movement = MovementSpec {
        distance: 4.0,
        duration: 0.5,
        teleport: false,
    };
    let mut arena = duel(DefinitionCatalog::new().with_skill(lunge));

    arena
        .cast(ATTACKER, SkillId(8), Vec3::ZERO, Vec3::X)
        .expect("cast");
    assert_eq!(arena.dashes().len(), 1);
    arena.step(0.25);
    assert_eq!(
        arena.get(ATTACKER).map(Combatant::position),
        Some(Vec3::new(2.0, 0.0, 0.0))
    );
    arena.step(0.25);
    assert_eq!(
        arena.get(ATTACKER).map(Combatant::position),
        Some(Vec3::new(4.0, 0.0, 0.0))
    );
    assert!(arena.dashes().is_empty());
}

#[test]
fn projectile_flies_and_strikes() {
    let mut bolt = SkillDefinition::new(SkillId(9), "bolt");
    bolt.attack_style = AttackStyle::Ranged;
    bolt.projectile = Some(ProjectileSpec {
        speed: 10.0,
        lifetime: 2.0,
        pierce: false,
        homing: false,
    });
    let mut arena = duel(DefinitionCatalog::new().with_skill(bolt));
    if let Some(defender) = arena.get_mut(DEFENDER) {
        defender.set_position(Vec3::new(0.0, 0.0, 5.0));
    }

    let report = arena
        .cast(ATTACKER, SkillId(9), Vec3::ZERO, Vec3::Z)
        .expect("cast");
    assert!(report.projectile_launched);
    assert!(report.targets_hit.is_empty());
    assert_eq!(arena.projectiles().len(), 1);

    arena.step(0.5);
    assert_eq!(health(&arena, DEFENDER), 85.0);
    assert!(arena.projectiles().is_empty());
}

#[test]
fn ranged_skill_without_projectile_is_rejected() {
    let mut broken = SkillDefinition::new(SkillId(10), "broken");
    broken.attack_style = AttackStyle::Ranged;
    let mut arena = duel(DefinitionCatalog::new().with_skill(broken));

    assert_eq!(
        arena.cast(ATTACKER, SkillId(10), Vec3::ZERO, Vec3::Z),
        Err(CastError::MissingProjectile(SkillId(10)))
    );
    assert_eq!(health(&arena, DEFENDER), 100.0);
}

fn bolt(homing: bool, pierce: bool, target_count: u32) -> SkillDefinition {
    let mut bolt = SkillDefinition::new(SkillId(11), "seeker");
    bolt.attack_style = AttackStyle::Ranged;
    bolt.target_count = target_count;
    bolt.projectile = Some(ProjectileSpec {
        speed: 10.0,
        lifetime: 2.0,
        pierce,
        homing,
    });
    bolt
}

fn fire_at_flank(homing: bool) -> f32 {
    let mut arena = duel(DefinitionCatalog::new().with_skill(bolt(homing, false, 1)));
    if let Some(defender) = arena.get_mut(DEFENDER) {
        defender.set_position(Vec3::new(1.5, 0.0, 3.0));
    }
    arena
        .cast(ATTACKER, SkillId(11), Vec3::ZERO, Vec3::Z)
        .expect("cast");
    // Long enough for a miss to outlive its lifetime.
    for _ in 0..25 {
        arena.step(0.1);
    }
    assert!(arena.projectiles().is_empty());
    health(&arena, DEFENDER)
}

#[test]
fn homing_projectile_curves_into_flanking_target() {
    assert_eq!(fire_at_flank(false), 100.0);
    assert_eq!(fire_at_flank(true), 85.0);
}

#[test]
fn piercing_projectile_stops_at_its_hit_cap() {
    let mut arena = duel(DefinitionCatalog::new().with_skill(bolt(false, true, 2)));
    if let Some(defender) = arena.get_mut(DEFENDER) {
        defender.set_position(Vec3::new(0.0, 0.0, 3.0));
    }
    for (id, z) in [(3, 4.0), (4, 5.0)] {
        arena.spawn(
            Combatant::new(EntityId(id), Team::Enemy, Some(defender_base()))
                .with_position(Vec3::new(0.0, 0.0, z)),
        );
    }

    arena
        .cast(ATTACKER, SkillId(11), Vec3::ZERO, Vec3::Z)
        .expect("cast");
    arena.step(0.5);

    assert_eq!(health(&arena, DEFENDER), 85.0);
    assert_eq!(health(&arena, EntityId(3)), 85.0);
    assert_eq!(health(&arena, EntityId(4)), 100.0);
    assert!(arena.projectiles().is_empty());
}
