//! Geometric target selection.
//!
//! All queries start from the world's radius query, keep alive hostiles of
//! the caster within range, and order them nearest first with ties broken by
//! entity id. Arc and Circle results are truncated to the target cap after
//! ordering, so the closest targets win.

use glam::Vec3;

use super::definition::RangeShape;
use crate::env::{CombatWorld, CombatantView};
use crate::state::EntityId;

/// Angle in degrees between `aim` and the direction from `from` to `to`.
///
/// A target on top of the caster, or a zero aim, counts as angle 0. Exactly
/// collinear vectors ahead of the aim are 0 without going through `acos`.
pub fn angle_to(aim: Vec3, from: Vec3, to: Vec3) -> f32 {
    let offset = to - from;
    let (aim_dir, offset_dir) = (aim.normalize_or_zero(), offset.normalize_or_zero());
    if aim_dir == Vec3::ZERO || offset_dir == Vec3::ZERO {
        return 0.0;
    }
    if offset.cross(aim).length_squared() == 0.0 && offset.dot(aim) > 0.0 {
        return 0.0;
    }
    aim_dir.dot(offset_dir).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Alive hostiles of `caster` within `range`, nearest first.
pub fn hostiles_in_range(
    world: &dyn CombatWorld,
    caster: &CombatantView,
    range: f32,
) -> Vec<CombatantView> {
    let mut found: Vec<(f32, CombatantView)> = world
        .entities_in_radius(caster.position, range)
        .into_iter()
        .filter(|id| *id != caster.id)
        .filter_map(|id| world.combatant(id))
        .filter(|view| view.alive && caster.is_hostile_to(view))
        .map(|view| (view.position.distance(caster.position), view))
        .filter(|(distance, _)| *distance <= range)
        .collect();
    found.sort_by(|(da, a), (db, b)| da.total_cmp(db).then(a.id.cmp(&b.id)));
    found.into_iter().map(|(_, view)| view).collect()
}

/// Runs the query of `shape` and returns the selected target ids.
pub fn select_targets(
    world: &dyn CombatWorld,
    caster: &CombatantView,
    shape: RangeShape,
    range: f32,
    arc_degrees: f32,
    cap: usize,
    aim: Vec3,
) -> Vec<EntityId> {
    let candidates = hostiles_in_range(world, caster, range);
    match shape {
        RangeShape::Single => candidates.first().map(|v| v.id).into_iter().collect(),
        RangeShape::Arc => {
            let half = arc_degrees.max(0.0) / 2.0;
            let aim = if aim.normalize_or_zero() == Vec3::ZERO {
                caster.forward
            } else {
                aim
            };
            candidates
                .iter()
                .filter(|v| angle_to(aim, caster.position, v.position) <= half)
                .take(cap)
                .map(|v| v.id)
                .collect()
        }
        RangeShape::Circle => candidates.iter().take(cap).map(|v| v.id).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_zero_for_straight_ahead_and_coincident() {
        assert_eq!(angle_to(Vec3::Z, Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0)), 0.0);
        assert_eq!(angle_to(Vec3::Z, Vec3::ONE, Vec3::ONE), 0.0);
        assert_eq!(angle_to(Vec3::ZERO, Vec3::ZERO, Vec3::X), 0.0);
    }

    #[test]
    fn angle_zero_for_scaled_collinear_offset() {
        let aim = Vec3::new(1.0, 0.0, 1.0);
        assert_eq!(angle_to(aim, Vec3::ZERO, Vec3::new(3.0, 0.0, 3.0)), 0.0);
    }

    #[test]
    fn angle_keeps_tiny_deviations() {
        // About 0.06 degrees off the aim.
        let angle = angle_to(Vec3::Z, Vec3::ZERO, Vec3::new(0.001, 0.0, 1.0));
        assert!(angle > 0.05 && angle < 0.07, "angle was {angle}");
    }

    #[test]
    fn angle_measures_degrees() {
        let right = angle_to(Vec3::Z, Vec3::ZERO, Vec3::X);
        assert!((right - 90.0).abs() < 1e-3);
        let behind = angle_to(Vec3::Z, Vec3::ZERO, -Vec3::Z);
        assert!((behind - 180.0).abs() < 1e-3);
    }
}
