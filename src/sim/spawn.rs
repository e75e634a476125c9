//! Entity placement
//!
//! Candidates are drawn uniformly inside the arena margin and rejected if
//! they land in a reserved UI zone or too close to the player's head. The
//! head constraint is dropped after `spawn_relax_after` attempts and the last
//! candidate is accepted after `spawn_max_attempts`.

use glam::Vec2;
use rand::Rng;

use super::state::{EntityKind, EntityTag, GameEntity, SimulationState};
use crate::tuning::Tuning;

/// Radius around the head where spawns are avoided
pub fn safe_radius(tuning: &Tuning, arena: Vec2, scale: f32) -> f32 {
    let fraction = arena * tuning.spawn_safe_fraction;
    fraction.min_element().min(tuning.spawn_safe_radius * scale)
}

/// Pick a spawn point for a new entity
pub fn find_spawn_point(
    rng: &mut impl Rng,
    tuning: &Tuning,
    arena: Vec2,
    scale: f32,
    head: Vec2,
) -> Vec2 {
    let margin = tuning.spawn_margin;
    let span = (arena - Vec2::splat(2.0 * margin)).max(Vec2::ZERO);
    let safe = safe_radius(tuning, arena, scale);

    let mut candidate = arena / 2.0;
    for attempt in 1..=tuning.spawn_max_attempts {
        candidate = Vec2::new(
            margin + rng.random::<f32>() * span.x,
            margin + rng.random::<f32>() * span.y,
        );

        if tuning.in_ui_zone(candidate, arena) {
            continue;
        }
        let relaxed = attempt > tuning.spawn_relax_after;
        if relaxed || candidate.distance(head) >= safe {
            return candidate;
        }
    }

    log::debug!(
        "No clear spawn point after {} attempts, using ({:.0}, {:.0})",
        tuning.spawn_max_attempts,
        candidate.x,
        candidate.y
    );
    candidate
}

/// Unscaled radius for an entity kind
pub fn base_radius(tuning: &Tuning, tag: EntityTag) -> f32 {
    match tag {
        EntityTag::Food => tuning.food_radius,
        EntityTag::Bomb => tuning.bomb_radius,
        EntityTag::Heart => tuning.heart_radius,
    }
}

/// Create a new entity of `tag` at a fresh spawn point; returns its ID
pub fn spawn_entity(state: &mut SimulationState, tag: EntityTag) -> u32 {
    let pos = find_spawn_point(
        &mut state.rng,
        &state.tuning,
        state.arena,
        state.scale,
        state.player.head,
    );
    let kind = EntityKind::random(tag, &mut state.rng);
    let radius = base_radius(&state.tuning, tag) * state.scale;
    let id = state.next_entity_id();

    state.entities.push(GameEntity {
        id,
        pos,
        radius,
        kind,
    });
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::LevelConfig;
    use crate::tuning::{UiZone, ZoneAnchor};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawns_avoid_ui_and_head() {
        let tuning = Tuning::default();
        let arena = Vec2::new(1280.0, 720.0);
        let head = arena / 2.0;
        let safe = safe_radius(&tuning, arena, 0.9);
        let mut rng = Pcg32::seed_from_u64(99);

        for _ in 0..500 {
            let p = find_spawn_point(&mut rng, &tuning, arena, 0.9, head);
            assert!(!tuning.in_ui_zone(p, arena));
            assert!(p.distance(head) >= safe);
            assert!(p.x >= tuning.spawn_margin && p.x <= arena.x - tuning.spawn_margin);
            assert!(p.y >= tuning.spawn_margin && p.y <= arena.y - tuning.spawn_margin);
        }
    }

    #[test]
    fn test_safe_radius_uses_smaller_bound() {
        let tuning = Tuning::default();
        // 40% of 300 = 120 < 180
        assert!((safe_radius(&tuning, Vec2::new(300.0, 1000.0), 1.0) - 120.0).abs() < 1e-4);
        // Scaled cap wins on large arenas
        assert!((safe_radius(&tuning, Vec2::new(2000.0, 2000.0), 1.0) - 180.0).abs() < 1e-4);
    }

    /// The `n`-th candidate `find_spawn_point` would draw from `seed`
    fn nth_candidate(tuning: &Tuning, arena: Vec2, seed: u64, n: u32) -> Vec2 {
        let margin = tuning.spawn_margin;
        let span = arena - Vec2::splat(2.0 * margin);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut candidate = Vec2::ZERO;
        for _ in 0..n {
            candidate = Vec2::new(
                margin + rng.random::<f32>() * span.x,
                margin + rng.random::<f32>() * span.y,
            );
        }
        candidate
    }

    #[test]
    fn test_head_constraint_relaxed_after_limit() {
        let mut tuning = Tuning::default();
        tuning.ui_zones.clear();
        tuning.spawn_safe_fraction = 10.0;
        tuning.spawn_safe_radius = 10_000.0;
        let arena = Vec2::new(1280.0, 720.0);
        let head = arena / 2.0;
        // Every point in the arena is too close to the head
        let safe = safe_radius(&tuning, arena, 1.0);
        assert!(safe > arena.length());

        let mut rng = Pcg32::seed_from_u64(17);
        let p = find_spawn_point(&mut rng, &tuning, arena, 1.0, head);

        assert!(p.distance(head) < safe);
        let relaxed_at = tuning.spawn_relax_after + 1;
        assert_eq!(p, nth_candidate(&tuning, arena, 17, relaxed_at));
    }

    #[test]
    fn test_last_candidate_accepted_inside_ui_zone() {
        let mut tuning = Tuning::default();
        tuning.ui_zones = vec![UiZone::new(ZoneAnchor::TopLeft, 1.0e6, 1.0e6)];
        let arena = Vec2::new(1280.0, 720.0);

        let mut rng = Pcg32::seed_from_u64(23);
        let p = find_spawn_point(&mut rng, &tuning, arena, 1.0, arena / 2.0);

        assert!(tuning.in_ui_zone(p, arena));
        assert_eq!(p, nth_candidate(&tuning, arena, 23, tuning.spawn_max_attempts));
    }

    #[test]
    fn test_tiny_arena_still_returns_a_point() {
        // Every candidate sits in a UI zone; the last one is accepted anyway
        let tuning = Tuning::default();
        let arena = Vec2::new(100.0, 100.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let p = find_spawn_point(&mut rng, &tuning, arena, 0.4, arena / 2.0);
        assert!(p.is_finite());
    }

    #[test]
    fn test_spawn_entity_scales_radius() {
        let mut state = SimulationState::new(
            Tuning::default(),
            LevelConfig::LEVEL_ONE,
            Vec2::new(1600.0, 1600.0),
            3,
        );
        let before = state.entities.len();
        let id = spawn_entity(&mut state, EntityTag::Bomb);
        assert_eq!(state.entities.len(), before + 1);

        let entity = state.entities.last().unwrap();
        assert_eq!(entity.id, id);
        assert_eq!(entity.kind.tag(), EntityTag::Bomb);
        assert!((entity.radius - 36.0).abs() < 1e-4);
    }

    #[test]
    fn test_entity_ids_unique() {
        let state = SimulationState::new(
            Tuning::default(),
            LevelConfig::LEVEL_TWO,
            Vec2::new(1280.0, 720.0),
            5,
        );
        let mut ids: Vec<u32> = state.entities.iter().map(|e| e.id).collect();
        ids.extend(state.enemies.iter().map(|e| e.id));
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
