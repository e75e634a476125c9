//! Collision checks between the player's head and the world
//!
//! All checks are circle-vs-point: the head is tested against entity centers
//! and against sampled points along ribbon trails.

use glam::Vec2;

use super::state::GameEntity;

/// Whether the head is close enough to collect/trigger an entity
#[inline]
pub fn pickup_hit(head: Vec2, entity: &GameEntity, margin: f32) -> bool {
    head.distance(entity.pos) < entity.radius + margin
}

/// Whether the head touches a trail
///
/// The first `skip` points are ignored and the rest are tested every
/// `stride` points.
pub fn trail_hit<'a>(
    head: Vec2,
    trail: impl IntoIterator<Item = &'a Vec2>,
    skip: usize,
    stride: usize,
    radius: f32,
) -> bool {
    let radius_sq = radius * radius;
    trail
        .into_iter()
        .skip(skip)
        .step_by(stride.max(1))
        .any(|p| head.distance_squared(*p) < radius_sq)
}

/// Collision radius against the player's own trail
#[inline]
pub fn self_hit_radius(ribbon_width: f32, scale: f32, width_factor: f32) -> f32 {
    ribbon_width * scale * width_factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EntityKind;

    fn food_at(pos: Vec2) -> GameEntity {
        GameEntity {
            id: 1,
            pos,
            radius: 16.0,
            kind: EntityKind::Food { swirl_seed: 0 },
        }
    }

    #[test]
    fn test_pickup_hit_includes_margin() {
        let food = food_at(Vec2::new(100.0, 100.0));
        assert!(pickup_hit(Vec2::new(127.0, 100.0), &food, 12.0));
        assert!(!pickup_hit(Vec2::new(128.5, 100.0), &food, 12.0));
        assert!(!pickup_hit(Vec2::new(127.0, 100.0), &food, 0.0));
    }

    #[test]
    fn test_trail_hit_skips_neck() {
        // Trail curls back to the head within the skipped prefix only
        let head = Vec2::ZERO;
        let mut trail = vec![Vec2::ZERO; 10];
        trail.extend((0..40).map(|i| Vec2::new(100.0 + i as f32, 0.0)));
        assert!(!trail_hit(head, &trail, 10, 2, 5.0));
        assert!(trail_hit(head, &trail, 0, 2, 5.0));
    }

    #[test]
    fn test_trail_hit_stride() {
        // Only odd indices are close to the head; stride 2 from 0 never sees them
        let trail: Vec<Vec2> = (0..20)
            .map(|i| if i % 2 == 1 { Vec2::ZERO } else { Vec2::splat(50.0) })
            .collect();
        assert!(!trail_hit(Vec2::ZERO, &trail, 0, 2, 1.0));
        assert!(trail_hit(Vec2::ZERO, &trail, 1, 2, 1.0));
        // Stride 0 behaves like stride 1
        assert!(trail_hit(Vec2::ZERO, &trail, 0, 0, 1.0));
    }

    #[test]
    fn test_trail_hit_short_trail() {
        let trail = vec![Vec2::ZERO; 30];
        assert!(!trail_hit(Vec2::ZERO, &trail, 45, 2, 10.0));
        assert!(!trail_hit(Vec2::ZERO, &[], 0, 6, 10.0));
    }

    #[test]
    fn test_self_hit_radius() {
        assert!((self_hit_radius(35.0, 1.0, 0.38) - 13.3).abs() < 1e-4);
    }
}
