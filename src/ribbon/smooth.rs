//! Chaikin curve smoothing

use glam::Vec2;

/// Default number of corner-cutting passes
pub const DEFAULT_ITERATIONS: u32 = 3;

/// Smooth a polyline by iterative corner cutting.
///
/// Every pass keeps the first point, replaces each segment `(p0, p1)` with the
/// points at 1/4 and 3/4 along it, then keeps the last point. Endpoints are
/// therefore preserved exactly. Inputs with fewer than 3 points come back
/// unchanged.
pub fn smooth(points: &[Vec2], iterations: u32) -> Vec<Vec2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut smoothed = points.to_vec();

    for _ in 0..iterations {
        let mut next = Vec::with_capacity(smoothed.len() * 2);
        next.push(smoothed[0]);

        for pair in smoothed.windows(2) {
            let (p0, p1) = (pair[0], pair[1]);
            next.push(p0 * 0.75 + p1 * 0.25);
            next.push(p0 * 0.25 + p1 * 0.75);
        }

        next.push(smoothed[smoothed.len() - 1]);
        smoothed = next;
    }

    smoothed
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_smooth_degenerate_passthrough() {
        let two = [Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)];
        assert_eq!(smooth(&two, 3), two.to_vec());
        assert!(smooth(&[], 3).is_empty());
    }

    #[test]
    fn test_smooth_point_count() {
        let points = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
        // n -> 2n per pass
        assert_eq!(smooth(&points, 1).len(), 6);
        assert_eq!(smooth(&points, 2).len(), 12);
        assert_eq!(smooth(&points, 0).len(), 3);
    }

    #[test]
    fn test_smooth_cuts_corner() {
        let points = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
        let once = smooth(&points, 1);
        assert_eq!(once[1], Vec2::new(2.5, 0.0));
        assert_eq!(once[2], Vec2::new(7.5, 0.0));
        assert_eq!(once[3], Vec2::new(10.0, 2.5));
        // The corner itself is gone
        assert!(!once.contains(&Vec2::new(10.0, 0.0)));
    }

    proptest! {
        #[test]
        fn prop_smooth_preserves_endpoints(
            raw in prop::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 3..40),
            iterations in 0u32..5,
        ) {
            let points: Vec<Vec2> = raw.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
            let out = smooth(&points, iterations);
            prop_assert_eq!(out[0], points[0]);
            prop_assert_eq!(out[out.len() - 1], points[points.len() - 1]);
        }
    }
}
