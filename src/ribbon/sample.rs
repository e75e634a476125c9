//! Fixed arc-length resampling
//!
//! Each sample carries the cumulative distance walked along the path, which
//! becomes the texture u-coordinate so the pattern flows along the ribbon
//! instead of stretching with segment length.

use glam::Vec2;

use crate::heading_angle;

/// A point on the resampled path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub point: Vec2,
    /// Heading of the segment the sample lies on (radians)
    pub angle: f32,
    /// Cumulative distance along the path
    pub distance: f32,
}

/// Resample `points` every `spacing` units of arc length, starting at distance 0
pub fn sample_path(points: &[Vec2], spacing: f32) -> Vec<PathSample> {
    sample_path_from(points, spacing, 0.0)
}

/// Resample `points` every `spacing` units of arc length.
///
/// The first sample is `points[0]` tagged with `start_distance`; every
/// following sample is tagged with the previous distance plus `spacing`.
/// Zero-length segments are skipped. Fewer than two points, or a
/// non-positive spacing, produce no samples.
pub fn sample_path_from(points: &[Vec2], spacing: f32, start_distance: f32) -> Vec<PathSample> {
    if points.len() < 2 || spacing <= 0.0 || spacing.is_nan() {
        return Vec::new();
    }

    let mut result = vec![PathSample {
        point: points[0],
        angle: heading_angle(points[1] - points[0]),
        distance: start_distance,
    }];

    let mut walked = 0.0_f32;
    let mut distance = start_distance;

    for pair in points.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        let delta = p2 - p1;
        let len = delta.length();
        if len <= 0.0 {
            continue;
        }

        let angle = heading_angle(delta);

        // Distance into this segment of the next sample
        let mut along = spacing - walked % spacing;
        if along <= 0.0 {
            along = spacing;
        }

        while along <= len {
            distance += spacing;
            result.push(PathSample {
                point: p1 + delta * (along / len),
                angle,
                distance,
            });
            along += spacing;
        }

        walked += len;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_sample_straight_line() {
        let points = [Vec2::ZERO, Vec2::new(10.0, 0.0)];
        let samples = sample_path(&points, 2.5);

        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0].point, Vec2::ZERO);
        assert_eq!(samples[0].distance, 0.0);
        assert!((samples[4].point.x - 10.0).abs() < 1e-4);
        assert!((samples[4].distance - 10.0).abs() < 1e-4);
        assert!(samples.iter().all(|s| s.angle.abs() < 1e-6));
    }

    #[test]
    fn test_sample_continues_across_corner() {
        // 3 units along x, then 3 units along y; spacing 2 lands at (2,0) and (3,1)
        let points = [Vec2::ZERO, Vec2::new(3.0, 0.0), Vec2::new(3.0, 3.0)];
        let samples = sample_path(&points, 2.0);

        assert_eq!(samples.len(), 4);
        assert!((samples[1].point - Vec2::new(2.0, 0.0)).length() < 1e-4);
        assert!((samples[2].point - Vec2::new(3.0, 1.0)).length() < 1e-4);
        assert!((samples[2].angle - FRAC_PI_2).abs() < 1e-5);
        assert!((samples[3].point - Vec2::new(3.0, 3.0)).length() < 1e-4);
    }

    #[test]
    fn test_sample_skips_zero_length_segments() {
        let points = [
            Vec2::ZERO,
            Vec2::ZERO,
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 0.0),
        ];
        let samples = sample_path(&points, 1.0);
        assert_eq!(samples.len(), 5);
        assert!(samples.iter().all(|s| s.point.y == 0.0));
    }

    #[test]
    fn test_sample_degenerate_inputs() {
        assert!(sample_path(&[], 1.0).is_empty());
        assert!(sample_path(&[Vec2::ONE], 1.0).is_empty());
        assert!(sample_path(&[Vec2::ZERO, Vec2::ONE], 0.0).is_empty());
        assert!(sample_path(&[Vec2::ZERO, Vec2::ONE], -1.0).is_empty());
    }

    #[test]
    fn test_sample_start_distance_offsets_tags() {
        let points = [Vec2::ZERO, Vec2::new(6.0, 0.0)];
        let samples = sample_path_from(&points, 3.0, 42.0);
        let distances: Vec<f32> = samples.iter().map(|s| s.distance).collect();
        assert_eq!(distances, vec![42.0, 45.0, 48.0]);
    }

    proptest! {
        #[test]
        fn prop_sample_distances_step_by_spacing(
            raw in prop::collection::vec((-300.0f32..300.0, -300.0f32..300.0), 2..25),
            spacing in 0.5f32..20.0,
        ) {
            let points: Vec<Vec2> = raw.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
            let samples = sample_path(&points, spacing);
            prop_assert!(!samples.is_empty());
            prop_assert_eq!(samples[0].distance, 0.0);
            for pair in samples.windows(2) {
                let step = pair[1].distance - pair[0].distance;
                prop_assert!(step >= 0.0);
                prop_assert!((step - spacing).abs() <= 1e-3 * spacing.max(1.0) + pair[1].distance * 1e-5);
            }
        }
    }
}
