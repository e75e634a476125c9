//! Ribbon geometry
//!
//! Turns a raw, noisy polyline into a constant-width strip ready for texturing:
//! - `smooth`: Chaikin corner cutting
//! - `sample`: fixed arc-length resampling with distance tags for texture continuity
//! - `mesh`: miter-joint left/right edges with spike clamping
//!
//! Everything here is pure: output depends only on the inputs.

pub mod mesh;
pub mod sample;
pub mod smooth;

pub use mesh::{MAX_MITER_SCALE, MIN_MITER_DOT, RibbonMeshBuilder, RibbonSlice, build_slices};
pub use sample::{PathSample, sample_path, sample_path_from};
pub use smooth::{DEFAULT_ITERATIONS, smooth};

use glam::Vec2;

/// Split a raw path wherever two consecutive points jump further than
/// `threshold` on either axis (the ribbon wrapped across an arena edge).
///
/// Only runs of at least two points are returned.
pub fn split_at_jumps(points: &[Vec2], threshold: f32) -> Vec<&[Vec2]> {
    let mut runs = Vec::new();
    let mut start = 0;

    for i in 1..points.len() {
        let delta = (points[i] - points[i - 1]).abs();
        if delta.x > threshold || delta.y > threshold {
            if i - start >= 2 {
                runs.push(&points[start..i]);
            }
            start = i;
        }
    }
    if points.len() - start >= 2 {
        runs.push(&points[start..]);
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_at_jumps_wrap() {
        // Ribbon crossing the right edge of a 100-wide arena
        let points = [
            Vec2::new(2.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(98.0, 10.0),
            Vec2::new(96.0, 10.0),
            Vec2::new(94.0, 10.0),
        ];
        let runs = split_at_jumps(&points, 50.0);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 2);
        assert_eq!(runs[1].len(), 3);
    }

    #[test]
    fn test_split_at_jumps_drops_single_points() {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(200.0, 0.0),
            Vec2::new(202.0, 0.0),
            Vec2::new(0.0, 300.0),
        ];
        let runs = split_at_jumps(&points, 50.0);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0], &points[1..3]);
    }

    #[test]
    fn test_split_at_jumps_empty() {
        assert!(split_at_jumps(&[], 10.0).is_empty());
        assert!(split_at_jumps(&[Vec2::ZERO], 10.0).is_empty());
    }
}
