//! Miter-joint ribbon mesh
//!
//! For each sampled centerline point the ribbon edge is offset along the
//! miter line (the normal of the averaged incoming/outgoing direction). The
//! offset is stretched by `1 / dot(miter_normal, segment_normal)` so the
//! perpendicular width stays constant through turns.

use glam::Vec2;

use super::sample::{PathSample, sample_path_from};
use super::smooth::{DEFAULT_ITERATIONS, smooth};
use crate::heading_angle;

/// Below this |dot| the miter is considered degenerate and the unscaled
/// half-width is used
pub const MIN_MITER_DOT: f32 = 0.1;
/// Upper bound on the miter offset, as a multiple of the half-width
pub const MAX_MITER_SCALE: f32 = 5.0;

/// One cross-section of the ribbon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RibbonSlice {
    pub center: Vec2,
    pub left: Vec2,
    pub right: Vec2,
    /// Direction of the ribbon at this slice (radians)
    pub angle: f32,
    /// Cumulative distance along the path (texture u source)
    pub distance: f32,
}

impl RibbonSlice {
    /// Distance from the center to either edge
    #[inline]
    pub fn half_width(&self) -> f32 {
        (self.left - self.center).length()
    }
}

/// Build ribbon slices from pre-sampled centerline points.
///
/// Fewer than two samples produce an empty mesh (nothing to draw).
pub fn build_slices(samples: &[PathSample], thickness: f32) -> Vec<RibbonSlice> {
    if samples.len() < 2 {
        return Vec::new();
    }

    let half = thickness / 2.0;
    let last = samples.len() - 1;

    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let (angle, offset) = if i > 0 && i < last {
                miter_joint(samples[i - 1].point, sample.point, samples[i + 1].point, half)
                    .unwrap_or((sample.angle, half))
            } else {
                // Endpoints use the raw segment direction
                (sample.angle, half)
            };

            let normal = Vec2::new(-angle.sin(), angle.cos());
            RibbonSlice {
                center: sample.point,
                left: sample.point + normal * offset,
                right: sample.point - normal * offset,
                angle,
                distance: sample.distance,
            }
        })
        .collect()
}

/// Miter angle and signed edge offset at `point`.
///
/// Returns `None` when the incoming and outgoing directions cancel out
/// (an exact reversal), leaving the caller to fall back to the segment angle.
fn miter_joint(prev: Vec2, point: Vec2, next: Vec2, half: f32) -> Option<(f32, f32)> {
    let incoming = (point - prev).normalize_or_zero();
    let outgoing = (next - point).normalize_or_zero();

    let tangent = incoming + outgoing;
    if tangent.length_squared() < 1e-12 {
        return None;
    }
    let angle = heading_angle(tangent);

    let miter_normal = Vec2::new(-angle.sin(), angle.cos());
    let segment_normal = incoming.perp();
    let dot = miter_normal.dot(segment_normal);

    let mut offset = half;
    if dot.abs() > MIN_MITER_DOT {
        offset = half / dot;
    }
    let limit = half.abs() * MAX_MITER_SCALE;
    Some((angle, offset.clamp(-limit, limit)))
}

/// Smooth, resample and mesh a raw path in one go
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RibbonMeshBuilder {
    /// Arc-length spacing between slices
    pub spacing: f32,
    /// Full ribbon width
    pub thickness: f32,
    /// Chaikin passes applied before sampling
    pub smoothing_iterations: u32,
}

impl RibbonMeshBuilder {
    pub fn new(spacing: f32, thickness: f32) -> Self {
        Self {
            spacing,
            thickness,
            smoothing_iterations: DEFAULT_ITERATIONS,
        }
    }

    pub fn with_smoothing(mut self, iterations: u32) -> Self {
        self.smoothing_iterations = iterations;
        self
    }

    /// Build the mesh for `raw`, distances starting at 0
    pub fn build(&self, raw: &[Vec2]) -> Vec<RibbonSlice> {
        self.build_from(raw, 0.0)
    }

    /// Build the mesh for `raw`, distances starting at `start_distance`
    pub fn build_from(&self, raw: &[Vec2], start_distance: f32) -> Vec<RibbonSlice> {
        let smoothed = smooth(raw, self.smoothing_iterations);
        let samples = sample_path_from(&smoothed, self.spacing, start_distance);
        build_slices(&samples, self.thickness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ribbon::sample_path;
    use proptest::prelude::*;
    use std::f32::consts::SQRT_2;

    #[test]
    fn test_straight_ribbon_keeps_width() {
        let points = [Vec2::new(10.0, 10.0), Vec2::new(110.0, 60.0)];
        let slices = build_slices(&sample_path(&points, 1.5), 20.0);

        assert!(slices.len() > 2);
        for slice in &slices {
            let width = (slice.left - slice.right).length();
            assert!((width - 20.0).abs() < 1e-3, "width {width}");
            // Edges are perpendicular to the direction of travel
            let dir = Vec2::new(100.0, 50.0).normalize();
            assert!((slice.left - slice.right).normalize().dot(dir).abs() < 1e-4);
        }
    }

    #[test]
    fn test_right_angle_miter() {
        let points = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
        let slices = build_slices(&sample_path(&points, 1.0), 4.0);

        let corner = slices
            .iter()
            .find(|s| (s.center - Vec2::new(10.0, 0.0)).length() < 1e-4)
            .expect("corner sample");
        assert!((corner.half_width() - 2.0 * SQRT_2).abs() < 1e-3);
        assert!((corner.angle - std::f32::consts::FRAC_PI_4).abs() < 1e-4);
    }

    #[test]
    fn test_exact_reversal_falls_back_to_half_width() {
        let points = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::ZERO];
        let slices = build_slices(&sample_path(&points, 1.0), 6.0);
        for slice in &slices {
            assert!((slice.half_width() - 3.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_near_reversal_spike_is_clamped() {
        let points = [Vec2::ZERO, Vec2::new(50.0, 0.0), Vec2::new(0.0, 2.0)];
        let builder = RibbonMeshBuilder::new(1.5, 10.0);
        let slices = builder.build(&points);

        assert!(!slices.is_empty());
        for slice in &slices {
            assert!(slice.half_width() <= 10.0 / 2.0 * MAX_MITER_SCALE + 1e-3);
        }
    }

    #[test]
    fn test_too_few_samples_is_empty() {
        assert!(build_slices(&[], 10.0).is_empty());
        let one = sample_path(&[Vec2::ZERO, Vec2::new(0.5, 0.0)], 1.0);
        assert_eq!(one.len(), 1);
        assert!(build_slices(&one, 10.0).is_empty());
        assert!(RibbonMeshBuilder::new(1.5, 10.0).build(&[Vec2::ZERO]).is_empty());
    }

    #[test]
    fn test_builder_distances_start_offset() {
        let points = [Vec2::ZERO, Vec2::new(10.0, 0.0)];
        let slices = RibbonMeshBuilder::new(2.0, 4.0).build_from(&points, 100.0);
        assert_eq!(slices[0].distance, 100.0);
        assert!((slices[1].distance - 102.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_offset_never_exceeds_clamp(
            raw in prop::collection::vec((-200.0f32..200.0, -200.0f32..200.0), 2..20),
            thickness in 1.0f32..60.0,
        ) {
            let points: Vec<Vec2> = raw.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
            let slices = RibbonMeshBuilder::new(1.5, thickness).build(&points);
            let limit = thickness / 2.0 * MAX_MITER_SCALE;
            for slice in &slices {
                prop_assert!(slice.half_width() <= limit * 1.0001 + 1e-3);
            }
        }
    }
}
