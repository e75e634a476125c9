//! Ribbon Snake - steer a growing, texture-mapped ribbon around the arena
//!
//! Core modules:
//! - `ribbon`: Curve smoothing, arc-length sampling and miter-joint ribbon meshes
//! - `sim`: Deterministic simulation (steering, pickups, hazards, game state)
//! - `renderer`: Frame building and the WebGPU pipeline
//! - `platform`: Input normalization and countdown timing
//! - `session`: Intent queue, fixed-step driver and outbound events
//! - `tuning`: Data-driven game balance

pub mod platform;
pub mod renderer;
pub mod ribbon;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::{GameOverReason, Intent, Session, SessionEvent};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one step per 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Hit points at the start of every level (also the cap)
    pub const MAX_HIT_POINTS: u8 = 5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Heading angle of a direction vector
#[inline]
pub fn heading_angle(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}

/// Unit vector for a heading angle
#[inline]
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Rotate `current` toward `target` by at most `max_step` radians
pub fn turn_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let diff = normalize_angle(target - current);
    current + diff.signum() * diff.abs().min(max_step)
}

/// Toroidal wrap: leaving one edge re-enters from the opposite one
#[inline]
pub fn wrap_position(mut pos: Vec2, size: Vec2) -> Vec2 {
    if pos.x < 0.0 {
        pos.x = size.x;
    }
    if pos.x > size.x {
        pos.x = 0.0;
    }
    if pos.y < 0.0 {
        pos.y = size.y;
    }
    if pos.y > size.y {
        pos.y = 0.0;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_turn_toward_clamps_step() {
        let next = turn_toward(0.0, PI / 2.0, 0.16);
        assert!((next - 0.16).abs() < 1e-6);

        // Small differences are reached exactly
        let next = turn_toward(0.0, 0.05, 0.16);
        assert!((next - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_turn_toward_takes_short_way_round() {
        // From just below +π to just above -π: turn positive through the seam
        let next = turn_toward(PI - 0.1, -PI + 0.1, 0.16);
        assert!(next > PI - 0.1);
    }

    #[test]
    fn test_wrap_position() {
        let size = Vec2::new(100.0, 50.0);
        assert_eq!(wrap_position(Vec2::new(101.0, 10.0), size), Vec2::new(0.0, 10.0));
        assert_eq!(wrap_position(Vec2::new(-1.0, 10.0), size), Vec2::new(100.0, 10.0));
        assert_eq!(wrap_position(Vec2::new(5.0, 51.0), size), Vec2::new(5.0, 0.0));
        assert_eq!(wrap_position(Vec2::new(5.0, -0.5), size), Vec2::new(5.0, 50.0));
        assert_eq!(wrap_position(Vec2::new(5.0, 5.0), size), Vec2::new(5.0, 5.0));
    }
}
