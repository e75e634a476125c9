//! Data-driven game balance
//!
//! Every gameplay and presentation constant lives here so the simulation can
//! be driven with injected values in tests. Lengths are in arena pixels at
//! scale 1.0 and are multiplied by the display scale factor where noted.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which arena corner/edge a UI exclusion zone hugs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneAnchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomCenter,
}

/// A rectangle reserved for overlay UI; nothing spawns inside it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiZone {
    pub anchor: ZoneAnchor,
    pub width: f32,
    pub height: f32,
}

impl UiZone {
    pub const fn new(anchor: ZoneAnchor, width: f32, height: f32) -> Self {
        Self {
            anchor,
            width,
            height,
        }
    }

    /// Whether `point` falls inside this zone for an arena of `size`
    pub fn contains(&self, point: Vec2, size: Vec2) -> bool {
        let Vec2 { x, y } = point;
        match self.anchor {
            ZoneAnchor::TopLeft => x < self.width && y < self.height,
            ZoneAnchor::TopRight => x > size.x - self.width && y < self.height,
            ZoneAnchor::BottomLeft => x < self.width && y > size.y - self.height,
            ZoneAnchor::BottomCenter => {
                let half = self.width / 2.0;
                x > size.x / 2.0 - half && x < size.x / 2.0 + half && y > size.y - self.height
            }
        }
    }
}

/// Tunable constants for simulation, spawning and rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Display scale ===
    /// Arena dimension that maps to scale 1.0
    pub reference_dimension: f32,
    /// Lower bound on the display scale factor
    pub min_scale: f32,

    // === Player ===
    /// Forward speed (pixels/second at scale 1.0)
    pub base_speed: f32,
    /// Maximum heading change (radians/second)
    pub turn_rate: f32,
    /// Pointer steering stops inside this distance from the target
    pub steer_dead_zone: f32,
    /// Directional steering places the target this far ahead
    pub look_ahead: f32,
    /// Initial pointer target offset to the right of the head
    pub initial_target_offset: f32,
    /// Initial trail length (path samples)
    pub initial_length: usize,
    /// Spacing of the initial straight trail
    pub initial_spacing: f32,
    /// Trail growth per food item (path samples)
    pub length_per_food: usize,
    /// Score per food item
    pub score_per_food: u32,

    // === Entities ===
    pub food_count: usize,
    pub bomb_count: usize,
    pub heart_count: usize,
    pub food_radius: f32,
    pub bomb_radius: f32,
    pub heart_radius: f32,
    /// Added to the entity radius for pickup checks (scaled)
    pub pickup_margin: f32,

    // === Spawner ===
    /// Keep spawns this far from the arena edges
    pub spawn_margin: f32,
    /// Head safe radius as a fraction of each arena dimension
    pub spawn_safe_fraction: f32,
    /// Head safe radius cap (scaled)
    pub spawn_safe_radius: f32,
    /// Attempts before the head-distance constraint is dropped
    pub spawn_relax_after: u32,
    /// Attempts before the last candidate is accepted as-is
    pub spawn_max_attempts: u32,
    pub ui_zones: Vec<UiZone>,

    // === Damage ===
    /// Invincibility window after a hit (seconds)
    pub invincibility_secs: f32,
    /// Own-trail samples next to the head that never collide
    pub self_hit_skip: usize,
    /// Stride when scanning the own trail
    pub self_hit_stride: usize,
    /// Self collision radius as a fraction of the ribbon width
    pub self_hit_width_factor: f32,

    // === Enemies ===
    pub enemy_length: usize,
    pub enemy_speed_factor: f32,
    /// Expected random heading changes per second
    pub enemy_turn_rate: f32,
    /// Full range of a random heading change (radians)
    pub enemy_turn_jitter: f32,
    /// Collision radius against enemy bodies (scaled)
    pub enemy_hit_radius: f32,
    /// Stride when scanning enemy trails
    pub enemy_hit_stride: usize,

    // === Rendering ===
    /// Raw path jumps larger than this (scaled) split the ribbon
    pub ribbon_jump_threshold: f32,
    /// Width added to the dark outline under each ribbon
    pub outline_extra_width: f32,
    pub outline_alpha: f32,
    /// Player flicker half-period while invincible (seconds)
    pub flicker_interval: f32,
    /// Head ornament size (scaled)
    pub head_size: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            reference_dimension: 800.0,
            min_scale: 0.4,

            base_speed: 252.0,
            turn_rate: 9.6,
            steer_dead_zone: 10.0,
            look_ahead: 100.0,
            initial_target_offset: 120.0,
            initial_length: 30,
            initial_spacing: 5.0,
            length_per_food: 10,
            score_per_food: 10,

            food_count: 5,
            bomb_count: 3,
            heart_count: 1,
            food_radius: 16.0,
            bomb_radius: 18.0,
            heart_radius: 18.0,
            pickup_margin: 12.0,

            spawn_margin: 40.0,
            spawn_safe_fraction: 0.4,
            spawn_safe_radius: 180.0,
            spawn_relax_after: 30,
            spawn_max_attempts: 50,
            ui_zones: vec![
                // Score & hit points
                UiZone::new(ZoneAnchor::TopLeft, 220.0, 110.0),
                // Timer
                UiZone::new(ZoneAnchor::TopRight, 160.0, 110.0),
                // D-pad
                UiZone::new(ZoneAnchor::BottomLeft, 180.0, 180.0),
                // Texture bar
                UiZone::new(ZoneAnchor::BottomCenter, 500.0, 110.0),
            ],

            invincibility_secs: 2.2,
            self_hit_skip: 45,
            self_hit_stride: 2,
            self_hit_width_factor: 0.38,

            enemy_length: 75,
            enemy_speed_factor: 0.75,
            enemy_turn_rate: 2.4,
            enemy_turn_jitter: 1.8,
            enemy_hit_radius: 22.0,
            enemy_hit_stride: 6,

            ribbon_jump_threshold: 100.0,
            outline_extra_width: 2.0,
            outline_alpha: 0.5,
            flicker_interval: 0.12,
            head_size: 12.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse tuning if provided, falling back to defaults on any error
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(tuning)) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Invalid tuning ({}), using defaults", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Display scale factor for an arena, keeping gameplay feel consistent
    /// across sizes
    pub fn scale_for(&self, size: Vec2) -> f32 {
        (size.min_element() / self.reference_dimension).max(self.min_scale)
    }

    /// Whether a point lies in any reserved UI zone
    pub fn in_ui_zone(&self, point: Vec2, size: Vec2) -> bool {
        self.ui_zones.iter().any(|zone| zone.contains(point, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_factor_clamped() {
        let tuning = Tuning::default();
        assert!((tuning.scale_for(Vec2::new(1600.0, 800.0)) - 1.0).abs() < 1e-6);
        assert!((tuning.scale_for(Vec2::new(400.0, 1000.0)) - 0.5).abs() < 1e-6);
        assert!((tuning.scale_for(Vec2::new(100.0, 100.0)) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_ui_zones() {
        let tuning = Tuning::default();
        let size = Vec2::new(1280.0, 720.0);

        assert!(tuning.in_ui_zone(Vec2::new(50.0, 50.0), size)); // score
        assert!(tuning.in_ui_zone(Vec2::new(1200.0, 50.0), size)); // timer
        assert!(tuning.in_ui_zone(Vec2::new(50.0, 700.0), size)); // d-pad
        assert!(tuning.in_ui_zone(Vec2::new(640.0, 700.0), size)); // texture bar
        assert!(!tuning.in_ui_zone(Vec2::new(640.0, 360.0), size));
        assert!(!tuning.in_ui_zone(Vec2::new(1200.0, 700.0), size));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "base_speed": 300.0, "food_count": 2 }"#).unwrap();
        assert_eq!(tuning.base_speed, 300.0);
        assert_eq!(tuning.food_count, 2);
        assert_eq!(tuning.bomb_count, Tuning::default().bomb_count);
        assert_eq!(tuning.ui_zones.len(), 4);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        let tuning = Tuning::load_or_default(Some("{ not json"));
        assert_eq!(tuning, Tuning::default());
        assert_eq!(Tuning::load_or_default(None), Tuning::default());
    }
}
