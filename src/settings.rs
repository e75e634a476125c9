//! Player settings and preferences
//!
//! Chosen by the player at runtime, separate from tuning. Lives only as long
//! as the session.

use serde::{Deserialize, Serialize};

/// Default ribbon thickness multiplier
pub const DEFAULT_THICKNESS: f32 = 1.75;
/// Allowed thickness multiplier range
pub const THICKNESS_RANGE: (f32, f32) = (0.5, 4.0);

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Chaikin passes applied to ribbon paths
    pub fn smoothing_iterations(&self) -> u32 {
        match self {
            QualityPreset::Low => 1,
            QualityPreset::Medium => 2,
            QualityPreset::High => 3,
        }
    }

    /// Arc-length distance between ribbon mesh slices
    pub fn mesh_spacing(&self) -> f32 {
        match self {
            QualityPreset::Low => 4.0,
            QualityPreset::Medium => 2.5,
            QualityPreset::High => 1.5,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Ribbon thickness multiplier
    pub thickness: f32,
    /// Selected player texture
    pub texture_id: String,
    /// Freeze decorative pulsing (invincibility flicker is kept)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::default(),
            thickness: DEFAULT_THICKNESS,
            texture_id: crate::renderer::texture::DEFAULT_TEXTURE_ID.to_string(),
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Set the thickness multiplier, clamped to the allowed range
    pub fn set_thickness(&mut self, thickness: f32) {
        self.thickness = clamp_thickness(thickness);
    }

    /// Unscaled ribbon width for a texture of `intrinsic_width`
    pub fn ribbon_width(&self, intrinsic_width: f32) -> f32 {
        intrinsic_width * clamp_thickness(self.thickness)
    }

    /// Whether decorative animation (pulses, sparks, tongue) runs
    pub fn animate_decorations(&self) -> bool {
        !self.reduced_motion
    }
}

fn clamp_thickness(thickness: f32) -> f32 {
    if thickness.is_finite() {
        thickness.clamp(THICKNESS_RANGE.0, THICKNESS_RANGE.1)
    } else {
        DEFAULT_THICKNESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thickness_clamped() {
        let mut settings = Settings::default();
        settings.set_thickness(10.0);
        assert_eq!(settings.thickness, 4.0);
        settings.set_thickness(0.1);
        assert_eq!(settings.thickness, 0.5);
        settings.set_thickness(f32::NAN);
        assert_eq!(settings.thickness, DEFAULT_THICKNESS);
    }

    #[test]
    fn test_default_ribbon_width() {
        let settings = Settings::default();
        assert!((settings.ribbon_width(20.0) - 35.0).abs() < 1e-5);
    }

    #[test]
    fn test_quality_presets() {
        assert_eq!(QualityPreset::default().smoothing_iterations(), 3);
        assert_eq!(QualityPreset::default().mesh_spacing(), 1.5);
        assert_eq!(QualityPreset::parse("LOW"), Some(QualityPreset::Low));
        assert!(QualityPreset::Low.mesh_spacing() > QualityPreset::High.mesh_spacing());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "reduced_motion": true }"#).unwrap();
        assert!(settings.reduced_motion);
        assert!(!settings.animate_decorations());
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.texture_id, "tech-tape");
    }
}
