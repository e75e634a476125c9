//! Ribbon textures
//!
//! Textures are procedural 128×64 RGBA patterns built once at startup and
//! shared through a `TextureCache`. The GPU side uploads them lazily by id.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Width of every generated pattern (pixels)
pub const PATTERN_WIDTH: u32 = 128;
/// Height of every generated pattern (pixels)
pub const PATTERN_HEIGHT: u32 = 64;
/// Intrinsic ribbon width of the built-in textures (before thickness)
pub const BUILTIN_RENDER_WIDTH: f32 = 20.0;

pub const DEFAULT_TEXTURE_ID: &str = "tech-tape";
pub const ENEMY_TEXTURE_ID: &str = "enemy";

/// Procedural pattern kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    /// Horizontal band through the middle
    Stripe,
    /// Vertical bars every 8 pixels
    Weave,
    /// Slanted twisted-rope bands
    Rope,
    /// 16-pixel checkerboard
    Checker,
    /// Bold diagonal hazard stripes
    Diagonal,
}

impl Pattern {
    /// Whether the pixel centered at (`x`, `y`) takes the accent color
    fn is_accent(self, x: f32, y: f32) -> bool {
        let t = y / PATTERN_HEIGHT as f32;
        match self {
            Pattern::Stripe => (15.0..49.0).contains(&y),
            Pattern::Weave => x.rem_euclid(8.0) < 4.0,
            Pattern::Rope => (x - 20.0 * t).rem_euclid(40.0) < 20.0,
            Pattern::Checker => {
                let cell = (x / 16.0).floor() as i32 + (y / 16.0).floor() as i32;
                cell % 2 == 0
            }
            Pattern::Diagonal => (x + 20.0 * t - 32.0).rem_euclid(48.0) < 24.0,
        }
    }

    /// Render the pattern with a base and accent color (`0xRRGGBB`)
    pub fn render(self, base: u32, accent: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((PATTERN_WIDTH * PATTERN_HEIGHT * 4) as usize);
        for y in 0..PATTERN_HEIGHT {
            for x in 0..PATTERN_WIDTH {
                let color = if self.is_accent(x as f32 + 0.5, y as f32 + 0.5) {
                    accent
                } else {
                    base
                };
                pixels.extend_from_slice(&[
                    (color >> 16) as u8,
                    (color >> 8) as u8,
                    color as u8,
                    0xff,
                ]);
            }
        }
        pixels
    }
}

/// An immutable RGBA image plus the ribbon width it is drawn at
#[derive(Debug, Clone, PartialEq)]
pub struct TextureAsset {
    pub id: String,
    pub name: String,
    /// Row-major RGBA8
    pub pixels: Vec<u8>,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Intrinsic ribbon width before the thickness multiplier
    pub render_width: f32,
}

impl TextureAsset {
    /// Generate a built-in pattern texture
    pub fn procedural(id: &str, name: &str, pattern: Pattern, base: u32, accent: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            pixels: pattern.render(base, accent),
            pixel_width: PATTERN_WIDTH,
            pixel_height: PATTERN_HEIGHT,
            render_width: BUILTIN_RENDER_WIDTH,
        }
    }

    /// Texture u per unit of path distance at the given ribbon thickness,
    /// keeping the image's aspect ratio across the ribbon width
    pub fn u_per_distance(&self, thickness: f32) -> f32 {
        if thickness <= 0.0 {
            return 0.0;
        }
        self.pixel_height as f32 / (thickness * self.pixel_width as f32)
    }
}

/// The five selectable player textures
pub fn player_presets() -> Vec<TextureAsset> {
    vec![
        TextureAsset::procedural("tech-tape", "Easy Tape", Pattern::Stripe, 0x0f172a, 0x38bdf8),
        TextureAsset::procedural("eco-rope", "Eco Rope", Pattern::Rope, 0x78350f, 0xd97706),
        TextureAsset::procedural("sport-mesh", "Sport Mesh", Pattern::Weave, 0xbe123c, 0xfb7185),
        TextureAsset::procedural("luxe-jacquard", "Luxe Gold", Pattern::Checker, 0x1c1917, 0xfbbf24),
        TextureAsset::procedural("neon-safety", "Neon Safety", Pattern::Diagonal, 0x374151, 0xa3e635),
    ]
}

/// Texture shared by all rival ribbons
pub fn enemy_texture() -> TextureAsset {
    TextureAsset::procedural(ENEMY_TEXTURE_ID, "Rival", Pattern::Diagonal, 0x1a0000, 0xff0000)
}

/// Textures keyed by id
#[derive(Debug, Clone, Default)]
pub struct TextureCache {
    textures: HashMap<String, Arc<TextureAsset>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache holding every built-in texture
    pub fn with_builtins() -> Self {
        let mut cache = Self::new();
        for texture in player_presets() {
            cache.insert(texture);
        }
        cache.insert(enemy_texture());
        cache
    }

    /// Add or replace a texture
    pub fn insert(&mut self, texture: TextureAsset) -> Arc<TextureAsset> {
        let texture = Arc::new(texture);
        self.textures.insert(texture.id.clone(), texture.clone());
        texture
    }

    pub fn get(&self, id: &str) -> Option<&Arc<TextureAsset>> {
        self.textures.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.textures.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<TextureAsset>> {
        self.textures.values()
    }
}
