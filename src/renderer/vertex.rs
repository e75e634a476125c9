//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// 2D vertex with texture coordinate and tint color
///
/// Untextured geometry samples a 1×1 white texture, so the tint alone
/// decides its color.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [0.0, 0.0],
            color,
        }
    }

    /// Textured vertex with a white tint scaled by `alpha`
    pub fn textured(pos: Vec2, u: f32, v: f32, alpha: f32) -> Self {
        Self {
            position: [pos.x, pos.y],
            uv: [u, v],
            color: [1.0, 1.0, 1.0, alpha],
        }
    }

    #[inline]
    pub fn at(pos: Vec2, color: [f32; 4]) -> Self {
        Self::new(pos.x, pos.y, color)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: (2 * std::mem::size_of::<[f32; 2]>()) as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// `0xRRGGBB` to linear-ish RGBA floats
pub const fn hex(rgb: u32, alpha: f32) -> [f32; 4] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        alpha,
    ]
}

/// Same color with a different alpha
#[inline]
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

/// Colors for game elements
pub mod colors {
    use super::hex;

    pub const BACKGROUND: [f32; 4] = hex(0x020617, 1.0);
    pub const RIBBON_OUTLINE: [f32; 4] = hex(0x0f172a, 1.0);

    pub const YARN: [f32; 4] = hex(0xf59e0b, 1.0);
    pub const YARN_STRAND: [f32; 4] = hex(0xfcd34d, 1.0);

    pub const BOMB_BODY: [f32; 4] = hex(0xef4444, 1.0);
    pub const BOMB_CAP: [f32; 4] = hex(0x1e293b, 1.0);
    pub const BOMB_FUSE: [f32; 4] = hex(0x78350f, 1.0);
    pub const BOMB_SPARK: [f32; 4] = hex(0xfbbf24, 1.0);
    pub const BOMB_HIGHLIGHT: [f32; 4] = [1.0, 1.0, 1.0, 0.25];

    pub const HEART: [f32; 4] = hex(0xec4899, 1.0);

    pub const EYE_WHITE: [f32; 4] = hex(0xffffff, 1.0);
    pub const EYE_PUPIL: [f32; 4] = hex(0x000000, 1.0);
    pub const PLAYER_TONGUE: [f32; 4] = hex(0xfb7185, 1.0);
    pub const ENEMY_TONGUE: [f32; 4] = hex(0x000000, 1.0);

    pub const ENEMY_HORN: [f32; 4] = hex(0x000000, 1.0);
    pub const ENEMY_EYE: [f32; 4] = hex(0xff0000, 1.0);
    pub const ENEMY_EYE_GLINT: [f32; 4] = hex(0xffcccc, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(hex(0xff0000, 1.0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(hex(0x00ff00, 0.5), [0.0, 1.0, 0.0, 0.5]);
    }

    #[test]
    fn test_vertex_layout_size() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }
}
