//! Ribbon and head drawing
//!
//! A raw path is split where it wrapped across the arena, each run is smoothed
//! and meshed, then drawn twice: a dark translucent underlay slightly wider
//! than the ribbon, and the textured strip on top.

use glam::{Mat2, Vec2};

use super::scene::Frame;
use super::shapes;
use super::texture::TextureAsset;
use super::vertex::{Vertex, colors, with_alpha};
use crate::ribbon::{RibbonMeshBuilder, RibbonSlice, split_at_jumps};

/// How a ribbon is meshed and outlined
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RibbonStyle {
    /// Full ribbon width (pixels)
    pub thickness: f32,
    /// Arc-length spacing between mesh slices
    pub spacing: f32,
    pub smoothing_iterations: u32,
    /// Raw point jumps beyond this split the ribbon
    pub jump_threshold: f32,
    /// Outline is this much wider than the ribbon
    pub outline_extra: f32,
    pub outline_alpha: f32,
}

/// Which head ornaments to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadStyle {
    Player,
    Enemy,
}

/// Draw a ribbon into `frame`; nothing is drawn for degenerate paths
pub fn draw_ribbon(frame: &mut Frame, path: &[Vec2], texture: &TextureAsset, style: &RibbonStyle) {
    if path.len() < 2 || style.thickness <= 0.0 {
        return;
    }

    let builder = RibbonMeshBuilder::new(style.spacing, style.thickness)
        .with_smoothing(style.smoothing_iterations);
    let u_scale = texture.u_per_distance(style.thickness);
    let outline_color = with_alpha(colors::RIBBON_OUTLINE, style.outline_alpha);

    for run in split_at_jumps(path, style.jump_threshold) {
        let slices = builder.build(run);
        if slices.len() < 2 {
            continue;
        }

        frame.push(None, outline_strip(&slices, style.outline_extra / 2.0, outline_color));
        frame.push(Some(&texture.id), textured_strip(&slices, u_scale));
    }
}

/// Untextured strip widened by `grow` on each side, with round end caps
fn outline_strip(slices: &[RibbonSlice], grow: f32, color: [f32; 4]) -> Vec<Vertex> {
    let widen = |slice: &RibbonSlice| {
        let half = slice.half_width();
        if half <= f32::EPSILON {
            return (slice.left, slice.right);
        }
        let k = (half + grow) / half;
        (
            slice.center + (slice.left - slice.center) * k,
            slice.center + (slice.right - slice.center) * k,
        )
    };

    let mut vertices = Vec::with_capacity(slices.len() * 6);
    for pair in slices.windows(2) {
        let (a_left, a_right) = widen(&pair[0]);
        let (b_left, b_right) = widen(&pair[1]);
        vertices.extend(shapes::quad(a_left, a_right, b_right, b_left, color));
    }

    for end in [slices.first(), slices.last()].into_iter().flatten() {
        let radius = end.half_width() + grow;
        vertices.extend(shapes::circle(end.center, radius, color, shapes::segments_for(radius)));
    }

    vertices
}

/// Textured strip: u follows path distance, v spans left (0) to right (1)
fn textured_strip(slices: &[RibbonSlice], u_scale: f32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(slices.len() * 6);
    for pair in slices.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let (ua, ub) = (a.distance * u_scale, b.distance * u_scale);
        vertices.extend([
            Vertex::textured(a.left, ua, 0.0, 1.0),
            Vertex::textured(a.right, ua, 1.0, 1.0),
            Vertex::textured(b.right, ub, 1.0, 1.0),
            Vertex::textured(a.left, ua, 0.0, 1.0),
            Vertex::textured(b.right, ub, 1.0, 1.0),
            Vertex::textured(b.left, ub, 0.0, 1.0),
        ]);
    }
    vertices
}

/// Move locally-built head geometry to `origin`, rotated to `angle`
fn place(mut vertices: Vec<Vertex>, origin: Vec2, angle: f32) -> Vec<Vertex> {
    let rot = Mat2::from_angle(angle);
    for v in &mut vertices {
        let p = origin + rot * Vec2::from(v.position);
        v.position = p.into();
    }
    vertices
}

/// Tongue, eyes and (for rivals) horns, facing `direction`
///
/// `time` drives the periodic tongue flick; pass `None` to keep it hidden.
pub fn draw_head(
    frame: &mut Frame,
    head: Vec2,
    direction: Vec2,
    kind: HeadStyle,
    scale: f32,
    head_size: f32,
    time: Option<f64>,
) {
    let s = scale;
    let size = head_size * s;
    let mut local = Vec::new();

    if let Some(t) = time {
        let ms = t * 1000.0;
        if ms.rem_euclid(1000.0) / 1000.0 > 0.6 {
            let len = (0.5 + (ms * 0.05).sin() as f32 * 0.5) * size;
            let color = match kind {
                HeadStyle::Player => colors::PLAYER_TONGUE,
                HeadStyle::Enemy => colors::ENEMY_TONGUE,
            };
            let tip = Vec2::new(size + len, 0.0);
            let width = 2.0 * s;
            local.extend(shapes::stroke(&[Vec2::new(size, 0.0), tip], width, color));
            local.extend(shapes::stroke(&[tip, tip + Vec2::new(4.0, -3.0) * s], width, color));
            local.extend(shapes::stroke(&[tip, tip + Vec2::new(4.0, 3.0) * s], width, color));
        }
    }

    match kind {
        HeadStyle::Player => {
            for side in [-1.0, 1.0] {
                let eye = Vec2::new(4.0, 6.0 * side) * s;
                let pupil = Vec2::new(6.0, 6.0 * side) * s;
                local.extend(shapes::circle(eye, 5.0 * s, colors::EYE_WHITE, 16));
                local.extend(shapes::circle(pupil, 2.0 * s, colors::EYE_PUPIL, 12));
            }
        }
        HeadStyle::Enemy => {
            for side in [-1.0, 1.0] {
                let p = |x: f32, y: f32| Vec2::new(x, y * side) * s;
                local.extend(shapes::triangle(p(-2.0, 8.0), p(-8.0, 16.0), p(2.0, 10.0), colors::ENEMY_HORN));
                local.extend(shapes::ellipse(
                    p(6.0, 6.0),
                    Vec2::new(5.0, 2.5) * s,
                    side * std::f32::consts::FRAC_PI_6,
                    colors::ENEMY_EYE,
                    16,
                ));
                local.extend(shapes::circle(p(7.0, 6.0), 1.2 * s, colors::ENEMY_EYE_GLINT, 8));
            }
        }
    }

    frame.push(None, place(local, head, crate::heading_angle(direction)));
}
