//! Frame building
//!
//! `render_frame` turns the simulation state into a `Frame`: a list of vertex
//! batches, each drawn with one texture (or none). It only reads the state,
//! so it can run at any rate relative to the simulation.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ribbon::{HeadStyle, RibbonStyle, draw_head, draw_ribbon};
use super::shapes;
use super::texture::{ENEMY_TEXTURE_ID, TextureCache};
use super::vertex::{Vertex, colors};
use crate::settings::{QualityPreset, Settings};
use crate::sim::{EntityKind, GameEntity, SimulationState};

/// Vertices sharing one texture binding
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBatch {
    /// Texture id, or `None` for flat-colored geometry
    pub texture: Option<String>,
    /// Triangle list in arena pixels
    pub vertices: Vec<Vertex>,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Arena size the vertex positions refer to
    pub viewport: Vec2,
    pub clear_color: [f32; 4],
    pub batches: Vec<DrawBatch>,
}

impl Frame {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            viewport,
            clear_color: colors::BACKGROUND,
            batches: Vec::new(),
        }
    }

    /// Append vertices, merging with the previous batch when the texture matches
    pub fn push(&mut self, texture: Option<&str>, vertices: Vec<Vertex>) {
        if vertices.is_empty() {
            return;
        }
        if let Some(last) = self.batches.last_mut() {
            if last.texture.as_deref() == texture {
                last.vertices.extend(vertices);
                return;
            }
        }
        self.batches.push(DrawBatch {
            texture: texture.map(str::to_string),
            vertices,
        });
    }

    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum()
    }

    /// Whether any batch samples `texture_id`
    pub fn uses_texture(&self, texture_id: &str) -> bool {
        self.batches
            .iter()
            .any(|b| b.texture.as_deref() == Some(texture_id))
    }
}

/// Presentation choices that don't live in the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct RenderView {
    pub player_texture: String,
    /// Thickness multiplier (applied to enemy ribbons; the player's width
    /// comes from the simulation so it matches collision)
    pub thickness: f32,
    pub quality: QualityPreset,
    /// Decorative animation on/off
    pub animate: bool,
}

impl RenderView {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            player_texture: settings.texture_id.clone(),
            thickness: settings.thickness,
            quality: settings.quality,
            animate: settings.animate_decorations(),
        }
    }
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Build the frame for `state` at host time `time` (seconds)
pub fn render_frame(
    state: &SimulationState,
    view: &RenderView,
    textures: &TextureCache,
    time: f64,
) -> Frame {
    let mut frame = Frame::new(state.arena);
    let tuning = &state.tuning;
    let scale = state.scale;
    let deco_time = if view.animate { time } else { 0.0 };
    let tongue_time = view.animate.then_some(time);

    for entity in &state.entities {
        frame.push(None, entity_vertices(entity, scale, deco_time));
    }

    let style = |thickness: f32| RibbonStyle {
        thickness,
        spacing: view.quality.mesh_spacing(),
        smoothing_iterations: view.quality.smoothing_iterations(),
        jump_threshold: tuning.ribbon_jump_threshold * scale,
        outline_extra: tuning.outline_extra_width,
        outline_alpha: tuning.outline_alpha,
    };

    if !state.enemies.is_empty() {
        if let Some(texture) = textures.get(ENEMY_TEXTURE_ID) {
            let enemy_style = style(texture.render_width * view.thickness * scale);
            for enemy in &state.enemies {
                draw_ribbon(&mut frame, &enemy.ribbon.path.to_vec(), texture, &enemy_style);
                draw_head(
                    &mut frame,
                    enemy.ribbon.head,
                    enemy.ribbon.direction,
                    HeadStyle::Enemy,
                    scale,
                    tuning.head_size,
                    tongue_time,
                );
            }
        }
    }

    if player_visible(state, time) {
        match textures.get(&view.player_texture) {
            Some(texture) if state.player.path.len() > 2 => {
                let path = state.player.path.to_vec();
                draw_ribbon(&mut frame, &path, texture, &style(state.ribbon_width * scale));
                draw_head(
                    &mut frame,
                    state.player.head,
                    state.player.direction,
                    HeadStyle::Player,
                    scale,
                    tuning.head_size,
                    tongue_time,
                );
            }
            _ => {}
        }
    }

    frame
}

/// Invincibility flicker: hidden on every other `flicker_interval` window
pub fn player_visible(state: &SimulationState, time: f64) -> bool {
    if !state.is_invincible() {
        return true;
    }
    let interval = f64::from(state.tuning.flicker_interval);
    if interval <= 0.0 {
        return true;
    }
    (time / interval).floor().rem_euclid(2.0) == 0.0
}

/// Kind-specific visuals for a collectible or hazard
fn entity_vertices(entity: &GameEntity, scale: f32, time: f64) -> Vec<Vertex> {
    let pos = entity.pos;
    let r = entity.radius;
    let ms = time * 1000.0;

    match entity.kind {
        EntityKind::Food { swirl_seed } => yarn_ball(pos, r, scale, swirl_seed),
        EntityKind::Bomb { spark_phase } => {
            let mut v = shapes::circle(pos, r, colors::BOMB_BODY, shapes::segments_for(r));
            v.extend(shapes::rect(
                pos + Vec2::new(0.0, -0.975 * r),
                Vec2::new(0.5 * r, 0.35 * r),
                0.0,
                colors::BOMB_CAP,
            ));
            let fuse_end = pos + Vec2::new(0.9 * r, -1.2 * r);
            let fuse = shapes::quadratic_points(
                pos + Vec2::new(0.0, -1.15 * r),
                pos + Vec2::new(0.6 * r, -1.5 * r),
                fuse_end,
                8,
            );
            v.extend(shapes::stroke(&fuse, 2.0 * scale, colors::BOMB_FUSE));
            let flicker = ((ms * 0.12) as f32 + spark_phase).sin();
            let spark = r * 0.3 * (1.0 + flicker * 0.25);
            v.extend(shapes::circle(fuse_end, spark, colors::BOMB_SPARK, 12));
            v.extend(shapes::circle(
                pos + Vec2::new(-0.35 * r, -0.35 * r),
                0.25 * r,
                colors::BOMB_HIGHLIGHT,
                12,
            ));
            v
        }
        EntityKind::Heart { pulse_phase } => {
            let pulse = 1.0 + ((ms / 250.0) as f32 + pulse_phase).sin() * 0.12;
            shapes::heart(pos, r * pulse, colors::HEART, 32)
        }
    }
}

/// Orange ball wrapped in six loose strands, stable per entity
fn yarn_ball(pos: Vec2, r: f32, scale: f32, seed: u32) -> Vec<Vertex> {
    let mut v = shapes::circle(pos, r, colors::YARN, shapes::segments_for(r));
    let mut rng = Pcg32::seed_from_u64(u64::from(seed));
    for _ in 0..6 {
        let radii = Vec2::new(rng.random::<f32>() * r, rng.random::<f32>() * r);
        let rotation = rng.random::<f32>() * std::f32::consts::PI;
        let rot = glam::Mat2::from_angle(rotation);
        let strand: Vec<Vec2> = (0..=24)
            .map(|i| {
                let theta = i as f32 / 24.0 * std::f32::consts::TAU;
                pos + rot * Vec2::new(radii.x * theta.cos(), radii.y * theta.sin())
            })
            .collect();
        v.extend(shapes::stroke(&strand, 1.2 * scale, colors::YARN_STRAND));
    }
    v
}
