//! Game state and core simulation types
//!
//! Everything the per-step update reads or writes lives in `SimulationState`.
//! Renderers only ever borrow it immutably.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::LevelConfig;
use super::spawn::spawn_entity;
use crate::consts::MAX_HIT_POINTS;
use crate::tuning::Tuning;
use crate::wrap_position;

/// Ribbon width used for self-collision until a texture is selected
/// (intrinsic texture width 20 × default thickness 1.75)
pub const DEFAULT_RIBBON_WIDTH: f32 = 35.0;

/// Current phase of a level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Target score reached
    Won,
    /// Hit points ran out
    Lost,
    /// Countdown expired before the target was reached
    TimedOut,
}

impl GamePhase {
    /// Every phase except `Playing` is terminal for the attempt
    pub fn is_over(&self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// Plain entity kind, used for counting and replenishment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    Food,
    Bomb,
    Heart,
}

impl EntityTag {
    pub const ALL: [EntityTag; 3] = [EntityTag::Food, EntityTag::Bomb, EntityTag::Heart];
}

/// Entity kind with its render-only payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Yarn ball: +score, +length
    Food { swirl_seed: u32 },
    /// Damages unless invincible
    Bomb { spark_phase: f32 },
    /// +1 hit point (capped)
    Heart { pulse_phase: f32 },
}

impl EntityKind {
    pub fn tag(&self) -> EntityTag {
        match self {
            EntityKind::Food { .. } => EntityTag::Food,
            EntityKind::Bomb { .. } => EntityTag::Bomb,
            EntityKind::Heart { .. } => EntityTag::Heart,
        }
    }

    /// Fresh kind for `tag` with randomized animation payload
    pub fn random(tag: EntityTag, rng: &mut impl Rng) -> Self {
        match tag {
            EntityTag::Food => EntityKind::Food {
                swirl_seed: rng.random(),
            },
            EntityTag::Bomb => EntityKind::Bomb {
                spark_phase: rng.random::<f32>() * std::f32::consts::TAU,
            },
            EntityTag::Heart => EntityKind::Heart {
                pulse_phase: rng.random::<f32>() * std::f32::consts::TAU,
            },
        }
    }
}

/// A collectible or hazard sitting in the arena
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameEntity {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub kind: EntityKind,
}

/// Position history, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    points: VecDeque<Vec2>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from points ordered head-first
    pub fn from_points(points: Vec<Vec2>) -> Self {
        Self {
            points: points.into(),
        }
    }

    /// Record a new head position, evicting from the tail beyond `max_len`
    pub fn push_head(&mut self, point: Vec2, max_len: usize) {
        self.points.push_front(point);
        self.points.truncate(max_len);
    }

    /// Points from the head back to the tail
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, Vec2> {
        self.points.iter()
    }

    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.points.get(index).copied()
    }

    /// Contiguous head-first copy, for meshing
    pub fn to_vec(&self) -> Vec<Vec2> {
        self.points.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A moving ribbon: head, heading and trailing path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ribbon {
    pub head: Vec2,
    /// Unit heading vector
    pub direction: Vec2,
    pub path: Path,
    /// Steady-state path length (samples)
    pub target_length: usize,
}

impl Ribbon {
    /// Move forward, wrap around the arena and record the new head
    pub fn advance(&mut self, distance: f32, arena: Vec2) {
        self.head = wrap_position(self.head + self.direction * distance, arena);
        self.path.push_head(self.head, self.target_length);
    }
}

/// An AI-controlled rival
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyRibbon {
    pub id: u32,
    pub ribbon: Ribbon,
}

/// What hurt the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    Bomb,
    Enemy,
    SelfCollision,
}

/// Events emitted during a step, drained by the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Collected { kind: EntityTag, pos: Vec2 },
    ScoreChanged(u32),
    HitPointsChanged(u8),
    Damaged(DamageSource),
    PhaseChanged(GamePhase),
}

fn detached_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete state of one level attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    /// Seed for reproducibility
    pub seed: u64,
    /// Constants injected at construction
    #[serde(skip)]
    pub tuning: Tuning,
    pub level: LevelConfig,
    /// Arena size (logical pixels)
    pub arena: Vec2,
    /// Display scale factor derived from the arena size
    pub scale: f32,
    /// Player ribbon
    pub player: Ribbon,
    /// Absolute steering target (pointer/touch)
    pub steering_target: Vec2,
    /// Unscaled ribbon width (texture width × thickness)
    pub ribbon_width: f32,
    pub entities: Vec<GameEntity>,
    pub enemies: Vec<EnemyRibbon>,
    pub hit_points: u8,
    pub score: u32,
    /// Simulation clock (seconds)
    pub time: f64,
    pub time_ticks: u64,
    /// Damage is ignored while `time` is before this
    pub invincible_until: Option<f64>,
    pub phase: GamePhase,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    #[serde(skip, default = "detached_rng")]
    pub rng: Pcg32,
    next_id: u32,
}

impl SimulationState {
    /// Start a level attempt centered in `arena`
    pub fn new(tuning: Tuning, level: LevelConfig, arena: Vec2, seed: u64) -> Self {
        let scale = tuning.scale_for(arena);
        let center = arena / 2.0;

        let trail = (0..tuning.initial_length)
            .map(|i| center - Vec2::X * (i as f32 * tuning.initial_spacing))
            .collect();
        let player = Ribbon {
            head: center,
            direction: Vec2::X,
            path: Path::from_points(trail),
            target_length: tuning.initial_length,
        };
        let steering_target = center + Vec2::X * tuning.initial_target_offset;

        let mut state = Self {
            seed,
            tuning,
            level,
            arena,
            scale,
            player,
            steering_target,
            ribbon_width: DEFAULT_RIBBON_WIDTH,
            entities: Vec::new(),
            enemies: Vec::new(),
            hit_points: MAX_HIT_POINTS,
            score: 0,
            time: 0.0,
            time_ticks: 0,
            invincible_until: None,
            phase: GamePhase::Playing,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        let counts = [
            (EntityTag::Food, state.tuning.food_count),
            (EntityTag::Bomb, state.tuning.bomb_count),
            (EntityTag::Heart, state.tuning.heart_count),
        ];
        for (tag, count) in counts {
            for _ in 0..count {
                spawn_entity(&mut state, tag);
            }
        }

        for i in 0..level.enemy_count {
            state.spawn_enemy(i);
        }

        log::info!(
            "Level {} started: arena {}x{}, scale {:.2}, {} enemies",
            level.id,
            arena.x,
            arena.y,
            scale,
            level.enemy_count
        );

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn spawn_enemy(&mut self, index: u32) {
        let start = Vec2::new(
            self.rng.random::<f32>() * self.arena.x,
            self.rng.random::<f32>() * self.arena.y,
        );
        let angle = index as f32;
        let length = self.tuning.enemy_length;
        let id = self.next_entity_id();
        self.enemies.push(EnemyRibbon {
            id,
            ribbon: Ribbon {
                head: start,
                direction: Vec2::new(angle.cos(), angle.sin()),
                path: Path::from_points(vec![start; length]),
                target_length: length,
            },
        });
    }

    /// Number of active entities of a kind
    pub fn count_of(&self, tag: EntityTag) -> usize {
        self.entities
            .iter()
            .filter(|e| e.kind.tag() == tag)
            .count()
    }

    /// Whether damage is currently ignored
    pub fn is_invincible(&self) -> bool {
        self.invincible_until.is_some_and(|until| self.time < until)
    }

    /// Lose a hit point unless invincible; returns whether damage was taken
    pub fn apply_damage(&mut self, source: DamageSource) -> bool {
        if self.phase.is_over() || self.is_invincible() {
            return false;
        }

        self.hit_points = self.hit_points.saturating_sub(1);
        self.invincible_until = Some(self.time + f64::from(self.tuning.invincibility_secs));
        self.events.push(GameEvent::Damaged(source));
        self.events.push(GameEvent::HitPointsChanged(self.hit_points));
        log::debug!("Damaged by {:?}, {} HP left", source, self.hit_points);

        if self.hit_points == 0 {
            self.set_phase(GamePhase::Lost);
        }
        true
    }

    /// Gain a hit point, capped at the maximum
    pub fn heal(&mut self) {
        if self.hit_points < MAX_HIT_POINTS {
            self.hit_points += 1;
            self.events.push(GameEvent::HitPointsChanged(self.hit_points));
        }
    }

    /// Transition to a new phase, emitting an event on change
    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?} (score {})", self.phase, phase, self.score);
            self.phase = phase;
            self.events.push(GameEvent::PhaseChanged(phase));
        }
    }

    /// Countdown ran out
    pub fn expire(&mut self) {
        if self.phase == GamePhase::Playing {
            self.set_phase(GamePhase::TimedOut);
        }
    }

    /// Viewport changed mid-attempt: keep positions, recompute the scale
    pub fn resize(&mut self, arena: Vec2) {
        self.arena = arena;
        self.scale = self.tuning.scale_for(arena);
    }

    /// Change the unscaled ribbon width (texture or thickness change)
    pub fn set_ribbon_width(&mut self, width: f32) {
        self.ribbon_width = width.max(0.0);
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
