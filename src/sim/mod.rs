//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (entities in spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{pickup_hit, self_hit_radius, trail_hit};
pub use level::LevelConfig;
pub use spawn::{find_spawn_point, spawn_entity};
pub use state::{
    DEFAULT_RIBBON_WIDTH, DamageSource, EnemyRibbon, EntityKind, EntityTag, GameEntity,
    GameEvent, GamePhase, Path, Ribbon, SimulationState,
};
pub use tick::{TickInput, tick};
