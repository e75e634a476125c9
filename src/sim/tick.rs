//! Fixed timestep simulation tick
//!
//! One step: steer, move and record the head, move enemies, resolve pickups,
//! then resolve hazards. Winning ends the step before hazards are checked.

use glam::Vec2;
use rand::Rng;

use super::collision::{pickup_hit, self_hit_radius, trail_hit};
use super::spawn::spawn_entity;
use super::state::{DamageSource, EntityKind, GameEvent, GamePhase, SimulationState};
use crate::{heading_angle, heading_vector, turn_toward};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Absolute steering target (mouse/touch position in arena pixels)
    pub pointer_target: Option<Vec2>,
    /// Held directional input (keyboard/D-pad); takes priority over the pointer
    pub direction: Option<Vec2>,
    /// Demo mode - AI steers toward the nearest yarn ball
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut SimulationState, input: &TickInput, dt: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    state.time += f64::from(dt);

    let mut input = input.clone();
    if input.autopilot {
        input.direction = None;
        input.pointer_target = nearest_food(state).or(input.pointer_target);
    }

    steer(state, &input, dt);

    let speed = state.tuning.base_speed * state.scale * dt;
    state.player.advance(speed, state.arena);

    move_enemies(state, speed * state.tuning.enemy_speed_factor, dt);

    if resolve_pickups(state) {
        return;
    }

    resolve_hazards(state);
}

/// Rotate the player's heading toward the active steering input
fn steer(state: &mut SimulationState, input: &TickInput, dt: f32) {
    let max_turn = state.tuning.turn_rate * dt;
    let player = &mut state.player;

    if let Some(dir) = input.direction {
        // A zero vector holds the current heading
        if dir.length_squared() > 0.0 {
            let angle = turn_toward(heading_angle(player.direction), heading_angle(dir), max_turn);
            player.direction = heading_vector(angle);
        }
        state.steering_target = player.head + player.direction * state.tuning.look_ahead;
        return;
    }

    if let Some(target) = input.pointer_target {
        state.steering_target = target;
    }

    let to_target = state.steering_target - player.head;
    if to_target.length() > state.tuning.steer_dead_zone {
        let angle = turn_toward(
            heading_angle(player.direction),
            heading_angle(to_target),
            max_turn,
        );
        player.direction = heading_vector(angle);
    }
}

/// Wander: occasional random turns, then move like the player does
fn move_enemies(state: &mut SimulationState, distance: f32, dt: f32) {
    let turn_chance = f64::from((state.tuning.enemy_turn_rate * dt).clamp(0.0, 1.0));
    let jitter = state.tuning.enemy_turn_jitter;

    for enemy in &mut state.enemies {
        let ribbon = &mut enemy.ribbon;
        if state.rng.random_bool(turn_chance) {
            let offset = (state.rng.random::<f32>() - 0.5) * jitter;
            ribbon.direction = heading_vector(heading_angle(ribbon.direction) + offset);
        }
        ribbon.advance(distance, state.arena);
    }
}

/// Collect everything under the head; returns true if the attempt ended
fn resolve_pickups(state: &mut SimulationState) -> bool {
    let head = state.player.head;
    let margin = state.tuning.pickup_margin * state.scale;

    let (picked, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.entities)
        .into_iter()
        .partition(|entity| pickup_hit(head, entity, margin));
    state.entities = kept;

    for entity in picked {
        let tag = entity.kind.tag();
        state.events.push(GameEvent::Collected {
            kind: tag,
            pos: entity.pos,
        });

        match entity.kind {
            EntityKind::Food { .. } => {
                state.score += state.tuning.score_per_food;
                state.player.target_length += state.tuning.length_per_food;
                state.events.push(GameEvent::ScoreChanged(state.score));
                if state.score >= state.level.target_score {
                    state.set_phase(GamePhase::Won);
                }
            }
            EntityKind::Bomb { .. } => {
                state.apply_damage(DamageSource::Bomb);
            }
            EntityKind::Heart { .. } => state.heal(),
        }

        spawn_entity(state, tag);
    }

    state.phase.is_over()
}

/// Enemy bodies, then the player's own trail
fn resolve_hazards(state: &mut SimulationState) {
    if state.is_invincible() {
        return;
    }

    let head = state.player.head;
    let tuning = &state.tuning;

    let enemy_radius = tuning.enemy_hit_radius * state.scale;
    let enemy_hit = state.enemies.iter().any(|enemy| {
        trail_hit(
            head,
            enemy.ribbon.path.iter(),
            0,
            tuning.enemy_hit_stride,
            enemy_radius,
        )
    });

    let self_radius = self_hit_radius(state.ribbon_width, state.scale, tuning.self_hit_width_factor);
    let self_hit = trail_hit(
        head,
        state.player.path.iter(),
        tuning.self_hit_skip,
        tuning.self_hit_stride,
        self_radius,
    );

    // Damage opens the invincibility window, so at most one of these lands
    if enemy_hit {
        state.apply_damage(DamageSource::Enemy);
    }
    if self_hit {
        state.apply_damage(DamageSource::SelfCollision);
    }
}

/// Autopilot target: closest yarn ball to the head
fn nearest_food(state: &SimulationState) -> Option<Vec2> {
    let head = state.player.head;
    state
        .entities
        .iter()
        .filter(|e| matches!(e.kind, EntityKind::Food { .. }))
        .min_by(|a, b| head.distance_squared(a.pos).total_cmp(&head.distance_squared(b.pos)))
        .map(|e| e.pos)
}
