//! Game session: intent queue, fixed-step driver and outbound events
//!
//! Hosts push `Intent`s from input handlers and timers at any time; they are
//! applied at the start of the next `update`. The simulation itself is only
//! created once the viewport size is known (first `resize`).

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::platform::Countdown;
use crate::renderer::texture::BUILTIN_RENDER_WIDTH;
use crate::renderer::{Frame, RenderView, TextureCache, render_frame};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, LevelConfig, SimulationState, TickInput, tick};
use crate::tuning::Tuning;

/// Longest frame delta fed to the accumulator (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// Input and host commands, applied at the next update
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Absolute steering target in arena pixels
    PointerMoved(Vec2),
    /// Held directional input; `None` on release
    Direction(Option<Vec2>),
    /// Player texture changed
    TextureSelected { id: String, render_width: f32 },
    /// Ribbon thickness multiplier changed
    ThicknessChanged(f32),
    /// One second of the level countdown passed
    SecondElapsed,
    /// Demo mode on/off
    Autopilot(bool),
}

/// Why an attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    TargetReached,
    OutOfHitPoints,
    TimeUp,
}

/// Notifications for the host UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Score changed
    Progress(u32),
    /// Hit points changed
    HitPoints(u8),
    /// The attempt ended (fired once)
    GameOver {
        won: bool,
        reason: GameOverReason,
        texture_id: String,
    },
}

/// One level attempt and everything driving it
#[derive(Debug)]
pub struct Session {
    tuning: Tuning,
    level: LevelConfig,
    settings: Settings,
    seed: u64,
    /// Intrinsic width of the selected texture
    texture_width: f32,
    state: Option<SimulationState>,
    countdown: Countdown,
    input: TickInput,
    intents: VecDeque<Intent>,
    events: Vec<SessionEvent>,
    accumulator: f32,
    last_score: Option<u32>,
    last_hit_points: Option<u8>,
    game_over_sent: bool,
    torn_down: bool,
}

impl Session {
    pub fn new(tuning: Tuning, level: LevelConfig, settings: Settings, seed: u64) -> Self {
        log::info!("Session created: level {}, seed {}", level.id, seed);
        Self {
            tuning,
            level,
            settings,
            seed,
            texture_width: BUILTIN_RENDER_WIDTH,
            state: None,
            countdown: Countdown::new(level.time_limit),
            input: TickInput::default(),
            intents: VecDeque::new(),
            events: Vec::new(),
            accumulator: 0.0,
            last_score: None,
            last_hit_points: None,
            game_over_sent: false,
            torn_down: false,
        }
    }

    /// Queue an intent for the next update
    pub fn push_intent(&mut self, intent: Intent) {
        if self.torn_down {
            return;
        }
        self.intents.push_back(intent);
    }

    /// Viewport changed; creates the simulation on first call
    pub fn resize(&mut self, width: f32, height: f32) {
        if self.torn_down || !(width > 0.0 && height > 0.0) {
            return;
        }
        let arena = Vec2::new(width, height);

        match &mut self.state {
            Some(state) => state.resize(arena),
            None => {
                let mut state = SimulationState::new(self.tuning.clone(), self.level, arena, self.seed);
                state.set_ribbon_width(self.settings.ribbon_width(self.texture_width));
                self.state = Some(state);
                self.publish(SessionEvent::Progress(0));
                self.publish_hit_points();
            }
        }
    }

    /// Discard the current attempt and start `level` with `seed`
    pub fn restart(&mut self, level: LevelConfig, seed: u64) {
        if self.torn_down {
            return;
        }
        let arena = self.state.as_ref().map(|s| s.arena);
        self.level = level;
        self.seed = seed;
        self.state = None;
        self.countdown = Countdown::new(level.time_limit);
        self.input = TickInput {
            autopilot: self.input.autopilot,
            ..Default::default()
        };
        self.intents.clear();
        self.accumulator = 0.0;
        self.last_score = None;
        self.last_hit_points = None;
        self.game_over_sent = false;
        if let Some(arena) = arena {
            self.resize(arena.x, arena.y);
        }
        log::info!("Restarted at level {} with seed {}", level.id, seed);
    }

    /// Apply queued intents and advance the simulation by `frame_dt` seconds
    pub fn update(&mut self, frame_dt: f32) {
        if self.torn_down {
            return;
        }

        while let Some(intent) = self.intents.pop_front() {
            self.apply(intent);
        }

        if let Some(state) = &mut self.state {
            let dt = if frame_dt.is_finite() {
                frame_dt.clamp(0.0, MAX_FRAME_DT)
            } else {
                0.0
            };
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Pointer targets are one-shot; the state keeps the last one
                self.input.pointer_target = None;
            }
        }

        self.collect_events();
    }

    fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::PointerMoved(pos) => {
                if self.input.direction.is_none() {
                    self.input.pointer_target = Some(pos);
                }
            }
            Intent::Direction(dir) => {
                self.input.direction = dir;
                if dir.is_some() {
                    self.input.pointer_target = None;
                }
            }
            Intent::TextureSelected { id, render_width } => {
                log::info!("Texture selected: {} (width {})", id, render_width);
                self.settings.texture_id = id;
                self.texture_width = render_width;
                self.sync_ribbon_width();
            }
            Intent::ThicknessChanged(thickness) => {
                self.settings.set_thickness(thickness);
                self.sync_ribbon_width();
            }
            Intent::SecondElapsed => {
                if let Some(state) = &mut self.state {
                    if state.phase == GamePhase::Playing && self.countdown.tick_second() {
                        log::info!("Time up at score {}", state.score);
                        state.expire();
                    }
                }
            }
            Intent::Autopilot(on) => {
                log::info!("Autopilot: {}", on);
                self.input.autopilot = on;
            }
        }
    }

    fn sync_ribbon_width(&mut self) {
        let width = self.settings.ribbon_width(self.texture_width);
        if let Some(state) = &mut self.state {
            state.set_ribbon_width(width);
        }
    }

    /// Translate simulation events into deduplicated session events
    fn collect_events(&mut self) {
        let Some(state) = &mut self.state else {
            return;
        };
        let events = state.drain_events();
        let (score, phase) = (state.score, state.phase);

        for event in events {
            match event {
                GameEvent::ScoreChanged(_) => self.publish(SessionEvent::Progress(score)),
                GameEvent::HitPointsChanged(_) => self.publish_hit_points(),
                GameEvent::Collected { kind, pos } => {
                    log::debug!("Collected {:?} at ({:.0}, {:.0})", kind, pos.x, pos.y);
                }
                GameEvent::Damaged(source) => log::debug!("Hit by {:?}", source),
                GameEvent::PhaseChanged(_) => {}
            }
        }

        if phase.is_over() && !self.game_over_sent {
            let (won, reason) = match phase {
                GamePhase::Won => (true, GameOverReason::TargetReached),
                GamePhase::Lost => (false, GameOverReason::OutOfHitPoints),
                GamePhase::TimedOut | GamePhase::Playing => (false, GameOverReason::TimeUp),
            };
            self.game_over_sent = true;
            log::info!("Game over: won={}, reason={:?}, score={}", won, reason, score);
            self.events.push(SessionEvent::GameOver {
                won,
                reason,
                texture_id: self.settings.texture_id.clone(),
            });
        }
    }

    fn publish_hit_points(&mut self) {
        if let Some(hp) = self.state.as_ref().map(|s| s.hit_points) {
            self.publish(SessionEvent::HitPoints(hp));
        }
    }

    /// Push a progress/HP event unless it repeats the last value
    fn publish(&mut self, event: SessionEvent) {
        let changed = match event {
            SessionEvent::Progress(score) => self.last_score.replace(score) != Some(score),
            SessionEvent::HitPoints(hp) => self.last_hit_points.replace(hp) != Some(hp),
            SessionEvent::GameOver { .. } => true,
        };
        if changed {
            self.events.push(event);
        }
    }

    /// Build the frame for the latest state; `None` before the first resize
    /// or after teardown
    pub fn render(&self, textures: &TextureCache, time: f64) -> Option<Frame> {
        if self.torn_down {
            return None;
        }
        let state = self.state.as_ref()?;
        Some(render_frame(state, &RenderView::from_settings(&self.settings), textures, time))
    }

    /// Stop the session: queued intents are dropped and nothing fires again
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.intents.clear();
        self.events.clear();
        log::info!("Session torn down");
    }

    /// Take all events since the last call
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> Option<&SimulationState> {
        self.state.as_ref()
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn level(&self) -> LevelConfig {
        self.level
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Whether the last applied intent turned autopilot on
    pub fn autopilot(&self) -> bool {
        self.input.autopilot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EntityKind, GameEntity};

    fn session() -> Session {
        let mut session = Session::new(
            Tuning::default(),
            LevelConfig::LEVEL_ONE,
            Settings::default(),
            2024,
        );
        session.resize(1280.0, 720.0);
        session
    }

    fn state_mut(session: &mut Session) -> &mut SimulationState {
        session.state.as_mut().unwrap()
    }

    #[test]
    fn test_state_created_on_first_resize() {
        let mut session = Session::new(Tuning::default(), LevelConfig::LEVEL_ONE, Settings::default(), 1);
        assert!(session.state().is_none());
        session.update(SIM_DT);
        assert!(session.render(&TextureCache::with_builtins(), 0.0).is_none());

        session.resize(1280.0, 720.0);
        let head = session.state().unwrap().player.head;
        assert_eq!(head, Vec2::new(640.0, 360.0));
        assert_eq!(
            session.drain_events(),
            vec![SessionEvent::Progress(0), SessionEvent::HitPoints(5)]
        );

        // Later resizes keep the attempt and only rescale
        session.resize(1600.0, 1600.0);
        let state = session.state().unwrap();
        assert_eq!(state.player.head, head);
        assert_eq!(state.arena, Vec2::new(1600.0, 1600.0));
        assert!((state.scale - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_fixed_step_accumulator() {
        let mut session = session();
        session.update(SIM_DT);
        assert_eq!(session.state().unwrap().time_ticks, 1);

        session.update(SIM_DT / 2.0);
        assert_eq!(session.state().unwrap().time_ticks, 1);

        // Long frames are clamped to 0.1s (6 steps)
        session.update(5.0);
        let ticks = session.state().unwrap().time_ticks;
        assert!((6..=7).contains(&ticks));
    }

    #[test]
    fn test_intents_apply_on_next_update() {
        let mut session = session();
        let target = Vec2::new(100.0, 100.0);
        session.push_intent(Intent::PointerMoved(target));
        assert_ne!(session.state().unwrap().steering_target, target);

        session.update(SIM_DT);
        assert_eq!(session.state().unwrap().steering_target, target);
    }

    #[test]
    fn test_pointer_ignored_while_direction_held() {
        let mut session = session();
        session.push_intent(Intent::Direction(Some(Vec2::new(0.0, 1.0))));
        session.push_intent(Intent::PointerMoved(Vec2::new(5.0, 5.0)));
        session.update(SIM_DT);
        assert_ne!(session.state().unwrap().steering_target, Vec2::new(5.0, 5.0));
        assert!(session.state().unwrap().player.direction.y > 0.0);
    }

    #[test]
    fn test_texture_and_thickness_update_width() {
        let mut session = session();
        session.push_intent(Intent::TextureSelected {
            id: "eco-rope".to_string(),
            render_width: 24.0,
        });
        session.push_intent(Intent::ThicknessChanged(10.0));
        session.update(0.0);

        assert_eq!(session.settings().texture_id, "eco-rope");
        assert!((session.state().unwrap().ribbon_width - 96.0).abs() < 1e-4);
    }

    #[test]
    fn test_time_up_fires_once() {
        let mut session = session();
        session.drain_events();
        for _ in 0..95 {
            session.push_intent(Intent::SecondElapsed);
        }
        session.update(0.0);

        assert_eq!(session.state().unwrap().phase, GamePhase::TimedOut);
        assert_eq!(session.countdown().remaining(), 0);
        assert_eq!(
            session.drain_events(),
            vec![SessionEvent::GameOver {
                won: false,
                reason: GameOverReason::TimeUp,
                texture_id: "tech-tape".to_string(),
            }]
        );

        session.update(SIM_DT);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_win_reports_progress_and_game_over() {
        let mut session = session();
        session.drain_events();
        session.push_intent(Intent::Direction(Some(Vec2::X)));
        for _ in 0..10 {
            let state = state_mut(&mut session);
            state.entities.clear();
            let head = state.player.head + state.player.direction * state.tuning.base_speed * state.scale * SIM_DT;
            state.entities.push(GameEntity {
                id: 999,
                pos: head,
                radius: 16.0,
                kind: EntityKind::Food { swirl_seed: 1 },
            });
            session.update(SIM_DT);
        }

        let events = session.drain_events();
        let progress: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, SessionEvent::Progress(_)))
            .collect();
        assert_eq!(progress.len(), 10);
        assert_eq!(progress.last(), Some(&&SessionEvent::Progress(100)));
        assert!(events.contains(&SessionEvent::GameOver {
            won: true,
            reason: GameOverReason::TargetReached,
            texture_id: "tech-tape".to_string(),
        }));
    }

    #[test]
    fn test_teardown_silences_session() {
        let mut session = session();
        session.push_intent(Intent::SecondElapsed);
        session.teardown();
        assert!(session.is_torn_down());
        assert!(session.drain_events().is_empty());

        session.push_intent(Intent::PointerMoved(Vec2::ZERO));
        session.update(1.0);
        assert_eq!(session.state().unwrap().time_ticks, 0);
        assert_eq!(session.countdown().remaining(), 90);
        assert!(session.drain_events().is_empty());
        assert!(session.render(&TextureCache::with_builtins(), 0.0).is_none());
    }

    #[test]
    fn test_restart_resets_attempt() {
        let mut session = session();
        session.update(SIM_DT * 3.0);
        session.restart(LevelConfig::LEVEL_TWO, 77);

        let state = session.state().unwrap();
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.enemies.len(), 3);
        assert_eq!(session.countdown().remaining(), 120);
    }
}
