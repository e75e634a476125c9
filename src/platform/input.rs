//! Input normalization
//!
//! Turns raw pointer, touch and keyboard events into session intents.
//! A held directional input always wins over the pointer.

use glam::Vec2;

use crate::session::Intent;

/// On-screen d-pad / arrow key / WASD direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpadButton {
    Up,
    Down,
    Left,
    Right,
}

impl DpadButton {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Self::Up),
            "ArrowDown" | "s" | "S" => Some(Self::Down),
            "ArrowLeft" | "a" | "A" => Some(Self::Left),
            "ArrowRight" | "d" | "D" => Some(Self::Right),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Up => 1,
            Self::Down => 2,
            Self::Left => 4,
            Self::Right => 8,
        }
    }
}

/// Tracks the held direction
#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    direction: Option<Vec2>,
    held: u8,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mouse or touch moved to `pos` (arena pixels)
    ///
    /// Ignored while a direction is held.
    pub fn pointer_moved(&mut self, pos: Vec2) -> Option<Intent> {
        if self.direction.is_some() || !pos.is_finite() {
            return None;
        }
        Some(Intent::PointerMoved(pos))
    }

    /// Set or clear an analog direction (virtual joystick), clamped to [-1, 1]²
    pub fn set_direction(&mut self, dir: Option<Vec2>) -> Intent {
        let dir = dir
            .filter(|d| d.is_finite())
            .map(|d| d.clamp(Vec2::NEG_ONE, Vec2::ONE));
        self.direction = dir;
        Intent::Direction(dir)
    }

    /// A d-pad button went down
    pub fn press(&mut self, button: DpadButton) -> Intent {
        self.held |= button.bit();
        self.set_direction(self.held_direction())
    }

    /// A d-pad button was released; the pointer takes over once none are held
    pub fn release(&mut self, button: DpadButton) -> Intent {
        self.held &= !button.bit();
        self.set_direction(self.held_direction())
    }

    /// Keyboard convenience wrapper around `press`
    pub fn key_down(&mut self, key: &str) -> Option<Intent> {
        DpadButton::from_key(key).map(|button| self.press(button))
    }

    /// Keyboard convenience wrapper around `release`
    pub fn key_up(&mut self, key: &str) -> Option<Intent> {
        DpadButton::from_key(key).map(|button| self.release(button))
    }

    fn held_direction(&self) -> Option<Vec2> {
        if self.held == 0 {
            return None;
        }
        let axis = |neg: DpadButton, pos: DpadButton| {
            let mut v = 0.0;
            if self.held & neg.bit() != 0 {
                v -= 1.0;
            }
            if self.held & pos.bit() != 0 {
                v += 1.0;
            }
            v
        };
        // Opposing buttons cancel to zero, which holds the heading
        Some(Vec2::new(
            axis(DpadButton::Left, DpadButton::Right),
            axis(DpadButton::Up, DpadButton::Down),
        ))
    }
}
