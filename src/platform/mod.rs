//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (pointer, touch, keyboard d-pad)
//! - Countdown timing

pub mod input;
pub mod timer;

pub use input::{DpadButton, InputAdapter};
pub use timer::Countdown;
