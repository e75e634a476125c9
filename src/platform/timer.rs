//! Level countdown
//!
//! Driven by whole-second ticks from the host (an interval timer on the web,
//! simulated time natively). Nothing here reads a clock.

/// Seconds remaining in the current attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self { remaining: seconds }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// One second passed; returns true exactly once, on reaching zero
    pub fn tick_second(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    /// Formatted as `m:ss`
    pub fn display(&self) -> String {
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}
