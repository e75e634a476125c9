//! Level presets

use serde::{Deserialize, Serialize};

/// Goal and hazards for one level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: u32,
    /// Score that wins the level
    pub target_score: u32,
    /// Countdown length in seconds
    pub time_limit: u32,
    /// Rival ribbons roaming the arena
    pub enemy_count: u32,
}

impl LevelConfig {
    /// Collect yarn balls, no rivals
    pub const LEVEL_ONE: Self = Self {
        id: 1,
        target_score: 100,
        time_limit: 90,
        enemy_count: 0,
    };

    /// Higher target with three rival ribbons
    pub const LEVEL_TWO: Self = Self {
        id: 2,
        target_score: 200,
        time_limit: 120,
        enemy_count: 3,
    };

    /// Look up a preset by id
    pub fn preset(id: u32) -> Option<Self> {
        match id {
            1 => Some(Self::LEVEL_ONE),
            2 => Some(Self::LEVEL_TWO),
            _ => None,
        }
    }

    /// The preset following this one, if any
    pub fn next(&self) -> Option<Self> {
        Self::preset(self.id + 1)
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::LEVEL_ONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(LevelConfig::preset(1), Some(LevelConfig::LEVEL_ONE));
        assert_eq!(LevelConfig::LEVEL_ONE.next(), Some(LevelConfig::LEVEL_TWO));
        assert_eq!(LevelConfig::LEVEL_TWO.next(), None);
        assert_eq!(LevelConfig::LEVEL_ONE.enemy_count, 0);
        assert_eq!(LevelConfig::LEVEL_TWO.enemy_count, 3);
    }
}
