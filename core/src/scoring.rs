use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::*;

/// Points and achievements produced by a single clear.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearScore {
    pub cleared: CellCount,
    pub gained: u32,
    /// Thresholds crossed by this clear, ascending.
    pub achievements: Vec<u32>,
}

/// Session score and the next achievement threshold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    score: u32,
    next_threshold: u32,
    step: u32,
    points_per_tile: u32,
}

impl ScoreTracker {
    pub const fn new(points_per_tile: u32, step: u32) -> Self {
        Self {
            score: 0,
            next_threshold: step,
            step,
            points_per_tile,
        }
    }

    pub const fn from_config(config: &GameConfig) -> Self {
        Self::new(config.points_per_tile, config.achievement_step)
    }

    /// Resumes from an earlier `score` with `next_threshold` still to reach.
    pub const fn with_progress(self, score: u32, next_threshold: u32) -> Self {
        Self {
            score,
            next_threshold,
            ..self
        }
    }

    pub const fn score(&self) -> u32 {
        self.score
    }

    pub const fn next_threshold(&self) -> u32 {
        self.next_threshold
    }

    /// Adds the points for `cleared` tiles, then reports every threshold the new score reached.
    pub fn record_clear(&mut self, cleared: CellCount) -> ClearScore {
        let gained = u32::from(cleared).saturating_mul(self.points_per_tile);
        self.score = self.score.saturating_add(gained);

        let mut achievements = Vec::new();
        while self.step > 0 && self.score >= self.next_threshold {
            achievements.push(self.next_threshold);
            match self.next_threshold.checked_add(self.step) {
                Some(next) => self.next_threshold = next,
                None => {
                    log::warn!("achievement thresholds exhausted at {}", self.next_threshold);
                    self.step = 0;
                }
            }
        }

        if !achievements.is_empty() {
            log::debug!("score {} reached {:?}", self.score, achievements);
        }

        ClearScore {
            cleared,
            gained,
            achievements,
        }
    }
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self::new(POINTS_PER_TILE, ACHIEVEMENT_STEP)
    }
}
