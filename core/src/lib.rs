#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use matcher::*;
pub use resolver::*;
pub use scoring::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod grid;
mod matcher;
mod resolver;
mod scoring;
mod tile;
mod types;

pub const DEFAULT_SIZE: Coord2 = (8, 8);
pub const DEFAULT_COLORS: ColorId = 4;
/// Fewer colors make the generator's redraw loop degenerate.
pub const MIN_COLORS: ColorId = 3;
/// Colors are written as single digits in the text form of a grid.
pub const MAX_COLORS: ColorId = 10;
pub const POINTS_PER_TILE: u32 = 5;
/// Base value and increment of the achievement thresholds.
pub const ACHIEVEMENT_STEP: u32 = 500;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub num_colors: ColorId,
    pub points_per_tile: u32,
    /// Zero disables achievements.
    pub achievement_step: u32,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, num_colors: ColorId) -> Self {
        Self {
            size,
            num_colors,
            points_per_tile: POINTS_PER_TILE,
            achievement_step: ACHIEVEMENT_STEP,
        }
    }

    pub fn new(size: Coord2, num_colors: ColorId) -> Result<Self> {
        let config = Self::new_unchecked(size, num_colors);
        config.validate()?;
        Ok(config)
    }

    pub const fn with_scoring(self, points_per_tile: u32, achievement_step: u32) -> Self {
        Self {
            points_per_tile,
            achievement_step,
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }
        if self.num_colors < MIN_COLORS {
            return Err(GameError::TooFewColors);
        }
        if self.num_colors > MAX_COLORS {
            return Err(GameError::TooManyColors);
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(DEFAULT_SIZE, DEFAULT_COLORS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_the_reference_board() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.total_cells(), 64);
        assert_eq!(config.points_per_tile, 5);
        assert_eq!(config.achievement_step, 500);
    }

    #[test]
    fn new_rejects_bad_configurations() {
        assert_eq!(GameConfig::new((8, 8), 2), Err(GameError::TooFewColors));
        assert_eq!(GameConfig::new((0, 8), 4), Err(GameError::EmptyBoard));
        assert_eq!(GameConfig::new((8, 0), 4), Err(GameError::EmptyBoard));
        assert_eq!(GameConfig::new((8, 8), 11), Err(GameError::TooManyColors));
        assert!(GameConfig::new((3, 12), 3).is_ok());
    }
}
