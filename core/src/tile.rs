use serde::{Deserialize, Serialize};

use crate::ColorId;

/// Content of a single board cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Transient hole left by a clear, never present once a cascade has settled.
    Empty,
    Tile(ColorId),
}

impl Cell {
    pub const fn color(self) -> Option<ColorId> {
        match self {
            Self::Empty => None,
            Self::Tile(color) => Some(color),
        }
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn to_char(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Tile(color) => char::from_digit(color.into(), 10).unwrap_or('#'),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Empty
    }
}
