use thiserror::Error;

use crate::MIN_COLORS;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Invalid move, cells must be orthogonally adjacent and on the board")]
    InvalidMove,
    #[error("Board is busy resolving a cascade, no new moves are accepted")]
    Busy,
    #[error("At least {} colors are required", MIN_COLORS)]
    TooFewColors,
    #[error("Too many colors")]
    TooManyColors,
    #[error("Board needs at least one row and one column")]
    EmptyBoard,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Cell is empty or its color is out of range")]
    InvalidColor,
}

pub type Result<T> = core::result::Result<T, GameError>;
