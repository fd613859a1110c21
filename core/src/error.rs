use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board must be at least 1x1")]
    InvalidSize,
    #[error("Too many mines, requested {requested} but at most {max} fit around any opening")]
    TooManyMines { requested: CellCount, max: CellCount },
}

pub type Result<T> = core::result::Result<T, GameError>;
