use serde::{Deserialize, Serialize};

use crate::*;

/// One board position as seen by the rules engine.
///
/// `mine` stays `false` until mines are generated, the engine tracks whether that has happened.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub x: Coord,
    pub y: Coord,
    pub revealed: bool,
    pub flagged: bool,
    pub mine: bool,
    pub adjacent_mines: u8,
}

impl Cell {
    pub const fn new((x, y): Coord2) -> Self {
        Self {
            x,
            y,
            revealed: false,
            flagged: false,
            mine: false,
            adjacent_mines: 0,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        (self.x, self.y)
    }

    /// Neither revealed nor flagged.
    pub const fn is_unknown(&self) -> bool {
        !self.revealed && !self.flagged
    }

    /// A revealed safe cell with at least one mine around it.
    pub const fn is_numbered(&self) -> bool {
        self.revealed && !self.mine && self.adjacent_mines > 0
    }
}
