use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Neighbor coordinates of one cell, never more than eight.
pub type Neighbors = SmallVec<[Coord2; 8]>;

/// Rectangular grid of cells, stored row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
}

impl Board {
    pub fn new(size: Coord2) -> Self {
        let cells = Array2::from_shape_fn(size.to_nd_index(), |(y, x)| {
            Cell::new((x as Coord, y as Coord))
        });
        Self { cells }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (cols as Coord, rows as Coord)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    pub(crate) fn get_mut(&mut self, coords: Coord2) -> Option<&mut Cell> {
        self.cells.get_mut(coords.to_nd_index())
    }

    pub fn neighbors(&self, coords: Coord2) -> Neighbors {
        self.cells.iter_neighbors(coords).collect()
    }

    /// Ordered grid snapshot, one slice-like view per row.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = &Cell>> {
        self.cells.rows().into_iter().map(|row| row.into_iter())
    }

    /// Flattened cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn as_array(&self) -> &Array2<Cell> {
        &self.cells
    }

    pub fn mine_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.mine).count() as CellCount
    }

    pub fn flag_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.flagged).count() as CellCount
    }

    /// Safe cells the player still has to uncover.
    pub fn unrevealed_safe_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| !cell.mine && !cell.revealed)
            .count() as CellCount
    }

    pub fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.cells
            .iter_neighbors(coords)
            .filter(|&pos| self.cells[pos.to_nd_index()].flagged)
            .count() as u8
    }

    pub fn count_unknown_neighbors(&self, coords: Coord2) -> u8 {
        self.cells
            .iter_neighbors(coords)
            .filter(|&pos| self.cells[pos.to_nd_index()].is_unknown())
            .count() as u8
    }

    /// Copies mines from `layout` and recomputes every adjacency count.
    pub(crate) fn place_mines(&mut self, layout: &MineLayout) -> Result<()> {
        if layout.size() != self.size() {
            return Err(GameError::InvalidSize);
        }

        for cell in self.cells.iter_mut() {
            cell.mine = layout.contains_mine(cell.coords());
        }
        self.update_numbers();
        Ok(())
    }

    /// Counts mine-bearing neighbors for every safe cell.
    pub(crate) fn update_numbers(&mut self) {
        let counts = Array2::from_shape_fn(self.cells.dim(), |(y, x)| {
            let coords = (x as Coord, y as Coord);
            if self.cells[coords.to_nd_index()].mine {
                return 0;
            }
            self.cells
                .iter_neighbors(coords)
                .filter(|&pos| self.cells[pos.to_nd_index()].mine)
                .count() as u8
        });

        for (cell, &count) in self.cells.iter_mut().zip(counts.iter()) {
            cell.adjacent_mines = count;
        }
    }

    /// Reveals every mine regardless of flags, returns how many were newly shown.
    pub(crate) fn show_all_mines(&mut self) -> CellCount {
        let mut shown = 0;
        for cell in self.cells.iter_mut().filter(|cell| cell.mine) {
            if !cell.revealed {
                cell.revealed = true;
                shown += 1;
            }
        }
        shown
    }
}
