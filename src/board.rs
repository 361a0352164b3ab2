//! The N-by-N grid of cells.

use crate::error::GameError;
use crate::types::{Cell, Player, Position, Symbols};
use serde::{Deserialize, Serialize};

/// Square board of `size * size` cells stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Smallest supported side length.
    pub const MIN_SIZE: usize = 2;

    /// Largest supported side length.
    pub const MAX_SIZE: usize = 1024;

    /// Number of cells on a board of side `size`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidSize`] when `size` is outside
    /// [`Board::MIN_SIZE`]..=[`Board::MAX_SIZE`].
    pub fn cell_count(size: usize) -> Result<usize, GameError> {
        if !(Self::MIN_SIZE..=Self::MAX_SIZE).contains(&size) {
            return Err(GameError::InvalidSize { size });
        }
        size.checked_mul(size).ok_or(GameError::InvalidSize { size })
    }

    /// Creates an empty board.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidSize`] when `size` is outside
    /// [`Board::MIN_SIZE`]..=[`Board::MAX_SIZE`].
    pub fn new(size: usize) -> Result<Self, GameError> {
        let cells = Self::cell_count(size)?;
        Ok(Self {
            size,
            cells: vec![Cell::Empty; cells],
        })
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Checks whether the position lies on the board.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        if !self.contains(pos) {
            return None;
        }
        self.cells.get(pos.index(self.size)).copied()
    }

    /// Checks if the cell at the position is empty. Off-board positions are not.
    pub fn is_empty(&self, pos: Position) -> bool {
        matches!(self.get(pos), Some(Cell::Empty))
    }

    /// Writes a cell. Only the engine mutates the board.
    pub(crate) fn set(&mut self, pos: Position, cell: Cell) {
        let index = pos.index(self.size);
        self.cells[index] = cell;
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row of the board, or `None` past the last row.
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        if row >= self.size {
            return None;
        }
        let start = row * self.size;
        self.cells.get(start..start + self.size)
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Checks if every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Empty positions in row-major order.
    pub fn empty_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_empty())
            .map(|(i, _)| Position::from_index(i, self.size))
            .collect()
    }

    /// Renders the board using custom symbols, `[_]` for empty cells.
    pub fn render_with(&self, symbols: &Symbols) -> String {
        let mut out = String::with_capacity(self.cells.len() * 3 + self.size);
        for row in self.cells.chunks(self.size) {
            for cell in row {
                out.push('[');
                match cell {
                    Cell::Empty => out.push('_'),
                    Cell::Occupied(player) => out.push(symbols.of(*player)),
                }
                out.push(']');
            }
            out.push('\n');
        }
        out
    }

    /// Renders occupied cells by coordinate (`[r,c]`) and empty ones as `[___]`.
    pub fn render_coordinates(&self) -> String {
        let mut out = String::new();
        for (row, cells) in self.cells.chunks(self.size).enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                match cell {
                    Cell::Empty => out.push_str("[___]"),
                    Cell::Occupied(_) => out.push_str(&Position::new(row, col).to_string()),
                }
            }
            out.push('\n');
        }
        out
    }

    /// Counts the marks of a player.
    pub fn count(&self, player: Player) -> usize {
        self.cells
            .iter()
            .filter(|c| **c == Cell::Occupied(player))
            .count()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render_with(&Symbols::default()))
    }
}
