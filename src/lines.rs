//! Winning-line bookkeeping.
//!
//! A board of size `n` has `2n + 2` winning lines: every row, every column and
//! both diagonals. The registry keeps the subset of lines that could still be
//! completed by one player. A line leaves that subset the first time it holds
//! marks from both players and never comes back, so total invalidation work over
//! a whole game is bounded by the number of lines times their length.

use crate::board::Board;
use crate::error::GameError;
use crate::types::{Cell, Position};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt::Write as _;
use tracing::{debug, instrument, trace};

/// Index of a line in the registry's line table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("L{}", _0)]
pub struct LineId(pub usize);

/// Which family a winning line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    /// Row `i`.
    Row(usize),
    /// Column `j`.
    Column(usize),
    /// Cells `(i, i)`.
    MainDiagonal,
    /// Cells `(i, n - 1 - i)`.
    AntiDiagonal,
}

/// One winning combination of `n` distinct positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    kind: LineKind,
    positions: Vec<Position>,
}

impl Line {
    fn build(kind: LineKind, n: usize) -> Self {
        let positions = (0..n)
            .map(|i| match kind {
                LineKind::Row(r) => Position::new(r, i),
                LineKind::Column(c) => Position::new(i, c),
                LineKind::MainDiagonal => Position::new(i, i),
                LineKind::AntiDiagonal => Position::new(i, n - 1 - i),
            })
            .collect();
        Self { kind, positions }
    }

    /// The family this line belongs to.
    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Positions of the line in order.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Checks whether the line passes through `pos`.
    pub fn contains(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }

    /// Checks whether the line holds marks from both players.
    pub fn is_mixed(&self, board: &Board) -> bool {
        let mut seen: Option<Cell> = None;
        for &pos in &self.positions {
            match (board.get(pos), seen) {
                (Some(Cell::Occupied(p)), None) => seen = Some(Cell::Occupied(p)),
                (Some(cell @ Cell::Occupied(_)), Some(prev)) if cell != prev => return true,
                _ => {}
            }
        }
        false
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for pos in &self.positions {
            write!(f, "{}", pos)?;
        }
        Ok(())
    }
}

/// Line ids touching a single position. At most four lines meet at one cell.
pub type LineSet = SmallVec<[LineId; 4]>;

/// Table of all winning lines plus the incrementally maintained live subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRegistry {
    size: usize,
    lines: Vec<Line>,
    active: Vec<bool>,
    active_count: usize,
    by_position: Vec<LineSet>,
}

impl LineRegistry {
    /// Generates every row, column and diagonal for a board of size `n`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidSize`] when `n` is outside
    /// [`Board::MIN_SIZE`]..=[`Board::MAX_SIZE`].
    #[instrument]
    pub fn generate(n: usize) -> Result<Self, GameError> {
        let cells = Board::cell_count(n)?;

        let kinds = (0..n)
            .map(LineKind::Row)
            .chain((0..n).map(LineKind::Column))
            .chain([LineKind::MainDiagonal, LineKind::AntiDiagonal]);

        let mut lines = Vec::with_capacity(2 * n + 2);
        let mut by_position: Vec<LineSet> = vec![LineSet::new(); cells];
        for (index, kind) in kinds.enumerate() {
            let line = Line::build(kind, n);
            for pos in line.positions() {
                by_position[pos.index(n)].push(LineId(index));
            }
            lines.push(line);
        }

        debug!(size = n, lines = lines.len(), "Generated winning lines");
        let active_count = lines.len();
        Ok(Self {
            size: n,
            active: vec![true; lines.len()],
            active_count,
            lines,
            by_position,
        })
    }

    /// Side length of the board these lines belong to.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Every line generated at construction, live or not.
    pub fn all_lines(&self) -> &[Line] {
        &self.lines
    }

    /// Looks up a line by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this registry.
    pub fn line(&self, id: LineId) -> &Line {
        &self.lines[id.0]
    }

    /// Checks whether the line is still winnable.
    pub fn is_active(&self, id: LineId) -> bool {
        self.active.get(id.0).copied().unwrap_or(false)
    }

    /// Number of lines still winnable.
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Ids of the live lines in generation order.
    pub fn active_ids(&self) -> impl Iterator<Item = LineId> + '_ {
        self.active
            .iter()
            .enumerate()
            .filter(|(_, live)| **live)
            .map(|(i, _)| LineId(i))
    }

    /// The live lines in generation order.
    pub fn active_lines(&self) -> impl Iterator<Item = &Line> + '_ {
        self.active_ids().map(move |id| self.line(id))
    }

    /// Every line through `pos`, live or not, in generation order.
    ///
    /// Computed from the line layout, so it does not depend on the index.
    pub fn lines_through(&self, pos: Position) -> LineSet {
        let n = self.size;
        let mut ids = LineSet::new();
        if pos.row >= n || pos.col >= n {
            return ids;
        }
        ids.push(LineId(pos.row));
        ids.push(LineId(n + pos.col));
        if pos.row == pos.col {
            ids.push(LineId(2 * n));
        }
        if pos.row + pos.col == n - 1 {
            ids.push(LineId(2 * n + 1));
        }
        ids
    }

    /// Live lines passing through `pos`. Empty for off-board positions.
    pub fn lines_at(&self, pos: Position) -> &[LineId] {
        if pos.row >= self.size || pos.col >= self.size {
            return &[];
        }
        &self.by_position[pos.index(self.size)]
    }

    /// Removes every live line through `pos` that now holds both players' marks.
    ///
    /// Must run after the move at `pos` is written to `board`. Returns the ids
    /// of the removed lines.
    #[instrument(skip(self, board), fields(position = %pos))]
    pub fn invalidate_touching(&mut self, pos: Position, board: &Board) -> LineSet {
        let removed: LineSet = self
            .lines_at(pos)
            .iter()
            .copied()
            .filter(|id| self.lines[id.0].is_mixed(board))
            .collect();

        for &id in &removed {
            self.active[id.0] = false;
            self.active_count -= 1;
            for other in &self.lines[id.0].positions {
                self.by_position[other.index(self.size)].retain(|l| *l != id);
            }
            trace!(line = %id, cells = %self.lines[id.0], "Line can no longer be won");
        }

        if !removed.is_empty() {
            debug!(
                removed = removed.len(),
                remaining = self.active_count,
                "Invalidated lines"
            );
        }
        removed
    }

    /// Renders every live line as a grid, `[r,c]` on the line and `[___]` elsewhere.
    pub fn render_active_lines(&self) -> String {
        let mut out = String::new();
        for (number, line) in self.active_lines().enumerate() {
            let _ = writeln!(
                out,
                "Winning Line (S{:02}.L{:02}):",
                self.size,
                number + 1
            );
            for row in 0..self.size {
                for col in 0..self.size {
                    let pos = Position::new(row, col);
                    if line.contains(pos) {
                        out.push_str(&pos.to_string());
                    } else {
                        out.push_str("[___]");
                    }
                }
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    /// Renders the live lines through each position, row-major.
    pub fn render_position_index(&self) -> String {
        let mut out = format!("Block to Lines Mapping for size {}:\n\n", self.size);
        for (index, ids) in self.by_position.iter().enumerate() {
            let _ = write!(out, "Block {}:   ", Position::from_index(index, self.size));
            for (count, id) in ids.iter().enumerate() {
                let _ = write!(out, "{}. {}   ", count + 1, self.line(*id));
            }
            out.push_str("\n\n");
        }
        out
    }
}
