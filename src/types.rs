//! Core domain types for N-by-N tic-tac-toe.

use serde::{Deserialize, Serialize};

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Default display symbol for this player.
    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell occupied by a player.
    Occupied(Player),
}

impl Cell {
    /// Returns the occupying player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }

    /// Checks if the cell is empty.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// A coordinate on the board, zero-based from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Converts signed coordinates into a position on an `n`-sized board.
    ///
    /// Returns `None` when either coordinate falls outside `[0, n)`.
    pub fn checked(row: i64, col: i64, n: usize) -> Option<Self> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < n && col < n).then_some(Self { row, col })
    }

    /// Row-major index of this position on an `n`-sized board.
    pub fn index(self, n: usize) -> usize {
        self.row * n + self.col
    }

    /// Inverse of [`Position::index`].
    pub fn from_index(index: usize, n: usize) -> Self {
        Self {
            row: index / n,
            col: index % n,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]", self.row, self.col)
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Display symbols used when rendering a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbols {
    /// Symbol for player X.
    pub x: char,
    /// Symbol for player O.
    pub o: char,
}

impl Symbols {
    /// Returns the symbol for the given player.
    pub fn of(&self, player: Player) -> char {
        match player {
            Player::X => self.x,
            Player::O => self.o,
        }
    }
}

impl Default for Symbols {
    fn default() -> Self {
        Self {
            x: Player::X.symbol(),
            o: Player::O.symbol(),
        }
    }
}
