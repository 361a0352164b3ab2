//! Error types for the game engine and its configuration.

use derive_more::{Display, Error};
use tracing::instrument;

/// Error that can occur when creating a game or making a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// Board size outside the supported range.
    #[display(
        "Size must be between {} and {} (got {})",
        crate::board::Board::MIN_SIZE,
        crate::board::Board::MAX_SIZE,
        size
    )]
    InvalidSize {
        /// Requested board size.
        size: usize,
    },

    /// Coordinates out of bounds or cell already occupied.
    #[display("Invalid move at [{},{}]", row, col)]
    IllegalMove {
        /// Requested row.
        row: i64,
        /// Requested column.
        col: i64,
    },

    /// The game has already ended.
    #[display("Game has already ended. Move not accepted.")]
    GameOver,

    /// A person tried to move in the bot's seat.
    #[display("It is the bot's turn. Move not accepted.")]
    BotTurn,
}

impl GameError {
    /// Returns true if the caller may retry with a different move.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, GameError::InvalidSize { .. })
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
