//! Strictly Lines library - N-by-N tic-tac-toe game-state engine
//!
//! The engine tracks which winning lines are still live as the game
//! progresses, so win and draw detection only ever touch the lines through
//! the cell just played.
//!
//! # Architecture
//!
//! - **Board**: the grid of cells
//! - **LineRegistry**: every row, column and diagonal, plus the live subset
//! - **GameEngine**: turn order, move validation, win/draw detection, events
//! - **MoveLog**: ordered move history with a line-based text format
//! - **MatchSession**: consecutive games with a score and an optional bot
//!
//! # Example
//!
//! ```
//! use strictly_lines::{GameEngine, GameStatus, Player};
//!
//! # fn example() -> Result<(), strictly_lines::GameError> {
//! let mut engine = GameEngine::new(3)?;
//! for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
//!     engine.make_move(row, col)?;
//! }
//! assert_eq!(engine.make_move(0, 2)?, GameStatus::Won(Player::X));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod bot;
mod config;
mod engine;
mod error;
mod events;
mod invariants;
mod lines;
mod move_log;
mod session;
mod types;

// Crate-level exports - Core types
pub use board::Board;
pub use types::{Cell, Player, Position, Symbols};

// Crate-level exports - Errors
pub use error::{ConfigError, GameError};

// Crate-level exports - Winning lines
pub use lines::{Line, LineId, LineKind, LineRegistry, LineSet};

// Crate-level exports - Engine and events
pub use engine::{GameEngine, GameSnapshot, GameStatus};
pub use events::{GameEvent, ListenerId, Listeners};

// Crate-level exports - Move history
pub use move_log::{MoveLog, MoveRecord, serialize_positions};

// Crate-level exports - Invariants
pub use invariants::{
    ActiveLinesUnmixed, AlternatingTurns, EngineInvariants, HistoryMatchesBoard, IndexConsistent,
    Invariant, InvariantSet, InvariantViolation, LastMoveSettled,
};

// Crate-level exports - Bots and sessions
pub use bot::{FirstEmptyPolicy, MovePolicy, RandomLinePolicy};
pub use config::{GameConfig, GameMode};
pub use session::{MatchSession, Scoreboard};
