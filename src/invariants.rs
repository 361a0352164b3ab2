//! First-class invariants for the game engine.
//!
//! Invariants are logical properties that must hold after every accepted
//! move. The engine checks them in debug builds; tests can check them
//! directly.

use crate::board::Board;
use crate::engine::GameEngine;
use crate::types::{Cell, Player, Position};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implementations are provided for tuples of two to four invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$inv::holds(state) {
                        violations.push(InvariantViolation::new($inv::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);

/// Invariant: no live line holds marks from both players.
pub struct ActiveLinesUnmixed;

impl Invariant<GameEngine> for ActiveLinesUnmixed {
    fn holds(engine: &GameEngine) -> bool {
        engine
            .registry()
            .active_lines()
            .all(|line| !line.is_mixed(engine.board()))
    }

    fn description() -> &'static str {
        "Active lines never contain both players"
    }
}

/// Invariant: the per-position index lists exactly the live lines through each cell.
pub struct IndexConsistent;

impl Invariant<GameEngine> for IndexConsistent {
    fn holds(engine: &GameEngine) -> bool {
        let registry = engine.registry();
        let n = registry.size();
        (0..n * n).map(|i| Position::from_index(i, n)).all(|pos| {
            let expected: Vec<_> = registry
                .active_ids()
                .filter(|id| registry.line(*id).contains(pos))
                .collect();
            registry.lines_at(pos) == expected.as_slice()
        })
    }

    fn description() -> &'static str {
        "Position index mirrors the active line set"
    }
}

/// Invariant: replaying the move log reproduces the board.
///
/// Every logged move lands on an empty cell, so no cell is ever
/// overwritten and the log length equals the number of occupied cells.
pub struct HistoryMatchesBoard;

impl Invariant<GameEngine> for HistoryMatchesBoard {
    fn holds(engine: &GameEngine) -> bool {
        let Ok(mut reconstructed) = Board::new(engine.board().size()) else {
            return false;
        };

        for record in engine.log().records() {
            if !reconstructed.is_empty(record.position) {
                return false;
            }
            reconstructed.set(record.position, Cell::Occupied(record.player));
        }

        reconstructed == *engine.board()
    }

    fn description() -> &'static str {
        "Move log replays to the current board"
    }
}

/// Invariant: players alternate X, O, X, O, ...
pub struct AlternatingTurns;

impl Invariant<GameEngine> for AlternatingTurns {
    fn holds(engine: &GameEngine) -> bool {
        let records = engine.log().records();

        if records.first().is_some_and(|r| r.player != Player::X) {
            return false;
        }
        if records.windows(2).any(|w| w[0].player == w[1].player) {
            return false;
        }

        // A finished game keeps the last mover as current player.
        let expected = match records.last() {
            None => Player::X,
            Some(last) if engine.status().is_terminal() => last.player,
            Some(last) => last.player.opponent(),
        };
        engine.current_player() == expected
    }

    fn description() -> &'static str {
        "Players alternate turns (X, O, X, O, ...)"
    }
}

/// Invariant: the lines through the latest move are settled.
///
/// Live lines through that cell are unmixed and listed at the cell. Dead ones
/// are gone from every cell they cover. O(n) per check.
pub struct LastMoveSettled;

impl Invariant<GameEngine> for LastMoveSettled {
    fn holds(engine: &GameEngine) -> bool {
        let Some(last) = engine.log().last() else {
            return true;
        };
        let registry = engine.registry();
        let listed = registry.lines_at(last.position);

        if engine.board().get(last.position) != Some(Cell::Occupied(last.player)) {
            return false;
        }

        registry.lines_through(last.position).into_iter().all(|id| {
            let line = registry.line(id);
            if registry.is_active(id) {
                listed.contains(&id) && !line.is_mixed(engine.board())
            } else {
                line.positions()
                    .iter()
                    .all(|pos| !registry.lines_at(*pos).contains(&id))
            }
        })
    }

    fn description() -> &'static str {
        "Lines through the latest move match the board"
    }
}

/// All engine invariants as a composable set.
pub type EngineInvariants = (
    ActiveLinesUnmixed,
    IndexConsistent,
    HistoryMatchesBoard,
    AlternatingTurns,
);
