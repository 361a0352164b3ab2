//! Turn-based game engine.
//!
//! One [`GameEngine`] is one game session. It owns the board, the line
//! registry and the move log, validates moves, detects wins and draws and
//! notifies listeners synchronously before `make_move` returns.
//!
//! A game is drawn as soon as no line can be completed by either player, which
//! can happen while empty cells remain.

use crate::board::Board;
use crate::error::GameError;
use crate::events::{GameEvent, ListenerId, Listeners};
use crate::invariants::{
    EngineInvariants, Invariant, InvariantSet, InvariantViolation, LastMoveSettled,
};
use crate::lines::{Line, LineId, LineRegistry};
use crate::move_log::MoveLog;
use crate::types::{Cell, Player, Position};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Player),
    /// Game ended in a draw.
    Draw,
}

impl GameStatus {
    /// Returns true once the game has ended.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameStatus::Won(player) => Some(*player),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "In progress"),
            GameStatus::Won(player) => write!(f, "Player {} wins", player),
            GameStatus::Draw => write!(f, "Draw"),
        }
    }
}

/// Read-only copy of the engine state for presentation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Board contents.
    pub board: Board,
    /// Player to move, or the last mover once the game is over.
    pub current_player: Player,
    /// Game status.
    pub status: GameStatus,
    /// Lines still winnable.
    pub active_lines: Vec<Line>,
    /// Number of accepted moves.
    pub moves: usize,
}

/// N-by-N tic-tac-toe engine.
#[derive(Debug)]
pub struct GameEngine {
    board: Board,
    registry: LineRegistry,
    log: MoveLog,
    current: Player,
    status: GameStatus,
    winning_line: Option<LineId>,
    listeners: Listeners,
}

impl GameEngine {
    /// Creates a new game on an empty `size * size` board. X moves first.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidSize`] when `size < 2`.
    #[instrument]
    pub fn new(size: usize) -> Result<Self, GameError> {
        let board = Board::new(size)?;
        let registry = LineRegistry::generate(size)?;
        debug!(size, "Starting game session");
        Ok(Self {
            board,
            registry,
            log: MoveLog::new(),
            current: Player::X,
            status: GameStatus::InProgress,
            winning_line: None,
            listeners: Listeners::default(),
        })
    }

    /// Replays positions on a fresh engine, stopping at the first terminal move.
    ///
    /// # Errors
    ///
    /// Propagates the first rejected move.
    #[instrument(skip(positions))]
    pub fn replay(
        size: usize,
        positions: impl IntoIterator<Item = Position>,
    ) -> Result<Self, GameError> {
        let mut engine = Self::new(size)?;
        for pos in positions {
            if engine.status.is_terminal() {
                debug!(position = %pos, "Ignoring moves after game end");
                break;
            }
            engine.make_move_at(pos)?;
        }
        Ok(engine)
    }

    /// Replays positions like [`GameEngine::replay`], skipping rejected moves.
    ///
    /// Returns the engine together with the positions that were skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidSize`] for an unsupported `size`.
    #[instrument(skip(positions))]
    pub fn replay_lenient(
        size: usize,
        positions: impl IntoIterator<Item = Position>,
    ) -> Result<(Self, Vec<Position>), GameError> {
        let mut engine = Self::new(size)?;
        let mut skipped = Vec::new();
        for pos in positions {
            if engine.status.is_terminal() {
                debug!(position = %pos, "Ignoring moves after game end");
                break;
            }
            if let Err(e) = engine.make_move_at(pos) {
                debug!(position = %pos, error = %e, "Skipping rejected move");
                skipped.push(pos);
            }
        }
        Ok((engine, skipped))
    }

    /// Places the current player's mark at `(row, col)`.
    ///
    /// On success emits `MoveMade`, then at most one of `Win` or `Draw`, and
    /// returns the resulting status. A rejected move changes nothing and emits
    /// nothing.
    ///
    /// # Errors
    ///
    /// - [`GameError::GameOver`] if the game has already ended.
    /// - [`GameError::IllegalMove`] if the coordinates are off the board or
    ///   the cell is occupied.
    #[instrument(skip(self), fields(player = %self.current))]
    pub fn make_move(&mut self, row: i64, col: i64) -> Result<GameStatus, GameError> {
        if self.status.is_terminal() {
            warn!(row, col, status = %self.status, "Move rejected, game is over");
            return Err(GameError::GameOver);
        }

        let pos = Position::checked(row, col, self.board.size())
            .filter(|pos| self.board.is_empty(*pos))
            .ok_or_else(|| {
                warn!(row, col, "Move rejected, cell unavailable");
                GameError::IllegalMove { row, col }
            })?;

        let player = self.current;
        self.board.set(pos, Cell::Occupied(player));
        self.log.append(pos, player);
        self.listeners.emit(&GameEvent::MoveMade {
            position: pos,
            player,
        });

        self.registry.invalidate_touching(pos, &self.board);

        if let Some(line) = self.completed_line(pos, player) {
            self.status = GameStatus::Won(player);
            self.winning_line = Some(line);
            info!(position = %pos, %player, line = %self.registry.line(line), "Game won");
            self.listeners.emit(&GameEvent::Win {
                position: pos,
                player,
            });
        } else if self.registry.active_count() == 0 {
            self.status = GameStatus::Draw;
            info!(position = %pos, %player, moves = self.log.len(), "Game drawn");
            self.listeners.emit(&GameEvent::Draw {
                position: pos,
                player,
            });
        } else {
            self.current = player.opponent();
        }

        debug_assert!(
            LastMoveSettled::holds(self),
            "{} after {}",
            LastMoveSettled::description(),
            pos
        );
        Ok(self.status)
    }

    /// Same as [`GameEngine::make_move`] for an unsigned position.
    pub fn make_move_at(&mut self, pos: Position) -> Result<GameStatus, GameError> {
        let row = i64::try_from(pos.row).unwrap_or(i64::MAX);
        let col = i64::try_from(pos.col).unwrap_or(i64::MAX);
        self.make_move(row, col)
    }

    /// Boolean form of [`GameEngine::make_move`]: true if the move was accepted.
    pub fn try_move(&mut self, row: i64, col: i64) -> bool {
        self.make_move(row, col).is_ok()
    }

    /// Live line through `pos` filled entirely by `player`.
    ///
    /// Mixed lines are already gone, so checking each cell against the mover
    /// is enough.
    fn completed_line(&self, pos: Position, player: Player) -> Option<LineId> {
        self.registry.lines_at(pos).iter().copied().find(|id| {
            self.registry
                .line(*id)
                .positions()
                .iter()
                .all(|p| self.board.get(*p) == Some(Cell::Occupied(player)))
        })
    }

    /// Registers a callback for game events.
    pub fn subscribe(&mut self, callback: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(callback)
    }

    /// Removes a callback. Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Moves every callback registered on `previous` onto this engine.
    pub(crate) fn adopt_listeners(&mut self, previous: &mut GameEngine) {
        self.listeners = std::mem::take(&mut previous.listeners);
    }

    /// Number of registered callbacks.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Checks every engine invariant.
    ///
    /// Sweeps the whole board and history. Accepted moves only check the
    /// lines through the cell just played, in debug builds.
    pub fn verify(&self) -> Result<(), Vec<InvariantViolation>> {
        EngineInvariants::check_all(self)
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.board.size()
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the line registry.
    pub fn registry(&self) -> &LineRegistry {
        &self.registry
    }

    /// Lines still winnable by either player.
    pub fn active_lines(&self) -> impl Iterator<Item = &Line> + '_ {
        self.registry.active_lines()
    }

    /// Returns the move log.
    pub fn log(&self) -> &MoveLog {
        &self.log
    }

    /// Player to move. After the game ends this stays the last mover.
    pub fn current_player(&self) -> Player {
        self.current
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns true once the game has ended.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The line that won the game, if any.
    pub fn winning_line(&self) -> Option<&Line> {
        self.winning_line.map(|id| self.registry.line(id))
    }

    /// Copies the state presentation code needs.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            current_player: self.current,
            status: self.status,
            active_lines: self.registry.active_lines().cloned().collect(),
            moves: self.log.len(),
        }
    }

    #[cfg(test)]
    pub(crate) fn board_mut_for_tests(&mut self) -> &mut Board {
        &mut self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(engine: &mut GameEngine) -> Rc<RefCell<Vec<GameEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        engine.subscribe(move |event| sink.borrow_mut().push(*event));
        events
    }

    #[test]
    fn test_new_game() {
        let engine = GameEngine::new(3).unwrap();
        assert_eq!(engine.current_player(), Player::X);
        assert_eq!(engine.status(), GameStatus::InProgress);
        assert_eq!(engine.active_lines().count(), 8);
        assert!(engine.log().is_empty());
    }

    #[test]
    fn test_invalid_size() {
        assert!(matches!(
            GameEngine::new(1),
            Err(GameError::InvalidSize { size: 1 })
        ));
    }

    #[test]
    fn test_moves_alternate() {
        let mut engine = GameEngine::new(3).unwrap();
        assert_eq!(engine.make_move(0, 0), Ok(GameStatus::InProgress));
        assert_eq!(engine.current_player(), Player::O);
        assert_eq!(engine.make_move(0, 1), Ok(GameStatus::InProgress));
        assert_eq!(engine.board().get(Position::new(0, 0)), Some(Cell::Occupied(Player::X)));
        assert_eq!(engine.board().get(Position::new(0, 1)), Some(Cell::Occupied(Player::O)));
        assert_eq!(engine.current_player(), Player::X);
    }

    #[test]
    fn test_occupied_cell_rejected_without_mutation() {
        let mut engine = GameEngine::new(3).unwrap();
        engine.make_move(1, 1).unwrap();
        let events = record(&mut engine);
        let before = engine.snapshot();

        assert_eq!(
            engine.make_move(1, 1),
            Err(GameError::IllegalMove { row: 1, col: 1 })
        );
        assert_eq!(engine.snapshot(), before);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut engine = GameEngine::new(3).unwrap();
        for (row, col) in [(-1, 0), (3, 0), (0, -1), (0, 3)] {
            assert_eq!(
                engine.make_move(row, col),
                Err(GameError::IllegalMove { row, col })
            );
        }
        assert_eq!(engine.board().occupied(), 0);
        assert!(!engine.try_move(5, 5));
    }

    #[test]
    fn test_win_events_in_order() {
        let mut engine = GameEngine::new(3).unwrap();
        let events = record(&mut engine);
        for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            engine.make_move(row, col).unwrap();
        }
        events.borrow_mut().clear();

        assert_eq!(engine.make_move(0, 2), Ok(GameStatus::Won(Player::X)));
        let pos = Position::new(0, 2);
        assert_eq!(
            *events.borrow(),
            vec![
                GameEvent::MoveMade {
                    position: pos,
                    player: Player::X
                },
                GameEvent::Win {
                    position: pos,
                    player: Player::X
                },
            ]
        );
        assert_eq!(engine.current_player(), Player::X);
        assert_eq!(
            engine.winning_line().map(|l| l.to_string()),
            Some("[0,0][0,1][0,2]".to_string())
        );
    }

    #[test]
    fn test_early_draw() {
        let mut engine = GameEngine::new(3).unwrap();
        let events = record(&mut engine);
        let moves = [(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2), (2, 1)];
        for (row, col) in moves {
            assert_eq!(engine.make_move(row, col), Ok(GameStatus::InProgress));
        }

        assert_eq!(engine.make_move(2, 0), Ok(GameStatus::Draw));
        assert!(engine.board().is_empty(Position::new(2, 2)));
        assert_eq!(engine.registry().active_count(), 0);
        assert_eq!(
            events.borrow().last(),
            Some(&GameEvent::Draw {
                position: Position::new(2, 0),
                player: Player::O
            })
        );
    }

    #[test]
    fn test_game_over_is_final() {
        let mut engine = GameEngine::new(2).unwrap();
        engine.make_move(0, 0).unwrap();
        engine.make_move(1, 1).unwrap();
        assert_eq!(engine.make_move(0, 1), Ok(GameStatus::Won(Player::X)));

        let events = record(&mut engine);
        let before = engine.snapshot();
        assert_eq!(engine.make_move(1, 0), Err(GameError::GameOver));
        assert_eq!(engine.make_move(-1, 0), Err(GameError::GameOver));
        assert_eq!(engine.snapshot(), before);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_unsubscribed_listener_is_silent() {
        let mut engine = GameEngine::new(3).unwrap();
        let events = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&events);
        let id = engine.subscribe(move |_| *sink.borrow_mut() += 1);
        engine.make_move(0, 0).unwrap();
        assert!(engine.unsubscribe(id));
        engine.make_move(1, 1).unwrap();
        assert_eq!(*events.borrow(), 1);
    }

    #[test]
    fn test_replay_stops_at_terminal_move() {
        let positions = [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2), (2, 2)]
            .map(Position::from);
        let engine = GameEngine::replay(3, positions).unwrap();
        assert_eq!(engine.status(), GameStatus::Won(Player::X));
        assert_eq!(engine.log().len(), 5);
    }

    #[test]
    fn test_replay_propagates_errors() {
        let positions = [(0, 0), (0, 0)].map(Position::from);
        assert_eq!(
            GameEngine::replay(3, positions).err(),
            Some(GameError::IllegalMove { row: 0, col: 0 })
        );
    }

    #[test]
    fn test_lenient_replay_skips_rejected_moves() {
        let text = "[0,0]\n[0,0]\n[1,0]\n[9,9]\n[0,1]\n[1,1]\n[0,2]\n[2,2]\n";
        let (engine, skipped) = GameEngine::replay_lenient(3, MoveLog::parse(text)).unwrap();
        assert_eq!(skipped, vec![Position::new(0, 0), Position::new(9, 9)]);
        assert_eq!(engine.status(), GameStatus::Won(Player::X));
        assert_eq!(engine.log().len(), 5);
    }

    #[test]
    fn test_lenient_replay_rejects_bad_size() {
        assert_eq!(
            GameEngine::replay_lenient(1, Vec::new()).err(),
            Some(GameError::InvalidSize { size: 1 })
        );
    }

    #[test]
    fn test_oversized_board_is_an_error() {
        assert_eq!(
            GameEngine::new(usize::MAX).err(),
            Some(GameError::InvalidSize { size: usize::MAX })
        );
    }

    #[test]
    fn test_large_board_plays_out() {
        let n = 64;
        let mut engine = GameEngine::new(n).unwrap();
        let mut moves = 0;
        while !engine.is_terminal() {
            let pos = engine.board().empty_positions()[0];
            engine.make_move_at(pos).unwrap();
            moves += 1;
        }
        assert!(moves <= n * n);
        assert!(engine.verify().is_ok());
    }
}
