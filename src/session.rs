//! Match sessions: consecutive games with a running score.

use crate::bot::{MovePolicy, RandomLinePolicy};
use crate::config::{GameConfig, GameMode};
use crate::engine::{GameEngine, GameStatus};
use crate::error::GameError;
use crate::types::{Player, Position};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Results of finished games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Games won by X.
    pub x_wins: u32,
    /// Games won by O.
    pub o_wins: u32,
    /// Drawn games.
    pub draws: u32,
}

impl Scoreboard {
    /// Records a finished game. In-progress statuses are ignored.
    pub fn record(&mut self, status: GameStatus) {
        match status {
            GameStatus::Won(Player::X) => self.x_wins += 1,
            GameStatus::Won(Player::O) => self.o_wins += 1,
            GameStatus::Draw => self.draws += 1,
            GameStatus::InProgress => {}
        }
    }

    /// Number of finished games.
    pub fn games(&self) -> u32 {
        self.x_wins + self.o_wins + self.draws
    }
}

impl std::fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "X: {}  O: {}  Draws: {}",
            self.x_wins, self.o_wins, self.draws
        )
    }
}

/// A sequence of games of the same size, optionally against the bot.
///
/// The bot always plays O.
pub struct MatchSession {
    config: GameConfig,
    engine: GameEngine,
    bot: Option<Box<dyn MovePolicy>>,
    scores: Scoreboard,
    last_winner: Option<Player>,
}

impl MatchSession {
    /// Starts the first game of a match.
    #[instrument(skip(config), fields(size = config.size(), mode = %config.mode()))]
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let bot: Option<Box<dyn MovePolicy>> = match config.mode() {
            GameMode::PlayerVsPlayer => None,
            GameMode::PlayerVsBot => Some(match config.bot_seed() {
                Some(seed) => Box::new(RandomLinePolicy::new(*seed)),
                None => Box::new(RandomLinePolicy::from_entropy()),
            }),
        };
        Self::with_bot(config, bot)
    }

    /// Starts a match with a custom bot policy for O.
    pub fn with_bot(
        config: GameConfig,
        bot: Option<Box<dyn MovePolicy>>,
    ) -> Result<Self, GameError> {
        let engine = GameEngine::new(*config.size())?;
        info!("Match started");
        Ok(Self {
            config,
            engine,
            bot,
            scores: Scoreboard::default(),
            last_winner: None,
        })
    }

    /// Plays a move for the person whose turn it is and records a finished game.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::BotTurn`] while the bot is due to move, otherwise
    /// whatever [`GameEngine::make_move`] returns.
    pub fn play(&mut self, row: i64, col: i64) -> Result<GameStatus, GameError> {
        self.ensure_human_turn()?;
        let status = self.engine.make_move(row, col)?;
        self.settle(status);
        Ok(status)
    }

    /// Same as [`MatchSession::play`] for an unsigned position.
    pub fn play_at(&mut self, pos: Position) -> Result<GameStatus, GameError> {
        self.ensure_human_turn()?;
        let status = self.engine.make_move_at(pos)?;
        self.settle(status);
        Ok(status)
    }

    fn ensure_human_turn(&self) -> Result<(), GameError> {
        if self.is_bot_turn() {
            warn!("Move rejected, the bot holds this seat");
            return Err(GameError::BotTurn);
        }
        Ok(())
    }

    /// Checks if the bot is due to move.
    pub fn is_bot_turn(&self) -> bool {
        self.bot.is_some()
            && !self.engine.is_terminal()
            && self.engine.current_player() == Player::O
    }

    /// Lets the bot move if it is its turn. Returns the move it made.
    #[instrument(skip(self))]
    pub fn bot_turn(&mut self) -> Result<Option<Position>, GameError> {
        if !self.is_bot_turn() {
            return Ok(None);
        }
        let Some(choice) = self.bot.as_mut().and_then(|bot| bot.choose(&self.engine)) else {
            warn!("Bot found no move on a live board");
            return Ok(None);
        };
        let status = self.engine.make_move_at(choice)?;
        self.settle(status);
        Ok(Some(choice))
    }

    fn settle(&mut self, status: GameStatus) {
        if status.is_terminal() {
            self.scores.record(status);
            self.last_winner = status.winner();
            info!(%status, scores = %self.scores, "Game finished");
        }
    }

    /// Replaces the current game with a fresh one.
    ///
    /// Scores persist, and listeners subscribed through
    /// [`MatchSession::engine_mut`] move over to the new game.
    #[instrument(skip(self))]
    pub fn restart(&mut self) -> Result<(), GameError> {
        let mut fresh = GameEngine::new(*self.config.size())?;
        fresh.adopt_listeners(&mut self.engine);
        self.engine = fresh;
        info!(
            games = self.scores.games(),
            listeners = self.engine.listener_count(),
            "Game restarted"
        );
        Ok(())
    }

    /// The current game.
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Mutable access to the current game, e.g. to subscribe listeners.
    pub fn engine_mut(&mut self) -> &mut GameEngine {
        &mut self.engine
    }

    /// Match configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Running score.
    pub fn scores(&self) -> Scoreboard {
        self.scores
    }

    /// Winner of the most recent decisive game, cleared by a draw.
    pub fn last_winner(&self) -> Option<Player> {
        self.last_winner
    }
}

impl std::fmt::Debug for MatchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchSession")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .field("has_bot", &self.bot.is_some())
            .field("scores", &self.scores)
            .finish()
    }
}
