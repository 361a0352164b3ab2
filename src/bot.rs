//! Move-selection policies for computer players.
//!
//! A policy only reads the engine; the caller submits the chosen move through
//! `make_move` like any other player.

use crate::engine::GameEngine;
use crate::types::Position;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

/// Picks the next move for a computer player.
pub trait MovePolicy {
    /// Chooses a move, or `None` if the policy has nothing to offer.
    fn choose(&mut self, engine: &GameEngine) -> Option<Position>;
}

/// Picks the first empty cell in row-major order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstEmptyPolicy;

impl MovePolicy for FirstEmptyPolicy {
    fn choose(&mut self, engine: &GameEngine) -> Option<Position> {
        if engine.is_terminal() {
            return None;
        }
        engine.board().empty_positions().into_iter().next()
    }
}

/// Picks a random live line, then its first empty cell.
///
/// While the game is in progress every live line has an empty cell, since a
/// full live line would already be a win.
#[derive(Debug, Clone)]
pub struct RandomLinePolicy {
    rng: ChaCha8Rng,
}

impl RandomLinePolicy {
    /// Creates a policy with a deterministic seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a policy seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl MovePolicy for RandomLinePolicy {
    #[instrument(skip_all)]
    fn choose(&mut self, engine: &GameEngine) -> Option<Position> {
        if engine.is_terminal() {
            return None;
        }
        let registry = engine.registry();
        let live = registry.active_count();
        if live == 0 {
            return None;
        }

        let pick = self.rng.gen_range(0..live);
        let id = registry.active_ids().nth(pick)?;
        let line = registry.line(id);
        let choice = line
            .positions()
            .iter()
            .copied()
            .find(|pos| engine.board().is_empty(*pos));
        debug!(line = %line, choice = ?choice, "Bot picked line");
        choice
    }
}
