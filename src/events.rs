//! Game events and the synchronous listener list that delivers them.

use crate::types::{Player, Position};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Something that happened during [`GameEngine::make_move`](crate::GameEngine::make_move).
///
/// Every event carries the move that caused it and the player who made it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    /// A mark was placed.
    MoveMade {
        /// Cell that was played.
        position: Position,
        /// Player who played it.
        player: Player,
    },
    /// The move completed a line; `player` is the winner.
    Win {
        /// Cell that completed the line.
        position: Position,
        /// The winner.
        player: Player,
    },
    /// The move left no line winnable by either player.
    Draw {
        /// Cell that exhausted the last live line.
        position: Position,
        /// Player who made that move.
        player: Player,
    },
}

impl GameEvent {
    /// The move the event refers to.
    pub fn position(&self) -> Position {
        match self {
            GameEvent::MoveMade { position, .. }
            | GameEvent::Win { position, .. }
            | GameEvent::Draw { position, .. } => *position,
        }
    }

    /// The player the event refers to.
    pub fn player(&self) -> Player {
        match self {
            GameEvent::MoveMade { player, .. }
            | GameEvent::Win { player, .. }
            | GameEvent::Draw { player, .. } => *player,
        }
    }

    /// Checks if this event ends the game.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::Win { .. } | GameEvent::Draw { .. })
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::MoveMade { position, player } => write!(f, "{} played {}", player, position),
            GameEvent::Win { position, player } => write!(f, "{} wins at {}", player, position),
            GameEvent::Draw { position, player } => {
                write!(f, "Draw after {} played {}", player, position)
            }
        }
    }
}

/// Handle returned by [`Listeners::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&GameEvent)>;

/// Callbacks invoked in subscription order.
#[derive(Default)]
pub struct Listeners {
    entries: Vec<(ListenerId, Callback)>,
    next_id: u64,
}

impl Listeners {
    /// Registers a callback.
    pub fn subscribe(&mut self, callback: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Removes a callback. Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if there are no callbacks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Delivers an event to every callback before returning.
    pub fn emit(&mut self, event: &GameEvent) {
        trace!(%event, listeners = self.entries.len(), "Emitting event");
        for (_, callback) in &mut self.entries {
            callback(event);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.len())
            .finish()
    }
}
