//! Append-only move history and its text format.
//!
//! The text format is one `[row,col]` per line. Debug tooling pastes these
//! logs back in to reconstruct matches, so `parse(serialize(log))` must give
//! back exactly the logged positions.

use crate::types::{Player, Position};
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

/// A move as recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Where the mark was placed.
    pub position: Position,
    /// Who placed it.
    pub player: Player,
}

/// Ordered record of every accepted move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLog {
    records: Vec<MoveRecord>,
}

impl MoveLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a move.
    pub fn append(&mut self, position: Position, player: Player) {
        self.records.push(MoveRecord { position, player });
    }

    /// All records in play order.
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    /// Positions in play order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.records.iter().map(|r| r.position)
    }

    /// The most recent move.
    pub fn last(&self) -> Option<&MoveRecord> {
        self.records.last()
    }

    /// Number of moves recorded.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Checks if no move has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Encodes the log as one `[row,col]` line per move.
    pub fn serialize(&self) -> String {
        serialize_positions(self.positions())
    }

    /// Decodes a move-history text into positions.
    ///
    /// Accepts `\n` or `\r\n` separators and ignores blank lines. Lines that
    /// are not a pair of non-negative integers are skipped.
    #[instrument(skip(text), fields(bytes = text.len()))]
    pub fn parse(text: &str) -> Vec<Position> {
        text.split(['\r', '\n'])
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| {
                let parsed = parse_line(line);
                if parsed.is_none() {
                    trace!(line, "Skipping malformed move line");
                }
                parsed
            })
            .collect()
    }
}

/// Encodes positions in the move-history format.
pub fn serialize_positions(positions: impl IntoIterator<Item = Position>) -> String {
    let mut out = String::new();
    for pos in positions {
        out.push_str(&pos.to_string());
        out.push('\n');
    }
    out
}

fn parse_line(line: &str) -> Option<Position> {
    let inner = line.trim().trim_matches(|c: char| c == '[' || c == ']');
    let mut parts = inner.split(',');
    let row = parts.next()?.trim().parse::<usize>().ok()?;
    let col = parts.next()?.trim().parse::<usize>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Position::new(row, col))
}

impl std::fmt::Display for MoveLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.serialize())
    }
}
