//! Session-owned conversation history.
//!
//! Storage is never truncated; display and context windows are applied at
//! read time through [`History::last`].

use serde::Serialize;

use crate::turn::Turn;

/// Ordered, append-only sequence of turns with a single rollback operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a turn to the end.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// The last `n` turns in original order, or every turn if fewer exist.
    pub fn last(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Drop the most recent turn. Does nothing on an empty history.
    pub fn remove_last(&mut self) {
        self.turns.pop();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}
