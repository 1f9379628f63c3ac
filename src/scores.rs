//! End-of-game ranking
//!
//! Built once when every player has finished, sorted by score descending.

use serde::{Deserialize, Serialize};

/// A single ranked player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player_id: u32,
    pub name: String,
    pub score: f64,
}

/// Final standings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Ranking {
    pub entries: Vec<ScoreEntry>,
}

impl Ranking {
    /// Create an empty ranking
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert an entry behind every entry with an equal or higher score.
    /// Returns the rank achieved (1-indexed).
    pub fn add(&mut self, entry: ScoreEntry) -> usize {
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top two players share the best score
    pub fn is_tie(&self) -> bool {
        match self.entries.as_slice() {
            [first, second, ..] => first.score == second.score,
            _ => false,
        }
    }

    /// Sole best entry, if there is no tie
    pub fn winner(&self) -> Option<&ScoreEntry> {
        if self.is_tie() { None } else { self.entries.first() }
    }

    /// One-line result for the scoreboard
    pub fn headline(&self) -> String {
        if self.is_tie() {
            "It's a tie!".to_string()
        } else {
            match self.winner() {
                Some(entry) => format!("{} won the game!", entry.name),
                None => "Nobody played".to_string(),
            }
        }
    }

    /// Lines like "Max: 29" in rank order
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(|e| format!("{}: {}", e.name, e.score))
    }
}
