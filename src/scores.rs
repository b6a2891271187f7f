//! Persistent score table.
//!
//! Top-10 list stored as JSON in the home directory. Load and save
//! failures degrade to an empty table and a log line; the game itself
//! never sees an error from here.

use std::fs;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::entities::GameMetrics;

/// Entries kept on the table.
pub const MAX_ENTRIES: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u32,
    pub wave: u32,
    pub accuracy: f32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScoreTable {
    pub entries: Vec<ScoreEntry>,
}

impl ScoreTable {
    /// Highest score on the table, 0 when empty.
    pub fn best(&self) -> u32 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }

    /// A score makes the table when it is nonzero and either the table
    /// has room or it beats the lowest entry.
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a finished run, keeping the list sorted descending and
    /// trimmed to [`MAX_ENTRIES`]. Returns the 1-based rank achieved.
    pub fn record(&mut self, metrics: &GameMetrics) -> Option<usize> {
        if !self.qualifies(metrics.score) {
            return None;
        }
        let entry = ScoreEntry {
            score: metrics.score,
            wave: metrics.wave,
            accuracy: metrics.accuracy,
        };
        let pos = self
            .entries
            .iter()
            .position(|e| metrics.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_ENTRIES);
        Some(pos + 1)
    }

    /// Load the table from disk; anything unreadable starts fresh.
    pub fn load() -> Self {
        let path = config::scores_path();
        match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(table) => table,
                Err(err) => {
                    log::warn!(
                        "score table at {} is corrupt ({}), starting fresh",
                        path.display(),
                        err
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist the table; failure is logged and otherwise ignored.
    pub fn save(&self) {
        let path = config::scores_path();
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = fs::write(&path, json) {
                    log::warn!("could not save score table to {}: {}", path.display(), err);
                } else {
                    log::debug!("score table saved ({} entries)", self.entries.len());
                }
            }
            Err(err) => log::warn!("could not serialize score table: {}", err),
        }
    }
}
