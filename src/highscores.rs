//! Session completion sink and local score bookkeeping
//!
//! The simulation hands each finished session's score to a `SessionSink`
//! exactly once. Durable storage and leaderboard submission live behind this
//! trait; `HighScores` is the in-memory bookkeeping a client keeps locally.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Receiver of finished-session scores
pub trait SessionSink {
    fn report_session(&mut self, final_score: u64);
}

/// Drops every report
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SessionSink for NullSink {
    fn report_session(&mut self, _final_score: u64) {}
}

/// Records every reported score in order
impl SessionSink for Vec<u64> {
    fn report_session(&mut self, final_score: u64) {
        self.push(final_score);
    }
}

/// Per-player running totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub total_games: u32,
    pub high_score: u64,
    pub last_score: u64,
    /// Whether the most recent session set a new personal best
    pub is_new_high_score: bool,
}

impl PlayerStats {
    /// Fold one finished session into the totals
    pub fn record(&mut self, score: u64) {
        self.total_games += 1;
        self.last_score = score;
        self.is_new_high_score = score > self.high_score;
        if self.is_new_high_score {
            self.high_score = score;
        }
    }
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score
    pub score: u64,
    /// Session number (1-based) that achieved it
    pub game: u32,
}

/// High score table plus player totals
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    /// Sorted descending by score
    pub entries: Vec<HighScoreEntry>,
    pub stats: PlayerStats,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, game: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry { score, game };

        // Find insertion point (sorted descending by score, ties keep the older first)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl SessionSink for HighScores {
    fn report_session(&mut self, final_score: u64) {
        self.stats.record(final_score);
        let game = self.stats.total_games;
        match self.add_score(final_score, game) {
            Some(rank) => log::info!("Game {} scored {} (rank {})", game, final_score, rank),
            None => log::info!("Game {} scored {}", game, final_score),
        }
    }
}
