//! Per-username score table
//!
//! One record per username. Stores serialize the whole table as a versioned
//! JSON envelope.

use serde::{Deserialize, Serialize};

/// Current envelope version
pub const LEADERBOARD_VERSION: u32 = 1;

/// How a finished session is merged into an existing record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScorePolicy {
    /// Keep the best session: overwrite score and count only when the new
    /// score is strictly higher
    #[default]
    BestScore,
    /// Add session score and count onto the stored totals
    Accumulate,
}

/// A persisted player record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub username: String,
    pub score: i32,
    pub count: u32,
}

impl ScoreRecord {
    pub fn new(username: impl Into<String>, score: i32, count: u32) -> Self {
        Self {
            username: username.into(),
            score,
            count,
        }
    }
}

/// Score table keyed by username
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Insertion order; see [`Leaderboard::ranked`] for display order
    pub records: Vec<ScoreRecord>,
}

fn default_version() -> u32 {
    LEADERBOARD_VERSION
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            version: LEADERBOARD_VERSION,
            records: Vec::new(),
        }
    }

    pub fn get(&self, username: &str) -> Option<&ScoreRecord> {
        self.records.iter().find(|r| r.username == username)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.get(username).is_some()
    }

    /// Insert a zero record for a new username. Returns true if inserted.
    pub fn create_if_absent(&mut self, username: &str) -> bool {
        if self.contains(username) {
            return false;
        }
        self.records.push(ScoreRecord::new(username, 0, 0));
        true
    }

    /// Merge a session result. Returns true if the table changed.
    pub fn apply(&mut self, session: &ScoreRecord, policy: ScorePolicy) -> bool {
        let Some(stored) = self
            .records
            .iter_mut()
            .find(|r| r.username == session.username)
        else {
            self.records.push(session.clone());
            return true;
        };

        match policy {
            ScorePolicy::BestScore => {
                if session.score > stored.score {
                    stored.score = session.score;
                    stored.count = session.count;
                    true
                } else {
                    false
                }
            }
            ScorePolicy::Accumulate => {
                stored.score = stored.score.saturating_add(session.score);
                stored.count = stored.count.saturating_add(session.count);
                session.score != 0 || session.count != 0
            }
        }
    }

    /// Records sorted by score, highest first (ties keep insertion order)
    pub fn ranked(&self) -> Vec<ScoreRecord> {
        let mut ranked = self.records.clone();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    /// Rank of a username (1-indexed)
    pub fn rank_of(&self, username: &str) -> Option<usize> {
        self.ranked()
            .iter()
            .position(|r| r.username == username)
            .map(|i| i + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<i32> {
        self.records.iter().map(|r| r.score).max()
    }
}
