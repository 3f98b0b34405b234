//! High score leaderboard and stores
//!
//! The simulation never touches storage. The session host asks a
//! [`HighScoreStore`] for the best score at session start and hands it a new
//! record at game over.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Errors from a high score backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("high score data is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("high score store unavailable: {0}")]
    Unavailable(String),
}

/// Backend that remembers the best score between sessions
pub trait HighScoreStore {
    /// Best score on record (0 when there is none)
    fn load_high_score(&mut self) -> Result<u64, StoreError>;

    /// Record a new best score reached on `level`
    fn save_high_score(&mut self, score: u64, level: u32) -> Result<(), StoreError>;
}

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's score
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// High score leaderboard, sorted best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
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

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, level: u32, timestamp: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            level,
            timestamp,
        };

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

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// In-process store, forgets everything on exit
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub scores: HighScores,
}

impl HighScoreStore for MemoryStore {
    fn load_high_score(&mut self) -> Result<u64, StoreError> {
        Ok(self.scores.top_score().unwrap_or(0))
    }

    fn save_high_score(&mut self, score: u64, level: u32) -> Result<(), StoreError> {
        self.scores.add_score(score, level, now_millis());
        Ok(())
    }
}

/// Leaderboard persisted as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    scores: HighScores,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            scores: HighScores::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    fn read(&self) -> Result<HighScores, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No high scores at {}, starting fresh", self.path.display());
                Ok(HighScores::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl HighScoreStore for JsonFileStore {
    fn load_high_score(&mut self) -> Result<u64, StoreError> {
        self.scores = self.read()?;
        log::info!("Loaded {} high scores", self.scores.entries.len());
        Ok(self.scores.top_score().unwrap_or(0))
    }

    fn save_high_score(&mut self, score: u64, level: u32) -> Result<(), StoreError> {
        self.scores.add_score(score, level, now_millis());
        let json = serde_json::to_string_pretty(&self.scores)?;
        std::fs::write(&self.path, json)?;
        log::info!("High scores saved ({} entries)", self.scores.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_score_keeps_descending_order() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(500, 2, 1), Some(1));
        assert_eq!(scores.add_score(900, 3, 2), Some(1));
        assert_eq!(scores.add_score(700, 2, 3), Some(2));
        let ordered: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![900, 700, 500]);
        assert_eq!(scores.top_score(), Some(900));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.add_score(0, 1, 1), None);
    }

    #[test]
    fn test_leaderboard_is_capped() {
        let mut scores = HighScores::new();
        for i in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_score(i * 100, 1, i);
        }
        assert!(!scores.qualifies(50));
        assert!(scores.qualifies(150));
        scores.add_score(5000, 4, 99);
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(200));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::default();
        assert_eq!(store.load_high_score().unwrap(), 0);
        store.save_high_score(1200, 3).unwrap();
        assert_eq!(store.load_high_score().unwrap(), 1200);
    }

    #[test]
    fn test_json_store_missing_file_is_empty() {
        let path = std::env::temp_dir().join(format!(
            "neon_breakout_missing_{}.json",
            std::process::id()
        ));
        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.load_high_score().unwrap(), 0);
    }

    #[test]
    fn test_json_store_persists() {
        let path = std::env::temp_dir().join(format!(
            "neon_breakout_scores_{}.json",
            std::process::id()
        ));
        let mut store = JsonFileStore::new(&path);
        store.save_high_score(4200, 5).unwrap();

        let mut reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load_high_score().unwrap(), 4200);
        assert_eq!(reopened.scores().entries[0].level, 5);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_json_store_rejects_garbage() {
        let path = std::env::temp_dir().join(format!(
            "neon_breakout_garbage_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "not json").unwrap();
        let mut store = JsonFileStore::new(&path);
        assert!(matches!(store.load_high_score(), Err(StoreError::Json(_))));
        let _ = std::fs::remove_file(&path);
    }
}
