//! High score leaderboard system
//!
//! Finished runs are graded and submitted to a [`LeaderboardStore`]. The JSON
//! file store is the durable one; the in-memory table is what a run falls back
//! to when the file cannot be read or written.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::tuning::GradeThresholds;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("leaderboard io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard data is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// Letter grade derived from the final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn for_score(score: u64, thresholds: &GradeThresholds) -> Self {
        if score >= thresholds.s {
            Grade::S
        } else if score >= thresholds.a {
            Grade::A
        } else if score >= thresholds.b {
            Grade::B
        } else if score >= thresholds.c {
            Grade::C
        } else {
            Grade::D
        }
    }
}

/// What a finished run submits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub team: String,
    pub score: u64,
    pub grade: Grade,
}

/// A ranked row as returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-indexed
    pub rank: usize,
    #[serde(flatten)]
    pub result: RunResult,
}

/// Somewhere a run result can be recorded
pub trait LeaderboardStore {
    /// Record `result` and return the current standings
    fn submit(&mut self, result: &RunResult) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;
}

fn default_limit() -> usize {
    MAX_HIGH_SCORES
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<RunResult>,
    #[serde(skip, default = "default_limit")]
    limit: usize,
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::with_limit(MAX_HIGH_SCORES)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < self.limit {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a run to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add(&mut self, result: RunResult) -> Option<usize> {
        if !self.qualifies(result.score) {
            return None;
        }

        // Sorted descending; equal scores keep the earlier run first
        let pos = self.entries.iter().position(|e| result.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, result);
                i + 1
            }
            None => {
                self.entries.push(result);
                self.entries.len()
            }
        };

        self.entries.truncate(self.limit);
        Some(rank)
    }

    pub fn standings(&self) -> Vec<LeaderboardEntry> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, result)| LeaderboardEntry {
                rank: i + 1,
                result: result.clone(),
            })
            .collect()
    }
}

impl LeaderboardStore for HighScores {
    fn submit(&mut self, result: &RunResult) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        match self.add(result.clone()) {
            Some(rank) => log::info!("{} placed #{rank} with {}", result.name, result.score),
            None => log::info!("{} did not place ({})", result.name, result.score),
        }
        Ok(self.standings())
    }
}

/// Leaderboard persisted as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileLeaderboard {
    path: PathBuf,
    limit: usize,
}

impl JsonFileLeaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            limit: MAX_HIGH_SCORES,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Read the table; a missing file is an empty leaderboard
    pub fn load(&self) -> Result<HighScores, LeaderboardError> {
        let mut table = HighScores::with_limit(self.limit);
        match fs::read_to_string(&self.path) {
            Ok(json) => {
                let stored: HighScores = serde_json::from_str(&json)?;
                for result in stored.entries {
                    table.add(result);
                }
                log::info!("Loaded {} high scores from {}", table.entries.len(), self.path.display());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(table)
    }

    pub fn save(&self, table: &HighScores) -> Result<(), LeaderboardError> {
        let json = serde_json::to_string_pretty(table)?;
        fs::write(&self.path, json)?;
        log::info!("High scores saved ({} entries)", table.entries.len());
        Ok(())
    }
}

impl LeaderboardStore for JsonFileLeaderboard {
    fn submit(&mut self, result: &RunResult) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let mut table = self.load()?;
        let standings = table.submit(result)?;
        self.save(&table)?;
        Ok(standings)
    }
}

/// Try `primary`; on failure log it and record the run in `fallback` instead.
/// Returns an empty list only if both stores fail.
pub fn submit_with_fallback(
    primary: &mut dyn LeaderboardStore,
    fallback: &mut dyn LeaderboardStore,
    result: &RunResult,
) -> Vec<LeaderboardEntry> {
    match primary.submit(result) {
        Ok(standings) => standings,
        Err(e) => {
            log::warn!("Leaderboard submit failed, using fallback: {e}");
            fallback.submit(result).unwrap_or_else(|e| {
                log::error!("Fallback leaderboard failed too: {e}");
                Vec::new()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(name: &str, score: u64) -> RunResult {
        RunResult {
            name: name.to_string(),
            company: String::new(),
            team: String::new(),
            score,
            grade: Grade::for_score(score, &GradeThresholds::default()),
        }
    }

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cv-blaster-{tag}-{}.json", std::process::id()))
    }

    struct Offline;

    impl LeaderboardStore for Offline {
        fn submit(&mut self, _: &RunResult) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
            Err(std::io::Error::other("offline").into())
        }
    }

    #[test]
    fn test_grades() {
        let t = GradeThresholds::default();
        assert_eq!(Grade::for_score(15_000, &t), Grade::S);
        assert_eq!(Grade::for_score(14_999, &t), Grade::A);
        assert_eq!(Grade::for_score(6_000, &t), Grade::B);
        assert_eq!(Grade::for_score(3_000, &t), Grade::C);
        assert_eq!(Grade::for_score(0, &t), Grade::D);
    }

    #[test]
    fn test_sorted_with_stable_ties() {
        let mut hs = HighScores::new();
        assert_eq!(hs.add(run("a", 500)), Some(1));
        assert_eq!(hs.add(run("b", 900)), Some(1));
        assert_eq!(hs.add(run("c", 500)), Some(3));
        let names: Vec<_> = hs.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(hs.entries[0].score, 900);
    }

    #[test]
    fn test_limit_and_qualification() {
        let mut hs = HighScores::with_limit(3);
        for score in [100, 200, 300] {
            hs.add(run("x", score));
        }
        assert!(!hs.qualifies(100));
        assert!(!hs.qualifies(0));
        assert!(hs.qualifies(250));
        assert_eq!(hs.add(run("y", 150)), Some(3));
        assert_eq!(hs.entries.len(), 3);
        assert_eq!(hs.entries.last().map(|e| e.score), Some(150));
    }

    #[test]
    fn test_file_store_persists() {
        let path = temp_path("persist");
        let _ = fs::remove_file(&path);
        let mut store = JsonFileLeaderboard::new(&path);

        store.submit(&run("ada", 4000)).unwrap();
        let standings = store.submit(&run("bob", 7000)).unwrap();
        assert_eq!(standings[0].result.name, "bob");
        assert_eq!(standings[1].rank, 2);

        let reloaded = JsonFileLeaderboard::new(&path).load().unwrap();
        assert_eq!(reloaded.entries.len(), 2);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_limit_applies_on_load() {
        let path = temp_path("limit");
        let _ = fs::remove_file(&path);
        let mut wide = JsonFileLeaderboard::new(&path);
        for score in [100, 200, 300] {
            wide.submit(&run("x", score)).unwrap();
        }

        let narrow = JsonFileLeaderboard::new(&path).with_limit(2);
        let table = narrow.load().unwrap();
        let scores: Vec<_> = table.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![300, 200]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json").unwrap();
        let mut store = JsonFileLeaderboard::new(&path);
        assert!(matches!(store.submit(&run("x", 10)), Err(LeaderboardError::Json(_))));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_fallback_on_primary_failure() {
        let mut memory = HighScores::new();
        let standings = submit_with_fallback(&mut Offline, &mut memory, &run("eve", 1234));
        assert_eq!(standings.len(), 1);
        assert_eq!(memory.entries[0].name, "eve");

        let nothing = submit_with_fallback(&mut Offline, &mut Offline, &run("eve", 1));
        assert!(nothing.is_empty());
    }
}
