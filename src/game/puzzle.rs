//! Puzzle Metadata
//!
//! Day-keyed puzzle records and the store boundary. Records are created by
//! an operator seed process and are read-only to this core; the answer is
//! stored only as a one-way digest, and the plaintext never reaches any
//! client-facing boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use thiserror::Error;

use crate::core::epoch::DayIndex;
use crate::core::hash::Digest32;

/// Puzzle difficulty tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    /// Warm-up puzzles.
    Easy,
    /// Standard daily difficulty.
    #[default]
    Medium,
    /// Weekend-grade puzzles.
    Hard,
}

impl DifficultyTier {
    /// Base point weight fed to the scoring mirror.
    pub const fn base_weight(self) -> u64 {
        match self {
            Self::Easy => 80,
            Self::Medium => 100,
            Self::Hard => 150,
        }
    }

    /// Default bonus multiplier in basis points, matching the seed data
    /// (0.8x / 1.0x / 1.5x).
    pub const fn default_multiplier_bps(self) -> u32 {
        match self {
            Self::Easy => 8_000,
            Self::Medium => 10_000,
            Self::Hard => 15_000,
        }
    }
}

/// One day's puzzle as stored in the metadata store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PuzzleRecord {
    /// Day this puzzle belongs to.
    pub day: DayIndex,
    /// Display title.
    pub title: String,
    /// Puzzle body text.
    pub body: String,
    /// Ordered hints, disclosed one at a time through the hint endpoint.
    pub hints: Vec<String>,
    /// Keccak-256 of the answer. Never the plaintext.
    pub answer_digest: Digest32,
    /// Difficulty tier.
    pub difficulty: DifficultyTier,
    /// Bonus multiplier in basis points (10_000 = 1.0x).
    pub bonus_multiplier_bps: u32,
}

/// Client-safe projection of a puzzle: no answer digest, no hint bodies.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PuzzlePublic {
    /// Day this puzzle belongs to.
    pub day: DayIndex,
    /// Display title.
    pub title: String,
    /// Puzzle body text.
    pub body: String,
    /// Number of hints available via the hint endpoint.
    pub hint_count: usize,
}

impl PuzzleRecord {
    /// Projection served to clients. Hints are counted, not included;
    /// their bodies are only released through the rate-limited hint
    /// endpoint.
    pub fn public_view(&self) -> PuzzlePublic {
        PuzzlePublic {
            day: self.day,
            title: self.title.clone(),
            body: self.body.clone(),
            hint_count: self.hints.len(),
        }
    }
}

/// Metadata store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Backing store unreachable. Transient.
    #[error("puzzle store unavailable: {0}")]
    Unavailable(String),
}

/// Puzzle metadata store boundary, keyed by day index.
#[async_trait]
pub trait PuzzleStore: Send + Sync {
    /// Fetch the puzzle for a day, if one is seeded.
    async fn get(&self, day: DayIndex) -> Result<Option<PuzzleRecord>, StoreError>;

    /// Insert or replace a puzzle record (operator path).
    async fn put(&self, record: PuzzleRecord) -> Result<(), StoreError>;
}

/// In-memory puzzle store for tests and the demo binary.
#[derive(Default)]
pub struct MemoryPuzzleStore {
    puzzles: Mutex<BTreeMap<DayIndex, PuzzleRecord>>,
}

impl MemoryPuzzleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PuzzleStore for MemoryPuzzleStore {
    async fn get(&self, day: DayIndex) -> Result<Option<PuzzleRecord>, StoreError> {
        let puzzles = self.puzzles.lock().unwrap_or_else(|e| e.into_inner());
        Ok(puzzles.get(&day).cloned())
    }

    async fn put(&self, record: PuzzleRecord) -> Result<(), StoreError> {
        let mut puzzles = self.puzzles.lock().unwrap_or_else(|e| e.into_inner());
        puzzles.insert(record.day, record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hash::answer_digest;

    fn record(day: u64) -> PuzzleRecord {
        PuzzleRecord {
            day: DayIndex(day),
            title: "Welcome Puzzle".to_string(),
            body: "Decode the message: 8-5-12-12-15.".to_string(),
            hints: vec!["A=1, B=2, C=3...".to_string(), "Hello".to_string()],
            answer_digest: answer_digest("hello"),
            difficulty: DifficultyTier::Easy,
            bonus_multiplier_bps: DifficultyTier::Easy.default_multiplier_bps(),
        }
    }

    #[tokio::test]
    async fn test_store_round_trip() {
        let store = MemoryPuzzleStore::new();
        store.put(record(20000)).await.unwrap();
        let fetched = store.get(DayIndex(20000)).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Welcome Puzzle");
        assert!(store.get(DayIndex(20001)).await.unwrap().is_none());
    }

    #[test]
    fn test_public_view_hides_answer_and_hints() {
        let view = record(20000).public_view();
        assert_eq!(view.hint_count, 2);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("Hello"));
        assert!(!json.contains("digest"));
    }

    #[test]
    fn test_tier_weights_are_ordered() {
        assert!(DifficultyTier::Easy.base_weight() < DifficultyTier::Medium.base_weight());
        assert!(DifficultyTier::Medium.base_weight() < DifficultyTier::Hard.base_weight());
    }
}
