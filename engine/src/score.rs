//! Score records handed to the persistence collaborator
//!
//! The engine only defines what a record looks like and how statistics are
//! derived from a set of them. Where records are stored is up to the caller,
//! through [`ScoreSink`].

use std::convert::Infallible;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::node::{GameTree, Side};
use crate::snapshot::{serialize, TreeSnapshot};
use crate::verify::Verdict;

/// Score awarded for a correct answer
pub const FULL_SCORE: u8 = 100;

/// All-or-nothing scoring: 100 for a correct answer, 0 otherwise.
pub fn score_for(correct: bool) -> u8 {
    if correct {
        FULL_SCORE
    } else {
        0
    }
}

/// One checked attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Assigned by the sink when stored, starting at 1; 0 until then
    #[serde(default)]
    pub id: u64,
    pub root_kind: Side,
    pub depth: u32,
    pub branching_factor: u32,
    pub score: u8,
    pub is_correct: bool,
    pub created_at: DateTime<Utc>,
    /// The tree as the user annotated it
    pub tree: TreeSnapshot,
}

impl ScoreRecord {
    /// Build a record for `tree` as just checked.
    pub fn new(tree: &GameTree, verdict: &Verdict) -> Self {
        let is_correct = verdict.is_correct();
        ScoreRecord {
            id: 0,
            root_kind: tree.root_side(),
            depth: tree.depth(),
            branching_factor: tree.branching_factor(),
            score: score_for(is_correct),
            is_correct,
            created_at: Utc::now(),
            tree: serialize(tree),
        }
    }
}

/// Destination for score records
pub trait ScoreSink {
    type Error;

    /// Store one record and return the id it was given
    fn record(&mut self, record: ScoreRecord) -> Result<u64, Self::Error>;

    /// All stored records, newest first
    fn records(&self) -> Result<Vec<ScoreRecord>, Self::Error>;

    /// One stored record, tree snapshot included
    fn get(&self, id: u64) -> Result<Option<ScoreRecord>, Self::Error> {
        Ok(self.records()?.into_iter().find(|r| r.id == id))
    }
}

/// Next free id after the given records
pub fn next_id(records: &[ScoreRecord]) -> u64 {
    records.iter().map(|r| r.id).max().unwrap_or(0) + 1
}

/// In-memory score book
#[derive(Debug, Default, Clone)]
pub struct MemoryScoreBook {
    records: Vec<ScoreRecord>,
}

impl MemoryScoreBook {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreSink for MemoryScoreBook {
    type Error = Infallible;

    fn record(&mut self, mut record: ScoreRecord) -> Result<u64, Self::Error> {
        record.id = next_id(&self.records);
        let id = record.id;
        self.records.push(record);
        Ok(id)
    }

    fn records(&self) -> Result<Vec<ScoreRecord>, Self::Error> {
        let mut out = self.records.clone();
        sort_newest_first(&mut out);
        Ok(out)
    }
}

/// Order records by `created_at`, newest first. Stable for equal timestamps.
pub fn sort_newest_first(records: &mut [ScoreRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Aggregate statistics over a user's attempts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub total_attempts: usize,
    pub correct_attempts: usize,
    pub incorrect_attempts: usize,
    /// Percentage of correct attempts (0 when there are none)
    pub accuracy: f64,
    pub average_score: f64,
}

impl ScoreStats {
    pub fn from_records(records: &[ScoreRecord]) -> Self {
        let total_attempts = records.len();
        let correct_attempts = records.iter().filter(|r| r.is_correct).count();
        let (accuracy, average_score) = if total_attempts == 0 {
            (0.0, 0.0)
        } else {
            let score_sum: f64 = records.iter().map(|r| f64::from(r.score)).sum();
            (
                correct_attempts as f64 / total_attempts as f64 * 100.0,
                score_sum / total_attempts as f64,
            )
        };
        ScoreStats {
            total_attempts,
            correct_attempts,
            incorrect_attempts: total_attempts - correct_attempts,
            accuracy,
            average_score,
        }
    }
}
