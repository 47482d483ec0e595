//! JSON-lines score book
//!
//! One [`ScoreRecord`] per line, appended on every recorded check.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use abprune_engine::score::{next_id, sort_newest_first, ScoreRecord, ScoreSink};
use anyhow::{Context, Result};
use tracing::debug;

pub struct JsonlScoreBook {
    path: PathBuf,
}

impl JsonlScoreBook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreSink for JsonlScoreBook {
    type Error = anyhow::Error;

    fn record(&mut self, mut record: ScoreRecord) -> Result<u64> {
        record.id = next_id(&self.records()?);
        let line = serde_json::to_string(&record).context("failed to encode score record")?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open score book {}", self.path.display()))?;
        writeln!(file, "{}", line)
            .with_context(|| format!("failed to write score book {}", self.path.display()))?;
        debug!(path = %self.path.display(), id = record.id, score = record.score, "score recorded");
        Ok(record.id)
    }

    fn records(&self) -> Result<Vec<ScoreRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read score book {}", self.path.display()))?;

        let mut records = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: ScoreRecord = serde_json::from_str(line).with_context(|| {
                format!("{}:{}: malformed score record", self.path.display(), line_no + 1)
            })?;
            records.push(record);
        }
        sort_newest_first(&mut records);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abprune_engine::lifecycle::{check_answer, reveal_solution};
    use abprune_engine::test_tree::build_reference_tree;
    use chrono::Duration;
    use tempfile::tempdir;

    fn record(solved: bool) -> ScoreRecord {
        let mut tree = build_reference_tree();
        if solved {
            reveal_solution(&mut tree);
        }
        ScoreRecord::new(&tree, &check_answer(&tree))
    }

    #[test]
    fn test_missing_file_is_empty_book() {
        let dir = tempdir().unwrap();
        let book = JsonlScoreBook::new(dir.path().join("scores.jsonl"));
        assert!(book.records().unwrap().is_empty());
    }

    #[test]
    fn test_append_and_read_back_newest_first() {
        let dir = tempdir().unwrap();
        let mut book = JsonlScoreBook::new(dir.path().join("scores.jsonl"));
        let mut first = record(false);
        first.created_at = first.created_at - Duration::seconds(30);
        let mut second = record(true);
        first.id = book.record(first.clone()).unwrap();
        second.id = book.record(second.clone()).unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        let text = fs::read_to_string(book.path()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(book.records().unwrap(), vec![second, first]);
    }

    #[test]
    fn test_get_by_id_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.jsonl");
        let id = {
            let mut book = JsonlScoreBook::new(&path);
            book.record(record(false)).unwrap();
            book.record(record(true)).unwrap()
        };

        let mut book = JsonlScoreBook::new(&path);
        let stored = book.get(id).unwrap().unwrap();
        assert!(stored.is_correct);
        assert_eq!(stored.tree.root.value, Some(3));
        assert!(book.get(42).unwrap().is_none());
        assert_eq!(book.record(record(true)).unwrap(), 3);
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.jsonl");
        let good = serde_json::to_string(&record(true)).unwrap();
        fs::write(&path, format!("{}\n\nnot json\n", good)).unwrap();
        let err = JsonlScoreBook::new(&path).records().unwrap_err();
        assert!(format!("{:#}", err).contains(":3: malformed score record"));
    }
}
