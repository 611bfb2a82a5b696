//! Records exchanged with the outside of a game: the persisted high-score table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Entries kept in a table.
pub const MAX_ENTRIES: usize = 20;

/// Name recorded for players who did not enter one.
pub const DEFAULT_NAME: &str = "Player";

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed high score data: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    pub fn new(name: &str, score: u32) -> Self {
        let name = match name.trim() {
            "" => DEFAULT_NAME,
            name => name,
        };
        Self {
            name: name.to_owned(),
            score,
        }
    }
}

/// Best scores first; among equal scores the earlier entry ranks higher.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    entries: Vec<ScoreEntry>,
}

impl HighScores {
    pub fn from_json(json: &str) -> Result<Self> {
        let mut table: Self = serde_json::from_str(json)?;
        table.normalize();
        Ok(table)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn best(&self) -> Option<&ScoreEntry> {
        self.entries.first()
    }

    /// Adds a finished game, returning its rank when it made the table.
    ///
    /// Games that scored nothing are not recorded.
    pub fn record(&mut self, name: &str, score: u32) -> Option<usize> {
        if score == 0 {
            return None;
        }

        let rank = self.entries.partition_point(|entry| entry.score >= score);
        if rank >= MAX_ENTRIES {
            return None;
        }
        self.entries.insert(rank, ScoreEntry::new(name, score));
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    fn normalize(&mut self) {
        for entry in &mut self.entries {
            *entry = ScoreEntry::new(&entry.name, entry.score);
        }
        // stable, keeps the stored order of ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_table_sorted() {
        let mut table = HighScores::default();

        assert_eq!(table.record("ann", 300), Some(0));
        assert_eq!(table.record("bob", 900), Some(0));
        assert_eq!(table.record("cy", 300), Some(2));

        let names: Vec<_> = table.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["bob", "ann", "cy"]);
        assert_eq!(table.best().map(|e| e.score), Some(900));
    }

    #[test]
    fn blank_names_become_default_and_zero_is_skipped() {
        let mut table = HighScores::default();

        assert_eq!(table.record("   ", 50), Some(0));
        assert_eq!(table.record("zed", 0), None);

        assert_eq!(table.entries(), [ScoreEntry::new(DEFAULT_NAME, 50)]);
    }

    #[test]
    fn table_is_truncated_to_max_entries() {
        let mut table = HighScores::default();
        for score in 1..=25 {
            table.record("p", score * 10);
        }

        assert_eq!(table.entries().len(), MAX_ENTRIES);
        assert_eq!(table.best().map(|e| e.score), Some(250));
        assert_eq!(table.entries().last().map(|e| e.score), Some(60));
        assert_eq!(table.record("low", 5), None);
    }

    #[test]
    fn json_is_a_plain_list_and_loading_sorts_it() {
        let json = r#"[{"name":"a","score":10},{"name":"b","score":30}]"#;

        let table = HighScores::from_json(json).unwrap();

        assert_eq!(table.best(), Some(&ScoreEntry::new("b", 30)));
        let reloaded = HighScores::from_json(&table.to_json().unwrap()).unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn loaded_blank_names_become_default() {
        let json = r#"[{"name":"  ","score":10},{"name":" eve ","score":20}]"#;

        let table = HighScores::from_json(json).unwrap();

        assert_eq!(
            table.entries(),
            [ScoreEntry::new("eve", 20), ScoreEntry::new(DEFAULT_NAME, 10)]
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            HighScores::from_json("{not json"),
            Err(ProtocolError::Malformed(_))
        ));
    }
}
