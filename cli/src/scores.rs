use std::path::{Path, PathBuf};

use anyhow::Context;
use match3_protocol::HighScores;

use crate::config::FileConfig;

pub const DEFAULT_SCORES_FILE: &str = "match3_scores.json";

#[derive(clap::Args, Debug)]
pub struct ScoresArgs {
    /// High score file
    #[arg(long)]
    pub scores: Option<PathBuf>,

    /// TOML settings file, only `scores_file` is used here
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn scores_path(flag: Option<&Path>, file: &FileConfig) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| file.scores_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCORES_FILE))
}

/// Reads the table, a missing or corrupt file yields an empty one.
pub fn load(path: &Path) -> anyhow::Result<HighScores> {
    if !path.exists() {
        return Ok(HighScores::default());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("could not read high scores {}", path.display()))?;
    Ok(HighScores::from_json(&json).unwrap_or_else(|err| {
        log::warn!("ignoring high scores in {}: {}", path.display(), err);
        HighScores::default()
    }))
}

/// Like [`load`], but an unreadable file is only reported so a finished game can still be recorded.
pub fn load_or_empty(path: &Path) -> HighScores {
    load(path).unwrap_or_else(|err| {
        log::warn!("{:#}", err);
        HighScores::default()
    })
}

pub fn save(path: &Path, table: &HighScores) -> anyhow::Result<()> {
    let json = table.to_json()?;
    std::fs::write(path, json)
        .with_context(|| format!("could not write high scores {}", path.display()))
}

pub fn print(table: &HighScores) {
    if table.entries().is_empty() {
        println!("No high scores yet, play a game first!");
        return;
    }
    for (rank, entry) in table.entries().iter().enumerate() {
        println!("{:>2}. {:<12} {:>6}", rank + 1, entry.name, entry.score);
    }
}

pub fn run(args: ScoresArgs) -> anyhow::Result<()> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let table = load(&scores_path(args.scores.as_deref(), &file))?;
    print(&table);
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn corrupt_or_missing_files_give_an_empty_table() {
        let dir = TempDir::new().unwrap();
        let corrupt = dir.path().join("corrupt.json");
        std::fs::write(&corrupt, "{ not a score table").unwrap();

        assert_eq!(load(&corrupt).unwrap(), HighScores::default());
        assert_eq!(load(&dir.path().join("missing.json")).unwrap(), HighScores::default());
    }

    #[test]
    fn unreadable_file_still_yields_a_table() {
        let dir = TempDir::new().unwrap();

        // a directory exists but cannot be read as a file
        assert!(load(dir.path()).is_err());
        assert_eq!(load_or_empty(dir.path()), HighScores::default());
    }

    #[test]
    fn saved_table_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        let mut table = HighScores::default();
        table.record("ann", 120);
        table.record("bob", 45);

        save(&path, &table).unwrap();

        assert_eq!(load(&path).unwrap(), table);
    }

    #[test]
    fn flag_wins_over_config_file_over_default() {
        let file = FileConfig {
            scores_file: Some(PathBuf::from("from_config.json")),
            ..Default::default()
        };
        let flag = Path::new("from_flag.json");

        assert_eq!(scores_path(Some(flag), &file).as_path(), flag);
        assert_eq!(scores_path(None, &file).as_path(), Path::new("from_config.json"));
        assert_eq!(
            scores_path(None, &FileConfig::default()).as_path(),
            Path::new(DEFAULT_SCORES_FILE)
        );
    }
}
