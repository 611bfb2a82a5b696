use std::path::{Path, PathBuf};

use anyhow::Context;
use match3_core::{ColorId, Coord, GameConfig};
use serde::Deserialize;

/// Contents of the optional TOML settings file, every key may be left out.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub rows: Option<Coord>,
    pub cols: Option<Coord>,
    pub colors: Option<ColorId>,
    pub points_per_tile: Option<u32>,
    pub achievement_step: Option<u32>,
    pub scores_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }
}

/// Board settings shared by the subcommands; flags win over the config file.
#[derive(clap::Args, Debug)]
pub struct BoardArgs {
    /// TOML file with board and scoring settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub rows: Option<Coord>,

    #[arg(long)]
    pub cols: Option<Coord>,

    /// Number of tile colors, at least 3
    #[arg(long)]
    pub colors: Option<ColorId>,
}

impl BoardArgs {
    pub fn file_config(&self) -> anyhow::Result<FileConfig> {
        match &self.config {
            Some(path) => FileConfig::load(path),
            None => Ok(FileConfig::default()),
        }
    }

    pub fn game_config(&self, file: &FileConfig) -> anyhow::Result<GameConfig> {
        let defaults = GameConfig::default();
        let rows = self.rows.or(file.rows).unwrap_or(defaults.size.0);
        let cols = self.cols.or(file.cols).unwrap_or(defaults.size.1);
        let colors = self.colors.or(file.colors).unwrap_or(defaults.num_colors);

        let config = GameConfig::new((rows, cols), colors)
            .context("invalid board settings")?
            .with_scoring(
                file.points_per_tile.unwrap_or(defaults.points_per_tile),
                file.achievement_step.unwrap_or(defaults.achievement_step),
            );
        log::debug!("{:?}", config);
        Ok(config)
    }
}

/// Seed from the clock when none was given.
pub fn seed_or_clock(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();
        now.as_nanos() as u64
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_args(rows: Option<Coord>, colors: Option<ColorId>) -> BoardArgs {
        BoardArgs {
            config: None,
            rows,
            cols: None,
            colors,
        }
    }

    #[test]
    fn flags_override_file_values() {
        let file: FileConfig = toml::from_str("rows = 6\ncols = 7\ncolors = 5\npoints_per_tile = 10").unwrap();

        let config = board_args(Some(9), None).game_config(&file).unwrap();

        assert_eq!(config.size, (9, 7));
        assert_eq!(config.num_colors, 5);
        assert_eq!(config.points_per_tile, 10);
        assert_eq!(config.achievement_step, 500);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let file = FileConfig::default();

        assert!(board_args(None, Some(2)).game_config(&file).is_err());
        assert!(board_args(Some(0), None).game_config(&file).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<FileConfig>("speed = 3").is_err());
    }
}
