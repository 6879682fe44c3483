use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use magic_maze_system_game_loop::{FrameDelay, GameSettings};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CHECKPOINT_FILE: &str = "magic-maze.checkpoint";

/// Errors raised while reading the configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration {path}")]
    Read {
        /// Configuration file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The file is not valid TOML for this schema.
    #[error("failed to parse configuration {path}")]
    Parse {
        /// Configuration file.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

/// Runner options; every field may be left out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ConfigFile {
    pub(crate) level: Option<u32>,
    pub(crate) seed: Option<u64>,
    pub(crate) delay_ms: Option<u64>,
    pub(crate) max_frames: Option<u64>,
    pub(crate) levels_dir: Option<PathBuf>,
    pub(crate) script: Option<PathBuf>,
    pub(crate) checkpoint: Option<PathBuf>,
}

impl ConfigFile {
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Fields set in `overrides` replace the ones read from the file.
    pub(crate) fn overridden_by(self, overrides: Self) -> Self {
        Self {
            level: overrides.level.or(self.level),
            seed: overrides.seed.or(self.seed),
            delay_ms: overrides.delay_ms.or(self.delay_ms),
            max_frames: overrides.max_frames.or(self.max_frames),
            levels_dir: overrides.levels_dir.or(self.levels_dir),
            script: overrides.script.or(self.script),
            checkpoint: overrides.checkpoint.or(self.checkpoint),
        }
    }

    pub(crate) fn settings(&self) -> GameSettings {
        let defaults = GameSettings::default();
        GameSettings {
            frame_delay: self
                .delay_ms
                .map_or(defaults.frame_delay, |ms| {
                    FrameDelay::new(Duration::from_millis(ms))
                }),
            seed: self.seed.unwrap_or(defaults.seed),
            first_level: self.level.unwrap_or(defaults.first_level),
            max_frames: self.max_frames,
        }
    }

    pub(crate) fn checkpoint_path(&self) -> PathBuf {
        self.checkpoint
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CHECKPOINT_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_the_defaults() {
        let config = ConfigFile::parse("").expect("empty config");
        assert_eq!(config, ConfigFile::default());
        assert_eq!(config.settings(), GameSettings::default());
        assert_eq!(
            config.checkpoint_path(),
            PathBuf::from(DEFAULT_CHECKPOINT_FILE)
        );
    }

    #[test]
    fn command_line_wins_over_the_file() {
        let file = ConfigFile::parse(
            r#"
            level = 2
            seed = 11
            delay_ms = 80
            levels_dir = "levels"
            "#,
        )
        .expect("config");
        let overrides = ConfigFile {
            seed: Some(99),
            max_frames: Some(500),
            ..ConfigFile::default()
        };

        let merged = file.overridden_by(overrides);
        let settings = merged.settings();
        assert_eq!(settings.first_level, 2);
        assert_eq!(settings.seed, 99);
        assert_eq!(settings.frame_delay.get(), Duration::from_millis(80));
        assert_eq!(settings.max_frames, Some(500));
        assert_eq!(merged.levels_dir, Some(PathBuf::from("levels")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ConfigFile::parse("colour = \"red\"").is_err());
    }
}
