use crate::storage::{FileStore, MemoryStore, Storage};
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    /// Settings about data files
    #[serde(default)]
    pub(crate) files: FileConfig,

    /// Settings about the log file
    #[serde(default)]
    pub(crate) logging: LogConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("snakegrid").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// Return the key-value store in which the high score should be kept.
    ///
    /// If `self.files.save_high_score` is `false`, or if no storage path is
    /// configured and the default path could not be computed, the high score
    /// only lasts as long as the program runs.
    pub(crate) fn storage(&self) -> Storage {
        if !self.files.save_high_score {
            return Storage::Memory(MemoryStore::default());
        }
        match self
            .files
            .storage_file
            .clone()
            .or_else(FileStore::default_path)
        {
            Some(path) => Storage::File(FileStore::new(path)),
            None => {
                log::warn!("Could not determine local data directory; high score will not be saved");
                Storage::Memory(MemoryStore::default())
            }
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct FileConfig {
    /// Path to the file in which the high score is stored
    pub(crate) storage_file: Option<PathBuf>,

    /// Whether to load & save the high score at all
    pub(crate) save_high_score: bool,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            storage_file: None,
            save_high_score: true,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default)]
pub(crate) struct LogConfig {
    /// File to write log messages to.  Nothing is logged if this is unset.
    pub(crate) file: Option<PathBuf>,

    /// Most verbose level of message to log
    pub(crate) level: LevelFilter,
}

impl Default for LogConfig {
    fn default() -> LogConfig {
        LogConfig {
            file: None,
            level: LevelFilter::Info,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}
