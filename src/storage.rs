//! Durable key-value storage and the high score record kept in it
use crate::consts::HIGH_SCORE_KEY;
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A store of string values under string keys
pub(crate) trait KeyValueStore {
    /// Fetch the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, LoadError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError>;
}

/// A [`KeyValueStore`] kept in a JSON object on disk.  The file is re-read
/// on every access so that separate sessions see each other's writes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub(crate) fn new(path: PathBuf) -> FileStore {
        FileStore { path }
    }

    /// Return the default storage file path
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("snakegrid").join("storage.json"))
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn load_map(&self) -> Result<BTreeMap<String, String>, LoadError> {
        let src = match fs_err::read(&self.path) {
            Ok(src) => src,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(LoadError::read(e)),
        };
        serde_json::from_slice(&src).map_err(LoadError::deserialize)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, LoadError> {
        let mut map = self.load_map()?;
        Ok(map.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        let mut map = self.load_map().map_err(SaveError::reload)?;
        map.insert(key.to_owned(), value.to_owned());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(SaveError::mkdir)?;
        }
        let mut src = serde_json::to_string_pretty(&map).map_err(SaveError::serialize)?;
        src.push('\n');
        fs_err::write(&self.path, &src).map_err(SaveError::write)?;
        Ok(())
    }
}

/// A [`KeyValueStore`] that forgets everything when dropped
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct MemoryStore(HashMap<String, String>);

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, LoadError> {
        Ok(self.0.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.0.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// The store chosen by the program's configuration
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Storage {
    File(FileStore),
    Memory(MemoryStore),
}

impl KeyValueStore for Storage {
    fn get(&self, key: &str) -> Result<Option<String>, LoadError> {
        match self {
            Storage::File(store) => store.get(key),
            Storage::Memory(store) => store.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        match self {
            Storage::File(store) => store.set(key, value),
            Storage::Memory(store) => store.set(key, value),
        }
    }
}

/// The persisted high score.
///
/// Storage failures never reach the caller: a failed or garbled read counts
/// as a high score of zero, and a failed write is logged and dropped.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct HighScore<S> {
    store: S,
}

impl<S: KeyValueStore> HighScore<S> {
    pub(crate) fn new(store: S) -> HighScore<S> {
        HighScore { store }
    }

    pub(crate) fn get_high_score(&self) -> u32 {
        match self.store.get(HIGH_SCORE_KEY) {
            Ok(Some(s)) => s.trim().parse::<u32>().unwrap_or_else(|e| {
                log::warn!("Ignoring unparseable stored high score {s:?}: {e}");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("{:#}", anyhow::Error::from(e));
                0
            }
        }
    }

    pub(crate) fn set_high_score(&mut self, score: u32) {
        if let Err(e) = self.store.set(HIGH_SCORE_KEY, &score.to_string()) {
            log::warn!("{:#}", anyhow::Error::from(e));
        }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }
}

#[derive(Debug, Error)]
#[error("Failed to read stored data")]
pub(crate) struct LoadError(#[source] LoadErrorSource);

impl LoadError {
    fn read(e: std::io::Error) -> Self {
        LoadError(LoadErrorSource::Read(e))
    }

    fn deserialize(e: serde_json::Error) -> Self {
        LoadError(LoadErrorSource::Deserialize(e))
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to read storage file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize storage file")]
    Deserialize(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
#[error("Failed to write stored data")]
pub(crate) struct SaveError(#[source] SaveErrorSource);

impl SaveError {
    fn reload(e: LoadError) -> Self {
        SaveError(SaveErrorSource::Reload(e))
    }

    fn mkdir(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Mkdir(e))
    }

    fn serialize(e: serde_json::Error) -> Self {
        SaveError(SaveErrorSource::Serialize(e))
    }

    fn write(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Write(e))
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to load existing data before updating")]
    Reload(#[source] LoadError),
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize stored data")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write storage file")]
    Write(#[source] std::io::Error),
}
