//! JSON key-value persistence for application state.
//!
//! Each key is stored as its own `<key>.json` file under the platform data
//! directory. Writes are atomic (write to a temp file, then rename over the
//! target). Reads fail open: a missing or unreadable file yields the
//! caller-supplied default so the application can always start.

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Errors that can occur when persisting a value to disk.
#[derive(Debug)]
pub enum StoreError {
    /// The platform data directory could not be determined.
    NoDataDir,

    /// Failed to write the value's file.
    Write {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to serialize the value as JSON.
    Serialize {
        /// The JSON serialization error.
        source: serde_json::Error,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NoDataDir => {
                write!(f, "Failed to determine the application data directory")
            }
            StoreError::Write { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            StoreError::Serialize { source } => {
                write!(f, "Failed to serialize value: {source}")
            }
        }
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StoreError::NoDataDir => None,
            StoreError::Write { source, .. } => Some(source),
            StoreError::Serialize { source } => Some(source),
        }
    }
}

/// A directory of JSON files, one per key.
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open the store at the platform data directory.
    pub fn open() -> Result<Self, StoreError> {
        let proj_dirs =
            ProjectDirs::from("org", "permacommons", "confab").ok_or(StoreError::NoDataDir)?;
        Ok(Self {
            dir: proj_dirs.data_dir().to_path_buf(),
        })
    }

    /// Open the store at an explicit directory.
    pub fn open_at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read the value stored under `key`, or `default` when the key is
    /// absent or unreadable.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let path = self.key_path(key);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return default,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "store read failed, using default");
                return default;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "store parse failed, using default");
                default
            }
        }
    }

    /// Serialize `value` and atomically replace the file for `key`.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let contents =
            serde_json::to_string(value).map_err(|source| StoreError::Serialize { source })?;
        let path = self.key_path(key);
        self.write_atomic(&path, &contents)
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;

        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        temp_file.write_all(contents.as_bytes()).map_err(io_err)?;
        temp_file.as_file_mut().sync_all().map_err(io_err)?;
        temp_file
            .persist(path)
            .map_err(|err| io_err(err.error))?;
        Ok(())
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}
