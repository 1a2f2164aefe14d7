//! Persisted mapping from target URL to the last fingerprint seen.
//!
//! The file is read once at run start and written once at run end. Writes go
//! to a temporary file in the same directory which is then renamed over the
//! old one, so a crash mid-write leaves the previous state intact.

use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::fingerprint::Fingerprint;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    #[serde(rename = "sig")]
    pub fingerprint: Fingerprint,
    #[serde(rename = "lastPostAt")]
    pub last_posted_at: DateTime<Utc>,
}

/// URL → record. Ordered so the file diffs cleanly between runs.
pub type StateMap = BTreeMap<String, StateRecord>;

#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state.
    ///
    /// A missing file means no prior state. A file that exists but does not
    /// parse is logged and also treated as no prior state, so every target
    /// is reported once as first-seen.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Read`] if the file exists but cannot be read.
    pub fn load(&self) -> Result<StateMap, StateError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no state file yet; starting fresh");
                return Ok(StateMap::new());
            }
            Err(e) => {
                return Err(StateError::Read {
                    path: self.path.display().to_string(),
                    source: e,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(StateMap::new());
        }

        match serde_json::from_str::<StateMap>(&content) {
            Ok(state) => Ok(state),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "state file is not valid JSON; treating as empty"
                );
                Ok(StateMap::new())
            }
        }
    }

    /// Atomically replace the state file with `state`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Write`] if the directory, temp file or rename
    /// fails, or [`StateError::Serialize`] if encoding fails.
    pub fn save(&self, state: &StateMap) -> Result<(), StateError> {
        let write_err = |source: std::io::Error| StateError::Write {
            path: self.path.display().to_string(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
        serde_json::to_writer_pretty(&mut tmp, state)?;
        tmp.write_all(b"\n").map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        tracing::debug!(path = %self.path.display(), records = state.len(), "state saved");
        Ok(())
    }
}
