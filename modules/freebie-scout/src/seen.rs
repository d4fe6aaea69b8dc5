use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::info;

use freebie_common::SeenEntry;

/// Entries older than this are forgotten, so a game that comes back free
/// later gets announced again.
pub const RETENTION_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access seen file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Seen file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Previously notified deals, keyed by deal id (or name), persisted as one
/// pretty-printed JSON object.
#[derive(Debug)]
pub struct SeenStore {
    path: PathBuf,
    entries: BTreeMap<String, SeenEntry>,
}

impl SeenStore {
    /// An empty store that will save to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Read the store from `path`. A missing file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "No seen file yet, starting empty");
                return Ok(Self::new(path));
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let entries = if data.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&data).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?
        };

        Ok(Self { path, entries })
    }

    /// Drop entries found more than [`RETENTION_DAYS`] before `now`. Entries
    /// whose `found_at` is missing or unparsable are kept. Returns the number
    /// removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::days(RETENTION_DAYS);
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.discovered_at().map_or(true, |at| at > cutoff));
        before - self.entries.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&SeenEntry> {
        self.entries.get(key)
    }

    pub fn record(&mut self, key: &str, name: &str, now: DateTime<Utc>) {
        self.entries
            .insert(key.to_string(), SeenEntry::new(name, now));
    }

    pub fn insert(&mut self, key: &str, entry: SeenEntry) {
        self.entries.insert(key.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with the current contents. Writes a sibling temp
    /// file and renames it into place.
    pub fn save(&self) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let data = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, data).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}
