use std::fs;
use std::path::PathBuf;

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Record kinds the cache knows how to store.
///
/// Each kind maps to a fixed file name so repeated runs overwrite the same
/// file (last write wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    PullRequests,
    WorkflowRuns,
    Jobs,
}

impl CacheKind {
    fn file_name(self) -> &'static str {
        match self {
            CacheKind::PullRequests => "prs.json",
            CacheKind::WorkflowRuns => "workflowRuns.json",
            CacheKind::Jobs => "jobs.json",
        }
    }
}

/// Flat JSON file cache for fetched API records.
///
/// One file per record kind under the cache directory, each holding a single
/// JSON array. Files are read entirely or not at all, and overwritten
/// entirely on each save. Not safe for concurrent writers.
pub struct CacheStore {
    dir: PathBuf,
    enabled: bool,
}

impl CacheStore {
    /// Creates a cache store rooted at `dir`.
    ///
    /// When disabled, `load` always misses and `save` is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>, enabled: bool) -> Result<Self> {
        let dir = dir.into();

        if enabled {
            fs::create_dir_all(&dir)?;
            info!("Cache enabled at: {}", dir.display());
        } else {
            debug!("Cache disabled");
        }

        Ok(Self { dir, enabled })
    }

    /// Loads the full record collection for a kind.
    ///
    /// Returns `Ok(None)` when caching is disabled, the file does not exist,
    /// or the file cannot be read; read failures are logged so the caller can
    /// fall back to a network fetch.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists and is readable but holds
    /// malformed JSON.
    pub fn load<T: DeserializeOwned>(&self, kind: CacheKind) -> Result<Option<Vec<T>>> {
        if !self.enabled {
            return Ok(None);
        }

        let path = self.dir.join(kind.file_name());
        if !path.exists() {
            debug!("No cache file at: {}", path.display());
            return Ok(None);
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    "Failed to read cache file {}, falling back to network: {e}",
                    path.display()
                );
                return Ok(None);
            }
        };

        let records: Vec<T> = serde_json::from_str(&content)?;
        debug!(
            "Loaded {} records from cache: {}",
            records.len(),
            path.display()
        );

        Ok(Some(records))
    }

    /// Serializes the entire collection for a kind to its cache file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn save<T: Serialize>(&self, kind: CacheKind, records: &[T]) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let path = self.dir.join(kind.file_name());
        let content = serde_json::to_string(records)?;
        fs::write(&path, content)?;

        debug!(
            "Saved {} records to cache: {}",
            records.len(),
            path.display()
        );

        Ok(())
    }
}
