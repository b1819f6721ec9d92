//! Sync manifest: the record of what the target already holds.
//!
//! Maps each relative asset path to the SHA-256 hex digest of its last
//! synced content. Consulting the manifest is the metadata call that gates
//! the per-file hash comparison.
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Manifest file name inside the sync target directory.
pub const MANIFEST_FILE: &str = ".siteops-manifest.json";

/// Relative path → SHA-256 hex digest of the last synced copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    entries: BTreeMap<String, String>,
}

impl Manifest {
    /// Load the manifest at `path`; a missing file yields an empty manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| SyncError::Manifest {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| SyncError::Manifest {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Write the manifest to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or the write fails.
    pub fn store(&self, path: &Path) -> Result<(), SyncError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| SyncError::Manifest {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        std::fs::write(path, json).map_err(|e| SyncError::Manifest {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Digest recorded for `rel`, if any.
    #[must_use]
    pub fn digest(&self, rel: &str) -> Option<&str> {
        self.entries.get(rel).map(String::as_str)
    }

    /// Record (or replace) the digest for `rel`.
    pub fn record(&mut self, rel: &str, digest: &str) {
        self.entries.insert(rel.to_string(), digest.to_string());
    }

    /// Drop entries whose path is not in `keep`, returning how many were
    /// removed.
    pub fn prune(&mut self, keep: &HashSet<String>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|path, _| keep.contains(path));
        before - self.entries.len()
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
