//! One-way synchronisation of binary assets into the site tree.
//!
//! Change detection is a content-hash comparison gated by the target's
//! manifest: a source file whose recorded digest matches its current
//! content (and whose target copy exists) is skipped without touching the
//! target. `--force` bypasses the gate, `--dry-run` previews the copies.
//! Files are never deleted from the target; entries for sources that
//! vanished are only pruned from the manifest.
pub mod manifest;

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::SyncError;
use crate::logging::Log;
pub use manifest::{MANIFEST_FILE, Manifest};

/// Behaviour switches for one sync run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Preview copies without writing anything.
    pub dry_run: bool,
    /// Copy every asset even when the manifest says it is unchanged.
    pub force: bool,
}

/// Counts of per-file outcomes for one sync run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    /// Files copied into the target.
    pub copied: usize,
    /// Files that would have been copied (dry-run only).
    pub planned: usize,
    /// Files skipped because the manifest gate matched.
    pub up_to_date: usize,
    /// Manifest entries removed because their source vanished.
    pub pruned: usize,
}

/// Compute the lowercase hex SHA-256 digest of the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn file_digest(path: &Path) -> Result<String, SyncError> {
    let bytes = std::fs::read(path).map_err(|source| SyncError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let result = hasher.finalize();
    let mut hex = String::with_capacity(64);
    for b in &result {
        // write! to a String is infallible; unwrap_or(()) makes that explicit.
        write!(hex, "{b:02x}").unwrap_or(());
    }
    Ok(hex)
}

/// Hash-gated one-way copier from a source asset tree to the site tree.
pub struct SyncEngine<'a> {
    source: PathBuf,
    target: PathBuf,
    log: &'a dyn Log,
    options: SyncOptions,
}

impl std::fmt::Debug for SyncEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'a> SyncEngine<'a> {
    /// Create a sync engine for one source/target pair.
    #[must_use]
    pub fn new(source: &Path, target: &Path, log: &'a dyn Log, options: SyncOptions) -> Self {
        Self {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            log,
            options,
        }
    }

    /// Walk the source tree and bring the target up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is missing, the manifest is corrupt,
    /// or an individual file cannot be hashed or copied.
    pub fn run(&self) -> Result<SyncSummary, SyncError> {
        if !self.source.is_dir() {
            return Err(SyncError::MissingSource(self.source.display().to_string()));
        }

        let manifest_path = self.target.join(MANIFEST_FILE);
        let mut manifest = Manifest::load(&manifest_path)?;
        let mut summary = SyncSummary::default();
        let mut seen = HashSet::new();

        for rel in collect_files(&self.source)? {
            let rel_str = relative_key(&rel);
            seen.insert(rel_str.clone());

            let src = self.source.join(&rel);
            let dst = self.target.join(&rel);
            let digest = file_digest(&src)?;

            let unchanged = manifest.digest(&rel_str) == Some(digest.as_str()) && dst.is_file();
            if unchanged && !self.options.force {
                self.log.debug(&format!("{rel_str} up to date"));
                summary.up_to_date += 1;
                continue;
            }

            if self.options.dry_run {
                self.log.dry_run(&format!("would copy {rel_str}"));
                summary.planned += 1;
                continue;
            }

            copy_file(&src, &dst)?;
            manifest.record(&rel_str, &digest);
            self.log.info(&format!("copied {rel_str}"));
            summary.copied += 1;
        }

        summary.pruned = manifest.prune(&seen);
        if summary.pruned > 0 {
            self.log
                .debug(&format!("pruned {} stale manifest entries", summary.pruned));
        }

        if !self.options.dry_run {
            std::fs::create_dir_all(&self.target).map_err(|source| SyncError::Io {
                path: self.target.display().to_string(),
                source,
            })?;
            manifest.store(&manifest_path)?;
        }

        Ok(summary)
    }
}

/// Manifest key for a relative path: components joined with `/` so the
/// manifest is stable across platforms.
fn relative_key(rel: &Path) -> String {
    rel.iter()
        .map(|c| c.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Copy `src` to `dst`, creating parent directories as needed.
fn copy_file(src: &Path, dst: &Path) -> Result<(), SyncError> {
    let map_io = |source| SyncError::Io {
        path: dst.display().to_string(),
        source,
    };
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent).map_err(map_io)?;
    }
    std::fs::copy(src, dst).map_err(map_io)?;
    Ok(())
}

/// All regular files under `root`, as paths relative to it, sorted.
fn collect_files(root: &Path) -> Result<Vec<PathBuf>, SyncError> {
    fn walk(dir: &Path, root: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                walk(&path, root, out)?;
            } else if let Ok(rel) = path.strip_prefix(root) {
                out.push(rel.to_path_buf());
            }
        }
        Ok(())
    }

    let mut files = Vec::new();
    walk(root, root, &mut files).map_err(|source| SyncError::Io {
        path: root.display().to_string(),
        source,
    })?;
    files.sort();
    Ok(files)
}
