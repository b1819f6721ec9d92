//! Top-level subcommand orchestration.
pub mod migrate;
pub mod sync;

use std::path::{Path, PathBuf};

use anyhow::Result;

/// Validate and canonicalise the site root given on the command line.
///
/// # Errors
///
/// Returns an error if the path does not exist or is not a directory.
pub fn resolve_site_root(path: &Path) -> Result<PathBuf> {
    anyhow::ensure!(
        path.is_dir(),
        "site root {} does not exist or is not a directory",
        path.display()
    );
    Ok(std::fs::canonicalize(path)?)
}
