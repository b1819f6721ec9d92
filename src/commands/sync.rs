//! The `sync` subcommand: bring the site's asset tree up to date.
use anyhow::Result;

use crate::cli::SyncOpts;
use crate::config::SiteConfig;
use crate::logging::Logger;
use crate::sync::{SyncEngine, SyncOptions};

/// Run the sync command.
///
/// # Errors
///
/// Returns an error if the site root is unusable, the source tree is
/// missing, or a file cannot be hashed or copied.
pub fn run(opts: &SyncOpts, log: &Logger) -> Result<()> {
    let site_root = super::resolve_site_root(&opts.site_root)?;
    let config = SiteConfig::load(&site_root)?;

    let source = config.sync_source(&site_root);
    let target = config.sync_target(&site_root);

    log.stage("Syncing assets");
    log.info(&format!(
        "{} -> {}",
        source.display(),
        target.display()
    ));

    let engine = SyncEngine::new(
        &source,
        &target,
        log,
        SyncOptions {
            dry_run: opts.dry_run,
            force: opts.force,
        },
    );
    let summary = engine.run()?;

    if opts.dry_run {
        log.info(&format!(
            "dry run: {} would be copied, {} up to date",
            summary.planned, summary.up_to_date
        ));
    } else {
        log.info(&format!(
            "{} copied, {} up to date, {} stale entries pruned",
            summary.copied, summary.up_to_date, summary.pruned
        ));
    }
    Ok(())
}
