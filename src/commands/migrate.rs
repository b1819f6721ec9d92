//! The `migrate` subcommand: apply all pending change-units to a site.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::MigrateOpts;
use crate::config::SiteConfig;
use crate::exec::{Executor, SystemExecutor};
use crate::host::CliHost;
use crate::logging::Logger;
use crate::migrate::MigrationEngine;

/// Run the migrate command.
///
/// The engine itself never aborts on a per-unit failure; this boundary
/// turns a non-zero failure count into a non-zero process exit so callers
/// (cron jobs, deploy scripts) can react.
///
/// # Errors
///
/// Returns an error if the site root or host CLI is unusable, the ledger
/// cannot be bootstrapped, or any unit failed.
pub fn run(opts: &MigrateOpts, log: &Logger) -> Result<()> {
    let site_root = super::resolve_site_root(&opts.site_root)?;

    let version = option_env!("SITEOPS_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.info(&format!("siteops {version}"));

    log.stage("Loading configuration");
    let config = SiteConfig::load(&site_root)?;
    log.info(&format!(
        "site: {}, host CLI: {}, units: {}",
        site_root.display(),
        config.host.program,
        config.migrate.dir
    ));

    let executor = Arc::new(SystemExecutor);
    if !executor.which(&config.host.program) {
        anyhow::bail!("host CLI '{}' not found on PATH", config.host.program);
    }

    let host = CliHost::new(
        &config.host.program,
        &site_root,
        &config.migrate.table,
        Arc::clone(&executor) as Arc<dyn Executor>,
    );
    let engine =
        MigrationEngine::new(&site_root, &config.migrate, &host, executor.as_ref(), log);
    let summary = engine.run()?;

    log.print_summary();

    if summary.failed > 0 {
        anyhow::bail!("{} unit(s) failed", summary.failed);
    }
    Ok(())
}
