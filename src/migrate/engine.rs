//! The migration engine: discovery, ordering, ledger gating, dispatch, and
//! failure isolation.
use std::path::{Path, PathBuf};

use crate::config::MigrateConfig;
use crate::error::MigrateError;
use crate::exec::Executor;
use crate::host::Host;
use crate::logging::{Log, UnitStatus};
use crate::migrate::activation::ActivationDispatcher;
use crate::migrate::ledger::Ledger;
use crate::migrate::name::{UnitKind, UnitName};
use crate::migrate::runner::DataUnitRunner;

/// Counts of per-unit outcomes for one engine run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Units applied and recorded in this run.
    pub applied: usize,
    /// Units the ledger already contained.
    pub already_applied: usize,
    /// Units skipped this run but retryable later (target not installed).
    pub skipped: usize,
    /// Names violating the naming convention, excluded from both phases.
    pub invalid: usize,
    /// Units whose apply operation failed (or applied-but-unrecorded).
    pub failed: usize,
}

/// A discovered change-unit: its parsed name plus the payload path.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Unit {
    name: UnitName,
    path: PathBuf,
}

impl Ord for Unit {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

impl PartialOrd for Unit {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Applies all pending change-units to one site, exactly once each.
///
/// The run is strictly sequential: the ledger is prepared, units are
/// discovered and validated, then the activation phase and the data phase
/// each iterate their units in `(date, sequence, name)` order. A failed
/// unit is logged and counted; it never aborts the remaining units. Only a
/// failed ledger bootstrap aborts the run.
pub struct MigrationEngine<'a> {
    site_root: &'a Path,
    config: &'a MigrateConfig,
    host: &'a dyn Host,
    executor: &'a dyn Executor,
    log: &'a dyn Log,
}

impl std::fmt::Debug for MigrationEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationEngine")
            .field("site_root", &self.site_root)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> MigrationEngine<'a> {
    /// Create an engine for one site.
    #[must_use]
    pub const fn new(
        site_root: &'a Path,
        config: &'a MigrateConfig,
        host: &'a dyn Host,
        executor: &'a dyn Executor,
        log: &'a dyn Log,
    ) -> Self {
        Self {
            site_root,
            config,
            host,
            executor,
            log,
        }
    }

    /// Run both phases over all pending units and return the outcome counts.
    ///
    /// # Errors
    ///
    /// Returns an error only when the ledger cannot be bootstrapped or the
    /// unit source cannot be listed; every per-unit failure is converted to
    /// a logged, counted outcome instead.
    pub fn run(&self) -> Result<RunSummary, MigrateError> {
        let mut summary = RunSummary::default();
        let units_dir = self.site_root.join(&self.config.dir);
        let ledger = Ledger::new(self.host, &self.config.table);

        self.log.stage("Preparing ledger");
        ledger.ensure_initialized(&units_dir.join(&self.config.bootstrap), self.log)?;

        let mut units = self.discover(&units_dir, &mut summary)?;
        units.sort();
        let (activations, data_units): (Vec<_>, Vec<_>) =
            units.into_iter().partition(|u| u.name.is_activation());

        self.log
            .stage(&format!("Activations ({})", activations.len()));
        for unit in &activations {
            self.apply_unit(unit, &ledger, &mut summary);
        }

        self.log
            .stage(&format!("Data changes ({})", data_units.len()));
        for unit in &data_units {
            self.apply_unit(unit, &ledger, &mut summary);
        }

        Ok(summary)
    }

    /// List the unit source, dropping the bootstrap seed, generator
    /// scripts, and invalid names.
    fn discover(&self, units_dir: &Path, summary: &mut RunSummary) -> Result<Vec<Unit>, MigrateError> {
        if !units_dir.is_dir() {
            self.log.warn(&format!(
                "unit source {} does not exist, nothing to apply",
                units_dir.display()
            ));
            return Ok(Vec::new());
        }

        let map_io = |source| MigrateError::Discovery {
            path: units_dir.display().to_string(),
            source,
        };

        let mut units = Vec::new();
        for entry in std::fs::read_dir(units_dir).map_err(map_io)? {
            let entry = entry.map_err(map_io)?;
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                let lossy = path.file_name().map_or_else(String::new, |n| n.to_string_lossy().to_string());
                self.log
                    .warn(&format!("skipping unit with non-UTF-8 name: {lossy}"));
                self.log
                    .record_unit(&lossy, UnitStatus::Invalid, Some("non-UTF-8 name"));
                summary.invalid += 1;
                continue;
            };
            if file_name == self.config.bootstrap {
                self.log.debug("skipping bootstrap seed file");
                continue;
            }
            if path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == self.config.generator_ext)
            {
                self.log
                    .debug(&format!("{file_name} is a generator script, not a unit"));
                continue;
            }
            match UnitName::parse(file_name) {
                Ok(name) => units.push(Unit { name, path }),
                Err(e) => {
                    self.log.warn(&format!("skipping {e}"));
                    self.log
                        .record_unit(file_name, UnitStatus::Invalid, Some("naming convention"));
                    summary.invalid += 1;
                }
            }
        }
        Ok(units)
    }

    /// Apply one unit, converting any failure into a logged, counted
    /// outcome. Never propagates an error: per-unit failure must not abort
    /// the run.
    fn apply_unit(&self, unit: &Unit, ledger: &Ledger<'_>, summary: &mut RunSummary) {
        let name = unit.name.raw();

        if ledger.is_applied(name, self.log) {
            self.log.info(&format!("{name} already applied"));
            self.log.record_unit(name, UnitStatus::AlreadyApplied, None);
            summary.already_applied += 1;
            return;
        }

        let outcome = match unit.name.kind() {
            UnitKind::Activation { target } => ActivationDispatcher::new(self.host)
                .dispatch(target)
                .map(|kind| format!("activated {} '{target}'", kind.as_str())),
            UnitKind::DataSql => DataUnitRunner::new(
                self.host,
                self.executor,
                self.log,
                self.site_root,
                &self.config.generator_ext,
            )
            .run(&unit.path)
            .map(|()| "statements executed".to_string()),
        };

        match outcome {
            Ok(detail) => match ledger.record_applied(name) {
                Ok(()) => {
                    self.log.info(&format!("{name}: {detail}"));
                    self.log.record_unit(name, UnitStatus::Applied, None);
                    summary.applied += 1;
                }
                Err(e) => {
                    let err = anyhow::Error::new(e);
                    self.log.error(&format!(
                        "{name} applied but not recorded, it will be re-attempted next run: {err:#}"
                    ));
                    self.log
                        .record_unit(name, UnitStatus::Failed, Some("applied but not recorded"));
                    summary.failed += 1;
                }
            },
            Err(MigrateError::NotInstalled(target)) => {
                self.log.warn(&format!(
                    "{name}: '{target}' is not installed, skipping (will retry once installed)"
                ));
                self.log
                    .record_unit(name, UnitStatus::Skipped, Some("not installed"));
                summary.skipped += 1;
            }
            Err(e) => {
                let err = anyhow::Error::new(e);
                self.log.warn(&format!("{name}: {err:#}"));
                self.log
                    .record_unit(name, UnitStatus::Failed, Some(&format!("{err:#}")));
                summary.failed += 1;
            }
        }
    }
}
