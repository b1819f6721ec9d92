//! Structured logger with per-unit outcome collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::types::{Log, UnitEntry, UnitStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
///
/// The `record_unit` method is **not** included because its signature differs
/// from the `fn(&self, &str)` pattern shared by the display methods.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with unit-outcome collection.
///
/// All messages are written to the console through the tracing pipeline and
/// to a persistent log file at `$XDG_CACHE_HOME/siteops/<command>.log`
/// (default `~/.cache/siteops/<command>.log`) with timestamps and ANSI codes
/// stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    units: Mutex<Vec<UnitEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary. The log file
    /// itself is created and initialised by
    /// [`init_subscriber`](super::subscriber::init_subscriber); this
    /// constructor does not write to the file.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            units: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return a clone of all recorded unit entries.
    #[must_use]
    pub fn unit_entries(&self) -> Vec<UnitEntry> {
        self.units.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "siteops::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: "siteops::dry_run", "{msg}");
    }

    /// Record a unit outcome for the summary.
    pub fn record_unit(&self, name: &str, status: UnitStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.units.lock() {
            guard.push(UnitEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Return `true` if any recorded unit has failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Count the number of failed units.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.units.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|u| u.status == UnitStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded unit outcomes.
    pub fn print_summary(&self) {
        let units = match self.units.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => return,
        };
        if units.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut applied = 0u32;
        let mut already = 0u32;
        let mut skipped = 0u32;
        let mut invalid = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for unit in &units {
            let (icon, color) = match unit.status {
                UnitStatus::Applied => {
                    applied += 1;
                    ("✓", "\x1b[32m")
                }
                UnitStatus::AlreadyApplied => {
                    already += 1;
                    ("·", "\x1b[2m")
                }
                UnitStatus::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                UnitStatus::Invalid => {
                    invalid += 1;
                    ("!", "\x1b[33m")
                }
                UnitStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                UnitStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = unit
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", unit.name));
        }

        let total = applied + already + skipped + invalid + dry_run + failed;
        self.info(&format!(
            "{total} units: \x1b[32m{applied} applied\x1b[0m, \x1b[2m{already} already applied\x1b[0m, \x1b[33m{skipped} skipped\x1b[0m, \x1b[33m{invalid} invalid\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_unit(&self, name: &str, status: UnitStatus, message: Option<&str>) {
        self.record_unit(name, status, message);
    }
}
