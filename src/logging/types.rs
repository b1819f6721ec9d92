//! Core logging types: unit entries, status, and the [`Log`] trait.

/// Per-unit outcome recorded for the run summary.
#[derive(Debug, Clone)]
pub struct UnitEntry {
    /// Unit or file name.
    pub name: String,
    /// Final status of the unit.
    pub status: UnitStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Outcome of one change-unit (or synced file).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStatus {
    /// The unit was applied and recorded in this run.
    Applied,
    /// The ledger already contained the unit; nothing was done.
    AlreadyApplied,
    /// The unit was skipped this run but will be retried later
    /// (e.g., activation target not yet installed).
    Skipped,
    /// The name violates the naming convention; excluded from the run.
    Invalid,
    /// Dry-run mode; the change was previewed, not applied.
    DryRun,
    /// The unit's apply operation failed; it was not recorded.
    Failed,
}

/// Abstraction over logging backends.
///
/// The engine and dispatchers log through this trait so unit tests can
/// capture output with an in-memory implementation instead of a real
/// console/file logger.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a unit outcome for the summary.
    fn record_unit(&self, name: &str, status: UnitStatus, message: Option<&str>);
}
