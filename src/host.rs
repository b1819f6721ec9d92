//! Boundary to the hosting site's admin CLI.
//!
//! The engine treats the host as an opaque executable accepting named
//! operations. [`Host`] is the seam: production code uses [`CliHost`],
//! which shells out through an [`Executor`]; tests substitute a scripted
//! implementation.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::HostError;
use crate::exec::{ExecResult, Executor};

/// The two mutually exclusive component categories an activation unit can
/// target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// A presentation-layer component.
    Theme,
    /// A general extension component.
    Plugin,
}

impl ComponentKind {
    /// The host CLI's command family for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Theme => "theme",
            Self::Plugin => "plugin",
        }
    }
}

/// Synchronous host operations the engine relies on.
///
/// All calls are blocking; their only contract is the signature. Timeouts,
/// if any, are the host invocation's responsibility.
pub trait Host: Send + Sync {
    /// Create the ledger's backing table from the built-in definition if it
    /// does not exist. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the host's statement execution fails.
    fn ensure_ledger_table(&self) -> Result<(), HostError>;

    /// Execute a statement whose result is a single integer and return it.
    ///
    /// # Errors
    ///
    /// Returns an error if the host fails or its output is not an integer.
    fn query_count(&self, statement: &str) -> Result<u64, HostError>;

    /// Append one row with the given unit name to the ledger table.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_ledger_row(&self, name: &str) -> Result<(), HostError>;

    /// Whether `name` is installed as the given component category.
    ///
    /// # Errors
    ///
    /// Returns an error if the host program cannot be invoked.
    fn is_installed(&self, kind: ComponentKind, name: &str) -> Result<bool, HostError>;

    /// Activate the installed component `name` of the given category.
    ///
    /// # Errors
    ///
    /// Returns an error if the host reports the activation failed.
    fn activate(&self, kind: ComponentKind, name: &str) -> Result<(), HostError>;

    /// Execute the statements contained in `file` against the data store.
    ///
    /// # Errors
    ///
    /// Returns an error if the host reports the execution failed.
    fn execute_statements(&self, file: &Path) -> Result<(), HostError>;
}

/// Quote a string for interpolation into a single-quoted SQL literal.
#[must_use]
pub fn sql_quote(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "''")
}

/// [`Host`] implementation that invokes the site's admin CLI.
///
/// Every operation runs `<program> --path=<site-root> <op> <args>`:
/// `db query <sql>`, `db import <file>`, `theme`/`plugin` `is-installed
/// <name>` (exit status is the boolean), and `theme`/`plugin` `activate
/// <name>`.
pub struct CliHost {
    program: String,
    site_root: PathBuf,
    table: String,
    executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for CliHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliHost")
            .field("program", &self.program)
            .field("site_root", &self.site_root)
            .field("table", &self.table)
            .field("executor", &"<dyn Executor>")
            .finish()
    }
}

impl CliHost {
    /// Create a host bound to one site installation and ledger table.
    #[must_use]
    pub fn new(
        program: &str,
        site_root: &Path,
        table: &str,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            program: program.to_string(),
            site_root: site_root.to_path_buf(),
            table: table.to_string(),
            executor,
        }
    }

    /// Invoke the host program with `--path=<site-root>` prepended.
    fn invoke(&self, args: &[&str]) -> Result<ExecResult, HostError> {
        let path_arg = format!("--path={}", self.site_root.display());
        let mut argv: Vec<&str> = Vec::with_capacity(args.len() + 1);
        argv.push(&path_arg);
        argv.extend_from_slice(args);
        self.executor
            .run_unchecked(&self.program, &argv)
            .map_err(|e| HostError::Spawn {
                program: self.program.clone(),
                message: format!("{e:#}"),
            })
    }

    /// Invoke the host program and convert a non-zero exit into
    /// [`HostError::OperationFailed`].
    fn invoke_checked(&self, operation: &str, args: &[&str]) -> Result<ExecResult, HostError> {
        let result = self.invoke(args)?;
        if result.success {
            Ok(result)
        } else {
            Err(HostError::OperationFailed {
                operation: operation.to_string(),
                code: result.code.unwrap_or(-1),
                stderr: result.stderr.trim().to_string(),
            })
        }
    }
}

/// Parse the integer a `db query` count statement printed.
///
/// The host may print a column-header line before the value, so the last
/// non-empty line is taken.
fn parse_count(operation: &str, stdout: &str) -> Result<u64, HostError> {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .and_then(|l| l.parse().ok())
        .ok_or_else(|| HostError::MalformedResponse {
            operation: operation.to_string(),
            output: stdout.trim().to_string(),
        })
}

impl Host for CliHost {
    fn ensure_ledger_table(&self) -> Result<(), HostError> {
        // 191 keeps the unique key inside the utf8mb4 index size limit.
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT, \
             name VARCHAR(191) NOT NULL, \
             applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP, \
             PRIMARY KEY (id), UNIQUE KEY name (name))",
            self.table
        );
        self.invoke_checked("db query", &["db", "query", &sql])?;
        Ok(())
    }

    fn query_count(&self, statement: &str) -> Result<u64, HostError> {
        let result = self.invoke_checked("db query", &["db", "query", statement])?;
        parse_count("db query", &result.stdout)
    }

    fn insert_ledger_row(&self, name: &str) -> Result<(), HostError> {
        let sql = format!(
            "INSERT INTO {} (name) VALUES ('{}')",
            self.table,
            sql_quote(name)
        );
        self.invoke_checked("db query", &["db", "query", &sql])?;
        Ok(())
    }

    fn is_installed(&self, kind: ComponentKind, name: &str) -> Result<bool, HostError> {
        let result = self.invoke(&[kind.as_str(), "is-installed", name])?;
        Ok(result.success)
    }

    fn activate(&self, kind: ComponentKind, name: &str) -> Result<(), HostError> {
        let operation = format!("{} activate", kind.as_str());
        self.invoke_checked(&operation, &[kind.as_str(), "activate", name])?;
        Ok(())
    }

    fn execute_statements(&self, file: &Path) -> Result<(), HostError> {
        let file_arg = file.display().to_string();
        self.invoke_checked("db import", &["db", "import", &file_arg])?;
        Ok(())
    }
}
