//! Execution of data-kind units, with optional generator pre-processing.
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::MigrateError;
use crate::exec::Executor;
use crate::host::Host;
use crate::logging::Log;

/// Executes one DataSQL unit against the host.
///
/// When a sibling generator script exists (same base name, the configured
/// generator extension), it is invoked with the site root as its single
/// argument and its stdout becomes the statements to execute. A failed
/// generator falls back to the unit's raw payload with a warning; the unit
/// is never silently dropped.
pub struct DataUnitRunner<'a> {
    host: &'a dyn Host,
    executor: &'a dyn Executor,
    log: &'a dyn Log,
    site_root: &'a Path,
    generator_ext: &'a str,
}

impl std::fmt::Debug for DataUnitRunner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataUnitRunner")
            .field("site_root", &self.site_root)
            .field("generator_ext", &self.generator_ext)
            .finish_non_exhaustive()
    }
}

impl<'a> DataUnitRunner<'a> {
    /// Create a runner for one site.
    #[must_use]
    pub const fn new(
        host: &'a dyn Host,
        executor: &'a dyn Executor,
        log: &'a dyn Log,
        site_root: &'a Path,
        generator_ext: &'a str,
    ) -> Self {
        Self {
            host,
            executor,
            log,
            site_root,
            generator_ext,
        }
    }

    /// Path of the unit's generator sibling, whether or not it exists.
    #[must_use]
    pub fn generator_path(&self, unit_path: &Path) -> PathBuf {
        unit_path.with_extension(self.generator_ext)
    }

    /// Execute the unit, generating its statements first when a generator
    /// sibling is present.
    ///
    /// Generator output is materialised into a temporary file that is
    /// removed when this call returns, regardless of outcome.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::ExecutionFailed`] if the host's statement
    /// execution fails. Generator failures are not errors at this level;
    /// they downgrade to a warning plus raw-payload execution.
    pub fn run(&self, unit_path: &Path) -> Result<(), MigrateError> {
        let unit = unit_path
            .file_name()
            .map_or_else(|| unit_path.display().to_string(), |n| n.to_string_lossy().to_string());

        let generator = self.generator_path(unit_path);
        if generator.is_file() {
            match self.generate(&generator) {
                Ok(statements) => match materialize(&statements) {
                    Ok(tmp) => {
                        self.log
                            .debug(&format!("executing generated statements for {unit}"));
                        return self.execute(tmp.path(), &unit);
                    }
                    Err(e) => self.log.warn(&format!(
                        "could not stage generator output for '{unit}' ({e}), falling back to raw payload"
                    )),
                },
                Err(reason) => {
                    let failure = MigrateError::GeneratorFailed {
                        path: generator.display().to_string(),
                        reason,
                    };
                    self.log
                        .warn(&format!("{failure}, falling back to raw payload"));
                }
            }
        }

        self.execute(unit_path, &unit)
    }

    fn execute(&self, file: &Path, unit: &str) -> Result<(), MigrateError> {
        self.host
            .execute_statements(file)
            .map_err(|source| MigrateError::ExecutionFailed {
                unit: unit.to_string(),
                source,
            })
    }

    /// Invoke the generator and capture its stdout.
    fn generate(&self, generator: &Path) -> Result<String, String> {
        let program = generator.display().to_string();
        let site_root = self.site_root.display().to_string();
        let result = self
            .executor
            .run_unchecked(&program, &[&site_root])
            .map_err(|e| format!("{e:#}"))?;
        if result.success {
            Ok(result.stdout)
        } else {
            Err(format!(
                "exit {}: {}",
                result.code.unwrap_or(-1),
                result.stderr.trim()
            ))
        }
    }
}

/// Write generated statements to a temp file removed on drop.
fn materialize(statements: &str) -> std::io::Result<NamedTempFile> {
    let mut tmp = NamedTempFile::new()?;
    tmp.write_all(statements.as_bytes())?;
    tmp.flush()?;
    Ok(tmp)
}
