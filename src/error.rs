//! Domain-specific error types for the siteops engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors (e.g., [`MigrateError`],
//! [`SyncError`]) while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! Within a migration run, every [`MigrateError`] except
//! [`MigrateError::LedgerBootstrap`] and [`MigrateError::Discovery`] is
//! caught at the engine's loop boundary and converted to a logged, per-unit
//! outcome; only those two abort the run.

use thiserror::Error;

/// Errors that arise from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading the config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file contains a syntax or type error.
    #[error("Invalid config file {path}: {message}")]
    Parse {
        /// Path to the offending file.
        path: String,
        /// Parser diagnostic.
        message: String,
    },
}

/// Errors surfaced by host CLI invocations.
///
/// The host is an opaque executable; these variants are the only contract
/// the engine relies on.
#[derive(Error, Debug)]
pub enum HostError {
    /// The host program could not be spawned at all.
    #[error("failed to invoke '{program}': {message}")]
    Spawn {
        /// Program name or path that failed to launch.
        program: String,
        /// Underlying spawn diagnostic.
        message: String,
    },

    /// The host program ran but reported failure.
    #[error("host operation '{operation}' failed (exit {code}): {stderr}")]
    OperationFailed {
        /// Short name of the host operation (e.g. `db query`).
        operation: String,
        /// Process exit code (`-1` if terminated by signal).
        code: i32,
        /// Trimmed stderr from the host program.
        stderr: String,
    },

    /// The host program succeeded but its output could not be interpreted.
    #[error("malformed response from '{operation}': {output:?}")]
    MalformedResponse {
        /// Short name of the host operation.
        operation: String,
        /// The raw output that failed to parse.
        output: String,
    },
}

/// Errors that arise while applying migrations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// The unit name violates the naming convention.
    #[error("invalid unit name '{0}'")]
    InvalidName(String),

    /// The activation target is installed neither as a theme nor a plugin.
    ///
    /// Retryable: the unit is not recorded, so a future run attempts it
    /// again once the target becomes installed.
    #[error("'{0}' is not installed as a theme or plugin")]
    NotInstalled(String),

    /// The host's activation operation failed.
    #[error("activating '{target}' failed")]
    ActivationFailed {
        /// The component that could not be activated.
        target: String,
        /// Underlying host error.
        #[source]
        source: HostError,
    },

    /// The host's statement-execution operation failed.
    #[error("executing '{unit}' failed")]
    ExecutionFailed {
        /// Name of the data unit whose statements failed.
        unit: String,
        /// Underlying host error.
        #[source]
        source: HostError,
    },

    /// A generator script exited non-zero; the raw payload was used instead.
    #[error("generator '{path}' failed: {reason}")]
    GeneratorFailed {
        /// Path of the generator script.
        path: String,
        /// Exit diagnostic from the generator.
        reason: String,
    },

    /// The ledger's backing table could not be created.
    ///
    /// Fatal: without the ledger there is no safe way to track progress.
    #[error("ledger bootstrap failed")]
    LedgerBootstrap(#[source] HostError),

    /// A unit was applied but its ledger entry could not be written.
    ///
    /// The unit will be re-attempted on the next run.
    #[error("recording '{unit}' in the ledger failed")]
    RecordFailed {
        /// Name of the unit that was applied but not recorded.
        unit: String,
        /// Underlying host error.
        #[source]
        source: HostError,
    },

    /// The unit source directory could not be listed.
    #[error("reading unit source {path}")]
    Discovery {
        /// The migrations directory that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors that arise during asset synchronisation.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The configured sync source directory does not exist.
    #[error("sync source does not exist: {0}")]
    MissingSource(String),

    /// The sync manifest exists but could not be read or parsed.
    #[error("manifest {path}: {message}")]
    Manifest {
        /// Path of the manifest file.
        path: String,
        /// Reader or parser diagnostic.
        message: String,
    },

    /// An I/O error occurred while hashing or copying an asset.
    #[error("sync IO error at {path}")]
    Io {
        /// Path of the file involved.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
