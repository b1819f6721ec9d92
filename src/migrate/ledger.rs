//! Durable record of which change-units have been applied.
use std::path::Path;

use crate::error::{HostError, MigrateError};
use crate::host::{Host, sql_quote};
use crate::logging::Log;

/// The applied-unit ledger, backed by a table in the host's data store.
///
/// The ledger only ever grows: one row per unit name, inserted at the
/// moment a unit's apply operation reports success, never mutated or
/// deleted by the engine.
pub struct Ledger<'a> {
    host: &'a dyn Host,
    table: &'a str,
}

impl std::fmt::Debug for Ledger<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("host", &"<dyn Host>")
            .field("table", &self.table)
            .finish()
    }
}

impl<'a> Ledger<'a> {
    /// Create a ledger view over the given host and table.
    #[must_use]
    pub const fn new(host: &'a dyn Host, table: &'a str) -> Self {
        Self { host, table }
    }

    /// Ensure the backing table exists, creating it from the bootstrap seed
    /// file (or the host's built-in definition when the seed is absent).
    ///
    /// Idempotent: when the table is already present this is a no-op. A
    /// failed existence check is logged and treated as "absent" — the
    /// bootstrap definition itself is create-if-missing, so re-applying it
    /// is safe.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::LedgerBootstrap`] if the bootstrap definition
    /// cannot be applied. This is the only fatal error in a migration run:
    /// without the ledger there is no safe way to track progress.
    pub fn ensure_initialized(&self, bootstrap: &Path, log: &dyn Log) -> Result<(), MigrateError> {
        match self.table_exists() {
            Ok(true) => {
                log.debug(&format!("ledger table '{}' present", self.table));
                return Ok(());
            }
            Ok(false) => {}
            Err(e) => log.warn(&format!(
                "ledger existence check failed ({e}), bootstrapping anyway"
            )),
        }

        if bootstrap.is_file() {
            log.info(&format!("creating ledger from {}", bootstrap.display()));
            self.host
                .execute_statements(bootstrap)
                .map_err(MigrateError::LedgerBootstrap)?;
        } else {
            log.info(&format!("creating ledger table '{}'", self.table));
            self.host
                .ensure_ledger_table()
                .map_err(MigrateError::LedgerBootstrap)?;
        }
        Ok(())
    }

    fn table_exists(&self) -> Result<bool, HostError> {
        let statement = format!(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = '{}'",
            sql_quote(self.table)
        );
        Ok(self.host.query_count(&statement)? > 0)
    }

    /// Whether a unit with this exact name has been applied.
    ///
    /// Fails open: a host error or malformed count response is logged as a
    /// warning and treated as "not applied", so a real pending unit is never
    /// silently skipped.
    pub fn is_applied(&self, name: &str, log: &dyn Log) -> bool {
        let statement = format!(
            "SELECT COUNT(*) FROM {} WHERE name = '{}'",
            self.table,
            sql_quote(name)
        );
        match self.host.query_count(&statement) {
            Ok(count) => count > 0,
            Err(e) => {
                log.warn(&format!(
                    "ledger check for '{name}' failed ({e}), treating as not applied"
                ));
                false
            }
        }
    }

    /// Append one entry for a successfully applied unit.
    ///
    /// Must only be called after the unit's apply operation reported
    /// success; the engine guarantees at most one call per name per run by
    /// checking [`Self::is_applied`] immediately before dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::RecordFailed`] if the insert fails.
    pub fn record_applied(&self, name: &str) -> Result<(), MigrateError> {
        self.host
            .insert_ledger_row(name)
            .map_err(|source| MigrateError::RecordFailed {
                unit: name.to_string(),
                source,
            })
    }
}
